use actix_web::{web, HttpResponse, Responder};
use chrono::{Duration, Local, NaiveDate, Timelike};

use crate::models::{
    Budget, CoinLedger, DashboardResponse, Runway, StreakSummary, Streaks, Transaction, UserProfile,
    Vibe,
};
use crate::routes::{store_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard));
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Greeting for the local hour of day
pub fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 6 {
        "Burning the midnight oil"
    } else if hour < 12 {
        "Good morning"
    } else if hour < 17 {
        "Good afternoon"
    } else if hour < 21 {
        "Good evening"
    } else {
        "Winding down"
    }
}

/// Budget mood tier for the percentage of the daily budget still unspent
pub fn vibe_for(percent_remaining: f64) -> Vibe {
    let (emoji, status, insight) = if percent_remaining >= 70.0 {
        ("📈", "On track — thriving", "Your discipline is paying off. Keep this momentum.")
    } else if percent_remaining >= 50.0 {
        ("😎", "Steady pace", "Doing well — you have room to breathe today.")
    } else if percent_remaining >= 30.0 {
        ("⚡", "Spending picking up", "Consider slowing down to protect your runway.")
    } else if percent_remaining >= 10.0 {
        ("🔶", "Budget pressure", "You're close to your limit. Only essentials from here.")
    } else {
        ("🛑", "Over budget", "Daily limit reached. Any spend extends into tomorrow's budget.")
    };

    Vibe {
        emoji: emoji.to_string(),
        status: status.to_string(),
        insight: insight.to_string(),
        percent_remaining: (percent_remaining * 10.0).round() / 10.0,
    }
}

/// Spending runway projected from the transaction log
pub fn build_runway(
    budget: &Budget,
    transactions: &[Transaction],
    loan_date: &str,
    today: NaiveDate,
    hour: u32,
) -> Runway {
    let total: f64 = transactions.iter().map(|t| t.amount.abs()).sum();
    let days_tracked = transactions
        .iter()
        .map(|t| t.date.chars().take(10).collect::<String>())
        .collect::<std::collections::HashSet<_>>()
        .len()
        .max(1);
    let daily_avg_spend = round2(total / days_tracked as f64);

    let safe_to_spend = budget.safe_to_spend();
    let days_left = if daily_avg_spend > 0.0 {
        (safe_to_spend / daily_avg_spend) as i64
    } else {
        999
    };

    let broke_date = today + Duration::days(days_left);
    let gap_days = NaiveDate::parse_from_str(loan_date, "%Y-%m-%d")
        .map(|loan| (loan - broke_date).num_days())
        .unwrap_or(0);

    let hours_elapsed = hour.max(1) as f64;

    Runway {
        days_left,
        broke_date: broke_date.format("%B %d").to_string(),
        next_loan_date: loan_date.to_string(),
        gap_days,
        daily_avg_spend,
        safe_to_spend: round2(safe_to_spend),
        locked_total: round2(budget.locked_total()),
        ghost_total: round2(budget.ghost_total()),
        avg_burn_per_hour: round2(budget.spent_today / hours_elapsed),
        saved_vs_avg: round2(daily_avg_spend - budget.spent_today),
        weekly_saved: round2(budget.daily_budget * 7.0 - daily_avg_spend * 7.0),
    }
}

async fn get_dashboard(state: web::Data<AppState>) -> impl Responder {
    let user: UserProfile = match state.store.load(Document::UserProfile) {
        Ok(u) => u,
        Err(e) => return store_error("Failed to load user profile", e),
    };
    let budget: Budget = match state.store.load(Document::Budget) {
        Ok(b) => b,
        Err(e) => return store_error("Failed to load budget", e),
    };
    let streaks: Streaks = match state.store.load(Document::Streaks) {
        Ok(s) => s,
        Err(e) => return store_error("Failed to load streaks", e),
    };
    let transactions: Vec<Transaction> = state.store.load(Document::Transactions).unwrap_or_default();
    let coins = state
        .store
        .load::<CoinLedger>(Document::Coins)
        .map(|c| c.balance)
        .unwrap_or(0);

    let now = Local::now();
    let runway = build_runway(&budget, &transactions, &user.loan_date, now.date_naive(), now.hour());

    let remaining_today = budget.daily_budget - budget.spent_today;
    let percent_remaining = if budget.daily_budget > 0.0 {
        remaining_today / budget.daily_budget * 100.0
    } else {
        0.0
    };

    let greeting = format!("{}, {}", greeting_for_hour(now.hour()), user.first_name());
    let streak = StreakSummary {
        days: streaks.current_streak,
        label: format!("🔥 {} day streak!", streaks.current_streak),
    };

    HttpResponse::Ok().json(DashboardResponse {
        user,
        budget,
        greeting,
        coins,
        runway,
        vibe: vibe_for(percent_remaining),
        streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EarmarkedFund;

    fn tx(amount: f64, date: &str) -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            merchant: "Test".to_string(),
            icon: "💸".to_string(),
            category: "food".to_string(),
            amount,
            currency: "EUR".to_string(),
            date: date.to_string(),
            ai_roast: None,
            roast_emoji: None,
            kind: "neutral".to_string(),
            perk_missed: None,
        }
    }

    #[test]
    fn test_greeting_tiers() {
        assert_eq!(greeting_for_hour(3), "Burning the midnight oil");
        assert_eq!(greeting_for_hour(9), "Good morning");
        assert_eq!(greeting_for_hour(14), "Good afternoon");
        assert_eq!(greeting_for_hour(19), "Good evening");
        assert_eq!(greeting_for_hour(22), "Winding down");
    }

    #[test]
    fn test_vibe_tiers() {
        assert_eq!(vibe_for(80.0).status, "On track — thriving");
        assert_eq!(vibe_for(55.0).status, "Steady pace");
        assert_eq!(vibe_for(35.0).status, "Spending picking up");
        assert_eq!(vibe_for(12.0).status, "Budget pressure");
        assert_eq!(vibe_for(2.0).status, "Over budget");
    }

    #[test]
    fn test_vibe_percent_rounded_to_one_decimal() {
        assert_eq!(vibe_for(66.666).percent_remaining, 66.7);
    }

    #[test]
    fn test_runway_projection() {
        let budget = Budget {
            total_balance: 500.0,
            daily_budget: 35.0,
            spent_today: 10.0,
            locked_funds: vec![EarmarkedFund { label: "Rent".to_string(), amount: 200.0 }],
            ghost_items: vec![],
        };
        let transactions = vec![
            tx(-20.0, "2026-08-01T10:00:00"),
            tx(-10.0, "2026-08-01T18:00:00"),
            tx(-30.0, "2026-08-02T12:00:00"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();

        let runway = build_runway(&budget, &transactions, "2026-09-01", today, 10);

        // 60 spent over 2 distinct days = 30/day; 300 safe / 30 = 10 days
        assert_eq!(runway.daily_avg_spend, 30.0);
        assert_eq!(runway.safe_to_spend, 300.0);
        assert_eq!(runway.days_left, 10);
        assert_eq!(runway.broke_date, "August 13");
        // Loan lands Sept 1, broke Aug 13 -> 19 day gap
        assert_eq!(runway.gap_days, 19);
        assert_eq!(runway.avg_burn_per_hour, 1.0);
        assert_eq!(runway.saved_vs_avg, 20.0);
        assert_eq!(runway.weekly_saved, 35.0);
    }

    #[test]
    fn test_runway_without_transactions() {
        let budget = Budget {
            total_balance: 500.0,
            daily_budget: 35.0,
            spent_today: 0.0,
            locked_funds: vec![],
            ghost_items: vec![],
        };
        let today = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();

        let runway = build_runway(&budget, &[], "2026-09-01", today, 0);
        assert_eq!(runway.days_left, 999);
        assert_eq!(runway.daily_avg_spend, 0.0);
    }
}
