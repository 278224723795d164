use std::collections::HashMap;

use crate::models::{
    ActivityEntry, Budget, CoinLedger, Direction, FxRates, GroceryPrices, MarketListing, Mission,
    Perk, Post, Reward, SquadMember, Streaks, Transaction, UserProfile,
};
use crate::services::store::{Document, DocumentStore};

/// Everything known about the user, loaded best-effort from the store.
///
/// Both the advisor and the insight engine work from this snapshot; a
/// missing or unreadable document simply leaves its slot empty.
#[derive(Debug, Default)]
pub struct UserContext {
    pub user: Option<UserProfile>,
    pub budget: Option<Budget>,
    pub transactions: Vec<Transaction>,
    pub streaks: Option<Streaks>,
    pub missions: Vec<Mission>,
    pub coins: Option<CoinLedger>,
    pub squad_members: Vec<SquadMember>,
    pub squad_activity: Vec<ActivityEntry>,
    pub perks: Vec<Perk>,
    pub grocery: Option<GroceryPrices>,
    pub fx: Option<FxRates>,
    pub market: Vec<MarketListing>,
    pub community: Vec<Post>,
    pub rewards_shop: Vec<Reward>,
}

impl UserContext {
    pub fn load(store: &DocumentStore) -> Self {
        Self {
            user: store.load(Document::UserProfile).ok(),
            budget: store.load(Document::Budget).ok(),
            transactions: store.load(Document::Transactions).unwrap_or_default(),
            streaks: store.load(Document::Streaks).ok(),
            missions: store.load(Document::SurvivalMissions).unwrap_or_default(),
            coins: store.load(Document::Coins).ok(),
            squad_members: store.load(Document::SquadMembers).unwrap_or_default(),
            squad_activity: store.load(Document::SquadActivity).unwrap_or_default(),
            perks: store.load(Document::Perks).unwrap_or_default(),
            grocery: store.load(Document::GroceryPrices).ok(),
            fx: store.load(Document::FxRates).ok(),
            market: store.load(Document::MarketListings).unwrap_or_default(),
            community: store.load(Document::CommunityPosts).unwrap_or_default(),
            rewards_shop: store.load(Document::RewardsShop).unwrap_or_default(),
        }
    }

    /// Spend per category over the most recent transactions
    pub fn category_totals(&self, recent: usize) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for tx in self.transactions.iter().take(recent) {
            *totals.entry(tx.category.clone()).or_insert(0.0) += tx.amount.abs();
        }
        totals
    }

    /// The category with the highest recent spend
    pub fn top_category(&self, recent: usize) -> Option<(String, f64)> {
        self.category_totals(recent)
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// (owed to you, you owe) across the squad
    pub fn squad_totals(&self) -> (f64, f64) {
        let owed = self
            .squad_members
            .iter()
            .filter(|m| m.direction == Direction::OwesYou)
            .map(|m| m.amount)
            .sum();
        let owing = self
            .squad_members
            .iter()
            .filter(|m| m.direction == Direction::YouOwe)
            .map(|m| m.amount)
            .sum();
        (owed, owing)
    }

    /// Average spend per tracked day, from distinct transaction dates
    pub fn daily_average_spend(&self) -> f64 {
        let total: f64 = self.transactions.iter().map(|t| t.amount.abs()).sum();
        let days = self
            .transactions
            .iter()
            .map(|t| t.date.chars().take(10).collect::<String>())
            .collect::<std::collections::HashSet<_>>()
            .len()
            .max(1);
        total / days as f64
    }

    /// One-line budget digest for prompts and templates
    pub fn budget_summary(&self) -> String {
        let Some(budget) = &self.budget else {
            return String::new();
        };
        let name = self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("Student");
        let university = self
            .user
            .as_ref()
            .map(|u| u.university.as_str())
            .unwrap_or("university");
        format!(
            "User: {} at {}. Balance: €{}, Locked: €{}, Safe: €{:.2}. Daily budget: €{}, Spent today: €{}. ",
            name,
            university,
            budget.total_balance,
            budget.locked_total(),
            budget.safe_to_spend(),
            budget.daily_budget,
            budget.spent_today,
        )
    }

    /// Rich multi-line user digest for the LLM system prompt
    pub fn user_summary(&self) -> String {
        let mut out = String::new();

        if let Some(user) = &self.user {
            out.push_str(&format!(
                "**User Profile:** {}, {} at {}. Year {}. Location: {}. Bio: {}. Home currency: {}, Host: {}.\n",
                user.name,
                user.course,
                user.university,
                user.year_of_study,
                user.location,
                user.bio,
                user.home_currency,
                user.host_currency,
            ));
        }

        if let Some(budget) = &self.budget {
            let remaining = budget.daily_budget - budget.spent_today;
            out.push_str(&format!(
                "**Financial Snapshot:** Balance: €{}, Locked: €{}, Ghost: €{}, Safe-to-spend: €{:.2}. Daily budget: €{}, Spent today: €{}, Remaining: €{:.2}.\n",
                budget.total_balance,
                budget.locked_total(),
                budget.ghost_total(),
                budget.safe_to_spend(),
                budget.daily_budget,
                budget.spent_today,
                remaining,
            ));
        }

        let totals = self.category_totals(20);
        let recent_spend: f64 = totals.values().sum();
        if let Some((top, amount)) = self.top_category(20) {
            out.push_str(&format!(
                "**Spending Behavior:** Top category: {} (€{:.2} recent). Total recent spend: €{:.2} across {} transactions.\n",
                top,
                amount,
                recent_spend,
                self.transactions.len().min(20),
            ));
        }

        if let Some(streaks) = &self.streaks {
            out.push_str(&format!(
                "**Streaks:** Current: {} days, Longest: {} days. Today under budget: {}.\n",
                streaks.current_streak,
                streaks.longest_streak,
                if streaks.today_under_budget { "Yes" } else { "No" },
            ));
        }

        let completed = self.missions.iter().filter(|m| m.completed).count();
        out.push_str(&format!(
            "**Missions:** {}/{} completed.\n",
            completed,
            self.missions.len()
        ));

        if let Some(coins) = &self.coins {
            out.push_str(&format!(
                "**Coins:** Balance: {}, Lifetime: {}.\n",
                coins.balance, coins.lifetime
            ));
        }

        let (owed, owing) = self.squad_totals();
        out.push_str(&format!(
            "**Squad:** Owed to you: €{:.2}, You owe: €{:.2}. Net: €{:.2}.\n",
            owed,
            owing,
            owed - owing
        ));

        if let Some(user) = &self.user {
            out.push_str(&format!("**Next loan date:** {}.\n", user.loan_date));
        }

        if let Some(fx) = &self.fx {
            out.push_str(&format!(
                "**FX:** Current rate: ₹1 = €{}. Best time: {}.\n",
                fx.current_rate, fx.best_time_to_transfer
            ));
        }

        out
    }
}
