use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use validator::Validate;

use crate::models::{
    ClaimResponse, CoinLedger, Mission, MissionToggleRequest, StreakRewardItem, Streaks,
    ToggleMissionResponse,
};
use crate::routes::{not_found, store_error, validation_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/streaks", web::get().to(get_streaks))
        .route("/survival-missions", web::get().to(get_survival_missions))
        .route("/survival-missions/toggle", web::post().to(toggle_mission))
        .route("/streaks/rewards", web::get().to(get_streak_rewards))
        .route("/streaks/rewards/{id}/claim", web::post().to(claim_reward));
}

/// Coin value attached to each streak milestone
fn milestone_coins(days: u32) -> u32 {
    match days {
        3 => 50,
        7 => 100,
        14 => 150,
        30 => 250,
        60 => 400,
        90 => 600,
        _ => 0,
    }
}

async fn get_streaks(state: web::Data<AppState>) -> impl Responder {
    let mut streaks: Streaks = match state.store.load(Document::Streaks) {
        Ok(s) => s,
        Err(e) => return store_error("Failed to load streaks", e),
    };

    for milestone in &mut streaks.milestones {
        milestone.coins = milestone_coins(milestone.days);
    }

    HttpResponse::Ok().json(streaks)
}

async fn get_survival_missions(state: web::Data<AppState>) -> impl Responder {
    let mut missions: Vec<Mission> = match state.store.load(Document::SurvivalMissions) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load survival missions", e),
    };

    // XP doubles as the coin value when unset
    for mission in &mut missions {
        if mission.coins.is_none() {
            mission.coins = Some(mission.xp);
        }
    }

    HttpResponse::Ok().json(missions)
}

async fn toggle_mission(
    state: web::Data<AppState>,
    req: web::Json<MissionToggleRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut missions: Vec<Mission> = match state.store.load(Document::SurvivalMissions) {
        Ok(m) => m,
        Err(e) => return store_error("Failed to load survival missions", e),
    };

    let Some(mission) = missions.iter_mut().find(|m| m.id == req.mission_id) else {
        return not_found("Mission not found");
    };

    mission.completed = !mission.completed;
    let completed = mission.completed;
    let coins_amount = mission.coin_value();
    let title = mission.title.clone();

    if let Err(e) = state.store.save(Document::SurvivalMissions, &missions) {
        return store_error("Failed to save survival missions", e);
    }

    let mut ledger: CoinLedger = match state.store.load(Document::Coins) {
        Ok(c) => c,
        Err(e) => return store_error("Failed to load coins", e),
    };

    if completed {
        ledger.balance += coins_amount as i64;
        ledger.lifetime += coins_amount as i64;
        ledger.record(
            "earned",
            coins_amount as i64,
            "mission",
            &format!("Completed: {}", title),
            Local::now().format("%Y-%m-%d").to_string(),
        );
        tracing::info!("Mission completed: {} (+{} coins)", title, coins_amount);
    } else {
        // Un-completing claws the coins back without a ledger entry
        ledger.balance = (ledger.balance - coins_amount as i64).max(0);
    }

    if let Err(e) = state.store.save(Document::Coins, &ledger) {
        return store_error("Failed to save coins", e);
    }

    HttpResponse::Ok().json(ToggleMissionResponse {
        success: true,
        completed,
        coins_earned: if completed { coins_amount } else { 0 },
        new_balance: Some(ledger.balance),
    })
}

async fn get_streak_rewards(state: web::Data<AppState>) -> impl Responder {
    let streaks: Streaks = match state.store.load(Document::Streaks) {
        Ok(s) => s,
        Err(e) => return store_error("Failed to load streaks", e),
    };

    let rewards: Vec<StreakRewardItem> = streaks
        .milestones
        .iter()
        .filter(|m| m.achieved)
        .map(|m| StreakRewardItem {
            id: format!("rwd-{}", m.days),
            milestone: m.label.clone(),
            emoji: m.emoji.clone(),
            reward: m.reward.clone(),
            days: m.days,
            claimed: m.claimed,
        })
        .collect();

    HttpResponse::Ok().json(rewards)
}

async fn claim_reward(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let reward_id = path.into_inner();
    let mut streaks: Streaks = match state.store.load(Document::Streaks) {
        Ok(s) => s,
        Err(e) => return store_error("Failed to load streaks", e),
    };

    let claimed = streaks
        .milestones
        .iter_mut()
        .find(|m| format!("rwd-{}", m.days) == reward_id && m.achieved);

    let Some(milestone) = claimed else {
        return HttpResponse::Ok().json(ClaimResponse {
            success: false,
            reward: None,
            message: Some("Reward not found or not yet earned".to_string()),
        });
    };

    milestone.claimed = true;
    let reward = milestone.reward.clone();

    if let Err(e) = state.store.save(Document::Streaks, &streaks) {
        return store_error("Failed to save streaks", e);
    }

    HttpResponse::Ok().json(ClaimResponse {
        success: true,
        reward: Some(reward),
        message: None,
    })
}
