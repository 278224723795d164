use actix_web::{web, HttpResponse, Responder};

use crate::models::{Budget, ProfileResponse, Streaks, UserProfile};
use crate::routes::{store_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_profile));
}

/// The user document flattened with live balances and streaks
async fn get_profile(state: web::Data<AppState>) -> impl Responder {
    let user: UserProfile = match state.store.load(Document::UserProfile) {
        Ok(u) => u,
        Err(e) => return store_error("Failed to load user profile", e),
    };
    let budget: Budget = match state.store.load(Document::Budget) {
        Ok(b) => b,
        Err(e) => return store_error("Failed to load budget", e),
    };
    let streaks: Streaks = state.store.load(Document::Streaks).unwrap_or_default();

    let balance = budget.total_balance;
    let safe_to_spend =
        ((budget.total_balance - budget.locked_total()) * 100.0).round() / 100.0;

    HttpResponse::Ok().json(ProfileResponse {
        user,
        balance,
        safe_to_spend,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
    })
}
