// Route exports
pub mod assistant;
pub mod catalog;
pub mod community;
pub mod dashboard;
pub mod profile;
pub mod rewards;
pub mod squad;
pub mod streaks;
pub mod transactions;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::Matchmaker;
use crate::models::ErrorResponse;
use crate::services::{Advisor, CompletionClient, DocumentStore, InsightEngine, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub completion: Option<Arc<CompletionClient>>,
    pub matchmaker: Matchmaker,
    pub advisor: Arc<Advisor>,
    pub insights: Arc<InsightEngine>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .configure(dashboard::configure)
            .configure(transactions::configure)
            .configure(community::configure)
            .configure(squad::configure)
            .configure(streaks::configure)
            .configure(rewards::configure)
            .configure(catalog::configure)
            .configure(profile::configure)
            .configure(assistant::configure),
    );
}

/// Version banner, also used as a liveness probe
async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Stash API v{} 🚀", env!("CARGO_PKG_VERSION")),
    }))
}

/// Map a store failure to the JSON error body handlers return
pub(crate) fn store_error(context: &str, e: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    match e {
        StoreError::NotFound(doc) => HttpResponse::NotFound().json(ErrorResponse {
            error: context.to_string(),
            message: format!("document not found: {}", doc),
            status_code: 404,
        }),
        other => HttpResponse::InternalServerError().json(ErrorResponse {
            error: context.to_string(),
            message: other.to_string(),
            status_code: 500,
        }),
    }
}

pub(crate) fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "not_found".to_string(),
        message: message.to_string(),
        status_code: 404,
    })
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
