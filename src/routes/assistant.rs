use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use validator::Validate;

use crate::models::{ChatRequest, ChatResponse};
use crate::routes::{validation_error, AppState};
use crate::services::Feature;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat))
        .route("/ai/insights", web::get().to(ai_insights));
}

/// Advice assistant: classify -> load context -> generate
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let reply = state.advisor.run(&req.message).await;

    HttpResponse::Ok().json(ChatResponse {
        response: reply.response,
        sources: reply.sources,
        intent: reply.topic.as_str().to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct InsightsQuery {
    feature: Option<String>,
}

/// Context-aware insight cards for a feature screen
async fn ai_insights(
    state: web::Data<AppState>,
    query: web::Query<InsightsQuery>,
) -> impl Responder {
    let feature = Feature::parse(query.feature.as_deref().unwrap_or("dashboard"));
    let response = state.insights.generate(feature).await;
    HttpResponse::Ok().json(response)
}
