use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::{FxRates, GroceryPrices, MarketListing, Perk};
use crate::routes::{store_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/perks", web::get().to(get_perks))
        .route("/grocery", web::get().to(get_grocery))
        .route("/fx", web::get().to(get_fx))
        .route("/market", web::get().to(get_market));
}

#[derive(Debug, Deserialize)]
struct PerksQuery {
    category: Option<String>,
}

async fn get_perks(state: web::Data<AppState>, query: web::Query<PerksQuery>) -> impl Responder {
    let perks: Vec<Perk> = match state.store.load(Document::Perks) {
        Ok(p) => p,
        Err(e) => return store_error("Failed to load perks", e),
    };

    let filtered: Vec<Perk> = match query.category.as_deref() {
        Some(category) if category != "All" => {
            perks.into_iter().filter(|p| p.category == category).collect()
        }
        _ => perks,
    };

    HttpResponse::Ok().json(filtered)
}

#[derive(Debug, Deserialize)]
struct GroceryQuery {
    item: Option<String>,
}

async fn get_grocery(
    state: web::Data<AppState>,
    query: web::Query<GroceryQuery>,
) -> impl Responder {
    let data: GroceryPrices = match state.store.load(Document::GroceryPrices) {
        Ok(g) => g,
        Err(e) => return store_error("Failed to load grocery prices", e),
    };

    let items = match query.item.as_deref() {
        Some(needle) => {
            let needle = needle.to_lowercase();
            data.items
                .into_iter()
                .filter(|i| i.name.to_lowercase().contains(&needle))
                .collect()
        }
        None => data.items,
    };

    HttpResponse::Ok().json(items)
}

async fn get_fx(state: web::Data<AppState>) -> impl Responder {
    match state.store.load::<FxRates>(Document::FxRates) {
        Ok(fx) => HttpResponse::Ok().json(fx),
        Err(e) => store_error("Failed to load FX rates", e),
    }
}

#[derive(Debug, Deserialize)]
struct MarketQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn get_market(state: web::Data<AppState>, query: web::Query<MarketQuery>) -> impl Responder {
    let listings: Vec<MarketListing> = match state.store.load(Document::MarketListings) {
        Ok(l) => l,
        Err(e) => return store_error("Failed to load market listings", e),
    };

    let filtered: Vec<MarketListing> = match query.kind.as_deref() {
        Some(kind) => listings.into_iter().filter(|l| l.kind == kind).collect(),
        None => listings,
    };

    HttpResponse::Ok().json(filtered)
}
