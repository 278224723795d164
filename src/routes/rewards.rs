use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use validator::Validate;

use crate::models::{
    BalanceResponse, CoinLedger, CoinsResponse, EarnCoinsRequest, EarnResponse, ErrorResponse,
    PurchaseRequest, PurchaseResponse, Reward, ShopResponse,
};
use crate::routes::{not_found, store_error, validation_error, AppState};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/coins", web::get().to(get_coins))
        .route("/coins/balance", web::get().to(get_coin_balance))
        .route("/coins/earn", web::post().to(earn_coins))
        .route("/rewards-shop", web::get().to(get_rewards_shop))
        .route("/rewards-shop/purchase", web::post().to(purchase_reward));
}

async fn get_coins(state: web::Data<AppState>) -> impl Responder {
    let ledger: CoinLedger = match state.store.load(Document::Coins) {
        Ok(c) => c,
        Err(e) => return store_error("Failed to load coins", e),
    };

    HttpResponse::Ok().json(CoinsResponse {
        balance: ledger.balance,
        lifetime: ledger.lifetime,
        history: ledger.history.into_iter().take(20).collect(),
    })
}

async fn get_coin_balance(state: web::Data<AppState>) -> impl Responder {
    match state.store.load::<CoinLedger>(Document::Coins) {
        Ok(ledger) => HttpResponse::Ok().json(BalanceResponse { balance: ledger.balance }),
        Err(e) => store_error("Failed to load coins", e),
    }
}

async fn get_rewards_shop(state: web::Data<AppState>) -> impl Responder {
    let rewards: Vec<Reward> = match state.store.load(Document::RewardsShop) {
        Ok(r) => r,
        Err(e) => return store_error("Failed to load rewards shop", e),
    };
    let balance = state
        .store
        .load::<CoinLedger>(Document::Coins)
        .map(|c| c.balance)
        .unwrap_or(0);

    HttpResponse::Ok().json(ShopResponse { balance, rewards })
}

fn purchase_refused(message: String) -> HttpResponse {
    HttpResponse::Ok().json(PurchaseResponse {
        success: false,
        reward: None,
        new_balance: None,
        message,
    })
}

async fn purchase_reward(
    state: web::Data<AppState>,
    req: web::Json<PurchaseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut rewards: Vec<Reward> = match state.store.load(Document::RewardsShop) {
        Ok(r) => r,
        Err(e) => return store_error("Failed to load rewards shop", e),
    };
    let mut ledger: CoinLedger = match state.store.load(Document::Coins) {
        Ok(c) => c,
        Err(e) => return store_error("Failed to load coins", e),
    };

    let Some(reward) = rewards.iter_mut().find(|r| r.id == req.reward_id) else {
        return not_found("Reward not found");
    };

    if reward.purchased {
        return purchase_refused("Already purchased".to_string());
    }
    if matches!(reward.stock, Some(stock) if stock <= 0) {
        return purchase_refused("Out of stock".to_string());
    }
    if ledger.balance < reward.cost {
        return purchase_refused(format!(
            "Not enough coins. Need {}, have {}",
            reward.cost, ledger.balance
        ));
    }

    ledger.balance -= reward.cost;
    ledger.record(
        "spent",
        reward.cost,
        "reward",
        &format!("Redeemed: {}", reward.name),
        Local::now().format("%Y-%m-%d").to_string(),
    );

    reward.purchased = true;
    reward.purchased_at = Some(Local::now().format("%Y-%m-%d %H:%M").to_string());
    if let Some(stock) = reward.stock.as_mut() {
        *stock -= 1;
    }
    let purchased = reward.clone();

    if let Err(e) = state.store.save(Document::Coins, &ledger) {
        return store_error("Failed to save coins", e);
    }
    if let Err(e) = state.store.save(Document::RewardsShop, &rewards) {
        return store_error("Failed to save rewards shop", e);
    }

    tracing::info!("Reward redeemed: {} (-{} coins)", purchased.name, purchased.cost);

    HttpResponse::Ok().json(PurchaseResponse {
        success: true,
        message: format!("🎉 Redeemed {}!", purchased.name),
        reward: Some(purchased),
        new_balance: Some(ledger.balance),
    })
}

async fn earn_coins(
    state: web::Data<AppState>,
    req: web::Json<EarnCoinsRequest>,
) -> impl Responder {
    if req.amount <= 0 {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_amount".to_string(),
            message: "Amount must be positive".to_string(),
            status_code: 400,
        });
    }

    let mut ledger: CoinLedger = match state.store.load(Document::Coins) {
        Ok(c) => c,
        Err(e) => return store_error("Failed to load coins", e),
    };

    ledger.balance += req.amount;
    ledger.lifetime += req.amount;
    ledger.record(
        "earned",
        req.amount,
        &req.source,
        &req.label,
        Local::now().format("%Y-%m-%d").to_string(),
    );

    if let Err(e) = state.store.save(Document::Coins, &ledger) {
        return store_error("Failed to save coins", e);
    }

    HttpResponse::Ok().json(EarnResponse {
        success: true,
        new_balance: ledger.balance,
    })
}
