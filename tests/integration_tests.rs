// Integration tests for the Stash API handlers

use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use stash_api::core::Matchmaker;
use stash_api::routes::{configure_routes, AppState};
use stash_api::services::{Advisor, Document, DocumentStore, InsightEngine};

/// Seed a temp data directory with schema-complete documents
fn seed_store(dir: &TempDir) -> Arc<DocumentStore> {
    let store = Arc::new(DocumentStore::new(dir.path()));

    store
        .save(
            Document::UserProfile,
            &json!({
                "name": "Priya Sharma",
                "university": "TU Dublin",
                "course": "MSc Computer Science",
                "yearOfStudy": 1,
                "location": "Drumcondra, Dublin 9",
                "bio": "Test user",
                "homeCurrency": "INR",
                "hostCurrency": "EUR",
                "loanDate": "2026-09-01",
                "stats": {"budgetHitRate": 72.0, "totalSaved": 145.0, "transactionCount": 38}
            }),
        )
        .unwrap();

    store
        .save(
            Document::Budget,
            &json!({
                "totalBalance": 1000.0,
                "dailyBudget": 35.0,
                "spentToday": 10.0,
                "lockedFunds": [{"label": "Rent", "amount": 600.0}],
                "ghostItems": [{"label": "Tickets", "amount": 50.0}]
            }),
        )
        .unwrap();

    store
        .save(
            Document::Streaks,
            &json!({
                "currentStreak": 5,
                "longestStreak": 11,
                "todayUnderBudget": true,
                "milestones": [
                    {"days": 3, "label": "Starter", "emoji": "🔥", "reward": "Free coffee coupon",
                     "achieved": true, "claimed": false},
                    {"days": 7, "label": "Week Warrior", "emoji": "⚔️", "reward": "€5 grocery voucher",
                     "achieved": false, "claimed": false}
                ]
            }),
        )
        .unwrap();

    store
        .save(
            Document::Transactions,
            &json!([
                {"id": "tx-1", "merchant": "Lidl", "icon": "🛒", "category": "groceries",
                 "amount": -18.45, "currency": "EUR", "date": "2026-08-03T18:22:10", "type": "neutral"},
                {"id": "tx-2", "merchant": "Insomnia", "icon": "☕", "category": "coffee",
                 "amount": -4.2, "currency": "EUR", "date": "2026-08-02T09:05:44", "type": "neutral"}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::SurvivalMissions,
            &json!([
                {"id": "sm-cook", "title": "Cook dinner at home", "xp": 40, "coins": 40, "completed": false},
                {"id": "sm-walk", "title": "Walk instead of the Luas", "xp": 25, "completed": false}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::Coins,
            &json!({"balance": 100, "lifetime": 200, "history": []}),
        )
        .unwrap();

    store
        .save(
            Document::RewardsShop,
            &json!([
                {"id": "rw-coffee", "name": "Free coffee voucher", "emoji": "☕", "cost": 80, "stock": 2},
                {"id": "rw-cinema", "name": "Cinema ticket", "emoji": "🎬", "cost": 150, "stock": 3}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::CommunityPosts,
            &json!([
                {"id": "cp-offer", "author": "Arjun Mehta", "avatar": "AM",
                 "content": "Subletting my room in Rathmines for the summer, €600/month",
                 "tags": ["rathmines", "accommodation"], "intent": "OFFERING",
                 "upvotes": 1, "comments": [], "createdAt": "2026-07-30T11:20:00"}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::SquadMembers,
            &json!([
                {"id": "sq-aoife", "name": "Aoife", "amount": 24.5, "direction": "owes-you",
                 "reason": "Pizza", "daysSince": 3},
                {"id": "sq-rahul", "name": "Rahul", "amount": 12.0, "direction": "you-owe",
                 "reason": "Taxi", "daysSince": 1}
            ]),
        )
        .unwrap();

    store.save(Document::SquadActivity, &json!([])).unwrap();

    store
        .save(
            Document::Perks,
            &json!([
                {"id": "pk-boojum", "brand": "Boojum", "deal": "Free upgrade", "category": "Food",
                 "logo": "🌯", "isHot": true},
                {"id": "pk-leap", "brand": "TFI Leap", "deal": "30% off fares", "category": "Transport",
                 "logo": "🚌", "isHot": false}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::GroceryPrices,
            &json!({"items": [
                {"name": "Whole Milk 1L", "stores": [
                    {"store": "Lidl", "price": 1.09},
                    {"store": "Tesco", "price": 1.35}
                ]}
            ]}),
        )
        .unwrap();

    store
        .save(
            Document::FxRates,
            &json!({"currentRate": 0.0112, "bestTimeToTransfer": "Tuesday mornings",
                    "historicalRates": [{"date": "2026-07-27", "rate": 0.011}]}),
        )
        .unwrap();

    store
        .save(
            Document::MarketListings,
            &json!([
                {"id": "ml-desk", "title": "IKEA desk", "type": "secondhand", "price": 18.0,
                 "originalPrice": 59.0},
                {"id": "ml-kit", "title": "Kitchen starter kit", "type": "starter-kit", "price": 35.0,
                 "originalPrice": 120.0}
            ]),
        )
        .unwrap();

    store
        .save(
            Document::Roasts,
            &json!({
                "coffee": ["Another oat latte? Your rent is watching."],
                "shopping": ["Retail therapy again?"]
            }),
        )
        .unwrap();

    store
}

fn app_state(store: Arc<DocumentStore>) -> AppState {
    AppState {
        advisor: Arc::new(Advisor::new(store.clone(), None)),
        insights: Arc::new(InsightEngine::new(store.clone(), None)),
        store,
        completion: None,
        matchmaker: Matchmaker::with_default_weights(),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_dashboard_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["greeting"].as_str().unwrap().ends_with("Priya"));
    assert_eq!(body["coins"], 100);
    // 1000 - 600 locked - 50 ghost
    assert_eq!(body["runway"]["safeToSpend"], 350.0);
    assert_eq!(body["streak"]["days"], 5);
    assert_eq!(body["streak"]["label"], "🔥 5 day streak!");
    // 25/35 remaining ≈ 71.4% -> top tier
    assert_eq!(body["vibe"]["status"], "On track — thriving");
}

#[actix_web::test]
async fn test_add_transaction_assigns_roast_and_prepends() {
    let tmp = TempDir::new().unwrap();
    let store = seed_store(&tmp);
    let app = init_app!(app_state(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/transactions")
        .set_json(json!({"amount": 22.5, "category": "Coffee"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["id"].as_str().unwrap().starts_with("tx-"));
    assert_eq!(body["merchant"], "Manual Entry");
    assert_eq!(body["icon"], "☕");
    assert_eq!(body["category"], "coffee");
    // Over €15 gets the roast treatment
    assert_eq!(body["type"], "roast");
    assert_eq!(body["aiRoast"], "Another oat latte? Your rent is watching.");

    let log: Value = store.load(Document::Transactions).unwrap();
    assert_eq!(log.as_array().unwrap().len(), 3);
    assert_eq!(log[0]["id"], body["id"]);
}

#[actix_web::test]
async fn test_invalid_expense_rejected() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/transactions")
        .set_json(json!({"amount": 0.0, "category": "coffee"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_create_post_runs_matchmaker() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/community")
        .set_json(json!({
            "author": "Priya Sharma",
            "content": "Looking for a room in Rathmines, budget around €600 for the summer"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["intent"], "SEEKING");
    assert_eq!(body["avatar"], "PS");
    assert!(body["tags"].as_array().unwrap().iter().any(|t| t == "rathmines"));
    // The seeded Rathmines sublet should match on location + budget
    let ai_match = body["aiMatch"].as_str().expect("expected a matchmaker hit");
    assert!(ai_match.contains("@Arjun Mehta"));
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["isAI"], true);
    assert!(comments[0]["content"].as_str().unwrap().contains("Safety Reminder"));
}

#[actix_web::test]
async fn test_comment_and_vote_on_post() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/community/cp-offer/comment")
        .set_json(json!({"author": "Emma Walsh", "content": "Is this still available?"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["avatar"], "EW");
    assert_eq!(body["isAI"], false);

    let req = test::TestRequest::post()
        .uri("/api/community/cp-offer/vote")
        .set_json(json!({"direction": "up"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["upvotes"], 2);

    // Downvotes floor at zero
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/community/cp-offer/vote")
            .set_json(json!({"direction": "down"}))
            .to_request();
        let _: Value = test::call_and_read_body_json(&app, req).await;
    }
    let req = test::TestRequest::post()
        .uri("/api/community/cp-offer/vote")
        .set_json(json!({"direction": "down"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["upvotes"], 0);
}

#[actix_web::test]
async fn test_comment_on_unknown_post_is_404() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/community/cp-nope/comment")
        .set_json(json!({"author": "Emma", "content": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_squad_split_updates_balances() {
    let tmp = TempDir::new().unwrap();
    let store = seed_store(&tmp);
    let app = init_app!(app_state(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/squad/split")
        .set_json(json!({
            "description": "Groceries",
            "totalAmount": 30.0,
            "memberIds": ["sq-aoife", "sq-rahul"]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["perPerson"], 10.0);
    assert_eq!(body["totalPeople"], 3);

    let members: Value = store.load(Document::SquadMembers).unwrap();
    // Aoife owed 24.50, now owes 34.50
    assert_eq!(members[0]["amount"], 34.5);
    // Rahul was owed 12.00 by you; the split consumes 10 of it
    assert_eq!(members[1]["amount"], 2.0);
    assert_eq!(members[1]["direction"], "you-owe");
}

#[actix_web::test]
async fn test_squad_settle_full_balance() {
    let tmp = TempDir::new().unwrap();
    let store = seed_store(&tmp);
    let app = init_app!(app_state(store.clone()));

    // Amount 0 settles everything
    let req = test::TestRequest::post()
        .uri("/api/squad/settle")
        .set_json(json!({"memberId": "sq-aoife", "amount": 0.0}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["remaining"], 0.0);

    let members: Value = store.load(Document::SquadMembers).unwrap();
    assert_eq!(members[0]["direction"], "settled");

    let activity: Value = store.load(Document::SquadActivity).unwrap();
    assert!(activity[0]["text"].as_str().unwrap().contains("Aoife paid you €24.50"));
}

#[actix_web::test]
async fn test_mission_toggle_awards_and_claws_back() {
    let tmp = TempDir::new().unwrap();
    let store = seed_store(&tmp);
    let app = init_app!(app_state(store.clone()));

    let req = test::TestRequest::post()
        .uri("/api/survival-missions/toggle")
        .set_json(json!({"missionId": "sm-cook"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["completed"], true);
    assert_eq!(body["coinsEarned"], 40);
    assert_eq!(body["newBalance"], 140);

    let coins: Value = store.load(Document::Coins).unwrap();
    assert_eq!(coins["lifetime"], 240);
    assert_eq!(coins["history"][0]["label"], "Completed: Cook dinner at home");

    // Un-completing takes the coins back
    let req = test::TestRequest::post()
        .uri("/api/survival-missions/toggle")
        .set_json(json!({"missionId": "sm-cook"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["completed"], false);
    assert_eq!(body["coinsEarned"], 0);
    assert_eq!(body["newBalance"], 100);
}

#[actix_web::test]
async fn test_streaks_inject_milestone_coins() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/streaks").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["milestones"][0]["coins"], 50);
    assert_eq!(body["milestones"][1]["coins"], 100);
}

#[actix_web::test]
async fn test_streak_rewards_claim_flow() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/streaks/rewards").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rewards = body.as_array().unwrap();
    // Only the achieved 3-day milestone surfaces
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0]["id"], "rwd-3");

    let req = test::TestRequest::post().uri("/api/streaks/rewards/rwd-3/claim").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["reward"], "Free coffee coupon");

    // Unachieved milestones refuse the claim
    let req = test::TestRequest::post().uri("/api/streaks/rewards/rwd-7/claim").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_purchase_guards_and_success() {
    let tmp = TempDir::new().unwrap();
    let store = seed_store(&tmp);
    let app = init_app!(app_state(store.clone()));

    // 150 > 100 balance
    let req = test::TestRequest::post()
        .uri("/api/rewards-shop/purchase")
        .set_json(json!({"rewardId": "rw-cinema"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("Not enough coins"));

    let req = test::TestRequest::post()
        .uri("/api/rewards-shop/purchase")
        .set_json(json!({"rewardId": "rw-coffee"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["newBalance"], 20);
    assert_eq!(body["reward"]["stock"], 1);

    // Second purchase is refused
    let req = test::TestRequest::post()
        .uri("/api/rewards-shop/purchase")
        .set_json(json!({"rewardId": "rw-coffee"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Already purchased");

    let coins: Value = store.load(Document::Coins).unwrap();
    assert_eq!(coins["history"][0]["amount"], -80);
}

#[actix_web::test]
async fn test_earn_coins_requires_positive_amount() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/coins/earn")
        .set_json(json!({"amount": -5}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/coins/earn")
        .set_json(json!({"amount": 30}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["newBalance"], 130);
}

#[actix_web::test]
async fn test_catalog_filters() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/perks?category=Food").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["brand"], "Boojum");

    let req = test::TestRequest::get().uri("/api/perks?category=All").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get().uri("/api/grocery?item=milk").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body[0]["name"], "Whole Milk 1L");

    let req = test::TestRequest::get().uri("/api/market?type=starter-kit").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "ml-kit");

    let req = test::TestRequest::get().uri("/api/fx").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["currentRate"], 0.0112);
}

#[actix_web::test]
async fn test_profile_flattens_user_with_balances() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/profile").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["name"], "Priya Sharma");
    assert_eq!(body["balance"], 1000.0);
    // Ghost items don't count against the profile's safe-to-spend
    assert_eq!(body["safeToSpend"], 400.0);
    assert_eq!(body["currentStreak"], 5);
}

#[actix_web::test]
async fn test_chat_runs_template_pipeline() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .set_json(json!({"message": "where can I find the cheapest milk?"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["intent"], "grocery");
    assert!(body["response"].as_str().unwrap().contains("Whole Milk 1L"));
    assert!(body["sources"]
        .as_array()
        .unwrap()
        .contains(&json!("Grocery Prices Database")));
}

#[actix_web::test]
async fn test_insights_endpoint_defaults_to_dashboard() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/ai/insights").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["feature"], "dashboard");
    assert_eq!(body["source"], "Stash AI");
    assert!(!body["insights"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/api/ai/insights?feature=squad").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["feature"], "squad");
}

#[actix_web::test]
async fn test_receipt_scan_falls_back_to_line_parser() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/expense/scan")
        .set_json(json!({
            "imageBase64": "aGVsbG8=",
            "contentType": "image/png",
            "ocrLines": ["SUPERVALU", "14/03/2026", "Milk 1L  EUR 1.65", "TOTAL EUR 1.65"]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["method"], "ocr");
    assert_eq!(body["parsed"]["merchant"], "SUPERVALU");
    assert_eq!(body["parsed"]["date"], "2026-03-14");
    assert_eq!(body["parsed"]["total"], 1.65);
}

#[actix_web::test]
async fn test_receipt_scan_rejects_bad_base64() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/expense/scan")
        .set_json(json!({"imageBase64": "not base64!!"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_receipt_scan_without_lines_reports_failure() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::post()
        .uri("/api/expense/scan")
        .set_json(json!({"imageBase64": "aGVsbG8="}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], false);
    assert_eq!(body["method"], "failed");
}

#[actix_web::test]
async fn test_community_intent_filter() {
    let tmp = TempDir::new().unwrap();
    let app = init_app!(app_state(seed_store(&tmp)));

    let req = test::TestRequest::get().uri("/api/community?intent=OFFERING").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/community?intent=SEEKING").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}
