use actix_web::{web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use validator::Validate;

use crate::core::receipt::{parse_lines, ParsedReceipt};
use crate::models::{
    NewExpenseRequest, Roasts, ScanReceiptRequest, ScanReceiptResponse, Transaction,
};
use crate::routes::{store_error, validation_error, AppState};
use crate::services::completion::{strip_code_fences, CompletionClient};
use crate::services::Document;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/transactions", web::get().to(get_transactions))
        .route("/transactions", web::post().to(add_transaction))
        .route("/expense/scan", web::post().to(scan_receipt));
}

async fn get_transactions(state: web::Data<AppState>) -> impl Responder {
    match state.store.load::<Vec<Transaction>>(Document::Transactions) {
        Ok(transactions) => HttpResponse::Ok().json(transactions),
        Err(e) => store_error("Failed to load transactions", e),
    }
}

/// Icon per spending category; anything unknown gets the generic money icon
fn category_icon(category: &str) -> &'static str {
    match category {
        "coffee" => "☕",
        "food" => "🍕",
        "transport" => "🚗",
        "groceries" => "🛒",
        "entertainment" => "🎮",
        "school" => "📚",
        "shopping" => "🛍️",
        _ => "💸",
    }
}

/// Pick a roast line for the category. The category's list is rotated by the
/// log length so consecutive expenses cycle through the lines; categories
/// without their own list borrow the shopping lines.
fn pick_roast(roasts: &Roasts, category: &str, rotation: usize) -> String {
    let list = roasts
        .get(category)
        .filter(|l| !l.is_empty())
        .or_else(|| roasts.get("shopping").filter(|l| !l.is_empty()));
    match list {
        Some(lines) => lines[rotation % lines.len()].clone(),
        None => "Money well spent... or was it?".to_string(),
    }
}

async fn add_transaction(
    state: web::Data<AppState>,
    req: web::Json<NewExpenseRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut transactions: Vec<Transaction> =
        match state.store.load(Document::Transactions) {
            Ok(t) => t,
            Err(e) => return store_error("Failed to load transactions", e),
        };
    let roasts: Roasts = state.store.load(Document::Roasts).unwrap_or_default();

    let category = req.category.to_lowercase();
    let roast = pick_roast(&roasts, &category, transactions.len());

    let new_tx = Transaction {
        id: format!("tx-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
        merchant: req.merchant.clone().unwrap_or_else(|| "Manual Entry".to_string()),
        icon: category_icon(&category).to_string(),
        category,
        amount: req.amount,
        currency: "EUR".to_string(),
        date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        ai_roast: Some(roast),
        roast_emoji: Some("🤖".to_string()),
        kind: (if req.amount > 15.0 { "roast" } else { "neutral" }).to_string(),
        perk_missed: None,
    };

    transactions.insert(0, new_tx.clone());
    if let Err(e) = state.store.save(Document::Transactions, &transactions) {
        return store_error("Failed to save transactions", e);
    }

    tracing::info!("Recorded expense {} (€{:.2})", new_tx.id, new_tx.amount);
    HttpResponse::Ok().json(new_tx)
}

const VISION_SYSTEM_PROMPT: &str = "You are an expert receipt OCR system. Extract structured data from the receipt image. \
     Return ONLY valid JSON with this exact schema:\n\
     {\"merchant\": \"Store Name\", \"date\": \"YYYY-MM-DD\", \
     \"items\": [{\"name\": \"Item name\", \"price\": 1.99}], \
     \"total\": 10.50, \"currency\": \"EUR\"}\n\
     Rules:\n\
     - Extract EVERY line item with its exact price\n\
     - The total should match the receipt total, not the sum of items\n\
     - Use the actual store name from the receipt\n\
     - If you cannot read something clearly, make your best guess\n\
     - Always return valid JSON, nothing else.";

async fn vision_scan(
    client: &CompletionClient,
    mime: &str,
    image_b64: &str,
) -> Result<ParsedReceipt, String> {
    let raw = client
        .vision(
            VISION_SYSTEM_PROMPT,
            "Extract all items, prices, merchant name, date, and total from this receipt image:",
            mime,
            image_b64,
        )
        .await
        .map_err(|e| e.to_string())?;

    let mut parsed: ParsedReceipt =
        serde_json::from_str(strip_code_fences(&raw)).map_err(|e| e.to_string())?;
    parsed.normalize();
    Ok(parsed)
}

/// Receipt scan pipeline: vision model first when configured, then the local
/// OCR line parser over client-supplied text lines, then a structured failure.
async fn scan_receipt(
    state: web::Data<AppState>,
    req: web::Json<ScanReceiptRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let image_bytes = match BASE64.decode(req.image_base64.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpResponse::BadRequest().json(crate::models::ErrorResponse {
                error: "invalid_image".to_string(),
                message: format!("Image is not valid base64: {}", e),
                status_code: 400,
            });
        }
    };

    let mime = match req.content_type.as_deref() {
        Some(ct @ ("image/jpeg" | "image/png" | "image/webp" | "image/gif")) => ct,
        _ => "image/jpeg",
    };

    tracing::debug!("Scanning receipt image: {} bytes ({})", image_bytes.len(), mime);

    if let Some(client) = &state.completion {
        match vision_scan(client, mime, &req.image_base64).await {
            Ok(parsed) => {
                return HttpResponse::Ok().json(ScanReceiptResponse {
                    success: true,
                    parsed: Some(parsed),
                    message: format!("Receipt scanned with AI Vision ({})", client.model()),
                    method: "ai".to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("Vision scan failed, falling back to line parser: {}", e);
            }
        }
    }

    if !req.ocr_lines.is_empty() {
        let parsed = parse_lines(&req.ocr_lines);
        if !parsed.items.is_empty() {
            return HttpResponse::Ok().json(ScanReceiptResponse {
                success: true,
                parsed: Some(parsed),
                message: "Receipt parsed from OCR text lines".to_string(),
                method: "ocr".to_string(),
            });
        }
    }

    HttpResponse::Ok().json(ScanReceiptResponse {
        success: false,
        parsed: None,
        message: "Could not read the receipt. Please try a clearer image.".to_string(),
        method: "failed".to_string(),
    })
}
