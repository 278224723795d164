use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Intent;

/// Request to create a community post
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPostRequest {
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_intent")]
    pub intent: Intent,
}

fn default_intent() -> Intent {
    Intent::General
}

/// Request to comment on a community post
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewCommentRequest {
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Request to vote on a community post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    #[serde(default = "default_vote_direction")]
    pub direction: String,
}

fn default_vote_direction() -> String {
    "up".to_string()
}

/// Request to record a manual expense
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewExpenseRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    pub merchant: Option<String>,
}

/// Request to scan a receipt image
///
/// The image travels base64-encoded in the JSON body. Clients that already
/// ran a local OCR pass may attach the raw text lines; they feed the line
/// parser when the vision model is unavailable or fails.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScanReceiptRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "image_base64", rename = "imageBase64")]
    pub image_base64: String,
    #[serde(alias = "content_type", rename = "contentType", default)]
    pub content_type: Option<String>,
    #[serde(alias = "ocr_lines", rename = "ocrLines", default)]
    pub ocr_lines: Vec<String>,
}

/// Request to split an expense across squad members
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SplitExpenseRequest {
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 0.01))]
    #[serde(alias = "total_amount", rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(alias = "member_ids", rename = "memberIds")]
    pub member_ids: Vec<String>,
    #[serde(alias = "paid_by", rename = "paidBy", default = "default_paid_by")]
    pub paid_by: String,
}

fn default_paid_by() -> String {
    "you".to_string()
}

/// Request to nudge a squad member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NudgeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "member_id", rename = "memberId")]
    pub member_id: String,
}

/// Request to settle a squad debt; amount 0 settles the full balance
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SettleRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "member_id", rename = "memberId")]
    pub member_id: String,
    #[serde(default)]
    pub amount: f64,
}

/// Request to purchase a reward from the coin shop
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "reward_id", rename = "rewardId")]
    pub reward_id: String,
}

/// Request to toggle a survival mission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MissionToggleRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "mission_id", rename = "missionId")]
    pub mission_id: String,
}

/// Request to credit coins outside the mission flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnCoinsRequest {
    #[serde(default)]
    pub amount: i64,
    #[serde(default = "default_earn_source")]
    pub source: String,
    #[serde(default = "default_earn_label")]
    pub label: String,
}

fn default_earn_source() -> String {
    "bonus".to_string()
}

fn default_earn_label() -> String {
    "Bonus coins".to_string()
}

/// Request to the advice assistant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_defaults() {
        let req: NewPostRequest =
            serde_json::from_str(r#"{"author": "Priya", "content": "hello"}"#).unwrap();
        assert_eq!(req.intent, Intent::General);
        assert!(req.tags.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_content_rejected() {
        let req: NewPostRequest =
            serde_json::from_str(r#"{"author": "Priya", "content": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_settle_amount_defaults_to_zero() {
        let req: SettleRequest = serde_json::from_str(r#"{"memberId": "sq-1"}"#).unwrap();
        assert_eq!(req.amount, 0.0);
    }

    #[test]
    fn test_scan_request_accepts_snake_case_alias() {
        let req: ScanReceiptRequest =
            serde_json::from_str(r#"{"image_base64": "aGVsbG8="}"#).unwrap();
        assert_eq!(req.image_base64, "aGVsbG8=");
        assert!(req.ocr_lines.is_empty());
    }
}
