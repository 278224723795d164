use serde::{Deserialize, Serialize};

use crate::core::receipt::ParsedReceipt;
use crate::models::domain::{
    ActivityEntry, Budget, CoinEntry, Reward, SquadMember, UserProfile,
};

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Response from the advice assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<String>,
    pub intent: String,
}

/// Response from the receipt scanner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReceiptResponse {
    pub success: bool,
    pub parsed: Option<ParsedReceipt>,
    pub message: String,
    pub method: String,
}

/// Dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: UserProfile,
    pub budget: Budget,
    pub greeting: String,
    pub coins: i64,
    pub runway: Runway,
    pub vibe: Vibe,
    pub streak: StreakSummary,
}

/// Spending runway projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runway {
    #[serde(rename = "daysLeft")]
    pub days_left: i64,
    #[serde(rename = "brokeDate")]
    pub broke_date: String,
    #[serde(rename = "nextLoanDate")]
    pub next_loan_date: String,
    #[serde(rename = "gapDays")]
    pub gap_days: i64,
    #[serde(rename = "dailyAvgSpend")]
    pub daily_avg_spend: f64,
    #[serde(rename = "safeToSpend")]
    pub safe_to_spend: f64,
    #[serde(rename = "lockedTotal")]
    pub locked_total: f64,
    #[serde(rename = "ghostTotal")]
    pub ghost_total: f64,
    #[serde(rename = "avgBurnPerHour")]
    pub avg_burn_per_hour: f64,
    #[serde(rename = "savedVsAvg")]
    pub saved_vs_avg: f64,
    #[serde(rename = "weeklySaved")]
    pub weekly_saved: f64,
}

/// Budget mood for the day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vibe {
    pub emoji: String,
    pub status: String,
    pub insight: String,
    #[serde(rename = "percentRemaining")]
    pub percent_remaining: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSummary {
    pub days: u32,
    pub label: String,
}

/// Profile payload: the user document flattened with live balances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub balance: f64,
    #[serde(rename = "safeToSpend")]
    pub safe_to_spend: f64,
    #[serde(rename = "currentStreak")]
    pub current_streak: u32,
    #[serde(rename = "longestStreak")]
    pub longest_streak: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadResponse {
    pub members: Vec<SquadMember>,
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitResponse {
    pub success: bool,
    #[serde(rename = "perPerson")]
    pub per_person: f64,
    #[serde(rename = "totalPeople")]
    pub total_people: usize,
    pub activity: ActivityEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResponse {
    pub success: bool,
    pub remaining: f64,
}

/// Generic success/message pair for small mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub upvotes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinsResponse {
    pub balance: i64,
    pub lifetime: i64,
    pub history: Vec<CoinEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopResponse {
    pub balance: i64,
    pub rewards: Vec<Reward>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    #[serde(default)]
    pub reward: Option<Reward>,
    #[serde(rename = "newBalance", default)]
    pub new_balance: Option<i64>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnResponse {
    pub success: bool,
    #[serde(rename = "newBalance")]
    pub new_balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleMissionResponse {
    pub success: bool,
    pub completed: bool,
    #[serde(rename = "coinsEarned")]
    pub coins_earned: u32,
    #[serde(rename = "newBalance")]
    pub new_balance: Option<i64>,
}

/// A streak milestone surfaced as a claimable reward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakRewardItem {
    pub id: String,
    pub milestone: String,
    pub emoji: String,
    pub reward: String,
    pub days: u32,
    pub claimed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub success: bool,
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One insight card for a feature screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightCard {
    pub emoji: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightCard>,
    pub source: String,
    pub feature: String,
}
