use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Post intent in the community feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Offering,
    Seeking,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Offering => "OFFERING",
            Intent::Seeking => "SEEKING",
            Intent::General => "GENERAL",
        }
    }

    /// The intent a matchmaker counterpart must have
    pub fn counterpart(&self) -> Option<Intent> {
        match self {
            Intent::Offering => Some(Intent::Seeking),
            Intent::Seeking => Some(Intent::Offering),
            Intent::General => None,
        }
    }
}

/// Community post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub intent: Intent,
    #[serde(rename = "aiMatch", default)]
    pub ai_match: Option<String>,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Comment on a community post; `is_ai` marks matchmaker comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    #[serde(rename = "isAI", default)]
    pub is_ai: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Expense transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub merchant: String,
    pub icon: String,
    pub category: String,
    pub amount: f64,
    pub currency: String,
    pub date: String,
    #[serde(rename = "aiRoast", default)]
    pub ai_roast: Option<String>,
    #[serde(rename = "roastEmoji", default)]
    pub roast_emoji: Option<String>,
    #[serde(rename = "type", default = "default_tx_kind")]
    pub kind: String,
    #[serde(rename = "perkMissed", default)]
    pub perk_missed: Option<String>,
}

fn default_tx_kind() -> String { "neutral".to_string() }

/// User profile document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub university: String,
    pub course: String,
    #[serde(rename = "yearOfStudy", default)]
    pub year_of_study: u8,
    pub location: String,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "homeCurrency")]
    pub home_currency: String,
    #[serde(rename = "hostCurrency")]
    pub host_currency: String,
    /// Next loan drop, YYYY-MM-DD
    #[serde(rename = "loanDate")]
    pub loan_date: String,
    #[serde(default)]
    pub stats: UserStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "budgetHitRate", default)]
    pub budget_hit_rate: f64,
    #[serde(rename = "totalSaved", default)]
    pub total_saved: f64,
    #[serde(rename = "transactionCount", default)]
    pub transaction_count: u32,
}

impl UserProfile {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("there")
    }
}

/// Budget document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    #[serde(rename = "totalBalance")]
    pub total_balance: f64,
    #[serde(rename = "dailyBudget")]
    pub daily_budget: f64,
    #[serde(rename = "spentToday")]
    pub spent_today: f64,
    #[serde(rename = "lockedFunds", default)]
    pub locked_funds: Vec<EarmarkedFund>,
    #[serde(rename = "ghostItems", default)]
    pub ghost_items: Vec<EarmarkedFund>,
}

/// A labelled amount set aside from the spendable balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarmarkedFund {
    pub label: String,
    pub amount: f64,
}

impl Budget {
    pub fn locked_total(&self) -> f64 {
        self.locked_funds.iter().map(|f| f.amount).sum()
    }

    pub fn ghost_total(&self) -> f64 {
        self.ghost_items.iter().map(|g| g.amount).sum()
    }

    /// Balance minus locked funds and ghost items
    pub fn safe_to_spend(&self) -> f64 {
        self.total_balance - self.locked_total() - self.ghost_total()
    }
}

/// Streak document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Streaks {
    #[serde(rename = "currentStreak")]
    pub current_streak: u32,
    #[serde(rename = "longestStreak")]
    pub longest_streak: u32,
    #[serde(rename = "todayUnderBudget", default)]
    pub today_under_budget: bool,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub days: u32,
    pub label: String,
    pub emoji: String,
    pub reward: String,
    #[serde(default)]
    pub achieved: bool,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub coins: u32,
}

/// Survival mission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub xp: u32,
    #[serde(default)]
    pub coins: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

impl Mission {
    /// Coin value of the mission; XP doubles as coins when unset
    pub fn coin_value(&self) -> u32 {
        self.coins.unwrap_or(self.xp)
    }
}

/// Coin ledger document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinLedger {
    pub balance: i64,
    pub lifetime: i64,
    #[serde(default)]
    pub history: Vec<CoinEntry>,
}

/// Ledger entries keep earned amounts positive and spent amounts negative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub source: String,
    pub label: String,
    pub date: String,
}

impl CoinLedger {
    /// Prepend a ledger entry, trimming history to the last 50 entries
    pub fn record(&mut self, kind: &str, amount: i64, source: &str, label: &str, date: String) -> CoinEntry {
        let signed = if kind == "earned" { amount } else { -amount.abs() };
        let entry = CoinEntry {
            id: format!("ch-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]),
            kind: kind.to_string(),
            amount: signed,
            source: source.to_string(),
            label: label.to_string(),
            date,
        };
        self.history.insert(0, entry.clone());
        self.history.truncate(50);
        entry
    }
}

/// Reward in the coin shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub cost: i64,
    #[serde(default)]
    pub purchased: bool,
    #[serde(rename = "purchasedAt", default)]
    pub purchased_at: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// Debt direction between the user and a squad member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "owes-you")]
    OwesYou,
    #[serde(rename = "you-owe")]
    YouOwe,
    #[serde(rename = "settled")]
    Settled,
}

/// Squad member with a running debt balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadMember {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub direction: Direction,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "daysSince", default)]
    pub days_since: u32,
}

/// Squad activity feed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub emoji: String,
    pub text: String,
    pub time: String,
}

impl ActivityEntry {
    pub fn now(emoji: &str, text: String) -> Self {
        Self {
            id: format!("act-{}", &uuid::Uuid::new_v4().simple().to_string()[..6]),
            emoji: emoji.to_string(),
            text,
            time: "Just now".to_string(),
        }
    }
}

/// Student discount perk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perk {
    pub id: String,
    pub brand: String,
    pub deal: String,
    pub category: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub logo: String,
    #[serde(rename = "isHot", default)]
    pub is_hot: bool,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool { true }

/// Grocery price comparison document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryPrices {
    #[serde(default)]
    pub items: Vec<GroceryItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroceryItem {
    pub name: String,
    #[serde(default)]
    pub stores: Vec<StorePrice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePrice {
    pub store: String,
    pub price: f64,
    #[serde(rename = "onSale", default)]
    pub on_sale: bool,
}

impl GroceryItem {
    pub fn cheapest(&self) -> Option<&StorePrice> {
        self.stores
            .iter()
            .min_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// FX rates document (home currency -> host currency)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxRates {
    #[serde(rename = "currentRate")]
    pub current_rate: f64,
    #[serde(rename = "bestTimeToTransfer", default)]
    pub best_time_to_transfer: String,
    #[serde(rename = "historicalRates", default)]
    pub historical_rates: Vec<FxSample>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FxSample {
    pub date: String,
    pub rate: f64,
}

/// Secondhand/starter-kit/barter market listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketListing {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "originalPrice", default)]
    pub original_price: Option<f64>,
}

/// Roast lines keyed by spending category
pub type Roasts = HashMap<String, Vec<String>>;

/// Matchmaker scoring weights
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub location: f64,
    pub budget: f64,
    pub tag: f64,
    pub word: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            location: 3.0,
            budget: 2.0,
            tag: 1.0,
            word: 0.5,
        }
    }
}

/// Initials avatar from an author name ("Priya Sharma" -> "PS")
pub fn initials_avatar(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|w| w.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}
