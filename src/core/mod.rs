// Core text-heuristics exports
pub mod extract;
pub mod intent;
pub mod matchmaker;
pub mod receipt;

pub use extract::{auto_tags, extract_budget, extract_duration, extract_locations, merge_tags, BudgetRange};
pub use intent::{classify_topic, detect_intent, Topic};
pub use matchmaker::{announcement, comment_body, Matchmaker, ScoredCandidate};
pub use receipt::{parse_lines, ParsedReceipt, ReceiptItem};
