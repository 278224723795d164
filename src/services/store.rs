use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur with document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The flat JSON documents backing the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Transactions,
    Budget,
    UserProfile,
    Streaks,
    SurvivalMissions,
    Coins,
    RewardsShop,
    CommunityPosts,
    SquadMembers,
    SquadActivity,
    Perks,
    GroceryPrices,
    FxRates,
    MarketListings,
    Roasts,
}

impl Document {
    pub fn filename(&self) -> &'static str {
        match self {
            Document::Transactions => "transactions.json",
            Document::Budget => "budget.json",
            Document::UserProfile => "user_profile.json",
            Document::Streaks => "streaks.json",
            Document::SurvivalMissions => "survival_missions.json",
            Document::Coins => "coins.json",
            Document::RewardsShop => "rewards_shop.json",
            Document::CommunityPosts => "community_posts.json",
            Document::SquadMembers => "squad_members.json",
            Document::SquadActivity => "squad_activity.json",
            Document::Perks => "perks.json",
            Document::GroceryPrices => "grocery_prices.json",
            Document::FxRates => "fx_rates.json",
            Document::MarketListings => "market_listings.json",
            Document::Roasts => "roasts.json",
        }
    }
}

/// Flat JSON document store
///
/// Every document is a single file under the data directory; a read
/// deserializes the whole file and a write rewrites it wholesale. There is
/// deliberately no locking or journaling here — documents are small and the
/// service mutates them one request at a time.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, doc: Document) -> PathBuf {
        self.dir.join(doc.filename())
    }

    /// Read and deserialize a whole document
    pub fn load<T: DeserializeOwned>(&self, doc: Document) -> Result<T, StoreError> {
        let path = self.path(doc);
        let raw = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(doc.filename().to_string())
            } else {
                StoreError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Serialize and rewrite a whole document
    pub fn save<T: Serialize>(&self, doc: Document, value: &T) -> Result<(), StoreError> {
        let path = self.path(doc);
        let mut raw = serde_json::to_string_pretty(value)?;
        raw.push('\n');
        fs::write(&path, raw)?;
        tracing::trace!("Saved document: {}", doc.filename());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoinEntry, CoinLedger};
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        let ledger = CoinLedger {
            balance: 120,
            lifetime: 450,
            history: vec![CoinEntry {
                id: "ch-abc123".to_string(),
                kind: "earned".to_string(),
                amount: 50,
                source: "mission".to_string(),
                label: "Completed: cook at home".to_string(),
                date: "2026-08-01".to_string(),
            }],
        };

        store.save(Document::Coins, &ledger).unwrap();
        let loaded: CoinLedger = store.load(Document::Coins).unwrap();

        assert_eq!(loaded.balance, 120);
        assert_eq!(loaded.lifetime, 450);
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history[0].amount, 50);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        let result: Result<CoinLedger, _> = store.load(Document::Coins);
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("coins.json"), "not json").unwrap();
        let store = DocumentStore::new(tmp.path());

        let result: Result<CoinLedger, _> = store.load(Document::Coins);
        assert!(matches!(result, Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_wire_format_is_camel_case_on_disk() {
        let tmp = TempDir::new().unwrap();
        let store = DocumentStore::new(tmp.path());

        let ledger = CoinLedger { balance: 1, lifetime: 1, history: vec![] };
        store.save(Document::Coins, &ledger).unwrap();

        let raw = std::fs::read_to_string(tmp.path().join("coins.json")).unwrap();
        assert!(raw.contains("\"balance\""));
        assert!(raw.ends_with('\n'));
    }
}
