// Service exports
pub mod advisor;
pub mod completion;
pub mod context;
pub mod insights;
pub mod store;

pub use advisor::{Advisor, AdvisorReply};
pub use completion::{strip_code_fences, CompletionClient, CompletionError};
pub use context::UserContext;
pub use insights::{Feature, InsightEngine};
pub use store::{Document, DocumentStore, StoreError};
