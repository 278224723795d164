// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityEntry, Budget, CoinEntry, CoinLedger, Comment, Direction, EarmarkedFund, FxRates,
    FxSample, GroceryItem, GroceryPrices, Intent, MarketListing, MatchWeights, Milestone, Mission,
    Perk, Post, Reward, Roasts, SquadMember, StorePrice, Streaks, Transaction, UserProfile,
    UserStats, initials_avatar,
};
pub use requests::{
    ChatRequest, EarnCoinsRequest, MissionToggleRequest, NewCommentRequest, NewExpenseRequest,
    NewPostRequest, NudgeRequest, PurchaseRequest, ScanReceiptRequest, SettleRequest,
    SplitExpenseRequest, VoteRequest,
};
pub use responses::{
    ActionResponse, BalanceResponse, ChatResponse, ClaimResponse, CoinsResponse,
    DashboardResponse, EarnResponse, ErrorResponse, InsightCard, InsightsResponse,
    ProfileResponse, PurchaseResponse, Runway, ScanReceiptResponse, SettleResponse, ShopResponse,
    SplitResponse, SquadResponse, StreakRewardItem, StreakSummary, ToggleMissionResponse, Vibe,
    VoteResponse,
};
