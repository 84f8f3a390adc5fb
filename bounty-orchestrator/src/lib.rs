pub mod client;
pub mod config;
pub mod create;
pub mod error;
pub mod leaderboard;
pub mod methods;
pub mod review;
pub mod session;
pub mod store;
pub mod submit;
pub mod txn;

pub use client::{
    Algod, Chain, Confirmation, ImageFile, Indexer, Notice, NoticeLevel, Notifier, Pinning,
};
pub use config::OrchestratorConfig;
pub use create::{BountyCreator, CreateBountyRequest, CreatedBounty};
pub use error::{OrchestratorError, ServiceError, ValidationError};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use review::{open_review, ReviewAccess, ReviewBoard, SubmissionStatus};
pub use session::{Session, SignedTransaction, Signer};
pub use store::{BountyStore, BoxScanStore};
pub use submit::submit_solution;
