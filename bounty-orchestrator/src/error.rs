use bounty_abi::AbiError;
use thiserror::Error;

/// Failure reported by a collaborator (algod, indexer, pinning service, wallet).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{service} unreachable: {message}")]
    Unreachable { service: String, message: String },

    #[error("{service} rejected the request: {message}")]
    Rejected { service: String, message: String },

    #[error("{service} has no {what}")]
    NotFound { service: String, what: String },
}

/// Input problems caught before any collaborator is called.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("connect a wallet first")]
    NotConnected,

    #[error("title is required")]
    EmptyTitle,

    #[error("description is required")]
    EmptyDescription,

    #[error("reward {input:?} is not a number")]
    InvalidReward { input: String },

    #[error("reward must be greater than zero")]
    NonPositiveReward,

    #[error("deadline {deadline} must be after {now}")]
    DeadlineInPast { deadline: u64, now: u64 },

    #[error("submission text is required")]
    EmptySubmission,
}

#[derive(Error, Debug, PartialEq)]
pub enum OrchestratorError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("image upload failed: {0}")]
    Upload(ServiceError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Abi(#[from] AbiError),

    #[error("application {app_id} was deployed but registering the bounty failed: {reason}")]
    OrphanedApplication { app_id: u64, reason: String },

    #[error("deploy confirmed without an application id")]
    MissingApplicationId,

    #[error("bounty with application id {app_id} not found")]
    BountyNotFound { app_id: u64 },

    #[error("only the bounty creator can manage submissions")]
    Unauthorized,

    #[error("no submission from {submitter}")]
    SubmissionNotFound { submitter: String },

    #[error("cannot move submission from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("a winner has already been selected for this bounty")]
    WinnerAlreadySelected,

    #[error("placeholder submissions have no on-chain record")]
    PlaceholderSubmission,

    #[error("no winner has been selected")]
    NoWinner,

    #[error("{kind} references exceed the limit: {count} > {limit}")]
    ResourceLimit {
        kind: String,
        count: usize,
        limit: usize,
    },

    #[error("signer returned {got} signatures for {expected} transactions")]
    SignatureCount { expected: usize, got: usize },

    #[error("invalid configuration: {0}")]
    Config(String),
}
