use bounty_abi::AbiError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Abi(#[from] AbiError),

    #[error("unauthorized: only {role} can perform this action")]
    Unauthorized { role: String },

    #[error("submissions closed at {end_time}")]
    SubmissionsClosed { end_time: u64 },

    #[error("end time {end_time} is not in the future")]
    InvalidEndTime { end_time: u64 },

    #[error("submission description must not be empty")]
    EmptySubmission,

    #[error("{submitter} has already submitted to this bounty")]
    AlreadySubmitted { submitter: String },

    #[error("{submitter} has no submission for this bounty")]
    SubmissionNotFound { submitter: String },

    #[error("no winner has been selected")]
    NoWinner,

    #[error("reward has already been paid")]
    AlreadyPaid,

    #[error("insufficient escrow: need {needed}, have {available}")]
    InsufficientEscrow { needed: String, available: String },

    #[error("zero amount not allowed")]
    ZeroAmount,

    #[error("address {address} has a {length}-byte key (expected 32)")]
    UnsupportedAddress { address: String, length: usize },

    #[error("unexpected funds sent with this message")]
    UnexpectedFunds,
}
