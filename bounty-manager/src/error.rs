use bounty_abi::AbiError;
use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("malformed bounty config: {0}")]
    Abi(#[from] AbiError),

    #[error("unauthorized: only {role} can perform this action")]
    Unauthorized { role: String },

    #[error("bounty config creator {config_creator} does not match sender key {sender_key}")]
    CreatorMismatch {
        config_creator: String,
        sender_key: String,
    },

    #[error("bounty {bounty_id} already exists for this creator")]
    BountyExists { bounty_id: u64 },

    #[error("bounty {bounty_id} not found for this creator")]
    BountyNotFound { bounty_id: u64 },

    #[error("bounty contract {contract} is already registered")]
    ContractAlreadyRegistered { contract: String },

    #[error("bounty reward must be greater than zero")]
    ZeroReward,

    #[error("bounty config must reference a deployed application")]
    MissingApplication,

    #[error("new bounty must start with zero submissions (got {submission_count})")]
    SubmissionCountNotZero { submission_count: u64 },

    #[error("bounty contract must not be the creator's own account")]
    InvalidBountyContract,

    #[error("developer {developer} is not registered")]
    DeveloperNotRegistered { developer: String },

    #[error("address {address} has a {length}-byte key (expected 32)")]
    UnsupportedAddress { address: String, length: usize },

    #[error("unexpected funds sent with this message")]
    UnexpectedFunds,

    #[error("overflow in arithmetic operation")]
    Overflow,
}
