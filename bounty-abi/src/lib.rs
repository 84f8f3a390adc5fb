pub mod abi;
pub mod address;
pub mod boxes;
pub mod config;
pub mod error;
pub mod storage;

pub use abi::{AbiType, AbiValue, Method};
pub use address::{application_address, PublicKey};
pub use config::{BountyConfig, BOUNTY_CONFIG_SCHEMA};
pub use error::AbiError;
