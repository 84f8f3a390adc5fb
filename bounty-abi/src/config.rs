use cosmwasm_schema::cw_serde;

use crate::abi::{AbiType, AbiValue};
use crate::address::PublicKey;
use crate::boxes::bounty_box_name;
use crate::error::AbiError;

/// Tuple schema of the bounty config box. Field order is part of the on-chain layout.
pub const BOUNTY_CONFIG_SCHEMA: &str =
    "(uint64,string,string,string,address,string,uint64,uint64,uint64,uint64)";

/// Per-bounty configuration as stored in the manager's config box.
#[cw_serde]
pub struct BountyConfig {
    /// Client-chosen pseudo-random id
    pub bounty_id: u64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub creator: PublicKey,
    /// Content URL of the bounty image, empty when none was attached
    pub image: String,
    /// Reward in micro-units
    pub cost: u64,
    /// Unix seconds
    pub end_time: u64,
    pub submission_count: u64,
    /// Application id of the per-bounty escrow instance
    pub app_id: u64,
}

impl BountyConfig {
    pub fn abi_type() -> AbiType {
        AbiType::Tuple(vec![
            AbiType::Uint64,
            AbiType::String,
            AbiType::String,
            AbiType::String,
            AbiType::Address,
            AbiType::String,
            AbiType::Uint64,
            AbiType::Uint64,
            AbiType::Uint64,
            AbiType::Uint64,
        ])
    }

    pub fn to_abi_value(&self) -> AbiValue {
        AbiValue::Tuple(vec![
            AbiValue::Uint64(self.bounty_id),
            AbiValue::String(self.name.clone()),
            AbiValue::String(self.category.clone()),
            AbiValue::String(self.description.clone()),
            AbiValue::Address(self.creator),
            AbiValue::String(self.image.clone()),
            AbiValue::Uint64(self.cost),
            AbiValue::Uint64(self.end_time),
            AbiValue::Uint64(self.submission_count),
            AbiValue::Uint64(self.app_id),
        ])
    }

    pub fn from_abi_value(value: AbiValue) -> Result<Self, AbiError> {
        let fields: [AbiValue; 10] =
            value
                .into_tuple()?
                .try_into()
                .map_err(|fields: Vec<AbiValue>| AbiError::TypeMismatch {
                    expected: BOUNTY_CONFIG_SCHEMA.to_string(),
                    found: AbiValue::Tuple(fields).abi_type().to_string(),
                })?;
        let [bounty_id, name, category, description, creator, image, cost, end_time, submission_count, app_id] =
            fields;
        Ok(BountyConfig {
            bounty_id: bounty_id.as_u64()?,
            name: name.into_string()?,
            category: category.into_string()?,
            description: description.into_string()?,
            creator: creator.as_address()?,
            image: image.into_string()?,
            cost: cost.as_u64()?,
            end_time: end_time.as_u64()?,
            submission_count: submission_count.as_u64()?,
            app_id: app_id.as_u64()?,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, AbiError> {
        self.to_abi_value().encode()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AbiError> {
        BountyConfig::from_abi_value(AbiValue::decode(&BountyConfig::abi_type(), bytes)?)
    }

    pub fn box_name(&self) -> Vec<u8> {
        bounty_box_name(&self.creator, self.bounty_id)
    }

    pub fn is_open(&self, now_seconds: u64) -> bool {
        now_seconds < self.end_time
    }
}
