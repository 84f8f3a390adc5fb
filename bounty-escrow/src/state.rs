use bounty_abi::PublicKey;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    pub manager: Addr,
    pub creator: Addr,
    /// Id of this bounty in the manager's registry
    pub bounty_id: u64,
    /// Submissions are refused from this time on
    pub end_time: Timestamp,
    /// Paid out in full to the winner
    pub reward: Uint128,
    pub denom: String,
}

#[cw_serde]
pub struct Winner {
    pub key: PublicKey,
    pub address: Addr,
    pub paid: bool,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const WINNER: Item<Winner> = Item::new("winner");

// Submission texts live in `bounty_abi::storage::BOXES` keyed by submitter key.

/// submitter key -> payout address (outside the box namespace)
pub const PAYEES: Map<&[u8], Addr> = Map::new("payees");
