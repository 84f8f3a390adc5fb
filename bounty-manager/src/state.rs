use cosmwasm_std::{Addr, Binary};
use cw_storage_plus::{Item, Map};

// Bounty configs and win counters live in `bounty_abi::storage::BOXES`.

/// Registered escrow contract -> name of its bounty config box
pub const BOUNTY_CONTRACTS: Map<&Addr, Binary> = Map::new("bounty_contracts");

pub const BOUNTY_COUNT: Item<u64> = Item::new("bounty_count");
pub const DEVELOPER_COUNT: Item<u64> = Item::new("developer_count");
