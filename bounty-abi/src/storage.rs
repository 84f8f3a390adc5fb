//! Raw box namespace shared by the bounty contracts.
//!
//! Everything the indexer reads lives under this one map so a box scan sees
//! exactly what the contract wrote; bookkeeping that must stay invisible to the
//! scan goes in separate maps.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, StdResult, Storage};
use cw_storage_plus::{Bound, Map};

pub const BOXES: Map<&[u8], Binary> = Map::new("boxes");

const DEFAULT_BOX_LIMIT: u32 = 30;
const MAX_BOX_LIMIT: u32 = 100;

#[cw_serde]
pub struct BoxNamesResponse {
    pub names: Vec<Binary>,
}

#[cw_serde]
pub struct BoxResponse {
    pub name: Binary,
    pub value: Binary,
}

pub fn save_box(storage: &mut dyn Storage, name: &[u8], value: Vec<u8>) -> StdResult<()> {
    BOXES.save(storage, name, &Binary::new(value))
}

pub fn load_box(storage: &dyn Storage, name: &[u8]) -> StdResult<Option<Binary>> {
    BOXES.may_load(storage, name)
}

pub fn list_box_names(
    storage: &dyn Storage,
    start_after: Option<Binary>,
    limit: Option<u32>,
) -> StdResult<BoxNamesResponse> {
    let limit = limit.unwrap_or(DEFAULT_BOX_LIMIT).min(MAX_BOX_LIMIT) as usize;
    let start = start_after.as_ref().map(|name| Bound::exclusive(name.as_slice()));

    let names = BOXES
        .keys(storage, start, None, cosmwasm_std::Order::Ascending)
        .take(limit)
        .map(|r| r.map(Binary::new))
        .collect::<StdResult<_>>()?;

    Ok(BoxNamesResponse { names })
}

pub fn query_box(storage: &dyn Storage, name: Binary) -> StdResult<BoxResponse> {
    let value = BOXES.load(storage, name.as_slice())?;
    Ok(BoxResponse { name, value })
}
