use bounty_abi::boxes::{bounty_box_name, decode_win_count};
use bounty_abi::storage::load_box;
use bounty_abi::{BountyConfig, PublicKey};
use cosmwasm_std::{Addr, Deps, MessageInfo};

use crate::error::ContractError;

/// 32-byte key behind a bech32 address. Chains with shorter canonical
/// addresses cannot own boxes.
pub fn address_key(deps: Deps, address: &str) -> Result<PublicKey, ContractError> {
    let canonical = deps.api.addr_canonicalize(address)?;
    PublicKey::from_slice(canonical.as_slice()).map_err(|_| ContractError::UnsupportedAddress {
        address: address.to_string(),
        length: canonical.as_slice().len(),
    })
}

pub fn sender_key(deps: Deps, sender: &Addr) -> Result<PublicKey, ContractError> {
    address_key(deps, sender.as_str())
}

pub fn load_bounty(
    deps: Deps,
    creator: &PublicKey,
    bounty_id: u64,
) -> Result<BountyConfig, ContractError> {
    let value = load_box(deps.storage, &bounty_box_name(creator, bounty_id))?
        .ok_or(ContractError::BountyNotFound { bounty_id })?;
    Ok(BountyConfig::decode(&value)?)
}

/// `None` when the developer has no win counter yet.
pub fn load_win_count(deps: Deps, developer: &PublicKey) -> Result<Option<u64>, ContractError> {
    match load_box(deps.storage, developer.as_bytes())? {
        Some(value) => Ok(Some(decode_win_count(&value)?)),
        None => Ok(None),
    }
}

pub fn reject_funds(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::UnexpectedFunds);
    }
    Ok(())
}
