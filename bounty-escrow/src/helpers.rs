use bounty_abi::PublicKey;
use cosmwasm_std::{Addr, Deps, MessageInfo};

use crate::error::ContractError;
use crate::state::{Config, CONFIG};

pub fn load_config(deps: Deps) -> Result<Config, ContractError> {
    Ok(CONFIG.load(deps.storage)?)
}

pub fn assert_creator(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    if *sender != config.creator {
        return Err(ContractError::Unauthorized {
            role: "the bounty creator".to_string(),
        });
    }
    Ok(())
}

pub fn address_key(deps: Deps, address: &str) -> Result<PublicKey, ContractError> {
    let canonical = deps.api.addr_canonicalize(address)?;
    PublicKey::from_slice(canonical.as_slice()).map_err(|_| ContractError::UnsupportedAddress {
        address: address.to_string(),
        length: canonical.as_slice().len(),
    })
}

pub fn reject_funds(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::UnexpectedFunds);
    }
    Ok(())
}
