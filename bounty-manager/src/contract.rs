use bounty_abi::boxes::{bounty_box_name, encode_win_count};
use bounty_abi::storage::{list_box_names, load_box, query_box, save_box};
use bounty_abi::BountyConfig;
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::helpers::{address_key, load_bounty, load_win_count, reject_funds, sender_key};
use crate::msg::{
    ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, StatsResponse, WinCountResponse,
};
use crate::state::{BOUNTY_CONTRACTS, BOUNTY_COUNT, DEVELOPER_COUNT};

const CONTRACT_NAME: &str = "crates.io:bounty-manager";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// ─── Instantiate ──────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    BOUNTY_COUNT.save(deps.storage, &0u64)?;
    DEVELOPER_COUNT.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", CONTRACT_NAME))
}

// ─── Execute ──────────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    reject_funds(&info)?;
    match msg {
        ExecuteMsg::CreateBounty {
            config,
            bounty_contract,
        } => execute_create_bounty(deps, env, info, config, bounty_contract),
        ExecuteMsg::RegisterDeveloper { developer } => {
            execute_register_developer(deps, info, developer)
        }
        ExecuteMsg::SetWinner {
            developer,
            bounty_id,
        } => execute_set_winner(deps, info, developer, bounty_id),
        ExecuteMsg::RecordSubmission {} => execute_record_submission(deps, info),
    }
}

// ─── Create Bounty ────────────────────────────────────────────────────

fn execute_create_bounty(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    config: Binary,
    bounty_contract: String,
) -> Result<Response, ContractError> {
    let bounty = BountyConfig::decode(&config)?;
    let creator = sender_key(deps.as_ref(), &info.sender)?;
    if bounty.creator != creator {
        return Err(ContractError::CreatorMismatch {
            config_creator: bounty.creator.to_address(),
            sender_key: creator.to_address(),
        });
    }
    if bounty.cost == 0 {
        return Err(ContractError::ZeroReward);
    }
    if bounty.app_id == 0 {
        return Err(ContractError::MissingApplication);
    }
    // Only RecordSubmission may move the counter.
    if bounty.submission_count != 0 {
        return Err(ContractError::SubmissionCountNotZero {
            submission_count: bounty.submission_count,
        });
    }

    let box_name = bounty.box_name();
    if load_box(deps.storage, &box_name)?.is_some() {
        return Err(ContractError::BountyExists {
            bounty_id: bounty.bounty_id,
        });
    }

    let contract = deps.api.addr_validate(&bounty_contract)?;
    if contract == info.sender {
        return Err(ContractError::InvalidBountyContract);
    }
    if BOUNTY_CONTRACTS.has(deps.storage, &contract) {
        return Err(ContractError::ContractAlreadyRegistered {
            contract: contract.to_string(),
        });
    }

    // Store the tuple exactly as sent so readers decode the creator's bytes.
    save_box(deps.storage, &box_name, config.to_vec())?;
    BOUNTY_CONTRACTS.save(deps.storage, &contract, &Binary::new(box_name))?;
    BOUNTY_COUNT.update(deps.storage, |n| -> StdResult<_> { Ok(n + 1) })?;

    Ok(Response::new()
        .add_attribute("action", "create_bounty")
        .add_attribute("bounty_id", bounty.bounty_id.to_string())
        .add_attribute("creator", creator.to_address())
        .add_attribute("app_id", bounty.app_id.to_string())
        .add_attribute("bounty_contract", contract.as_str()))
}

// ─── Developers ───────────────────────────────────────────────────────

fn execute_register_developer(
    deps: DepsMut,
    _info: MessageInfo,
    developer: String,
) -> Result<Response, ContractError> {
    let key = address_key(deps.as_ref(), &developer)?;

    let created = if load_win_count(deps.as_ref(), &key)?.is_none() {
        save_box(deps.storage, key.as_bytes(), encode_win_count(0))?;
        DEVELOPER_COUNT.update(deps.storage, |n| -> StdResult<_> { Ok(n + 1) })?;
        true
    } else {
        false
    };

    Ok(Response::new()
        .add_attribute("action", "register_developer")
        .add_attribute("developer", key.to_address())
        .add_attribute("created", created.to_string()))
}

fn execute_set_winner(
    deps: DepsMut,
    info: MessageInfo,
    developer: String,
    bounty_id: u64,
) -> Result<Response, ContractError> {
    // The config box is keyed by creator, so only the creator can find it.
    let creator = sender_key(deps.as_ref(), &info.sender)?;
    load_bounty(deps.as_ref(), &creator, bounty_id)?;

    let key = address_key(deps.as_ref(), &developer)?;
    let wins = load_win_count(deps.as_ref(), &key)?.ok_or_else(|| {
        ContractError::DeveloperNotRegistered {
            developer: developer.clone(),
        }
    })?;
    let wins = wins.checked_add(1).ok_or(ContractError::Overflow)?;
    save_box(deps.storage, key.as_bytes(), encode_win_count(wins))?;

    Ok(Response::new()
        .add_attribute("action", "set_winner")
        .add_attribute("bounty_id", bounty_id.to_string())
        .add_attribute("developer", key.to_address())
        .add_attribute("wins", wins.to_string()))
}

// ─── Submissions ──────────────────────────────────────────────────────

fn execute_record_submission(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let box_name = BOUNTY_CONTRACTS
        .may_load(deps.storage, &info.sender)?
        .ok_or_else(|| ContractError::Unauthorized {
            role: "a registered bounty contract".to_string(),
        })?;

    let value = load_box(deps.storage, &box_name)?
        .ok_or_else(|| StdError::not_found("bounty config box"))?;
    let mut bounty = BountyConfig::decode(&value)?;
    bounty.submission_count = bounty
        .submission_count
        .checked_add(1)
        .ok_or(ContractError::Overflow)?;
    save_box(deps.storage, &box_name, bounty.encode()?)?;

    Ok(Response::new()
        .add_attribute("action", "record_submission")
        .add_attribute("bounty_id", bounty.bounty_id.to_string())
        .add_attribute("submission_count", bounty.submission_count.to_string()))
}

// ─── Query ────────────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Stats {} => to_json_binary(&StatsResponse {
            bounty_count: BOUNTY_COUNT.load(deps.storage)?,
            developer_count: DEVELOPER_COUNT.load(deps.storage)?,
        }),
        QueryMsg::BoxNames { start_after, limit } => {
            to_json_binary(&list_box_names(deps.storage, start_after, limit)?)
        }
        QueryMsg::BoxValue { name } => to_json_binary(&query_box(deps.storage, name)?),
        QueryMsg::Bounty { creator, bounty_id } => query_bounty(deps, creator, bounty_id),
        QueryMsg::WinCount { developer } => query_win_count(deps, developer),
    }
}

fn query_bounty(deps: Deps, creator: String, bounty_id: u64) -> StdResult<Binary> {
    let key = address_key(deps, &creator).map_err(|e| StdError::generic_err(e.to_string()))?;
    let value = load_box(deps.storage, &bounty_box_name(&key, bounty_id))?
        .ok_or_else(|| StdError::not_found("bounty config box"))?;
    to_json_binary(&BountyConfig::decode(&value)?)
}

fn query_win_count(deps: Deps, developer: String) -> StdResult<Binary> {
    let key = address_key(deps, &developer).map_err(|e| StdError::generic_err(e.to_string()))?;
    let wins = load_win_count(deps, &key).map_err(|e| StdError::generic_err(e.to_string()))?;
    to_json_binary(&WinCountResponse {
        developer: key.to_address(),
        wins: wins.unwrap_or(0),
        registered: wins.is_some(),
    })
}

// ─── Migrate ──────────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
