use bounty_abi::boxes::encode_submission;
use bounty_abi::storage::{list_box_names, load_box, query_box, save_box};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coin, to_json_binary, BankMsg, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
    Timestamp, WasmMsg,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::helpers::{address_key, assert_creator, load_config, reject_funds};
use crate::msg::{
    ExecuteMsg, InstantiateMsg, ManagerExecuteMsg, MigrateMsg, QueryMsg, WinnerResponse,
};
use crate::state::{Config, Winner, CONFIG, PAYEES, WINNER};

const CONTRACT_NAME: &str = "crates.io:bounty-escrow";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// ─── Instantiate ──────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.reward.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    let end_time = Timestamp::from_seconds(msg.end_time);
    if end_time <= env.block.time {
        return Err(ContractError::InvalidEndTime {
            end_time: msg.end_time,
        });
    }

    let config = Config {
        manager: deps.api.addr_validate(&msg.manager)?,
        creator: deps.api.addr_validate(&msg.creator)?,
        bounty_id: msg.bounty_id,
        end_time,
        reward: msg.reward,
        denom: msg.denom,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", CONTRACT_NAME)
        .add_attribute("bounty_id", config.bounty_id.to_string())
        .add_attribute("creator", config.creator.as_str()))
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
        ExecuteMsg::Submit { description } => execute_submit(deps, env, info, description),
        ExecuteMsg::SetWinner { winner } => execute_set_winner(deps, info, winner),
        ExecuteMsg::SendReward {} => execute_send_reward(deps, env, info),
    }
}

// ─── Submit ───────────────────────────────────────────────────────────

fn execute_submit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    description: String,
) -> Result<Response, ContractError> {
    let config = load_config(deps.as_ref())?;
    if env.block.time >= config.end_time {
        return Err(ContractError::SubmissionsClosed {
            end_time: config.end_time.seconds(),
        });
    }
    if description.trim().is_empty() {
        return Err(ContractError::EmptySubmission);
    }

    let key = address_key(deps.as_ref(), info.sender.as_str())?;
    if load_box(deps.storage, key.as_bytes())?.is_some() {
        return Err(ContractError::AlreadySubmitted {
            submitter: info.sender.to_string(),
        });
    }
    save_box(deps.storage, key.as_bytes(), encode_submission(&description)?)?;
    PAYEES.save(deps.storage, key.as_bytes(), &info.sender)?;

    let notify = WasmMsg::Execute {
        contract_addr: config.manager.to_string(),
        msg: to_json_binary(&ManagerExecuteMsg::RecordSubmission {})?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(notify)
        .add_attribute("action", "submit")
        .add_attribute("bounty_id", config.bounty_id.to_string())
        .add_attribute("submitter", key.to_address()))
}

// ─── Winner & Payout ──────────────────────────────────────────────────

fn execute_set_winner(
    deps: DepsMut,
    info: MessageInfo,
    winner: String,
) -> Result<Response, ContractError> {
    let config = load_config(deps.as_ref())?;
    assert_creator(&config, &info.sender)?;

    if let Some(current) = WINNER.may_load(deps.storage)? {
        if current.paid {
            return Err(ContractError::AlreadyPaid);
        }
    }

    let key = address_key(deps.as_ref(), &winner)?;
    let address = PAYEES
        .may_load(deps.storage, key.as_bytes())?
        .ok_or_else(|| ContractError::SubmissionNotFound {
            submitter: winner.clone(),
        })?;

    WINNER.save(
        deps.storage,
        &Winner {
            key,
            address,
            paid: false,
        },
    )?;

    Ok(Response::new()
        .add_attribute("action", "set_winner")
        .add_attribute("bounty_id", config.bounty_id.to_string())
        .add_attribute("winner", key.to_address()))
}

fn execute_send_reward(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = load_config(deps.as_ref())?;
    assert_creator(&config, &info.sender)?;

    let mut winner = WINNER
        .may_load(deps.storage)?
        .ok_or(ContractError::NoWinner)?;
    if winner.paid {
        return Err(ContractError::AlreadyPaid);
    }

    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?
        .amount;
    if balance < config.reward {
        return Err(ContractError::InsufficientEscrow {
            needed: config.reward.to_string(),
            available: balance.to_string(),
        });
    }

    winner.paid = true;
    WINNER.save(deps.storage, &winner)?;

    let payout = BankMsg::Send {
        to_address: winner.address.to_string(),
        amount: vec![coin(config.reward.u128(), &config.denom)],
    };

    Ok(Response::new()
        .add_message(payout)
        .add_attribute("action", "send_reward")
        .add_attribute("bounty_id", config.bounty_id.to_string())
        .add_attribute("winner", winner.key.to_address())
        .add_attribute("amount", config.reward.to_string()))
}

// ─── Query ────────────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&CONFIG.load(deps.storage)?),
        QueryMsg::BoxNames { start_after, limit } => {
            to_json_binary(&list_box_names(deps.storage, start_after, limit)?)
        }
        QueryMsg::BoxValue { name } => to_json_binary(&query_box(deps.storage, name)?),
        QueryMsg::Winner {} => {
            let winner = WINNER.may_load(deps.storage)?;
            to_json_binary(&WinnerResponse {
                winner: winner.as_ref().map(|w| w.address.to_string()),
                winner_key: winner.as_ref().map(|w| w.key.to_address()),
                paid: winner.map(|w| w.paid).unwrap_or(false),
            })
        }
    }
}

// ─── Migrate ──────────────────────────────────────────────────────────

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
