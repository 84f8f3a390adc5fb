use bounty_abi::storage::{BoxNamesResponse, BoxResponse};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Binary, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Manager contract notified of every submission
    pub manager: String,
    pub creator: String,
    pub bounty_id: u64,
    /// Unix seconds
    pub end_time: u64,
    pub reward: Uint128,
    pub denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Record the sender's solution (one per participant, before the end time)
    Submit { description: String },

    /// Creator picks the submission to reward; may be changed until payout
    SetWinner { winner: String },

    /// Creator releases the reward to the winner (terminal)
    SendReward {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(crate::state::Config)]
    Config {},

    #[returns(BoxNamesResponse)]
    BoxNames {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(BoxResponse)]
    BoxValue { name: Binary },

    #[returns(WinnerResponse)]
    Winner {},
}

#[cw_serde]
pub struct WinnerResponse {
    pub winner: Option<String>,
    /// Checksummed address of the winner's key
    pub winner_key: Option<String>,
    pub paid: bool,
}

/// The subset of the manager's execute interface this contract calls.
#[cw_serde]
pub enum ManagerExecuteMsg {
    RecordSubmission {},
}

#[cw_serde]
pub struct MigrateMsg {}
