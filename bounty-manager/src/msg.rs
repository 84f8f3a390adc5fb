use bounty_abi::storage::{BoxNamesResponse, BoxResponse};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

#[cw_serde]
pub struct InstantiateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a bounty. `config` is the ABI-encoded config tuple; its creator
    /// must be the sender's key.
    CreateBounty {
        config: Binary,
        /// Escrow contract deployed for this bounty
        bounty_contract: String,
    },

    /// Open a win counter for a developer (no-op if it exists)
    RegisterDeveloper { developer: String },

    /// Credit a win to a registered developer (bounty creator only)
    SetWinner { developer: String, bounty_id: u64 },

    /// Bump the submission counter of the calling escrow contract's bounty
    RecordSubmission {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(StatsResponse)]
    Stats {},

    #[returns(BoxNamesResponse)]
    BoxNames {
        start_after: Option<Binary>,
        limit: Option<u32>,
    },

    #[returns(BoxResponse)]
    BoxValue { name: Binary },

    #[returns(bounty_abi::BountyConfig)]
    Bounty { creator: String, bounty_id: u64 },

    #[returns(WinCountResponse)]
    WinCount { developer: String },
}

#[cw_serde]
pub struct StatsResponse {
    pub bounty_count: u64,
    pub developer_count: u64,
}

#[cw_serde]
pub struct WinCountResponse {
    /// Checksummed address of the developer key
    pub developer: String,
    pub wins: u64,
    pub registered: bool,
}

#[cw_serde]
pub struct MigrateMsg {}
