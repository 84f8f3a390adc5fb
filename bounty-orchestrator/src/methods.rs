//! ABI surface of the manager and escrow applications, plus call builders
//! carrying the box references each method touches.

use bounty_abi::boxes::bounty_box_name;
use bounty_abi::{application_address, AbiError, AbiType, AbiValue, BountyConfig, Method, PublicKey};

use crate::txn::AppCall;

/// Registers the config tuple together with the escrow account it belongs to.
pub fn create_bounty() -> Method {
    Method::new(
        "create_bounty",
        vec![BountyConfig::abi_type(), AbiType::Address],
        None,
    )
}

pub fn register_developer() -> Method {
    Method::new("register_developer", vec![AbiType::Address], None)
}

/// Manager side: increments the developer's win counter.
pub fn manager_set_winner() -> Method {
    Method::new(
        "set_winner",
        vec![AbiType::Address, AbiType::Uint64],
        None,
    )
}

pub fn escrow_set_winner() -> Method {
    Method::new("set_winner", vec![AbiType::Address], None)
}

pub fn submit() -> Method {
    Method::new("submit", vec![AbiType::String], None)
}

pub fn send_reward() -> Method {
    Method::new("send_reward", vec![], None)
}

/// Escrow constructor fields in argument order. Matches the escrow's
/// instantiate message field for field.
pub const ESCROW_INIT_FIELDS: [&str; 6] = [
    "manager",
    "creator",
    "bounty_id",
    "end_time",
    "reward",
    "denom",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowInit {
    /// Account of the manager the escrow reports submissions to
    pub manager: PublicKey,
    pub creator: PublicKey,
    pub bounty_id: u64,
    pub end_time: u64,
    /// Micro-units of `denom`
    pub reward: u64,
    pub denom: String,
}

impl EscrowInit {
    pub fn abi_types() -> Vec<AbiType> {
        vec![
            AbiType::Address,
            AbiType::Address,
            AbiType::Uint64,
            AbiType::Uint64,
            AbiType::Uint64,
            AbiType::String,
        ]
    }

    pub fn to_args(&self) -> Vec<AbiValue> {
        vec![
            AbiValue::Address(self.manager),
            AbiValue::Address(self.creator),
            AbiValue::Uint64(self.bounty_id),
            AbiValue::Uint64(self.end_time),
            AbiValue::Uint64(self.reward),
            AbiValue::String(self.denom.clone()),
        ]
    }

    pub fn from_args(args: Vec<AbiValue>) -> Result<Self, AbiError> {
        let args: [AbiValue; 6] = args.try_into().map_err(|args: Vec<AbiValue>| {
            AbiError::TypeMismatch {
                expected: AbiType::Tuple(Self::abi_types()).to_string(),
                found: AbiValue::Tuple(args).abi_type().to_string(),
            }
        })?;
        let [manager, creator, bounty_id, end_time, reward, denom] = args;
        Ok(EscrowInit {
            manager: manager.as_address()?,
            creator: creator.as_address()?,
            bounty_id: bounty_id.as_u64()?,
            end_time: end_time.as_u64()?,
            reward: reward.as_u64()?,
            denom: denom.into_string()?,
        })
    }
}

pub fn create_bounty_call(manager_app_id: u64, config: &BountyConfig) -> AppCall {
    AppCall::new(
        manager_app_id,
        create_bounty(),
        vec![
            config.to_abi_value(),
            AbiValue::Address(application_address(config.app_id)),
        ],
    )
    .with_box(manager_app_id, config.box_name())
    .with_app(config.app_id)
}

pub fn register_developer_call(manager_app_id: u64, developer: PublicKey) -> AppCall {
    AppCall::new(
        manager_app_id,
        register_developer(),
        vec![AbiValue::Address(developer)],
    )
    .with_box(manager_app_id, developer.as_bytes().to_vec())
}

pub fn manager_set_winner_call(manager_app_id: u64, bounty: &BountyConfig, developer: PublicKey) -> AppCall {
    AppCall::new(
        manager_app_id,
        manager_set_winner(),
        vec![AbiValue::Address(developer), AbiValue::Uint64(bounty.bounty_id)],
    )
    .with_box(manager_app_id, developer.as_bytes().to_vec())
    .with_box(manager_app_id, bounty_box_name(&bounty.creator, bounty.bounty_id))
}

pub fn escrow_set_winner_call(bounty_app_id: u64, winner: PublicKey) -> AppCall {
    AppCall::new(
        bounty_app_id,
        escrow_set_winner(),
        vec![AbiValue::Address(winner)],
    )
    .with_box(bounty_app_id, winner.as_bytes().to_vec())
}

/// The escrow records the submission in the manager's config box as well.
pub fn submit_call(
    bounty_app_id: u64,
    manager_app_id: u64,
    submitter: PublicKey,
    description: &str,
) -> AppCall {
    AppCall::new(
        bounty_app_id,
        submit(),
        vec![AbiValue::String(description.to_string())],
    )
    .with_box(bounty_app_id, submitter.as_bytes().to_vec())
    .with_app(manager_app_id)
}

pub fn send_reward_call(bounty_app_id: u64, winner: PublicKey) -> AppCall {
    AppCall::new(bounty_app_id, send_reward(), vec![])
        .with_account(winner)
        .with_box(bounty_app_id, winner.as_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures() {
        assert_eq!(
            create_bounty().signature(),
            "create_bounty((uint64,string,string,string,address,string,uint64,uint64,uint64,uint64),address)void"
        );
        assert_eq!(register_developer().signature(), "register_developer(address)void");
        assert_eq!(manager_set_winner().signature(), "set_winner(address,uint64)void");
        assert_eq!(escrow_set_winner().signature(), "set_winner(address)void");
        assert_eq!(submit().signature(), "submit(string)void");
        assert_eq!(send_reward().signature(), "send_reward()void");
    }

    #[test]
    fn escrow_init_args_decode_back() {
        let init = EscrowInit {
            manager: application_address(1001),
            creator: PublicKey([7; 32]),
            bounty_id: 9,
            end_time: 2_000,
            reward: 100_000_000,
            denom: "ustake".to_string(),
        };
        let args = init.to_args();
        let types: Vec<AbiType> = args.iter().map(AbiValue::abi_type).collect();
        assert_eq!(types, EscrowInit::abi_types());
        assert_eq!(EscrowInit::from_args(args), Ok(init));
    }

    #[test]
    fn escrow_init_rejects_short_args() {
        assert!(matches!(
            EscrowInit::from_args(vec![AbiValue::Uint64(1)]),
            Err(AbiError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn set_winner_selectors_differ_between_contracts() {
        assert_ne!(
            manager_set_winner().selector(),
            escrow_set_winner().selector()
        );
    }
}
