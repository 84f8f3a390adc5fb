use std::str::FromStr;

use bounty_abi::{application_address, BountyConfig, PublicKey};
use cosmwasm_std::{Decimal, Timestamp, Uint128};
use rand_core::{OsRng, RngCore};

use crate::client::{Chain, ImageFile, Pinning};
use crate::config::MICRO_UNITS;
use crate::error::{OrchestratorError, ValidationError};
use crate::methods::{create_bounty_call, EscrowInit};
use crate::session::Session;
use crate::txn::{populate_resources, Transaction, TransactionGroup, TxId};

/// Form input for a new bounty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateBountyRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Whole units as typed, e.g. `"100"` or `"12.5"`
    pub reward: String,
    pub deadline: Timestamp,
    pub image: Option<ImageFile>,
    /// Display-only; not recorded on chain
    pub featured: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreatedBounty {
    pub config: BountyConfig,
    pub app_address: PublicKey,
    /// First transaction of the registration group
    pub tx_id: TxId,
    pub featured: bool,
}

/// Parses a decimal amount of whole units into micro-units.
pub fn parse_reward(input: &str) -> Result<u64, ValidationError> {
    let invalid = || ValidationError::InvalidReward {
        input: input.to_string(),
    };
    let amount = Decimal::from_str(input.trim()).map_err(|_| invalid())?;
    let micro = Uint128::from(MICRO_UNITS)
        .checked_mul_floor(amount)
        .map_err(|_| invalid())?;
    let micro = u64::try_from(micro.u128()).map_err(|_| invalid())?;
    if micro == 0 {
        return Err(ValidationError::NonPositiveReward);
    }
    Ok(micro)
}

/// Checks the request and returns the reward in micro-units.
pub fn validate_request(
    request: &CreateBountyRequest,
    now: Timestamp,
) -> Result<u64, ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if request.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    let reward = parse_reward(&request.reward)?;
    if request.deadline <= now {
        return Err(ValidationError::DeadlineInPast {
            deadline: request.deadline.seconds(),
            now: now.seconds(),
        });
    }
    Ok(reward)
}

/// Drives bounty creation: image upload, escrow deploy, then the
/// registration group (manager `create_bounty` + escrow funding).
pub struct BountyCreator<'a> {
    chain: &'a Chain<'a>,
    pinning: &'a dyn Pinning,
}

impl<'a> BountyCreator<'a> {
    pub fn new(chain: &'a Chain<'a>, pinning: &'a dyn Pinning) -> Self {
        BountyCreator { chain, pinning }
    }

    /// Nothing is called until the request validates. The deploy and the
    /// registration group are separate submissions; a failure between them
    /// leaves the deployed escrow unregistered and is reported as
    /// [`OrchestratorError::OrphanedApplication`].
    pub fn create(
        &self,
        session: Option<&Session<'_>>,
        request: CreateBountyRequest,
        now: Timestamp,
        rng: &mut dyn RngCore,
    ) -> Result<CreatedBounty, OrchestratorError> {
        let result = self.try_create(session, request, now, rng);
        self.chain.report(result, |created| {
            format!(
                "Bounty \"{}\" created (app {})",
                created.config.name, created.config.app_id
            )
        })
    }

    /// [`create`](Self::create) with bounty ids drawn from the OS entropy source.
    pub fn create_with_os_rng(
        &self,
        session: Option<&Session<'_>>,
        request: CreateBountyRequest,
        now: Timestamp,
    ) -> Result<CreatedBounty, OrchestratorError> {
        self.create(session, request, now, &mut OsRng)
    }

    fn try_create(
        &self,
        session: Option<&Session<'_>>,
        request: CreateBountyRequest,
        now: Timestamp,
        rng: &mut dyn RngCore,
    ) -> Result<CreatedBounty, OrchestratorError> {
        let session = session.ok_or(ValidationError::NotConnected)?;
        let reward = validate_request(&request, now)?;
        let creator = session.address();

        let image = match &request.image {
            Some(file) => {
                let cid = self
                    .pinning
                    .upload(file)
                    .map_err(OrchestratorError::Upload)?;
                log::info!("pinned {} as {}", file.name, cid);
                self.chain.config.image_url(&cid)
            }
            None => String::new(),
        };

        let bounty_id = rng.next_u64();
        let end_time = request.deadline.seconds();
        let config = self.chain.config;

        let params = self.chain.algod.suggested_params()?;
        let deploy = Transaction::app_create(
            creator,
            config.approval_program.to_vec(),
            config.clear_program.to_vec(),
            EscrowInit {
                manager: application_address(config.manager_app_id),
                creator,
                bounty_id,
                end_time,
                reward,
                denom: config.denom.clone(),
            }
            .to_args(),
            &params,
        );
        let app_id = self
            .chain
            .execute(session, &TransactionGroup::single(deploy))?
            .application_index
            .ok_or(OrchestratorError::MissingApplicationId)?;
        let app_address = application_address(app_id);
        log::info!("deployed escrow {} at {}", app_id, app_address);

        let bounty = BountyConfig {
            bounty_id,
            name: request.title,
            category: request.category,
            description: request.description,
            creator,
            image,
            cost: reward,
            end_time,
            submission_count: 0,
            app_id,
        };

        let tx_id = self
            .register(session, &bounty, app_address)
            .map_err(|err| OrchestratorError::OrphanedApplication {
                app_id,
                reason: err.to_string(),
            })?;

        if request.featured {
            log::info!("bounty {} flagged as featured", app_id);
        }
        Ok(CreatedBounty {
            config: bounty,
            app_address,
            tx_id,
            featured: request.featured,
        })
    }

    fn register(
        &self,
        session: &Session<'_>,
        bounty: &BountyConfig,
        app_address: PublicKey,
    ) -> Result<TxId, OrchestratorError> {
        let config = self.chain.config;
        let params = self.chain.algod.suggested_params()?;
        let mut txns = vec![
            Transaction::app_call(
                bounty.creator,
                create_bounty_call(config.manager_app_id, bounty),
                &params,
            ),
            Transaction::payment(bounty.creator, app_address, config.app_funding, &params),
        ];
        populate_resources(&mut txns)?;
        let group = TransactionGroup::new(txns)?;
        Ok(self.chain.execute(session, &group)?.tx_id)
    }

    /// Tops up an escrow with the reward it will pay out.
    pub fn fund_reward(
        &self,
        session: &Session<'_>,
        app_id: u64,
        amount: u64,
    ) -> Result<TxId, OrchestratorError> {
        let result = self.try_fund(session, app_id, amount);
        self.chain
            .report(result, |_| format!("Escrow {} funded", app_id))
    }

    fn try_fund(
        &self,
        session: &Session<'_>,
        app_id: u64,
        amount: u64,
    ) -> Result<TxId, OrchestratorError> {
        let params = self.chain.algod.suggested_params()?;
        let payment = Transaction::payment(
            session.address(),
            application_address(app_id),
            amount,
            &params,
        );
        Ok(self
            .chain
            .execute(session, &TransactionGroup::single(payment))?
            .tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateBountyRequest {
        CreateBountyRequest {
            title: "Fix bug".to_string(),
            description: "Crash on start".to_string(),
            category: "Bug".to_string(),
            reward: "100".to_string(),
            deadline: Timestamp::from_seconds(2_000),
            image: None,
            featured: false,
        }
    }

    #[test]
    fn reward_is_converted_to_micro_units() {
        assert_eq!(parse_reward("100"), Ok(100_000_000));
        assert_eq!(parse_reward(" 12.5 "), Ok(12_500_000));
        assert_eq!(parse_reward("0.000001"), Ok(1));
    }

    #[test]
    fn reward_must_be_positive_number() {
        assert_eq!(parse_reward("0"), Err(ValidationError::NonPositiveReward));
        assert_eq!(parse_reward("0.0000001"), Err(ValidationError::NonPositiveReward));
        assert!(matches!(
            parse_reward("-5"),
            Err(ValidationError::InvalidReward { .. })
        ));
        assert!(matches!(
            parse_reward("abc"),
            Err(ValidationError::InvalidReward { .. })
        ));
        assert!(matches!(
            parse_reward("100000000000000"),
            Err(ValidationError::InvalidReward { .. })
        ));
    }

    #[test]
    fn validation_order() {
        let now = Timestamp::from_seconds(1_000);
        assert_eq!(validate_request(&request(), now), Ok(100_000_000));

        let mut r = request();
        r.title = "  ".to_string();
        assert_eq!(validate_request(&r, now), Err(ValidationError::EmptyTitle));

        let mut r = request();
        r.description.clear();
        assert_eq!(validate_request(&r, now), Err(ValidationError::EmptyDescription));

        let mut r = request();
        r.deadline = now;
        assert_eq!(
            validate_request(&r, now),
            Err(ValidationError::DeadlineInPast {
                deadline: 1_000,
                now: 1_000
            })
        );
    }
}
