//! Creator-side review of a bounty's submissions.
//!
//! ```text
//! Pending ──accept──▶ Accepted ──select_winner──▶ (winner) ──pay_reward──▶ Paid
//!    └────reject───▶ Rejected
//! ```
//!
//! At most one submission per board is ever the winner.

use std::fmt;

use bounty_abi::address::sha512_256;
use bounty_abi::{BountyConfig, PublicKey};

use crate::client::Chain;
use crate::error::OrchestratorError;
use crate::methods::{
    escrow_set_winner_call, manager_set_winner_call, register_developer_call, send_reward_call,
};
use crate::session::Session;
use crate::store::BountyStore;
use crate::txn::{populate_resources, Transaction, TransactionGroup, TxId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Rejected,
    Paid,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Accepted => "accepted",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub submitter: PublicKey,
    pub description: String,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub is_winner: bool,
    /// Synthesized for display; has no escrow box behind it
    pub placeholder: bool,
}

impl Submission {
    pub fn pending(submitter: PublicKey, description: String) -> Self {
        Submission {
            submitter,
            description,
            status: SubmissionStatus::Pending,
            feedback: None,
            is_winner: false,
            placeholder: false,
        }
    }
}

/// What to show when the escrow scan comes back empty.
pub trait SubmissionFallback {
    fn fill(&self, bounty: &BountyConfig) -> Vec<Submission>;
}

/// One placeholder per recorded `submission_count`.
pub struct PlaceholderSubmissions;

impl SubmissionFallback for PlaceholderSubmissions {
    fn fill(&self, bounty: &BountyConfig) -> Vec<Submission> {
        (0..bounty.submission_count)
            .map(|index| {
                let submitter = PublicKey(sha512_256(&[
                    b"placeholder",
                    &bounty.app_id.to_be_bytes(),
                    &index.to_be_bytes(),
                ]));
                Submission {
                    placeholder: true,
                    ..Submission::pending(submitter, format!("Submission #{}", index + 1))
                }
            })
            .collect()
    }
}

pub struct NoFallback;

impl SubmissionFallback for NoFallback {
    fn fill(&self, _bounty: &BountyConfig) -> Vec<Submission> {
        vec![]
    }
}

pub enum ReviewAccess {
    NotFound,
    Unauthorized,
    Granted(ReviewBoard),
}

/// Loads the board for `app_id` if `viewer` created that bounty.
/// Submissions are only scanned once access is established.
pub fn open_review(
    store: &dyn BountyStore,
    viewer: &PublicKey,
    app_id: u64,
    fallback: &dyn SubmissionFallback,
) -> Result<ReviewAccess, OrchestratorError> {
    let Some(bounty) = store.find_bounty(app_id)? else {
        return Ok(ReviewAccess::NotFound);
    };
    if bounty.creator != *viewer {
        log::warn!("{} denied review of bounty app {}", viewer, app_id);
        return Ok(ReviewAccess::Unauthorized);
    }

    let mut submissions: Vec<Submission> = store
        .submissions(app_id)?
        .into_iter()
        .map(|record| Submission::pending(record.submitter, record.description))
        .collect();
    if submissions.is_empty() {
        submissions = fallback.fill(&bounty);
    }
    Ok(ReviewAccess::Granted(ReviewBoard {
        bounty,
        submissions,
    }))
}

pub struct ReviewBoard {
    bounty: BountyConfig,
    submissions: Vec<Submission>,
}

impl ReviewBoard {
    pub fn bounty(&self) -> &BountyConfig {
        &self.bounty
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn submission(&self, submitter: &PublicKey) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.submitter == *submitter)
    }

    pub fn winner(&self) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.is_winner)
    }

    fn submission_mut(&mut self, submitter: &PublicKey) -> Result<&mut Submission, OrchestratorError> {
        self.submissions
            .iter_mut()
            .find(|s| s.submitter == *submitter)
            .ok_or_else(|| OrchestratorError::SubmissionNotFound {
                submitter: submitter.to_address(),
            })
    }

    fn review(
        &mut self,
        submitter: &PublicKey,
        to: SubmissionStatus,
        feedback: Option<String>,
    ) -> Result<(), OrchestratorError> {
        let submission = self.submission_mut(submitter)?;
        if submission.status != SubmissionStatus::Pending {
            return Err(OrchestratorError::InvalidTransition {
                from: submission.status.to_string(),
                to: to.to_string(),
            });
        }
        submission.status = to;
        submission.feedback = feedback;
        log::debug!("submission {} marked {}", submitter, to);
        Ok(())
    }

    pub fn accept(
        &mut self,
        submitter: &PublicKey,
        feedback: Option<String>,
    ) -> Result<(), OrchestratorError> {
        self.review(submitter, SubmissionStatus::Accepted, feedback)
    }

    pub fn reject(&mut self, submitter: &PublicKey, feedback: String) -> Result<(), OrchestratorError> {
        self.review(submitter, SubmissionStatus::Rejected, Some(feedback))
    }

    pub fn can_select_winner(&self, submitter: &PublicKey) -> bool {
        self.winner().is_none()
            && self.submission(submitter).is_some_and(|s| {
                s.status == SubmissionStatus::Accepted && !s.placeholder
            })
    }

    fn check_winner(&self, session: &Session<'_>, submitter: &PublicKey) -> Result<(), OrchestratorError> {
        if session.address() != self.bounty.creator {
            return Err(OrchestratorError::Unauthorized);
        }
        if self.winner().is_some() {
            return Err(OrchestratorError::WinnerAlreadySelected);
        }
        let submission = self
            .submission(submitter)
            .ok_or_else(|| OrchestratorError::SubmissionNotFound {
                submitter: submitter.to_address(),
            })?;
        if submission.placeholder {
            return Err(OrchestratorError::PlaceholderSubmission);
        }
        if submission.status != SubmissionStatus::Accepted {
            return Err(OrchestratorError::InvalidTransition {
                from: submission.status.to_string(),
                to: "winner".to_string(),
            });
        }
        Ok(())
    }

    /// Atomically registers the developer, records the win on the manager
    /// and marks the winner in the escrow.
    pub fn select_winner(
        &mut self,
        chain: &Chain<'_>,
        session: &Session<'_>,
        submitter: &PublicKey,
    ) -> Result<TxId, OrchestratorError> {
        let result = self.try_select_winner(chain, session, submitter);
        chain.report(result, |_| {
            format!("Winner selected: {}", submitter.to_address())
        })
    }

    fn try_select_winner(
        &mut self,
        chain: &Chain<'_>,
        session: &Session<'_>,
        submitter: &PublicKey,
    ) -> Result<TxId, OrchestratorError> {
        self.check_winner(session, submitter)?;

        let manager = chain.config.manager_app_id;
        let sender = session.address();
        let params = chain.algod.suggested_params()?;
        let mut txns = vec![
            Transaction::app_call(sender, register_developer_call(manager, *submitter), &params),
            Transaction::app_call(
                sender,
                manager_set_winner_call(manager, &self.bounty, *submitter),
                &params,
            ),
            Transaction::app_call(
                sender,
                escrow_set_winner_call(self.bounty.app_id, *submitter),
                &params,
            ),
        ];
        populate_resources(&mut txns)?;
        let group = TransactionGroup::new(txns)?;
        let confirmation = chain.execute(session, &group)?;

        self.submission_mut(submitter)?.is_winner = true;
        Ok(confirmation.tx_id)
    }

    /// Asks the escrow to release the reward to the selected winner.
    pub fn pay_reward(
        &mut self,
        chain: &Chain<'_>,
        session: &Session<'_>,
    ) -> Result<TxId, OrchestratorError> {
        let result = self.try_pay_reward(chain, session);
        chain.report(result, |_| "Reward sent".to_string())
    }

    fn try_pay_reward(
        &mut self,
        chain: &Chain<'_>,
        session: &Session<'_>,
    ) -> Result<TxId, OrchestratorError> {
        if session.address() != self.bounty.creator {
            return Err(OrchestratorError::Unauthorized);
        }
        let winner = self.winner().ok_or(OrchestratorError::NoWinner)?;
        if winner.status != SubmissionStatus::Accepted {
            return Err(OrchestratorError::InvalidTransition {
                from: winner.status.to_string(),
                to: SubmissionStatus::Paid.to_string(),
            });
        }
        let key = winner.submitter;

        let params = chain.algod.suggested_params()?;
        // inner payment fee
        let txn = Transaction::app_call(
            session.address(),
            send_reward_call(self.bounty.app_id, key),
            &params,
        )
        .with_fee_multiplier(2);
        let confirmation = chain.execute(session, &TransactionGroup::single(txn))?;

        self.submission_mut(&key)?.status = SubmissionStatus::Paid;
        Ok(confirmation.tx_id)
    }
}
