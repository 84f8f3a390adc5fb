use crate::client::Chain;
use crate::error::{OrchestratorError, ValidationError};
use crate::methods::submit_call;
use crate::session::Session;
use crate::txn::{populate_resources, Transaction, TransactionGroup, TxId};

/// Records a solution in the bounty's escrow under the submitter's key.
pub fn submit_solution(
    chain: &Chain<'_>,
    session: &Session<'_>,
    bounty_app_id: u64,
    description: &str,
) -> Result<TxId, OrchestratorError> {
    let result = try_submit(chain, session, bounty_app_id, description);
    chain.report(result, |_| "Submission sent".to_string())
}

fn try_submit(
    chain: &Chain<'_>,
    session: &Session<'_>,
    bounty_app_id: u64,
    description: &str,
) -> Result<TxId, OrchestratorError> {
    if description.trim().is_empty() {
        return Err(ValidationError::EmptySubmission.into());
    }
    let params = chain.algod.suggested_params()?;
    let call = submit_call(
        bounty_app_id,
        chain.config.manager_app_id,
        session.address(),
        description,
    );
    let mut txns = vec![Transaction::app_call(session.address(), call, &params)];
    populate_resources(&mut txns)?;
    let group = TransactionGroup::new(txns)?;
    let confirmation = chain.execute(session, &group)?;
    log::info!(
        "{} submitted to bounty app {}",
        session.address(),
        bounty_app_id
    );
    Ok(confirmation.tx_id)
}
