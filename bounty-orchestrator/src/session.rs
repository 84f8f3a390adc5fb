use bounty_abi::PublicKey;

use crate::error::{OrchestratorError, ServiceError};
use crate::txn::{Transaction, TransactionGroup, TxId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx_id: TxId,
    pub blob: Vec<u8>,
}

/// Wallet capability. Signs the members of `group` at `indexes`.
pub trait Signer {
    fn sign(
        &self,
        group: &[Transaction],
        indexes: &[usize],
    ) -> Result<Vec<SignedTransaction>, ServiceError>;
}

/// A connected wallet: the active address plus something that signs for it.
pub struct Session<'a> {
    address: PublicKey,
    signer: &'a dyn Signer,
}

impl<'a> Session<'a> {
    pub fn new(address: PublicKey, signer: &'a dyn Signer) -> Self {
        Session { address, signer }
    }

    pub fn address(&self) -> PublicKey {
        self.address
    }

    pub fn sign_all(
        &self,
        group: &TransactionGroup,
    ) -> Result<Vec<SignedTransaction>, OrchestratorError> {
        let indexes: Vec<usize> = (0..group.len()).collect();
        let signed = self.signer.sign(group.transactions(), &indexes)?;
        if signed.len() != group.len() {
            return Err(OrchestratorError::SignatureCount {
                expected: group.len(),
                got: signed.len(),
            });
        }
        Ok(signed)
    }
}
