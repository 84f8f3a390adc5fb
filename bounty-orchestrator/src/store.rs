use bounty_abi::boxes::{
    decode_submission, decode_win_count, key_box_name, BOUNTY_BOX_NAME_LENGTH,
};
use bounty_abi::{AbiError, BountyConfig, PublicKey};

use crate::client::Indexer;
use crate::error::OrchestratorError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub submitter: PublicKey,
    pub description: String,
}

/// Read model of bounties, submissions and win counters.
pub trait BountyStore {
    fn bounties(&self) -> Result<Vec<BountyConfig>, OrchestratorError>;

    fn find_bounty(&self, app_id: u64) -> Result<Option<BountyConfig>, OrchestratorError> {
        Ok(self
            .bounties()?
            .into_iter()
            .find(|bounty| bounty.app_id == app_id))
    }

    fn submissions(&self, app_id: u64) -> Result<Vec<SubmissionRecord>, OrchestratorError>;

    fn win_counts(&self) -> Result<Vec<(PublicKey, u64)>, OrchestratorError>;
}

/// Rebuilds state by scanning application boxes through an indexer.
///
/// Transport failures abort the scan. A box that does not decode is logged
/// and skipped so one bad record cannot hide the rest.
pub struct BoxScanStore<I> {
    indexer: I,
    manager_app_id: u64,
}

impl<I: Indexer> BoxScanStore<I> {
    pub fn new(indexer: I, manager_app_id: u64) -> Self {
        BoxScanStore {
            indexer,
            manager_app_id,
        }
    }

    /// Key-named boxes of `app_id` decoded with `decode`.
    fn scan_keyed<T>(
        &self,
        app_id: u64,
        what: &str,
        decode: impl Fn(&[u8]) -> Result<T, AbiError>,
    ) -> Result<Vec<(PublicKey, T)>, OrchestratorError> {
        let mut out = Vec::new();
        for name in self.indexer.box_names(app_id)? {
            let Some(key) = key_box_name(&name) else {
                continue;
            };
            let value = self.indexer.box_value(app_id, &name)?;
            match decode(&value) {
                Ok(decoded) => out.push((key, decoded)),
                Err(err) => log::warn!("skipping {} box {} of app {}: {}", what, key, app_id, err),
            }
        }
        Ok(out)
    }
}

impl<I: Indexer> BountyStore for BoxScanStore<I> {
    fn bounties(&self) -> Result<Vec<BountyConfig>, OrchestratorError> {
        let mut bounties = Vec::new();
        for name in self.indexer.box_names(self.manager_app_id)? {
            if name.len() != BOUNTY_BOX_NAME_LENGTH {
                continue;
            }
            let value = self.indexer.box_value(self.manager_app_id, &name)?;
            match BountyConfig::decode(&value) {
                Ok(config) => bounties.push(config),
                Err(err) => log::warn!("skipping bounty box {:02x?}: {}", name, err),
            }
        }
        log::debug!("loaded {} bounties", bounties.len());
        Ok(bounties)
    }

    fn submissions(&self, app_id: u64) -> Result<Vec<SubmissionRecord>, OrchestratorError> {
        Ok(self
            .scan_keyed(app_id, "submission", decode_submission)?
            .into_iter()
            .map(|(submitter, description)| SubmissionRecord {
                submitter,
                description,
            })
            .collect())
    }

    fn win_counts(&self) -> Result<Vec<(PublicKey, u64)>, OrchestratorError> {
        self.scan_keyed(self.manager_app_id, "win counter", decode_win_count)
    }
}
