use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, ServiceError};
use crate::session::{Session, SignedTransaction};
use crate::txn::{SuggestedParams, TransactionGroup, TxId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_id: TxId,
    pub confirmed_round: u64,
    /// Set when the confirmed transaction created an application
    pub application_index: Option<u64>,
}

/// Node endpoint used to build and submit transactions.
pub trait Algod {
    fn suggested_params(&self) -> Result<SuggestedParams, ServiceError>;

    /// Returns the id of the first transaction in the group.
    fn send_group(&self, signed: &[SignedTransaction]) -> Result<TxId, ServiceError>;

    fn wait_for_confirmation(
        &self,
        tx_id: &TxId,
        max_rounds: u64,
    ) -> Result<Confirmation, ServiceError>;
}

/// Read side: enumerate and fetch application boxes.
pub trait Indexer {
    fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>, ServiceError>;

    fn box_value(&self, app_id: u64, name: &[u8]) -> Result<Vec<u8>, ServiceError>;
}

impl<T: Indexer + ?Sized> Indexer for &T {
    fn box_names(&self, app_id: u64) -> Result<Vec<Vec<u8>>, ServiceError> {
        (**self).box_names(app_id)
    }

    fn box_value(&self, app_id: u64, name: &[u8]) -> Result<Vec<u8>, ServiceError> {
        (**self).box_value(app_id, name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Content-addressed storage. Returns the content id.
pub trait Pinning {
    fn upload(&self, file: &ImageFile) -> Result<String, ServiceError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// User-facing success/error channel.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Collaborators shared by every write path.
pub struct Chain<'a> {
    pub config: &'a OrchestratorConfig,
    pub algod: &'a dyn Algod,
    pub notifier: &'a dyn Notifier,
}

impl<'a> Chain<'a> {
    pub fn new(
        config: &'a OrchestratorConfig,
        algod: &'a dyn Algod,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Chain {
            config,
            algod,
            notifier,
        }
    }

    /// Sign every member, submit, and wait for the configured number of rounds.
    pub fn execute(
        &self,
        session: &Session<'_>,
        group: &TransactionGroup,
    ) -> Result<Confirmation, OrchestratorError> {
        let signed = session.sign_all(group)?;
        let tx_id = self.algod.send_group(&signed)?;
        log::debug!("sent group of {} starting with {}", group.len(), tx_id);
        let confirmation = self
            .algod
            .wait_for_confirmation(&tx_id, self.config.confirmation_rounds)?;
        log::info!(
            "{} confirmed in round {}",
            confirmation.tx_id,
            confirmation.confirmed_round
        );
        Ok(confirmation)
    }

    /// Surfaces the outcome of a user action through the notifier.
    pub fn report<T>(
        &self,
        result: Result<T, OrchestratorError>,
        success: impl FnOnce(&T) -> String,
    ) -> Result<T, OrchestratorError> {
        match &result {
            Ok(value) => self.notifier.notify(Notice::success(success(value))),
            Err(err) => {
                log::error!("{}", err);
                self.notifier.notify(Notice::error(err.to_string()));
            }
        }
        result
    }
}
