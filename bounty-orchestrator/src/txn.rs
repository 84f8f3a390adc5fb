use std::fmt;

use bounty_abi::address::{base32_encode, sha512_256};
use bounty_abi::{AbiError, AbiValue, Method, PublicKey};

use crate::error::OrchestratorError;

/// Per-transaction reference limits enforced by the network.
pub const MAX_ACCOUNTS: usize = 4;
pub const MAX_FOREIGN_APPS: usize = 8;
pub const MAX_REFERENCES: usize = 8;

/// Largest atomic group the network accepts.
pub const MAX_GROUP_SIZE: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedParams {
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxId(pub [u8; 32]);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32_encode(&self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxRef {
    pub app_id: u64,
    pub name: Vec<u8>,
}

/// An ABI method call against an existing application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppCall {
    pub app_id: u64,
    pub method: Method,
    pub args: Vec<AbiValue>,
    pub accounts: Vec<PublicKey>,
    pub foreign_apps: Vec<u64>,
    pub boxes: Vec<BoxRef>,
}

impl AppCall {
    pub fn new(app_id: u64, method: Method, args: Vec<AbiValue>) -> Self {
        AppCall {
            app_id,
            method,
            args,
            accounts: vec![],
            foreign_apps: vec![],
            boxes: vec![],
        }
    }

    pub fn with_box(mut self, app_id: u64, name: Vec<u8>) -> Self {
        self.boxes.push(BoxRef { app_id, name });
        self
    }

    pub fn with_account(mut self, account: PublicKey) -> Self {
        add_unique(&mut self.accounts, account);
        self
    }

    pub fn with_app(mut self, app_id: u64) -> Self {
        add_unique(&mut self.foreign_apps, app_id);
        self
    }

    /// Selector followed by each encoded argument.
    pub fn app_args(&self) -> Result<Vec<Vec<u8>>, AbiError> {
        let mut out = Vec::with_capacity(self.args.len() + 1);
        out.push(self.method.selector().to_vec());
        for arg in &self.args {
            out.push(arg.encode()?);
        }
        Ok(out)
    }

    fn reference_count(&self) -> usize {
        self.accounts.len() + self.foreign_apps.len() + self.boxes.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxnKind {
    Payment {
        receiver: PublicKey,
        amount: u64,
    },
    AppCreate {
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        args: Vec<AbiValue>,
    },
    AppCall(AppCall),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub sender: PublicKey,
    pub fee: u64,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub group: Option<[u8; 32]>,
    pub kind: TxnKind,
}

impl Transaction {
    fn with_params(sender: PublicKey, params: &SuggestedParams, kind: TxnKind) -> Self {
        Transaction {
            sender,
            fee: params.fee,
            first_valid: params.first_valid,
            last_valid: params.last_valid,
            genesis_id: params.genesis_id.clone(),
            group: None,
            kind,
        }
    }

    pub fn payment(
        sender: PublicKey,
        receiver: PublicKey,
        amount: u64,
        params: &SuggestedParams,
    ) -> Self {
        Self::with_params(sender, params, TxnKind::Payment { receiver, amount })
    }

    pub fn app_create(
        sender: PublicKey,
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
        args: Vec<AbiValue>,
        params: &SuggestedParams,
    ) -> Self {
        Self::with_params(
            sender,
            params,
            TxnKind::AppCreate {
                approval_program,
                clear_program,
                args,
            },
        )
    }

    pub fn app_call(sender: PublicKey, call: AppCall, params: &SuggestedParams) -> Self {
        Self::with_params(sender, params, TxnKind::AppCall(call))
    }

    /// Covers inner transactions issued by the callee.
    pub fn with_fee_multiplier(mut self, multiplier: u64) -> Self {
        self.fee = self.fee.saturating_mul(multiplier);
        self
    }

    pub fn as_app_call(&self) -> Option<&AppCall> {
        match &self.kind {
            TxnKind::AppCall(call) => Some(call),
            _ => None,
        }
    }

    /// Deterministic field-tagged encoding; the id hashes exactly these bytes.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, AbiError> {
        let mut out = Vec::new();
        put(&mut out, b"snd", self.sender.as_bytes());
        put(&mut out, b"fee", &self.fee.to_be_bytes());
        put(&mut out, b"fv", &self.first_valid.to_be_bytes());
        put(&mut out, b"lv", &self.last_valid.to_be_bytes());
        put(&mut out, b"gen", self.genesis_id.as_bytes());
        if let Some(group) = &self.group {
            put(&mut out, b"grp", group);
        }
        match &self.kind {
            TxnKind::Payment { receiver, amount } => {
                put(&mut out, b"type", b"pay");
                put(&mut out, b"rcv", receiver.as_bytes());
                put(&mut out, b"amt", &amount.to_be_bytes());
            }
            TxnKind::AppCreate {
                approval_program,
                clear_program,
                args,
            } => {
                put(&mut out, b"type", b"appl");
                put(&mut out, b"apap", approval_program);
                put(&mut out, b"apsu", clear_program);
                for arg in args {
                    put(&mut out, b"apaa", &arg.encode()?);
                }
            }
            TxnKind::AppCall(call) => {
                put(&mut out, b"type", b"appl");
                put(&mut out, b"apid", &call.app_id.to_be_bytes());
                for arg in call.app_args()? {
                    put(&mut out, b"apaa", &arg);
                }
                for account in &call.accounts {
                    put(&mut out, b"apat", account.as_bytes());
                }
                for app in &call.foreign_apps {
                    put(&mut out, b"apfa", &app.to_be_bytes());
                }
                for reference in &call.boxes {
                    put(&mut out, b"apbx", &reference.app_id.to_be_bytes());
                    put(&mut out, b"apbn", &reference.name);
                }
            }
        }
        Ok(out)
    }

    pub fn id(&self) -> Result<TxId, AbiError> {
        Ok(TxId(sha512_256(&[b"TX", &self.canonical_bytes()?])))
    }
}

fn put(out: &mut Vec<u8>, tag: &[u8], value: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());
    out.extend_from_slice(value);
}

fn add_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Transactions that commit or fail together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionGroup {
    txns: Vec<Transaction>,
}

impl TransactionGroup {
    /// Stamps every member with the group id. A single transaction stays ungrouped.
    pub fn new(mut txns: Vec<Transaction>) -> Result<Self, OrchestratorError> {
        if txns.len() > MAX_GROUP_SIZE {
            return Err(OrchestratorError::ResourceLimit {
                kind: "transaction".to_string(),
                count: txns.len(),
                limit: MAX_GROUP_SIZE,
            });
        }
        for txn in txns.iter_mut() {
            txn.group = None;
        }
        if txns.len() > 1 {
            let ids = txns
                .iter()
                .map(|txn| txn.id())
                .collect::<Result<Vec<_>, _>>()?;
            let mut parts: Vec<&[u8]> = vec![b"TG"];
            parts.extend(ids.iter().map(|id| &id.0[..]));
            let group = sha512_256(&parts);
            for txn in txns.iter_mut() {
                txn.group = Some(group);
            }
        }
        Ok(TransactionGroup { txns })
    }

    pub fn single(txn: Transaction) -> Self {
        let mut txn = txn;
        txn.group = None;
        TransactionGroup { txns: vec![txn] }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.txns
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    pub fn group_id(&self) -> Option<[u8; 32]> {
        self.txns.first().and_then(|txn| txn.group)
    }
}

/// Cross-references every app call in a group with the accounts and
/// applications touched by its siblings, then checks reference limits.
pub fn populate_resources(txns: &mut [Transaction]) -> Result<(), OrchestratorError> {
    let mut receivers = Vec::new();
    let mut apps = Vec::new();
    for txn in txns.iter() {
        match &txn.kind {
            TxnKind::Payment { receiver, .. } => add_unique(&mut receivers, *receiver),
            TxnKind::AppCall(call) => add_unique(&mut apps, call.app_id),
            TxnKind::AppCreate { .. } => {}
        }
    }

    for txn in txns.iter_mut() {
        let sender = txn.sender;
        let TxnKind::AppCall(call) = &mut txn.kind else {
            continue;
        };
        let addresses: Vec<PublicKey> = call
            .args
            .iter()
            .filter_map(|arg| arg.as_address().ok())
            .collect();
        for account in addresses.into_iter().chain(receivers.iter().copied()) {
            if account != sender {
                add_unique(&mut call.accounts, account);
            }
        }
        for app in &apps {
            if *app != call.app_id {
                add_unique(&mut call.foreign_apps, *app);
            }
        }
        check_limits(call)?;
    }
    Ok(())
}

fn check_limits(call: &AppCall) -> Result<(), OrchestratorError> {
    let checks = [
        ("account", call.accounts.len(), MAX_ACCOUNTS),
        ("application", call.foreign_apps.len(), MAX_FOREIGN_APPS),
        ("total", call.reference_count(), MAX_REFERENCES),
    ];
    for (kind, count, limit) in checks {
        if count > limit {
            return Err(OrchestratorError::ResourceLimit {
                kind: kind.to_string(),
                count,
                limit,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounty_abi::AbiType;

    fn params() -> SuggestedParams {
        SuggestedParams {
            fee: 1_000,
            first_valid: 10,
            last_valid: 1_010,
            genesis_id: "testnet-v1.0".to_string(),
        }
    }

    fn key(byte: u8) -> PublicKey {
        PublicKey([byte; 32])
    }

    fn call(app_id: u64, arg: PublicKey) -> AppCall {
        AppCall::new(
            app_id,
            Method::new("register_developer", vec![AbiType::Address], None),
            vec![AbiValue::Address(arg)],
        )
    }

    #[test]
    fn group_id_is_shared_and_order_sensitive() {
        let a = Transaction::payment(key(1), key(2), 5, &params());
        let b = Transaction::app_call(key(1), call(7, key(3)), &params());

        let forward = TransactionGroup::new(vec![a.clone(), b.clone()]).unwrap();
        let reverse = TransactionGroup::new(vec![b, a]).unwrap();

        let gid = forward.group_id().unwrap();
        assert!(forward.transactions().iter().all(|t| t.group == Some(gid)));
        assert_ne!(Some(gid), reverse.group_id());
    }

    #[test]
    fn single_transaction_is_not_grouped() {
        let group = TransactionGroup::new(vec![Transaction::payment(key(1), key(2), 5, &params())])
            .unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.group_id(), None);
    }

    #[test]
    fn oversized_group_is_rejected() {
        let txns = (0..17)
            .map(|i| Transaction::payment(key(1), key(2), i, &params()))
            .collect::<Vec<_>>();
        let err = TransactionGroup::new(txns).unwrap_err();
        assert_eq!(
            err,
            OrchestratorError::ResourceLimit {
                kind: "transaction".to_string(),
                count: 17,
                limit: MAX_GROUP_SIZE,
            }
        );

        let txns = (0..16)
            .map(|i| Transaction::payment(key(1), key(2), i, &params()))
            .collect::<Vec<_>>();
        assert_eq!(TransactionGroup::new(txns).unwrap().len(), 16);
    }

    #[test]
    fn grouping_changes_transaction_id() {
        let txn = Transaction::payment(key(1), key(2), 5, &params());
        let before = txn.id().unwrap();
        let group = TransactionGroup::new(vec![txn.clone(), txn]).unwrap();
        assert_ne!(group.transactions()[0].id().unwrap(), before);
    }

    #[test]
    fn populate_adds_sibling_receivers_and_apps() {
        let mut txns = vec![
            Transaction::app_call(key(1), call(7, key(3)), &params()),
            Transaction::app_call(key(1), call(9, key(1)), &params()),
            Transaction::payment(key(1), key(4), 5, &params()),
        ];
        populate_resources(&mut txns).unwrap();

        let first = txns[0].as_app_call().unwrap();
        assert_eq!(first.accounts, vec![key(3), key(4)]);
        assert_eq!(first.foreign_apps, vec![9]);

        // sender is implicitly available
        let second = txns[1].as_app_call().unwrap();
        assert_eq!(second.accounts, vec![key(4)]);
        assert_eq!(second.foreign_apps, vec![7]);
    }

    #[test]
    fn populate_enforces_account_limit() {
        let mut txns = vec![Transaction::app_call(key(1), call(7, key(2)), &params())];
        for receiver in 3..8 {
            txns.push(Transaction::payment(key(1), key(receiver), 1, &params()));
        }
        let err = populate_resources(&mut txns).unwrap_err();
        assert!(matches!(err, OrchestratorError::ResourceLimit { limit: 4, .. }));
    }

    #[test]
    fn app_args_start_with_selector() {
        let c = call(7, key(3));
        let args = c.app_args().unwrap();
        assert_eq!(args[0], c.method.selector().to_vec());
        assert_eq!(args[1], key(3).as_bytes().to_vec());
    }
}
