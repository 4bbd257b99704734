use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sol_core::{Address, Keypair};
use token_utils::{
    AccountOracle, BoxError, Confirmation, LedgerProvider, TokenError, TokenProvider,
    TransactionEnvelope,
};

/// In-memory ledger: a wallet keypair, a set of existing token accounts and a
/// log of everything submitted.
pub struct MockLedger {
    pub wallet: Keypair,
    existing: Mutex<BTreeSet<Address>>,
    failing: Mutex<BTreeSet<Address>>,
    reject_submissions: Mutex<Option<String>>,
    pub submitted: Mutex<Vec<TransactionEnvelope>>,
}

impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            wallet: Keypair::from_seed(&[42u8; 32]),
            existing: Mutex::new(BTreeSet::new()),
            failing: Mutex::new(BTreeSet::new()),
            reject_submissions: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn add_account(&self, address: Address) {
        self.existing.lock().unwrap().insert(address);
    }

    pub fn fail_lookup(&self, address: Address) {
        self.failing.lock().unwrap().insert(address);
    }

    pub fn reject_submissions(&self, reason: &str) {
        *self.reject_submissions.lock().unwrap() = Some(reason.to_string());
    }
}

#[async_trait]
impl AccountOracle for MockLedger {
    async fn exists(&self, address: &Address) -> Result<bool, BoxError> {
        if self.failing.lock().unwrap().contains(address) {
            return Err(format!("rpc error looking up {address}").into());
        }
        Ok(self.existing.lock().unwrap().contains(address))
    }
}

#[async_trait]
impl LedgerProvider for MockLedger {
    fn wallet_key(&self) -> Address {
        self.wallet.address()
    }

    async fn submit(&self, envelope: TransactionEnvelope) -> Result<Confirmation, TokenError> {
        if let Some(reason) = self.reject_submissions.lock().unwrap().clone() {
            return Err(TokenError::Submission(reason));
        }

        let mut tx = envelope.build_transaction(&[7u8; 32])?;
        tx.sign(&self.wallet)?;
        if !tx.is_fully_signed() {
            return Err(TokenError::Submission("missing signatures".into()));
        }

        self.submitted.lock().unwrap().push(envelope);
        Ok(Confirmation {
            signature: bs58::encode(tx.signatures[0]).into_string(),
        })
    }
}

/// Ledger whose wallet identity changes on every read, as if the user
/// switched accounts between calls. No token account exists.
#[derive(Default)]
pub struct SwitchingLedger {
    reads: AtomicU8,
}

impl SwitchingLedger {
    pub fn reads(&self) -> u8 {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountOracle for SwitchingLedger {
    async fn exists(&self, _address: &Address) -> Result<bool, BoxError> {
        Ok(false)
    }
}

#[async_trait]
impl LedgerProvider for SwitchingLedger {
    fn wallet_key(&self) -> Address {
        addr(self.reads.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn submit(&self, _envelope: TransactionEnvelope) -> Result<Confirmation, TokenError> {
        Err(TokenError::Submission("switching ledger does not submit".into()))
    }
}

pub fn provider(ledger: &Arc<MockLedger>) -> TokenProvider {
    TokenProvider::new(ledger.clone(), ledger.clone())
}

pub fn addr(b: u8) -> Address {
    Address::new_from_array([b; 32])
}
