//! A signing provider backed by a keypair held in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sol_core::{Address, Keypair, Transaction};
use tracing::debug;

use crate::adapter::{EventHandler, WalletAdapter, WalletEvent};
use crate::error::WalletError;

struct Identity {
    keypair: Keypair,
    public_key: Arc<str>,
}

impl Identity {
    fn new(keypair: Keypair) -> Self {
        let public_key = Arc::from(keypair.address().to_string());
        Self {
            keypair,
            public_key,
        }
    }
}

/// Local keypair wallet for CLIs and tests.
///
/// Starts disconnected. Signing while disconnected fails with
/// [`WalletError::NotConnected`].
pub struct KeypairWallet {
    identity: Mutex<Identity>,
    connected: AtomicBool,
    auto_approve: bool,
    handlers: Mutex<Vec<(WalletEvent, EventHandler)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            identity: Mutex::new(Identity::new(keypair)),
            connected: AtomicBool::new(false),
            auto_approve: true,
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> Address {
        lock(&self.identity).keypair.address()
    }

    /// Replace the active keypair, as when a user switches accounts.
    pub fn switch_keypair(&self, keypair: Keypair) {
        let mut identity = lock(&self.identity);
        debug!(
            from = %identity.keypair.address(),
            to = %keypair.address(),
            "switching wallet keypair"
        );
        *identity = Identity::new(keypair);
    }

    fn emit(&self, event: WalletEvent) {
        // Clone out of the lock so handlers may register more handlers.
        let handlers: Vec<EventHandler> = lock(&self.handlers)
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler();
        }
    }

    fn sign_with_identity(&self, mut transaction: Transaction) -> Result<Transaction, WalletError> {
        if !self.connected() {
            return Err(WalletError::NotConnected);
        }
        transaction.sign(&lock(&self.identity).keypair)?;
        Ok(transaction)
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn public_key(&self) -> Option<Arc<str>> {
        if !self.connected() {
            return None;
        }
        Some(Arc::clone(&lock(&self.identity).public_key))
    }

    fn auto_approve(&self) -> bool {
        self.auto_approve
    }

    fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError> {
        self.sign_with_identity(transaction)
    }

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, WalletError> {
        transactions
            .into_iter()
            .map(|tx| self.sign_with_identity(tx))
            .collect()
    }

    async fn connect(&self) -> Result<(), WalletError> {
        if !self.connected.swap(true, Ordering::SeqCst) {
            debug!(address = %self.address(), "keypair wallet connected");
            self.emit(WalletEvent::Connect);
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        if self.connected.swap(false, Ordering::SeqCst) {
            debug!(address = %self.address(), "keypair wallet disconnected");
            self.emit(WalletEvent::Disconnect);
        }
        Ok(())
    }

    fn on(&self, event: WalletEvent, handler: EventHandler) {
        lock(&self.handlers).push((event, handler));
    }
}
