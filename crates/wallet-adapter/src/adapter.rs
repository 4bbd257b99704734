//! The capability set every signing provider exposes.

use std::sync::Arc;

use async_trait::async_trait;
use sol_core::Transaction;

use crate::error::WalletError;

/// Callback registered with [`WalletAdapter::on`].
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle events a signing provider reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletEvent {
    Connect,
    Disconnect,
}

/// A signing provider: browser extension, hardware device, local keypair.
///
/// Implementations report their identity in raw form. The returned `Arc`
/// must stay the same allocation for as long as the identity is unchanged
/// and be replaced when it changes (e.g. the user switches accounts); the
/// wrapper's cache keys on that.
#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Base58 public key as reported by the provider; `None` while
    /// disconnected.
    fn public_key(&self) -> Option<Arc<str>>;

    /// Whether the provider signs without prompting.
    fn auto_approve(&self) -> bool;

    fn connected(&self) -> bool;

    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, WalletError>;

    async fn connect(&self) -> Result<(), WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Register `handler` for `event`.
    fn on(&self, event: WalletEvent, handler: EventHandler);
}
