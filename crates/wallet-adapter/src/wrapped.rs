//! Wallet adapter wrapper with a cached, typed identity.

use std::sync::{Arc, Mutex};

use sol_core::{Address, Transaction};
use tracing::debug;

use crate::adapter::{EventHandler, WalletAdapter, WalletEvent};
use crate::error::WalletError;

/// Last raw identity seen and what it converted to.
struct IdentityCache {
    raw: Arc<str>,
    address: Arc<Address>,
}

/// Wraps any [`WalletAdapter`], exposing its identity as an [`Address`].
///
/// The conversion is memoized in a single slot keyed by the identity of the
/// raw `Arc` (pointer equality, not string equality): the same raw value
/// returns the same `Arc<Address>`, a replaced one is converted afresh.
/// Disconnecting does not clear the slot.
pub struct WrappedWalletAdapter<A> {
    adapter: A,
    cache: Mutex<Option<IdentityCache>>,
}

impl<A: WalletAdapter> WrappedWalletAdapter<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            cache: Mutex::new(None),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn into_inner(self) -> A {
        self.adapter
    }

    /// The wallet's address, or `None` while disconnected.
    ///
    /// Fails with [`WalletError::InvalidConnectionState`] if the adapter is
    /// connected but reports no identity, and with
    /// [`WalletError::InvalidIdentity`] if the identity is not an address.
    pub fn public_key(&self) -> Result<Option<Arc<Address>>, WalletError> {
        if !self.adapter.connected() {
            return Ok(None);
        }
        let raw = self
            .adapter
            .public_key()
            .ok_or(WalletError::InvalidConnectionState)?;

        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = cache.as_ref() {
            if Arc::ptr_eq(&cached.raw, &raw) {
                return Ok(Some(Arc::clone(&cached.address)));
            }
        }

        let address = Arc::new(Address::from_base58(&raw)?);
        debug!(%address, "wallet identity changed");
        *cache = Some(IdentityCache {
            raw,
            address: Arc::clone(&address),
        });
        Ok(Some(address))
    }

    /// Like [`public_key`](Self::public_key) but disconnected is an error.
    pub fn require_public_key(&self) -> Result<Arc<Address>, WalletError> {
        self.public_key()?.ok_or(WalletError::NotConnected)
    }

    pub fn auto_approve(&self) -> bool {
        self.adapter.auto_approve()
    }

    pub fn connected(&self) -> bool {
        self.adapter.connected()
    }

    pub async fn sign_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        self.adapter.sign_transaction(transaction).await
    }

    pub async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, WalletError> {
        self.adapter.sign_all_transactions(transactions).await
    }

    pub async fn connect(&self) -> Result<(), WalletError> {
        self.adapter.connect().await
    }

    pub async fn disconnect(&self) -> Result<(), WalletError> {
        self.adapter.disconnect().await
    }

    pub fn on(&self, event: WalletEvent, handler: EventHandler) -> &Self {
        self.adapter.on(event, handler);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Adapter whose identity and connection flag are set directly.
    struct StubAdapter {
        identity: Mutex<Option<Arc<str>>>,
        connected: AtomicBool,
    }

    impl StubAdapter {
        fn new(identity: Option<&str>, connected: bool) -> Self {
            Self {
                identity: Mutex::new(identity.map(Arc::from)),
                connected: AtomicBool::new(connected),
            }
        }

        fn set_identity(&self, identity: &str) {
            *self.identity.lock().unwrap() = Some(Arc::from(identity));
        }
    }

    #[async_trait]
    impl WalletAdapter for StubAdapter {
        fn public_key(&self) -> Option<Arc<str>> {
            self.identity.lock().unwrap().clone()
        }

        fn auto_approve(&self) -> bool {
            true
        }

        fn connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        async fn sign_transaction(
            &self,
            transaction: Transaction,
        ) -> Result<Transaction, WalletError> {
            Ok(transaction)
        }

        async fn sign_all_transactions(
            &self,
            transactions: Vec<Transaction>,
        ) -> Result<Vec<Transaction>, WalletError> {
            Ok(transactions)
        }

        async fn connect(&self) -> Result<(), WalletError> {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> Result<(), WalletError> {
            self.connected.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn on(&self, _event: WalletEvent, _handler: EventHandler) {}
    }

    const KEY_A: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
    const KEY_B: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";

    #[test]
    fn disconnected_has_no_key() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), false));
        assert_eq!(wrapped.public_key().unwrap(), None);
        assert_eq!(wrapped.require_public_key(), Err(WalletError::NotConnected));
    }

    #[test]
    fn connected_without_identity_is_invalid_state() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(None, true));
        assert_eq!(wrapped.public_key(), Err(WalletError::InvalidConnectionState));
    }

    #[test]
    fn malformed_identity_is_rejected() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some("nope"), true));
        assert!(matches!(wrapped.public_key(), Err(WalletError::InvalidIdentity(_))));
    }

    #[test]
    fn unchanged_identity_returns_same_instance() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), true));

        let first = wrapped.public_key().unwrap().unwrap();
        let second = wrapped.public_key().unwrap().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.to_string(), KEY_A);
    }

    #[test]
    fn changed_identity_is_recomputed() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), true));
        let first = wrapped.public_key().unwrap().unwrap();

        wrapped.adapter().set_identity(KEY_B);
        let second = wrapped.public_key().unwrap().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.to_string(), KEY_B);
    }

    #[test]
    fn new_allocation_of_same_key_is_recomputed() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), true));
        let first = wrapped.public_key().unwrap().unwrap();

        wrapped.adapter().set_identity(KEY_A);
        let second = wrapped.public_key().unwrap().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn reconnect_with_same_identity_hits_cache() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), true));
        let first = wrapped.public_key().unwrap().unwrap();

        wrapped.disconnect().await.unwrap();
        assert_eq!(wrapped.public_key().unwrap(), None);

        wrapped.connect().await.unwrap();
        let second = wrapped.public_key().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn forwards_flags() {
        let wrapped = WrappedWalletAdapter::new(StubAdapter::new(Some(KEY_A), true));
        assert!(wrapped.auto_approve());
        assert!(wrapped.connected());
    }
}
