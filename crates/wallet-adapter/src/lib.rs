//! Signing-provider abstraction.
//!
//! [`WalletAdapter`] is the capability set every provider implements.
//! [`WrappedWalletAdapter`] sits in front of one and turns its raw identity
//! into a typed [`sol_core::Address`], memoized per identity.
//! [`KeypairWallet`] is the in-process provider.

pub mod adapter;
pub mod error;
pub mod keypair_wallet;
pub mod wrapped;

pub use adapter::{EventHandler, WalletAdapter, WalletEvent};
pub use error::WalletError;
pub use keypair_wallet::KeypairWallet;
pub use wrapped::WrappedWalletAdapter;
