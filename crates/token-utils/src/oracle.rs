//! Ledger collaborators: account existence lookups and envelope submission.

use async_trait::async_trait;
use sol_core::Address;

use crate::envelope::TransactionEnvelope;
use crate::error::{BoxError, TokenError};
use crate::instructions::default_rent_exemption;

/// Answers whether an address already holds an initialized token account.
///
/// Implementations do network I/O. An `Err` must mean "could not tell", never
/// "absent"; callers surface it as [`TokenError::LookupFailed`].
#[async_trait]
pub trait AccountOracle: Send + Sync {
    async fn exists(&self, address: &Address) -> Result<bool, BoxError>;
}

/// Proof that the ledger accepted and confirmed an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Base58 transaction signature.
    pub signature: String,
}

/// The ledger connection: identity, submission and rent parameters.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// The caller's own identity; default owner, authority and fee payer.
    fn wallet_key(&self) -> Address;

    /// Sign (with the wallet plus the envelope's own signers), send and
    /// confirm `envelope`.
    ///
    /// Failures should be [`TokenError::Submission`] or
    /// [`TokenError::ConfirmationTimeout`]; they are never retried here.
    async fn submit(&self, envelope: TransactionEnvelope) -> Result<Confirmation, TokenError>;

    /// Lamports required for a rent-exempt account of `data_len` bytes.
    async fn minimum_balance_for_rent_exemption(&self, data_len: u64) -> Result<u64, BoxError> {
        Ok(default_rent_exemption(data_len))
    }
}
