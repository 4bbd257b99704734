use sol_core::{Address, SolError};
use thiserror::Error;

/// Error type returned by collaborator implementations (oracles, ledger
/// providers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Token tooling errors.
///
/// Every variant except [`TokenError::Submission`] and
/// [`TokenError::ConfirmationTimeout`] means no envelope was handed out.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed identifier, bad amount or out-of-range decimals. Raised
    /// before any I/O.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The existence oracle could not answer for `address`.
    #[error("account lookup failed for {address}: {source}")]
    LookupFailed {
        address: Address,
        #[source]
        source: BoxError,
    },

    /// Building the ledger message failed.
    #[error("transaction build error: {0}")]
    Build(SolError),

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("confirmation timed out: {0}")]
    ConfirmationTimeout(String),
}

/// Where an operation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Nothing was built; retrying construction is safe.
    Composition,
    /// An envelope was built and handed off but not confirmed.
    Submission,
}

impl TokenError {
    pub fn stage(&self) -> FailureStage {
        match self {
            TokenError::Submission(_) | TokenError::ConfirmationTimeout(_) => {
                FailureStage::Submission
            }
            TokenError::InvalidInput(_)
            | TokenError::LookupFailed { .. }
            | TokenError::Build(_) => FailureStage::Composition,
        }
    }

    pub(crate) fn lookup_failed(address: Address, source: BoxError) -> Self {
        TokenError::LookupFailed { address, source }
    }
}

impl From<SolError> for TokenError {
    fn from(err: SolError) -> Self {
        match err {
            SolError::InvalidAddress(msg) | SolError::InvalidPrivateKey(msg) => {
                TokenError::InvalidInput(msg)
            }
            other => TokenError::Build(other),
        }
    }
}
