use thiserror::Error;

/// Wallet adapter errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,

    /// The adapter claims to be connected but reports no identity.
    #[error("invalid wallet connection state")]
    InvalidConnectionState,

    #[error("invalid wallet identity: {0}")]
    InvalidIdentity(String),

    #[error("signing error: {0}")]
    Signing(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl From<sol_core::SolError> for WalletError {
    fn from(err: sol_core::SolError) -> Self {
        match err {
            sol_core::SolError::InvalidAddress(msg) => WalletError::InvalidIdentity(msg),
            other => WalletError::Signing(other.to_string()),
        }
    }
}
