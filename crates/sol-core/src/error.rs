use thiserror::Error;

/// Ledger primitive errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_private_key() {
        let err = SolError::InvalidPrivateKey("key too short".into());
        assert_eq!(err.to_string(), "invalid private key: key too short");
    }

    #[test]
    fn display_invalid_address() {
        let err = SolError::InvalidAddress("bad decode".into());
        assert_eq!(err.to_string(), "invalid address: bad decode");
    }

    #[test]
    fn display_transaction_build_error() {
        let err = SolError::TransactionBuildError("too many accounts".into());
        assert_eq!(err.to_string(), "transaction build error: too many accounts");
    }

    #[test]
    fn display_signing_error() {
        let err = SolError::SigningError("signer not in message".into());
        assert_eq!(err.to_string(), "signing error: signer not in message");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(SolError::SerializationError("compact-u16 overflow".into()));
        assert!(err.to_string().contains("compact-u16"));
    }
}
