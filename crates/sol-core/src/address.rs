//! Ledger account identifiers.
//!
//! An address is a 32-byte value, usually an Ed25519 public key or a
//! program-derived address. Its text form is the Base58 encoding of the raw
//! bytes (Bitcoin alphabet, as used by the `bs58` crate). Equality, ordering
//! and hashing are all over the canonical bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolError;

/// Length of an address in bytes.
pub const ADDRESS_BYTES: usize = 32;

/// A 32-byte ledger account or program identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Wrap raw bytes as an address.
    pub const fn new_from_array(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Copy of the raw 32 bytes.
    pub const fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Decode a Base58 address string.
    ///
    /// Fails if the input is not valid Base58 or does not decode to exactly
    /// 32 bytes.
    pub fn from_base58(address: &str) -> Result<Self, SolError> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

        Self::try_from(bytes.as_slice())
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = SolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; ADDRESS_BYTES] = bytes.try_into().map_err(|_| {
            SolError::InvalidAddress(format!(
                "expected {ADDRESS_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The System Program address is 32 zero bytes, which encodes to
    /// "11111111111111111111111111111111" in Base58.
    #[test]
    fn zero_address_encodes_to_all_ones() {
        let addr = Address::new_from_array([0u8; 32]);
        assert_eq!(addr.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn parse_token_program_address() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let parsed: Address = address.parse().unwrap();
        assert_eq!(parsed.to_string(), address);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Address::from_base58("not-a-valid-address!!!").unwrap_err();
        assert!(matches!(err, SolError::InvalidAddress(_)));
    }

    #[test]
    fn wrong_length_is_rejected() {
        // "1" decodes to a single zero byte, which is not 32 bytes.
        let err = Address::from_base58("1").unwrap_err();
        assert_eq!(
            err,
            SolError::InvalidAddress("expected 32 bytes, got 1".into())
        );
    }

    #[test]
    fn equality_is_by_bytes() {
        let a = Address::new_from_array([7u8; 32]);
        let b: Address = a.to_string().parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn debug_shows_base58() {
        let addr = Address::new_from_array([0u8; 32]);
        assert_eq!(
            format!("{addr:?}"),
            "Address(11111111111111111111111111111111)"
        );
    }

    #[test]
    fn serde_uses_base58_string() {
        let addr: Address = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr".parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr\"");

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn serde_rejects_short_address() {
        let result: Result<Address, _> = serde_json::from_str("\"1\"");
        assert!(result.is_err());
    }
}
