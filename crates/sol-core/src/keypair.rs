//! Ed25519 signing keys.

use std::fmt;

use ed25519_dalek::Signer;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::address::Address;
use crate::error::SolError;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_BYTES: usize = 64;

/// An Ed25519 keypair whose public half is a ledger [`Address`].
///
/// The secret key is zeroized on drop by `ed25519-dalek`.
#[derive(Clone)]
pub struct Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random number generator.
    pub fn generate() -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut copy = *seed;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self { signing_key }
    }

    /// Build a keypair from a seed slice, rejecting anything but 32 bytes.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self, SolError> {
        let mut arr: [u8; 32] = seed.try_into().map_err(|_| {
            SolError::InvalidPrivateKey(format!("expected 32 bytes, got {}", seed.len()))
        })?;
        let keypair = Self::from_seed(&arr);
        arr.zeroize();
        Ok(keypair)
    }

    pub fn address(&self) -> Address {
        Address::new_from_array(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message`, returning the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_BYTES] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Verify a signature produced by [`Keypair::sign`].
pub fn verify_signature(
    signer: &Address,
    message: &[u8],
    signature: &[u8; SIGNATURE_BYTES],
) -> bool {
    let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(signer.as_bytes()) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(signature);
    key.verify_strict(message, &signature).is_ok()
}
