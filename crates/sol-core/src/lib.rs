//! Ledger primitives for the token tooling.
//!
//! Addresses, Ed25519 keypairs, instructions, program-derived address
//! search and the compact binary message/transaction format, all without
//! pulling in `solana-sdk`. Signing uses `ed25519-dalek`, the off-curve
//! check uses `curve25519-dalek` and text encoding uses `bs58`.

pub mod address;
pub mod error;
pub mod instruction;
pub mod keypair;
pub mod program;
pub mod system;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{Address, ADDRESS_BYTES};
pub use error::SolError;
pub use instruction::{AccountMeta, Instruction};
pub use keypair::{verify_signature, Keypair, SIGNATURE_BYTES};
pub use program::{
    create_program_address, find_program_address, is_on_curve, ASSOCIATED_TOKEN_PROGRAM_ID,
    SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    encode_compact_u16, CompiledInstruction, Message, MessageHeader, Transaction,
};
