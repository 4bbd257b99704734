//! Message compilation and the signed transaction wire format.
//!
//! Instructions are compiled into a message by hand, no `solana-sdk`
//! involved. The wire format is a compact binary layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::address::Address;
use crate::error::SolError;
use crate::instruction::Instruction;
use crate::keypair::{Keypair, SIGNATURE_BYTES};

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in the ledger's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let value = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(value))
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Counts that tell the runtime which account keys sign and which are
/// read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the message's `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled message: the bytes every signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    /// All account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Address>,
    pub recent_blockhash: [u8; 32],
    /// Compiled instructions, in the order they were supplied.
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile `instructions` with a single fee payer.
    ///
    /// The fee payer is always a writable signer at index 0. Instruction
    /// order is preserved exactly.
    pub fn compile(
        instructions: &[Instruction],
        fee_payer: &Address,
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, SolError> {
        struct AccountEntry {
            address: Address,
            is_signer: bool,
            is_writable: bool,
        }

        fn rank(e: &AccountEntry) -> u8 {
            match (e.is_signer, e.is_writable) {
                (true, true) => 0,
                (true, false) => 1,
                (false, true) => 2,
                (false, false) => 3,
            }
        }

        // Instruction account lists are tiny, a Vec beats a map here.
        let mut entries: Vec<AccountEntry> = Vec::new();
        let mut upsert = |address: Address, signer: bool, writable: bool| {
            if let Some(entry) = entries.iter_mut().find(|e| e.address == address) {
                entry.is_signer |= signer;
                entry.is_writable |= writable;
            } else {
                entries.push(AccountEntry {
                    address,
                    is_signer: signer,
                    is_writable: writable,
                });
            }
        };

        upsert(*fee_payer, true, true);
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.address, meta.is_signer, meta.is_writable);
            }
            // Program IDs are non-signer, read-only accounts.
            upsert(ix.program_id, false, false);
        }

        // Stable sort: the fee payer was inserted first into rank 0 and stays there.
        entries.sort_by_key(rank);

        if entries.len() > usize::from(u8::MAX) {
            return Err(SolError::TransactionBuildError(format!(
                "too many accounts: {}",
                entries.len()
            )));
        }

        let header = MessageHeader {
            num_required_signatures: entries.iter().filter(|e| e.is_signer).count() as u8,
            num_readonly_signed: entries
                .iter()
                .filter(|e| e.is_signer && !e.is_writable)
                .count() as u8,
            num_readonly_unsigned: entries
                .iter()
                .filter(|e| !e.is_signer && !e.is_writable)
                .count() as u8,
        };

        let account_keys: Vec<Address> = entries.iter().map(|e| e.address).collect();
        let index_of = |address: &Address| -> Result<u8, SolError> {
            account_keys
                .iter()
                .position(|k| k == address)
                .map(|i| i as u8)
                .ok_or_else(|| {
                    SolError::TransactionBuildError(format!("{address} not in account keys"))
                })
        };

        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            let account_indices = ix
                .accounts
                .iter()
                .map(|meta| index_of(&meta.address))
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices,
                data: ix.data.clone(),
            });
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash: *recent_blockhash,
            instructions: compiled,
        })
    }

    /// Fee payer, always the first account key.
    pub fn fee_payer(&self) -> Option<&Address> {
        self.account_keys.first()
    }

    /// The accounts whose signatures this message requires, in slot order.
    pub fn signer_keys(&self) -> &[Address] {
        let n = usize::from(self.header.num_required_signatures).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        buf.extend_from_slice(&compact_len(self.account_keys.len(), "account keys")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&compact_len(ix.account_indices.len(), "account indices")?);
            buf.extend_from_slice(&ix.account_indices);

            buf.extend_from_slice(&compact_len(ix.data.len(), "data bytes")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A message plus one signature slot per required signer.
///
/// Unfilled slots are all-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; SIGNATURE_BYTES]>,
    pub message: Message,
}

impl Transaction {
    /// Wrap a message with empty signature slots.
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.signer_keys().len();
        Self {
            signatures: vec![[0u8; SIGNATURE_BYTES]; slots],
            message,
        }
    }

    /// Sign with `keypair`, writing into the slot that matches its address.
    ///
    /// Fails if the keypair is not one of the message's required signers.
    pub fn sign(&mut self, keypair: &Keypair) -> Result<(), SolError> {
        let signer = keypair.address();
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == signer)
            .ok_or_else(|| {
                SolError::SigningError(format!("{signer} not found in transaction signers"))
            })?;

        let message_bytes = self.message.serialize()?;
        let signature = keypair.sign(&message_bytes);
        let target = self.signatures.get_mut(slot).ok_or_else(|| {
            SolError::SigningError(format!("no signature slot {slot} for {signer}"))
        })?;
        *target = signature;
        Ok(())
    }

    /// Signers whose slot is still empty.
    pub fn missing_signers(&self) -> Vec<Address> {
        self.message
            .signer_keys()
            .iter()
            .zip(&self.signatures)
            .filter(|(_, sig)| sig.iter().all(|b| *b == 0))
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.missing_signers().is_empty()
    }

    /// Serialize into wire format, ready for `sendTransaction`.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let message_bytes = self.message.serialize()?;

        let mut wire =
            Vec::with_capacity(3 + self.signatures.len() * SIGNATURE_BYTES + message_bytes.len());
        wire.extend_from_slice(&compact_len(self.signatures.len(), "signatures")?);
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message_bytes);

        Ok(wire)
    }
}
