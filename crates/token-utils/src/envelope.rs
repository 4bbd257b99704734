//! Transaction envelopes: ordered instruction lists not yet signed or sent.
//!
//! The ledger runs instructions strictly in sequence with no dependency
//! inference, so order is the caller's responsibility. An envelope can only
//! grow at either end; nothing already queued is ever removed or reordered.

use sol_core::{Address, Instruction, Keypair, Message, Transaction};

use crate::error::TokenError;

#[derive(Debug, Clone)]
pub struct TransactionEnvelope {
    fee_payer: Address,
    instructions: Vec<Instruction>,
    signers: Vec<Keypair>,
}

impl TransactionEnvelope {
    /// Empty envelope paid for by `fee_payer`.
    pub fn new(fee_payer: Address) -> Self {
        Self::of(fee_payer, Vec::new())
    }

    /// Envelope starting with `instructions`, in the given order.
    pub fn of(fee_payer: Address, instructions: Vec<Instruction>) -> Self {
        Self {
            fee_payer,
            instructions,
            signers: Vec::new(),
        }
    }

    /// Queue `instruction` after everything already present.
    pub fn append(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Queue `instruction` ahead of everything already present.
    ///
    /// Used for dependencies, e.g. creating an account before a queued
    /// transfer writes to it.
    pub fn prepend(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.insert(0, instruction);
        self
    }

    /// Append several instructions, preserving their order.
    pub fn extend<I: IntoIterator<Item = Instruction>>(&mut self, instructions: I) -> &mut Self {
        self.instructions.extend(instructions);
        self
    }

    /// Add a keypair that must co-sign, e.g. a freshly generated mint.
    pub fn add_signer(&mut self, signer: Keypair) -> &mut Self {
        if !self.signers.iter().any(|s| s.address() == signer.address()) {
            self.signers.push(signer);
        }
        self
    }

    pub fn fee_payer(&self) -> &Address {
        &self.fee_payer
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn signers(&self) -> &[Keypair] {
        &self.signers
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compile into a message over `recent_blockhash`.
    pub fn compile(&self, recent_blockhash: &[u8; 32]) -> Result<Message, TokenError> {
        Ok(Message::compile(
            &self.instructions,
            &self.fee_payer,
            recent_blockhash,
        )?)
    }

    /// Compile and sign with the envelope's own signers.
    ///
    /// The result still needs the fee payer's signature unless the fee payer
    /// is one of those signers.
    pub fn build_transaction(
        &self,
        recent_blockhash: &[u8; 32],
    ) -> Result<Transaction, TokenError> {
        let mut tx = Transaction::new_unsigned(self.compile(recent_blockhash)?);
        for signer in &self.signers {
            tx.sign(signer)?;
        }
        Ok(tx)
    }
}
