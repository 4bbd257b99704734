//! Token tooling on top of [`sol_core`].
//!
//! Derives associated token accounts, decides whether they need creating,
//! and assembles ordered instruction envelopes for mints and transfers.
//! Network access goes through two narrow traits: [`AccountOracle`] for
//! existence lookups and [`LedgerProvider`] for identity and submission.

pub mod ata;
pub mod config;
pub mod envelope;
pub mod error;
pub mod instructions;
pub mod oracle;
pub mod provider;
pub mod resolver;
pub mod token;

pub use ata::{get_ata_address, get_ata_address_from_str, get_ata_addresses, DerivedAccount};
pub use config::{
    CreateMintOptions, MintParams, ProviderConfig, TransferOptions, TransferToOptions,
};
pub use envelope::TransactionEnvelope;
pub use error::{BoxError, FailureStage, TokenError};
pub use instructions::{
    create_associated_token_account, create_mint_instructions, default_rent_exemption,
    initialize_mint, transfer, MINT_SIZE,
};
pub use oracle::{AccountOracle, Confirmation, LedgerProvider};
pub use provider::TokenProvider;
pub use resolver::{AtaResolver, ResolvedAccount};
pub use token::{Token, TokenAmount, DEFAULT_TOKEN_DECIMALS, MAX_TOKEN_DECIMALS};
