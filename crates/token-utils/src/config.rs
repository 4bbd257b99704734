//! Provider configuration and per-operation options.
//!
//! Every optional field has exactly one documented default, applied by the
//! `resolve` method of its struct:
//!
//! | field                          | default                                   |
//! |--------------------------------|-------------------------------------------|
//! | `CreateMintOptions::mint_keypair` | freshly generated keypair              |
//! | `CreateMintOptions::authority` | provider identity (`wallet_key`)          |
//! | `CreateMintOptions::decimals`  | `ProviderConfig::default_decimals` (9)    |
//! | `TransferToOptions::source`    | caller's associated account for the token |
//! | `TransferOptions::source`      | caller's associated account for the token |
//! | ATA query `owner`              | provider identity (`wallet_key`)          |

use serde::{Deserialize, Serialize};
use sol_core::{Address, Keypair};

use crate::error::TokenError;
use crate::token::{validate_decimals, TokenAmount, DEFAULT_TOKEN_DECIMALS};

/// Static settings for a [`TokenProvider`](crate::provider::TokenProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Decimals for new mints when the caller does not pick any.
    pub default_decimals: u8,
    /// Fixed rent for new mint accounts. `None` asks the ledger provider.
    pub mint_rent_lamports: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default_decimals: DEFAULT_TOKEN_DECIMALS,
            mint_rent_lamports: None,
        }
    }
}

impl ProviderConfig {
    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TokenError::InvalidInput(format!("provider config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TokenError> {
        validate_decimals(self.default_decimals)
    }
}

/// Options for creating a mint.
#[derive(Debug, Clone, Default)]
pub struct CreateMintOptions {
    pub mint_keypair: Option<Keypair>,
    pub authority: Option<Address>,
    pub decimals: Option<u8>,
}

/// [`CreateMintOptions`] with every default applied.
#[derive(Debug, Clone)]
pub struct MintParams {
    pub mint_keypair: Keypair,
    pub authority: Address,
    pub decimals: u8,
}

impl CreateMintOptions {
    pub fn with_mint_keypair(mut self, keypair: Keypair) -> Self {
        self.mint_keypair = Some(keypair);
        self
    }

    pub fn with_authority(mut self, authority: Address) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn resolve(
        self,
        wallet_key: Address,
        config: &ProviderConfig,
    ) -> Result<MintParams, TokenError> {
        let decimals = self.decimals.unwrap_or(config.default_decimals);
        validate_decimals(decimals)?;
        Ok(MintParams {
            mint_keypair: self.mint_keypair.unwrap_or_else(Keypair::generate),
            authority: self.authority.unwrap_or(wallet_key),
            decimals,
        })
    }
}

/// Options for a transfer into a known token account.
#[derive(Debug, Clone)]
pub struct TransferToOptions {
    pub amount: TokenAmount,
    /// Token account to debit. `None` uses the caller's associated account.
    pub source: Option<Address>,
    pub destination: Address,
}

impl TransferToOptions {
    pub fn new(amount: TokenAmount, destination: Address) -> Self {
        Self {
            amount,
            source: None,
            destination,
        }
    }

    pub fn with_source(mut self, source: Address) -> Self {
        self.source = Some(source);
        self
    }
}

/// Options for a transfer to a wallet owner. The recipient's associated
/// account is created if needed.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub amount: TokenAmount,
    /// Token account to debit. `None` uses the caller's associated account.
    pub source: Option<Address>,
    /// Recipient wallet. Must not be a token account.
    pub to: Address,
}

impl TransferOptions {
    pub fn new(amount: TokenAmount, to: Address) -> Self {
        Self {
            amount,
            source: None,
            to,
        }
    }

    pub fn with_source(mut self, source: Address) -> Self {
        self.source = Some(source);
        self
    }
}
