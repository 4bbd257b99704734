//! Tokens and exact token amounts.
//!
//! Amounts are always integers in the token's smallest unit. For a token
//! with 6 decimals, `raw = 1_500_000` is 1.5 whole tokens.

use std::fmt;

use serde::{Deserialize, Serialize};
use sol_core::Address;

use crate::error::TokenError;

/// Decimals used when a caller does not choose.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 9;

/// Largest precision accepted. Past this a single whole token no longer fits
/// comfortably in a u64 magnitude.
pub const MAX_TOKEN_DECIMALS: u8 = 18;

/// A fungible asset: its mint address and decimal precision.
///
/// Deserialization goes through [`Token::from_mint`], so out-of-range
/// decimals are rejected on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    mint: Address,
    decimals: u8,
}

#[derive(Deserialize)]
struct RawToken {
    mint: Address,
    decimals: u8,
}

impl TryFrom<RawToken> for Token {
    type Error = TokenError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        Token::from_mint(raw.mint, raw.decimals)
    }
}

impl Token {
    /// Build a token, rejecting decimals above [`MAX_TOKEN_DECIMALS`].
    pub fn from_mint(mint: Address, decimals: u8) -> Result<Self, TokenError> {
        validate_decimals(decimals)?;
        Ok(Self { mint, decimals })
    }

    pub fn mint(&self) -> Address {
        self.mint
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

pub(crate) fn validate_decimals(decimals: u8) -> Result<(), TokenError> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(TokenError::InvalidInput(format!(
            "decimals {decimals} exceeds {MAX_TOKEN_DECIMALS}"
        )));
    }
    Ok(())
}

/// An exact quantity of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenAmount {
    token: Token,
    raw: u64,
}

impl TokenAmount {
    /// Amount from a raw base-unit magnitude.
    pub fn new(token: Token, raw: u64) -> Self {
        Self { token, raw }
    }

    /// Parse a decimal string such as `"1.5"` in whole-token units.
    ///
    /// Rejects negative values, more fractional digits than the token
    /// supports, and magnitudes that overflow u64.
    pub fn parse(token: Token, input: &str) -> Result<Self, TokenError> {
        let s = input.trim();
        if s.starts_with('-') {
            return Err(TokenError::InvalidInput(format!(
                "amount must not be negative: {input}"
            )));
        }

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(TokenError::InvalidInput(format!("empty amount: {input:?}")));
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(TokenError::InvalidInput(format!("not a decimal number: {input}")));
        }

        let decimals = usize::from(token.decimals);
        if frac.len() > decimals {
            return Err(TokenError::InvalidInput(format!(
                "{input} has more than {decimals} fractional digits"
            )));
        }

        let overflow = || TokenError::InvalidInput(format!("amount {input} overflows u64"));
        let scale = 10u64.checked_pow(u32::from(token.decimals)).ok_or_else(overflow)?;
        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let frac: u64 = if frac.is_empty() {
            0
        } else {
            // Right-pad to the token's precision: "5" at 6 decimals is 500_000.
            format!("{frac:0<decimals$}").parse().map_err(|_| overflow())?
        };

        let raw = whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(overflow)?;

        Ok(Self { token, raw })
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Magnitude in base units.
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Decimal string in whole-token units, trailing zeros trimmed.
    pub fn to_ui_string(&self) -> String {
        let decimals = u32::from(self.token.decimals);
        if decimals == 0 {
            return self.raw.to_string();
        }
        let scale = 10u128.pow(decimals);
        let raw = u128::from(self.raw);
        let whole = raw / scale;
        let frac = raw % scale;
        if frac == 0 {
            return whole.to_string();
        }
        let width = decimals as usize;
        let frac = format!("{frac:0>width$}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.to_ui_string(), self.token.mint)
    }
}
