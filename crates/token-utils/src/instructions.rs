//! SPL Token and Associated Token Account instructions.
//!
//! Pure constructors, no I/O. Validation is structural only.

use sol_core::{
    system, AccountMeta, Address, Instruction, ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};

use crate::error::TokenError;
use crate::token::validate_decimals;

/// Size of an SPL Token mint account in bytes.
pub const MINT_SIZE: u64 = 82;

/// SPL Token instruction tags.
const INITIALIZE_MINT2_TAG: u8 = 20;
const TRANSFER_TAG: u8 = 3;

/// Build an associated-token-program `Create` instruction.
///
/// `payer` funds the new account and signs. The data is empty; the program
/// re-derives `ata` from `owner` and `mint` and fails if it does not match
/// or if the account already exists.
pub fn create_associated_token_account(
    payer: &Address,
    owner: &Address,
    ata: &Address,
    mint: &Address,
) -> Instruction {
    Instruction::new(
        ASSOCIATED_TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(*ata, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        Vec::new(),
    )
}

/// Build an SPL Token `Transfer` instruction.
///
/// Moves `amount` base units from `source` to `destination`; `authority`
/// owns `source` and signs.
///
/// # Wire format
///
/// Tag 3 followed by u64 LE amount. Total data: 9 bytes.
pub fn transfer(
    source: &Address,
    destination: &Address,
    authority: &Address,
    amount: u64,
) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(TRANSFER_TAG);
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![
            AccountMeta::writable(*source, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*authority, true),
        ],
        data,
    )
}

/// Build an SPL Token `InitializeMint2` instruction with no freeze authority.
///
/// # Wire format
///
/// Tag 20, decimals (u8), mint authority (32 bytes), freeze-authority
/// option (u8 flag + 32 bytes). Total data: 67 bytes.
pub fn initialize_mint(
    mint: &Address,
    mint_authority: &Address,
    decimals: u8,
) -> Result<Instruction, TokenError> {
    validate_decimals(decimals)?;

    let mut data = Vec::with_capacity(67);
    data.push(INITIALIZE_MINT2_TAG);
    data.push(decimals);
    data.extend_from_slice(mint_authority.as_bytes());
    data.push(0);
    data.extend_from_slice(&[0u8; 32]);

    Ok(Instruction::new(
        TOKEN_PROGRAM_ID,
        vec![AccountMeta::writable(*mint, false)],
        data,
    ))
}

/// Instructions that allocate and initialize a new mint.
///
/// Returns `[CreateAccount, InitializeMint2]`; allocation must run first.
/// Both `payer` and `mint` sign the allocation.
pub fn create_mint_instructions(
    payer: &Address,
    mint: &Address,
    authority: &Address,
    decimals: u8,
    rent_lamports: u64,
) -> Result<Vec<Instruction>, TokenError> {
    let init = initialize_mint(mint, authority, decimals)?;
    Ok(vec![
        system::create_account(payer, mint, rent_lamports, MINT_SIZE, &TOKEN_PROGRAM_ID),
        init,
    ])
}

/// Minimum lamports for a rent-exempt account of `data_len` bytes under the
/// default rent parameters (3480 lamports/byte-year, 2-year exemption,
/// 128 bytes of account overhead).
pub fn default_rent_exemption(data_len: u64) -> u64 {
    (128 + data_len) * 3_480 * 2
}
