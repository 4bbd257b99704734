//! System Program instructions.

use crate::address::Address;
use crate::instruction::{AccountMeta, Instruction};
use crate::program::SYSTEM_PROGRAM_ID;

/// System Program `CreateAccount` instruction index (little-endian u32).
const SYSTEM_CREATE_ACCOUNT_IX_INDEX: u32 = 0;

/// Build a System Program `CreateAccount` instruction.
///
/// Funds `new_account` with `lamports` from `from`, allocates `space` bytes
/// and assigns ownership to `owner`. Both `from` and `new_account` must sign.
///
/// # Wire format
///
/// u32 LE index (0) + u64 LE lamports + u64 LE space + 32-byte owner = 52 bytes.
pub fn create_account(
    from: &Address,
    new_account: &Address,
    lamports: u64,
    space: u64,
    owner: &Address,
) -> Instruction {
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&SYSTEM_CREATE_ACCOUNT_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner.as_bytes());

    Instruction::new(
        SYSTEM_PROGRAM_ID,
        vec![
            AccountMeta::writable(*from, true),
            AccountMeta::writable(*new_account, true),
        ],
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_account_data_layout() {
        let from = Address::new_from_array([1u8; 32]);
        let new_account = Address::new_from_array([2u8; 32]);
        let owner = Address::new_from_array([3u8; 32]);

        let ix = create_account(&from, &new_account, 1_461_600, 82, &owner);

        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.data.len(), 52);
        assert_eq!(&ix.data[..4], &[0, 0, 0, 0]);
        assert_eq!(&ix.data[4..12], &1_461_600u64.to_le_bytes());
        assert_eq!(&ix.data[12..20], &82u64.to_le_bytes());
        assert_eq!(&ix.data[20..], owner.as_bytes());
    }

    #[test]
    fn create_account_both_accounts_sign() {
        let from = Address::new_from_array([1u8; 32]);
        let new_account = Address::new_from_array([2u8; 32]);
        let ix = create_account(&from, &new_account, 1, 0, &SYSTEM_PROGRAM_ID);

        assert_eq!(ix.accounts.len(), 2);
        assert!(ix.accounts.iter().all(|m| m.is_signer && m.is_writable));
        assert_eq!(ix.accounts[0].address, from);
        assert_eq!(ix.accounts[1].address, new_account);
    }
}
