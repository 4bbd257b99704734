//! Associated token account derivation.
//!
//! The associated account for `(mint, owner)` is the program-derived address
//! of seeds `[owner, token_program_id, mint]` under the associated-token
//! program. Computing it never touches the network.

use std::collections::BTreeMap;

use sol_core::{find_program_address, Address, ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

use crate::error::TokenError;

/// A `(mint, owner)` pair together with its derived associated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAccount {
    pub mint: Address,
    pub owner: Address,
    pub address: Address,
}

impl DerivedAccount {
    pub fn derive(mint: &Address, owner: &Address) -> Result<Self, TokenError> {
        Ok(Self {
            mint: *mint,
            owner: *owner,
            address: get_ata_address(mint, owner)?,
        })
    }
}

/// Derive the associated token account address for a mint + owner pair.
pub fn get_ata_address(mint: &Address, owner: &Address) -> Result<Address, TokenError> {
    let (address, _bump) = find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Derive one associated address per entry of `mints`, keeping the keys.
pub fn get_ata_addresses<K>(
    mints: &BTreeMap<K, Address>,
    owner: &Address,
) -> Result<BTreeMap<K, DerivedAccount>, TokenError>
where
    K: Ord + Clone,
{
    mints
        .iter()
        .map(|(key, mint)| Ok((key.clone(), DerivedAccount::derive(mint, owner)?)))
        .collect()
}

/// Parse Base58 mint and owner strings, then derive.
///
/// Malformed input fails with [`TokenError::InvalidInput`] before any hashing.
pub fn get_ata_address_from_str(mint: &str, owner: &str) -> Result<Address, TokenError> {
    let mint: Address = mint.parse()?;
    let owner: Address = owner.parse()?;
    get_ata_address(&mint, &owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_core::is_on_curve;

    #[test]
    fn derivation_is_deterministic() {
        let mint = Address::new_from_array([0x22u8; 32]);
        let owner = Address::new_from_array([0x11u8; 32]);

        assert_eq!(
            get_ata_address(&mint, &owner).unwrap(),
            get_ata_address(&mint, &owner).unwrap()
        );
    }

    #[test]
    fn ata_is_off_curve() {
        let ata = get_ata_address(
            &Address::new_from_array([0xBBu8; 32]),
            &Address::new_from_array([0xAAu8; 32]),
        )
        .unwrap();
        assert!(!is_on_curve(ata.as_bytes()));
    }

    #[test]
    fn different_owners_give_different_atas() {
        let mint = Address::new_from_array([0xFFu8; 32]);
        let a = get_ata_address(&mint, &Address::new_from_array([1u8; 32])).unwrap();
        let b = get_ata_address(&mint, &Address::new_from_array([2u8; 32])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_mints_give_different_atas() {
        let owner = Address::new_from_array([0xAAu8; 32]);
        let a = get_ata_address(&Address::new_from_array([1u8; 32]), &owner).unwrap();
        let b = get_ata_address(&Address::new_from_array([2u8; 32]), &owner).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn batch_preserves_keys() {
        let owner = Address::new_from_array([7u8; 32]);
        let mints = BTreeMap::from([
            ("usdc", Address::new_from_array([1u8; 32])),
            ("sbr", Address::new_from_array([2u8; 32])),
            ("wsol", Address::new_from_array([3u8; 32])),
        ]);

        let derived = get_ata_addresses(&mints, &owner).unwrap();

        assert!(derived.keys().eq(mints.keys()));
        for (key, account) in &derived {
            assert_eq!(account.mint, mints[key]);
            assert_eq!(account.owner, owner);
            assert_eq!(account.address, get_ata_address(&mints[key], &owner).unwrap());
        }
    }

    #[test]
    fn batch_of_nothing_is_empty() {
        let mints: BTreeMap<String, Address> = BTreeMap::new();
        assert!(get_ata_addresses(&mints, &Address::default()).unwrap().is_empty());
    }

    #[test]
    fn malformed_owner_is_invalid_input() {
        let err = get_ata_address_from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", "abc")
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidInput(_)));
    }

    #[test]
    fn from_str_matches_typed_derivation() {
        let mint = Address::new_from_array([9u8; 32]);
        let owner = Address::new_from_array([8u8; 32]);
        assert_eq!(
            get_ata_address_from_str(&mint.to_string(), &owner.to_string()).unwrap(),
            get_ata_address(&mint, &owner).unwrap()
        );
    }
}
