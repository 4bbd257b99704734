//! Associated token account resolution.
//!
//! Resolving derives the address, asks the oracle whether it exists and, only
//! if it does not, builds the instruction that creates it.
//!
//! Two resolvers racing on the same `(mint, owner)` may both see "absent" and
//! both emit a create instruction. That race is left to the ledger: the
//! associated-token program rejects a create on an existing account, so at
//! most one lands. Callers wanting a client-side guarantee should serialize
//! resolution per `(mint, owner)` themselves.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use sol_core::{Address, Instruction};
use tracing::debug;

use crate::ata::DerivedAccount;
use crate::error::TokenError;
use crate::instructions::create_associated_token_account;
use crate::oracle::AccountOracle;

/// A derived account plus the instruction needed to create it, if missing
/// when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccount {
    pub account: DerivedAccount,
    pub instruction: Option<Instruction>,
}

impl ResolvedAccount {
    pub fn address(&self) -> Address {
        self.account.address
    }

    pub fn needs_creation(&self) -> bool {
        self.instruction.is_some()
    }
}

/// Resolves associated accounts against an oracle, charging creation to
/// `payer`.
pub struct AtaResolver<'a> {
    oracle: &'a dyn AccountOracle,
    payer: Address,
}

impl<'a> AtaResolver<'a> {
    pub fn new(oracle: &'a dyn AccountOracle, payer: Address) -> Self {
        Self { oracle, payer }
    }

    pub fn payer(&self) -> &Address {
        &self.payer
    }

    /// Get the associated account for `(mint, owner)`, with a create
    /// instruction if it does not exist yet.
    pub async fn resolve(
        &self,
        mint: &Address,
        owner: &Address,
    ) -> Result<ResolvedAccount, TokenError> {
        let account = DerivedAccount::derive(mint, owner)?;

        let exists = self
            .oracle
            .exists(&account.address)
            .await
            .map_err(|source| TokenError::lookup_failed(account.address, source))?;

        let instruction = if exists {
            debug!(ata = %account.address, %mint, %owner, "associated account exists");
            None
        } else {
            debug!(
                ata = %account.address,
                %mint,
                %owner,
                payer = %self.payer,
                "associated account missing, queueing create"
            );
            Some(create_associated_token_account(
                &self.payer,
                owner,
                &account.address,
                mint,
            ))
        };

        Ok(ResolvedAccount {
            account,
            instruction,
        })
    }

    /// Resolve one account per entry of `mints`, all for `owner`.
    ///
    /// Lookups are polled together on the calling task. Any failure fails the
    /// whole batch; there are no partial results.
    pub async fn resolve_many<K>(
        &self,
        mints: &BTreeMap<K, Address>,
        owner: &Address,
    ) -> Result<BTreeMap<K, ResolvedAccount>, TokenError>
    where
        K: Ord + Clone,
    {
        let lookups = mints.iter().map(|(key, mint)| async move {
            let resolved = self.resolve(mint, owner).await?;
            Ok::<_, TokenError>((key.clone(), resolved))
        });

        let resolved = try_join_all(lookups).await?;
        Ok(resolved.into_iter().collect())
    }
}
