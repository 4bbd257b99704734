//! Token provider: mint creation, transfers and associated account lookups
//! composed into envelopes.
//!
//! Every builder either returns a complete envelope or fails before handing
//! anything out. Submission is a separate, explicit step.

use std::collections::BTreeMap;
use std::sync::Arc;

use sol_core::Address;
use tracing::{debug, info};

use crate::ata::{get_ata_address, get_ata_addresses, DerivedAccount};
use crate::config::{CreateMintOptions, ProviderConfig, TransferOptions, TransferToOptions};
use crate::envelope::TransactionEnvelope;
use crate::error::TokenError;
use crate::instructions::{create_mint_instructions, transfer, MINT_SIZE};
use crate::oracle::{AccountOracle, Confirmation, LedgerProvider};
use crate::resolver::{AtaResolver, ResolvedAccount};
use crate::token::Token;

/// Ledger provider augmented with token utilities.
#[derive(Clone)]
pub struct TokenProvider {
    ledger: Arc<dyn LedgerProvider>,
    oracle: Arc<dyn AccountOracle>,
    config: ProviderConfig,
}

impl TokenProvider {
    pub fn new(ledger: Arc<dyn LedgerProvider>, oracle: Arc<dyn AccountOracle>) -> Self {
        Self {
            ledger,
            oracle,
            config: ProviderConfig::default(),
        }
    }

    pub fn with_config(
        ledger: Arc<dyn LedgerProvider>,
        oracle: Arc<dyn AccountOracle>,
        config: ProviderConfig,
    ) -> Result<Self, TokenError> {
        config.validate()?;
        Ok(Self {
            ledger,
            oracle,
            config,
        })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The provider's own identity.
    pub fn wallet_key(&self) -> Address {
        self.ledger.wallet_key()
    }

    /// A resolver that charges account creation to this provider's wallet.
    pub fn resolver(&self) -> AtaResolver<'_> {
        self.resolver_for(self.wallet_key())
    }

    fn resolver_for(&self, payer: Address) -> AtaResolver<'_> {
        AtaResolver::new(self.oracle.as_ref(), payer)
    }

    // -----------------------------------------------------------------------
    // Mints
    // -----------------------------------------------------------------------

    /// Build the envelope that creates a mint, and the [`Token`] it will be.
    ///
    /// The mint address is chosen here, so the token is known before
    /// submission. The mint keypair is attached to the envelope as a signer.
    pub async fn create_mint_tx(
        &self,
        options: CreateMintOptions,
    ) -> Result<(Token, TransactionEnvelope), TokenError> {
        let payer = self.wallet_key();
        let params = options.resolve(payer, &self.config)?;
        let mint = params.mint_keypair.address();
        let token = Token::from_mint(mint, params.decimals)?;

        let rent = match self.config.mint_rent_lamports {
            Some(lamports) => lamports,
            None => self
                .ledger
                .minimum_balance_for_rent_exemption(MINT_SIZE)
                .await
                .map_err(|source| TokenError::lookup_failed(mint, source))?,
        };

        let instructions =
            create_mint_instructions(&payer, &mint, &params.authority, params.decimals, rent)?;
        let mut envelope = TransactionEnvelope::of(payer, instructions);
        envelope.add_signer(params.mint_keypair);

        debug!(
            %mint,
            authority = %params.authority,
            decimals = params.decimals,
            rent,
            "built mint envelope"
        );
        Ok((token, envelope))
    }

    /// Create a mint and wait for confirmation.
    pub async fn create_mint(&self, options: CreateMintOptions) -> Result<Token, TokenError> {
        let (token, envelope) = self.create_mint_tx(options).await?;
        let confirmation = self.submit(envelope).await?;
        info!(mint = %token.mint(), signature = %confirmation.signature, "mint created");
        Ok(token)
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Transfer into a known token account.
    ///
    /// Without an explicit source, the caller's associated account for the
    /// token is used; its create instruction, if needed, is queued before the
    /// transfer.
    pub async fn transfer_to(
        &self,
        options: TransferToOptions,
    ) -> Result<TransactionEnvelope, TokenError> {
        self.transfer_to_with(self.wallet_key(), options).await
    }

    /// [`transfer_to`](Self::transfer_to) with the wallet identity already
    /// read, so one envelope never mixes payers across await points.
    async fn transfer_to_with(
        &self,
        wallet: Address,
        options: TransferToOptions,
    ) -> Result<TransactionEnvelope, TokenError> {
        let mint = options.amount.token().mint();
        let mut envelope = TransactionEnvelope::new(wallet);

        let source = match options.source {
            Some(source) => source,
            None => {
                let resolved = self.resolver_for(wallet).resolve(&mint, &wallet).await?;
                if let Some(create) = resolved.instruction {
                    envelope.append(create);
                }
                resolved.account.address
            }
        };

        envelope.append(transfer(
            &source,
            &options.destination,
            &wallet,
            options.amount.raw(),
        ));

        debug!(
            %source,
            destination = %options.destination,
            amount = options.amount.raw(),
            instructions = envelope.len(),
            "built transfer envelope"
        );
        Ok(envelope)
    }

    /// Transfer to a wallet owner, creating their associated account first if
    /// it is missing.
    ///
    /// The recipient's create instruction is placed at index 0, ahead of any
    /// source-account creation and the transfer itself.
    pub async fn transfer(
        &self,
        options: TransferOptions,
    ) -> Result<TransactionEnvelope, TokenError> {
        let wallet = self.wallet_key();
        let mint = options.amount.token().mint();
        let recipient = self.resolver_for(wallet).resolve(&mint, &options.to).await?;

        let mut envelope = self
            .transfer_to_with(
                wallet,
                TransferToOptions {
                    amount: options.amount,
                    source: options.source,
                    destination: recipient.account.address,
                },
            )
            .await?;

        if let Some(create) = recipient.instruction {
            // Sending to oneself with no account yet: transfer_to already
            // queued this exact create at index 0.
            if !envelope.instructions().contains(&create) {
                envelope.prepend(create);
            }
        }

        Ok(envelope)
    }

    // -----------------------------------------------------------------------
    // Associated accounts
    // -----------------------------------------------------------------------

    /// Associated account address for `mint`. `owner` defaults to the wallet.
    pub fn ata_address(
        &self,
        mint: &Address,
        owner: Option<Address>,
    ) -> Result<Address, TokenError> {
        let owner = owner.unwrap_or_else(|| self.wallet_key());
        get_ata_address(mint, &owner)
    }

    /// Associated accounts for several mints. `owner` defaults to the wallet.
    pub fn ata_addresses<K>(
        &self,
        mints: &BTreeMap<K, Address>,
        owner: Option<Address>,
    ) -> Result<BTreeMap<K, DerivedAccount>, TokenError>
    where
        K: Ord + Clone,
    {
        let owner = owner.unwrap_or_else(|| self.wallet_key());
        get_ata_addresses(mints, &owner)
    }

    /// Associated account for `mint`, with a create instruction if missing.
    /// `owner` defaults to the wallet.
    pub async fn get_or_create_ata(
        &self,
        mint: &Address,
        owner: Option<Address>,
    ) -> Result<ResolvedAccount, TokenError> {
        let wallet = self.wallet_key();
        let owner = owner.unwrap_or(wallet);
        self.resolver_for(wallet).resolve(mint, &owner).await
    }

    /// Batch form of [`get_or_create_ata`](Self::get_or_create_ata).
    pub async fn get_or_create_atas<K>(
        &self,
        mints: &BTreeMap<K, Address>,
        owner: Option<Address>,
    ) -> Result<BTreeMap<K, ResolvedAccount>, TokenError>
    where
        K: Ord + Clone,
    {
        let wallet = self.wallet_key();
        let owner = owner.unwrap_or(wallet);
        self.resolver_for(wallet).resolve_many(mints, &owner).await
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Hand `envelope` to the ledger provider. Failures are not retried.
    pub async fn submit(
        &self,
        envelope: TransactionEnvelope,
    ) -> Result<Confirmation, TokenError> {
        debug!(
            instructions = envelope.len(),
            fee_payer = %envelope.fee_payer(),
            "submitting envelope"
        );
        self.ledger.submit(envelope).await
    }
}
