//! SPL token balance and transfer operations

use super::context::Context;
use super::operation::SignedOperation;
use crate::chain::token::{
    TOKEN_PROGRAM_ID, associated_token_address, create_associated_token_account,
    transfer_checked, ui_amount_to_base_units,
};
use crate::chain::{Instruction, Pubkey};
use crate::core::bulk::{BulkAction, BulkHandler, SubmitOptions, TransferRequest};
use crate::rpc::UiTokenAmount;
use crate::utils::error::{Result, SolenError};
use async_trait::async_trait;
use tracing::info;

/// Signature recorded for transfers that were only simulated
pub const DRY_RUN_SIGNATURE: &str = "dry-run";

/// Bulk transfer job over a CSV of `dest,amount` rows
pub type BulkTransfer = BulkHandler<TokenClient>;

/// Operations on one token mint, signed by the context wallet
pub struct TokenClient {
    context: Context,
    mint: Pubkey,
    decimals: u8,
}

impl TokenClient {
    /// Bind to `mint`, or to the environment's configured token, and fetch
    /// its decimals
    pub async fn new(context: Context, mint: Option<&str>) -> Result<Self> {
        let mint = match mint.or(context.token()) {
            Some(mint) => mint.parse::<Pubkey>()?,
            None => {
                return Err(SolenError::config(format!(
                    "no token given and no `{}_token` in config file (addresses section)",
                    context.env()
                )));
            }
        };
        let decimals = token_decimals(&context, &mint).await?;
        Ok(Self {
            context,
            mint,
            decimals,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn mint(&self) -> &Pubkey {
        &self.mint
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Decimals of any mint
    pub async fn token_decimals(&self, mint: &str) -> Result<u8> {
        token_decimals(&self.context, &mint.parse()?).await
    }

    /// Token balance of `owner` (default: the wallet); zero when the owner has
    /// no token account yet
    pub async fn balance(&self, owner: Option<&str>) -> Result<f64> {
        let owner = self.context.owner_or_self(owner)?;
        let address = self.associated_address(&owner)?;
        if !self.is_account_funded(&address.to_string()).await? {
            return Ok(0.0);
        }
        let amount = self
            .context
            .rpc()
            .get_token_account_balance(&address.to_string())
            .await?;
        ui_amount(&amount)
    }

    /// Associated token account of `owner` for this mint
    pub fn associated_address(&self, owner: &Pubkey) -> Result<Pubkey> {
        associated_token_address(owner, &self.mint)
    }

    /// True when `address` is an account owned by the token program
    pub async fn is_token_account(&self, address: &str) -> Result<bool> {
        let account = self.context.rpc().get_account_info(address).await?;
        Ok(account.is_some_and(|a| a.owner == TOKEN_PROGRAM_ID.to_string()))
    }

    /// True when `address` exists on chain
    pub async fn is_account_funded(&self, address: &str) -> Result<bool> {
        Ok(self.context.rpc().get_account_info(address).await?.is_some())
    }

    /// Create and fund the associated token account of `wallet`
    pub async fn create_associated_token_account(
        &self,
        wallet: &str,
        skip_confirm: bool,
    ) -> Result<String> {
        let wallet: Pubkey = wallet.parse()?;
        let instruction =
            create_associated_token_account(&self.context.pubkey(), &wallet, &self.mint)?;
        self.operation().execute(&[instruction], skip_confirm).await
    }

    /// Transfer `amount` tokens to `dest`, a wallet or a token account.
    ///
    /// A wallet without an associated token account gets one created in the
    /// same transaction.
    pub async fn transfer_token(
        &self,
        dest: &str,
        amount: f64,
        options: SubmitOptions,
    ) -> Result<String> {
        let dest_key: Pubkey = dest.parse()?;
        let base_units = ui_amount_to_base_units(amount, self.decimals)?;
        info!(
            "Going to transfer {} ({} base units) from local wallet to {}",
            amount, base_units, dest
        );
        if options.dry_run {
            return Ok(DRY_RUN_SIGNATURE.to_string());
        }

        let owner = self.context.pubkey();
        let mut instructions: Vec<Instruction> = Vec::with_capacity(2);
        let destination = if self.is_token_account(dest).await? {
            dest_key
        } else {
            let associated = self.associated_address(&dest_key)?;
            info!("Recipient associated token account: {}", associated);
            if !self.is_account_funded(&associated.to_string()).await? {
                info!("Create & fund recipient associated token account: {}", associated);
                instructions.push(create_associated_token_account(
                    &owner,
                    &dest_key,
                    &self.mint,
                )?);
            }
            associated
        };

        instructions.push(transfer_checked(
            &self.associated_address(&owner)?,
            &self.mint,
            &destination,
            &owner,
            base_units,
            self.decimals,
        ));

        let signature = self
            .operation()
            .execute(&instructions, options.skip_confirm)
            .await?;
        info!("Token been transferred, transaction signature: {}", signature);
        Ok(signature)
    }

    /// Bulk transfer job driven by this client
    pub fn bulk_transfer(self) -> Result<BulkTransfer> {
        let confirmer = self.context.confirmer();
        let settings = self.context.bulk_settings();
        BulkHandler::new(self, confirmer, settings)
    }

    fn operation(&self) -> SignedOperation<'_> {
        SignedOperation::new(
            self.context.rpc().clone(),
            self.context.keypair(),
            &self.context.confirmer(),
        )
    }
}

#[async_trait]
impl BulkAction for TokenClient {
    type Request = TransferRequest;

    fn name(&self) -> &'static str {
        "transfer"
    }

    async fn submit(&self, request: &TransferRequest, options: SubmitOptions) -> Result<String> {
        self.transfer_token(&request.dest, request.amount, options)
            .await
    }
}

async fn token_decimals(context: &Context, mint: &Pubkey) -> Result<u8> {
    Ok(context
        .rpc()
        .get_token_supply(&mint.to_string())
        .await?
        .decimals)
}

fn ui_amount(amount: &UiTokenAmount) -> Result<f64> {
    amount.ui_amount_string.parse().map_err(|_| {
        SolenError::parsing(format!(
            "invalid token amount: {:?}",
            amount.ui_amount_string
        ))
    })
}
