//! NFT metadata, holder and history queries, and metadata updates

use super::context::Context;
use super::operation::SignedOperation;
use super::token::DRY_RUN_SIGNATURE;
use crate::chain::metadata::{Creator, Data, Metadata, metadata_address, update_metadata_account};
use crate::chain::token::{TOKEN_PROGRAM_ID, TokenAccount};
use crate::chain::{LAMPORTS_PER_SOL, Pubkey};
use crate::core::batch::{BatchItemResult, BatchRunner};
use crate::core::bulk::{
    BulkAction, BulkHandler, MetadataUpdate, MetadataUpdateRequest, SubmitOptions,
};
use crate::rpc::SignatureInfo;
use crate::utils::error::{Result, SolenError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

/// Bulk metadata update job over a CSV of `mint_address,...` rows
pub type BulkUpdate = BulkHandler<NftClient>;

/// Token account held by an owner, as reported by `getTokenAccountsByOwner`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NftAccount {
    pub account: String,
    pub sol_balance: f64,
    pub token: String,
    pub token_balance: f64,
    pub hold_by_owner: bool,
    pub owner: String,
}

/// NFT operations signed by the context wallet
pub struct NftClient {
    context: Context,
}

impl NftClient {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// On-chain metadata of `mint`. With `sort_creators_by_share` the
    /// creators come highest share first.
    pub async fn get_data(&self, mint: &str, sort_creators_by_share: bool) -> Result<Metadata> {
        let mint: Pubkey = mint.parse()?;
        let address = metadata_address(&mint)?;
        let account = self
            .context
            .rpc()
            .get_account_info(&address.to_string())
            .await?
            .ok_or_else(|| {
                SolenError::remote_rejected(format!("no metadata account for mint {}", mint))
            })?;

        let mut metadata = Metadata::unpack(&account.decode_data()?)?;
        if sort_creators_by_share {
            if let Some(creators) = metadata.data.creators.as_mut() {
                creators.sort_by(|a, b| b.share.cmp(&a.share));
            }
        }
        Ok(metadata)
    }

    /// [`get_data`](Self::get_data) for many mints through the rate limited
    /// worker pool; results keep the input order
    pub async fn bulk_get_data(
        &self,
        mints: &[String],
        sort_creators_by_share: bool,
    ) -> Vec<BatchItemResult<Metadata>> {
        let runner = BatchRunner::new(self.context.bulk().batch_config());
        runner
            .run_all(mints.iter(), |mint| self.get_data(mint, sort_creators_by_share))
            .await
    }

    /// Token accounts that ever held `mint`, largest first
    pub async fn get_holder_accounts(&self, mint: &str) -> Result<Vec<String>> {
        let accounts = self.context.rpc().get_token_largest_accounts(mint).await?;
        Ok(accounts.into_iter().map(|a| a.address).collect())
    }

    /// Owner wallet of a token account
    pub async fn get_account_owner(&self, token_account: &str) -> Result<Pubkey> {
        let account = self
            .context
            .rpc()
            .get_account_info(token_account)
            .await?
            .ok_or_else(|| {
                SolenError::remote_rejected(format!("token account {} not found", token_account))
            })?;
        Ok(TokenAccount::unpack(&account.decode_data()?)?.owner)
    }

    /// Owners of every account that held `mint`
    pub async fn get_holders(&self, mint: &str) -> Result<Vec<String>> {
        let mut holders = Vec::new();
        for account in self.get_holder_accounts(mint).await? {
            holders.push(self.get_account_owner(&account).await?.to_string());
        }
        Ok(holders)
    }

    /// Owner of the largest account of `mint`
    pub async fn get_current_holder(&self, mint: &str) -> Result<Option<String>> {
        match self.get_holder_accounts(mint).await?.first() {
            Some(account) => Ok(Some(self.get_account_owner(account).await?.to_string())),
            None => Ok(None),
        }
    }

    /// Transaction history of `mint`, newest first
    pub async fn get_transactions(&self, mint: &str) -> Result<Vec<SignatureInfo>> {
        Ok(self
            .context
            .rpc()
            .get_signatures_for_address(mint, None)
            .await?)
    }

    /// Token accounts owned by `owner` (default: the wallet)
    pub async fn get_all_nft_accounts_by_owner(&self, owner: Option<&str>) -> Result<Vec<NftAccount>> {
        let owner = self.context.owner_or_self(owner)?;
        let accounts = self
            .context
            .rpc()
            .get_token_accounts_by_owner(&owner.to_string(), &TOKEN_PROGRAM_ID.to_string())
            .await?;

        accounts
            .into_iter()
            .map(|keyed| {
                let token_balance = keyed
                    .token_amount()
                    .and_then(|a| a.ui_amount_string.parse::<f64>().ok())
                    .ok_or_else(|| {
                        SolenError::parsing(format!("missing token amount for {}", keyed.pubkey))
                    })?;
                let lamports = keyed
                    .account
                    .get("lamports")
                    .and_then(Value::as_u64)
                    .unwrap_or_default();
                let info_owner = keyed
                    .account
                    .pointer("/data/parsed/info/owner")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Ok(NftAccount {
                    token: keyed.mint().unwrap_or_default().to_string(),
                    sol_balance: lamports as f64 / LAMPORTS_PER_SOL as f64,
                    token_balance,
                    hold_by_owner: token_balance > 0.0,
                    owner: info_owner,
                    account: keyed.pubkey,
                })
            })
            .collect()
    }

    /// Overwrite the given metadata fields of `mint`, keeping the rest of
    /// the on-chain values
    pub async fn update_token_metadata(
        &self,
        mint: &str,
        update: &MetadataUpdate,
        options: SubmitOptions,
    ) -> Result<String> {
        if update.is_empty() {
            return Err(SolenError::invalid_input(format!("nothing to update for {}", mint)));
        }
        info!("Going to update token {} values: {:?}", mint, update);

        let current = self.get_data(mint, false).await?;
        if current.update_authority != self.context.pubkey() {
            return Err(SolenError::invalid_input(format!(
                "update authority of {} is {}, not {}",
                mint,
                current.update_authority,
                self.context.pubkey()
            )));
        }
        if !current.is_mutable {
            return Err(SolenError::invalid_input(format!("metadata of {} is immutable", mint)));
        }

        let data = merge_data(current.data, update)?;
        data.validate()?;
        let instruction = update_metadata_account(&current.mint, &current.update_authority, data)?;
        if options.dry_run {
            return Ok(DRY_RUN_SIGNATURE.to_string());
        }

        let operation = SignedOperation::new(
            self.context.rpc().clone(),
            self.context.keypair(),
            &self.context.confirmer(),
        );
        let signature = operation.execute(&[instruction], options.skip_confirm).await?;
        if options.skip_confirm {
            return Ok(signature);
        }

        info!("Going to verify update transaction signature: {}", signature);
        self.verify_update(&signature).await?;
        info!("Update been verified");
        Ok(signature)
    }

    /// Bulk metadata update job driven by this client
    pub fn bulk_update(self) -> Result<BulkUpdate> {
        let confirmer = self.context.confirmer();
        let settings = self.context.bulk_settings();
        BulkHandler::new(self, confirmer, settings)
    }

    async fn verify_update(&self, signature: &str) -> Result<()> {
        let Some(transaction) = self.context.rpc().get_transaction(signature).await? else {
            // Not visible yet at this commitment; confirmation is left to the poller
            return Ok(());
        };
        let Some(meta) = transaction.get("meta") else {
            return Ok(());
        };
        if meta.get("err").is_none_or(Value::is_null) {
            return Ok(());
        }

        let logs: Vec<&str> = meta
            .get("logMessages")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        error!("{}", logs.join("\n"));
        let reason = program_error_message(&logs);
        error!("Failed to update token data, {}", reason);
        Err(SolenError::remote_rejected(format!(
            "update transaction {} failed: {}",
            signature, reason
        )))
    }
}

#[async_trait]
impl BulkAction for NftClient {
    type Request = MetadataUpdateRequest;

    fn name(&self) -> &'static str {
        "metadata update"
    }

    async fn submit(&self, request: &MetadataUpdateRequest, options: SubmitOptions) -> Result<String> {
        self.update_token_metadata(&request.mint, &request.update, options)
            .await
    }
}

/// Apply `update` on top of the current on-chain data
pub(crate) fn merge_data(current: Data, update: &MetadataUpdate) -> Result<Data> {
    let creators = match &update.creators {
        Some(specs) => Some(
            specs
                .iter()
                .map(|spec| {
                    Ok(Creator {
                        address: spec.address.parse()?,
                        verified: spec.verified,
                        share: spec.share,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        None => current.creators,
    };

    Ok(Data {
        name: update.name.clone().unwrap_or(current.name),
        symbol: update.symbol.clone().unwrap_or(current.symbol),
        uri: update.uri.clone().unwrap_or(current.uri),
        seller_fee_basis_points: update.fee.unwrap_or(current.seller_fee_basis_points),
        creators,
    })
}

/// Message for the metadata program's `custom program error: 0x..` log line
pub(crate) fn program_error_message(logs: &[&str]) -> String {
    let code = logs.iter().find_map(|line| {
        let (_, code) = line.split_once("custom program error:")?;
        let code = code.trim();
        u32::from_str_radix(code.trim_start_matches("0x"), 16).ok()
    });
    match code {
        Some(code) => match metadata_error(code) {
            Some(message) => format!("{} (0x{:x})", message, code),
            None => format!("custom program error 0x{:x}", code),
        },
        None => "transaction failed".to_string(),
    }
}

fn metadata_error(code: u32) -> Option<&'static str> {
    let message = match code {
        0x0 => "Failed to unpack instruction data",
        0x1 => "Failed to pack instruction data",
        0x2 => "Lamport balance below rent-exempt threshold",
        0x3 => "Already initialized",
        0x4 => "Uninitialized",
        0x5 => "Metadata's key must match seed of ['metadata', program id, mint] provided",
        0x6 => "Edition's key must match seed of ['metadata', program id, name, 'edition'] provided",
        0x7 => "Update Authority given does not match",
        0x8 => "Update Authority needs to be signer to update metadata",
        0x9 => "You must be the mint authority and signer on this transaction",
        0xa => "Mint authority provided does not match the authority on the mint",
        0xb => "Name too long",
        0xc => "Symbol too long",
        0xd => "URI too long",
        _ => return None,
    };
    Some(message)
}
