//! Token metadata program: account layout and the update instruction

use super::pubkey::Pubkey;
use super::transaction::{AccountMeta, Instruction};
use crate::utils::error::{Result, SolenError};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// `metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s`
pub const METADATA_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    11, 112, 101, 177, 227, 209, 124, 69, 56, 157, 82, 127, 107, 4, 195, 205, 88, 184, 108, 115, 26,
    160, 253, 181, 73, 182, 209, 188, 3, 248, 41, 70,
]);

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;
pub const MAX_CREATOR_LIMIT: usize = 5;

const METADATA_V1_KEY: u8 = 4;
const UPDATE_METADATA_ACCOUNT: u8 = 1;

#[derive(
    Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    /// Percentage of royalties, all creators sum to 100
    pub share: u8,
}

#[derive(
    Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Data {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Option<Vec<Creator>>,
}

impl Data {
    /// Reject values the metadata program would refuse
    pub fn validate(&self) -> Result<()> {
        let too_long = |field: &str, value: &str, max: usize| {
            (value.len() > max).then(|| {
                SolenError::invalid_input(format!(
                    "{} is {} bytes, max {}",
                    field,
                    value.len(),
                    max
                ))
            })
        };
        if let Some(err) = too_long("name", &self.name, MAX_NAME_LENGTH)
            .or_else(|| too_long("symbol", &self.symbol, MAX_SYMBOL_LENGTH))
            .or_else(|| too_long("uri", &self.uri, MAX_URI_LENGTH))
        {
            return Err(err);
        }
        if self.seller_fee_basis_points > 10_000 {
            return Err(SolenError::invalid_input(format!(
                "seller fee {} basis points exceeds 10000",
                self.seller_fee_basis_points
            )));
        }
        if let Some(creators) = &self.creators {
            if creators.len() > MAX_CREATOR_LIMIT {
                return Err(SolenError::invalid_input(format!(
                    "{} creators, max {}",
                    creators.len(),
                    MAX_CREATOR_LIMIT
                )));
            }
            let total: u32 = creators.iter().map(|c| u32::from(c.share)).sum();
            if !creators.is_empty() && total != 100 {
                return Err(SolenError::invalid_input(format!(
                    "creator shares sum to {}, expected 100",
                    total
                )));
            }
        }
        Ok(())
    }
}

/// On-chain metadata account
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, Serialize)]
pub struct Metadata {
    pub key: u8,
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub data: Data,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
}

impl Metadata {
    /// Decode the account; string fields are stored null padded
    pub fn unpack(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        let mut metadata = Metadata::deserialize(&mut buf)
            .map_err(|e| SolenError::parsing(format!("invalid metadata account: {}", e)))?;
        if metadata.key != METADATA_V1_KEY {
            return Err(SolenError::parsing(format!(
                "unexpected metadata account key {}",
                metadata.key
            )));
        }
        for field in [
            &mut metadata.data.name,
            &mut metadata.data.symbol,
            &mut metadata.data.uri,
        ] {
            *field = field.trim_matches('\0').to_string();
        }
        Ok(metadata)
    }
}

#[derive(BorshSerialize)]
struct UpdateMetadataAccountArgs {
    data: Option<Data>,
    update_authority: Option<Pubkey>,
    primary_sale_happened: Option<bool>,
}

/// Metadata account of `mint`
pub fn metadata_address(mint: &Pubkey) -> Result<Pubkey> {
    let (address, _) = Pubkey::find_program_address(
        &[b"metadata", METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Replace the metadata `data` of `mint`, signed by its update authority
pub fn update_metadata_account(
    mint: &Pubkey,
    update_authority: &Pubkey,
    data: Data,
) -> Result<Instruction> {
    let args = UpdateMetadataAccountArgs {
        data: Some(data),
        update_authority: None,
        primary_sale_happened: None,
    };
    let mut payload = vec![UPDATE_METADATA_ACCOUNT];
    payload.extend(
        borsh::to_vec(&args)
            .map_err(|e| SolenError::parsing(format!("failed to encode metadata: {}", e)))?,
    );

    Ok(Instruction {
        program_id: METADATA_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(metadata_address(mint)?, false),
            AccountMeta::new_readonly(*update_authority, true),
        ],
        data: payload,
    })
}
