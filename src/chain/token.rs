//! SPL token and associated token account program encodings

use super::pubkey::Pubkey;
use super::transaction::{AccountMeta, Instruction};
use super::{RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID};
use crate::utils::error::{Result, SolenError};

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133, 237,
    95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// Size of a token account
pub const TOKEN_ACCOUNT_LEN: usize = 165;

const TRANSFER_CHECKED: u8 = 12;

/// Associated token account of `owner` for `mint`
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Result<Pubkey> {
    let (address, _) = Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Create the associated token account of `wallet` for `mint`, funded by `payer`
pub fn create_associated_token_account(
    payer: &Pubkey,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> Result<Instruction> {
    let associated = associated_token_address(wallet, mint)?;
    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(associated, false),
            AccountMeta::new_readonly(*wallet, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        ],
        data: Vec::new(),
    })
}

/// `TransferChecked`: move `amount` base units, asserting the mint's decimals
pub fn transfer_checked(
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let mut data = Vec::with_capacity(10);
    data.push(TRANSFER_CHECKED);
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    }
}

/// Convert a UI amount to base units, rejecting amounts that do not fit
pub fn ui_amount_to_base_units(amount: f64, decimals: u8) -> Result<u64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SolenError::invalid_input(format!("invalid amount: {}", amount)));
    }
    let scaled = (amount * 10f64.powi(i32::from(decimals))).round();
    if scaled > u64::MAX as f64 {
        return Err(SolenError::invalid_input(format!("amount too large: {}", amount)));
    }
    Ok(scaled as u64)
}

/// Decoded prefix of a token account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl TokenAccount {
    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() < TOKEN_ACCOUNT_LEN {
            return Err(SolenError::parsing(format!(
                "token account data is {} bytes, expected at least {}",
                data.len(),
                TOKEN_ACCOUNT_LEN
            )));
        }
        let key_at = |offset: usize| {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&data[offset..offset + 32]);
            Pubkey::new_from_array(bytes)
        };
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&data[64..72]);

        Ok(Self {
            mint: key_at(0),
            owner: key_at(32),
            amount: u64::from_le_bytes(amount),
        })
    }
}
