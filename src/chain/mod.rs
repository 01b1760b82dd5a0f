//! On-chain primitives: addresses, keypairs, transactions, and the
//! token and token-metadata program encodings solen needs.

pub mod keypair;
pub mod metadata;
pub mod pubkey;
pub mod token;
pub mod transaction;


pub use keypair::Keypair;
pub use pubkey::Pubkey;
pub use transaction::{AccountMeta, Instruction, Message, Transaction};

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// System program
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);

/// Rent sysvar, `SysvarRent111111111111111111111111111111111`
pub const RENT_SYSVAR_ID: Pubkey = Pubkey::new_from_array([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155, 161,
    253, 68, 227, 219, 217, 138, 0, 0, 0, 0,
]);
