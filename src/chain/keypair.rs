//! Signing keypairs in the Solana CLI file format

use super::pubkey::Pubkey;
use crate::utils::error::{Result, SolenError};
use ed25519_dalek::{Signer, SigningKey};
use std::fmt;
use std::path::Path;

/// ed25519 keypair; signing itself is delegated to `ed25519-dalek`
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Fresh random keypair
    pub fn generate() -> Self {
        let seed: [u8; 32] = rand::random();
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Build from the 64-byte `secret || public` layout
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| {
            SolenError::keypair(format!("expected 64 keypair bytes, got {}", bytes.len()))
        })?;
        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| SolenError::keypair(format!("invalid keypair bytes: {}", e)))?;
        Ok(Self { signing_key })
    }

    /// Read a keypair file: a JSON array of 64 integers
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolenError::keypair(format!("Failed to read keypair file {}: {}", path.display(), e))
        })?;
        let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| {
            SolenError::keypair(format!("Failed to parse keypair file {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// The 64-byte file representation
    pub fn to_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}
