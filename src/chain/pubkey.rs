//! 32-byte account addresses and program derived addresses

use crate::utils::error::{Result, SolenError};
use base58::{FromBase58, ToBase58};
use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub const PUBKEY_BYTES: usize = 32;
pub const MAX_SEED_LEN: usize = 32;
pub const MAX_SEEDS: usize = 16;
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Decode a base58 string that must hold exactly 32 bytes
pub fn decode_base58_32(value: &str, what: &str) -> Result<[u8; 32]> {
    let bytes = value
        .from_base58()
        .map_err(|e| SolenError::invalid_input(format!("invalid {} {:?}: {:?}", what, value, e)))?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        SolenError::invalid_input(format!(
            "invalid {} {:?}: expected 32 bytes, got {}",
            what,
            value,
            b.len()
        ))
    })
}

/// Account address
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    /// Whether the bytes decode to a point on the ed25519 curve
    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// Hash `seeds` into an off-curve address owned by `program_id`
    pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
        validate_seeds(seeds, MAX_SEEDS)?;
        let address = hash_program_address(seeds, program_id);
        if address.is_on_curve() {
            return Err(SolenError::invalid_input(
                "derived address lies on the ed25519 curve",
            ));
        }
        Ok(address)
    }

    /// Find the first bump seed, counting down from 255, that yields an
    /// off-curve program address
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
        validate_seeds(seeds, MAX_SEEDS - 1)?;
        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            let address = hash_program_address(&with_bump, program_id);
            if !address.is_on_curve() {
                return Ok((address, bump));
            }
        }
        Err(SolenError::invalid_input(
            "unable to find a viable program address bump seed",
        ))
    }
}

fn validate_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<()> {
    if seeds.len() > max_seeds {
        return Err(SolenError::invalid_input(format!(
            "too many seeds: {} (max {})",
            seeds.len(),
            max_seeds
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolenError::invalid_input(format!(
            "seed of {} bytes exceeds {} bytes",
            seed.len(),
            MAX_SEED_LEN
        )));
    }
    Ok(())
}

fn hash_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    Pubkey(hasher.finalize().into())
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = SolenError;

    fn from_str(s: &str) -> Result<Self> {
        decode_base58_32(s, "address").map(Pubkey)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
