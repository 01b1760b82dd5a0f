//! Legacy transaction format: message compilation, signing, wire encoding

use super::keypair::Keypair;
use super::pubkey::{Pubkey, decode_base58_32};
use crate::utils::error::{Result, SolenError};
use base58::ToBase58;
use base64::Engine;

/// Account referenced by an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable account
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// Compiled message ready to be signed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a message paid for by `payer`.
    ///
    /// Account keys are ordered fee payer first, then writable signers,
    /// readonly signers, writable non-signers and readonly non-signers, each
    /// group in first-seen order.
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: &str) -> Result<Self> {
        let recent_blockhash = decode_base58_32(recent_blockhash, "blockhash")?;

        let mut metas: Vec<AccountMeta> = vec![AccountMeta::new(*payer, true)];
        let mut merge = |meta: AccountMeta| {
            match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                Some(existing) => {
                    existing.is_signer |= meta.is_signer;
                    existing.is_writable |= meta.is_writable;
                }
                None => metas.push(meta),
            }
        };
        for instruction in instructions {
            for meta in &instruction.accounts {
                merge(*meta);
            }
            merge(AccountMeta::new_readonly(instruction.program_id, false));
        }

        let rank = |m: &AccountMeta| match (m.is_signer, m.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        metas[1..].sort_by_key(rank);

        if metas.len() > usize::from(u8::MAX) + 1 {
            return Err(SolenError::invalid_input(format!(
                "transaction references {} accounts (max 256)",
                metas.len()
            )));
        }

        let count = |f: &dyn Fn(&AccountMeta) -> bool| metas.iter().filter(|m| f(m)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(&|m| m.is_signer),
            num_readonly_signed_accounts: count(&|m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(&|m| !m.is_signer && !m.is_writable),
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> u8 {
            account_keys
                .iter()
                .position(|k| k == key)
                .unwrap_or_default() as u8
        };

        let compiled = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Keys whose signatures the message requires, in signature order
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..usize::from(self.header.num_required_signatures)]
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        encode_length(&mut out, self.account_keys.len());
        for key in &self.account_keys {
            out.extend_from_slice(key.as_ref());
        }
        out.extend_from_slice(&self.recent_blockhash);
        encode_length(&mut out, self.instructions.len());
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(&mut out, ix.accounts.len());
            out.extend_from_slice(&ix.accounts);
            encode_length(&mut out, ix.data.len());
            out.extend_from_slice(&ix.data);
        }
        out
    }
}

/// Signed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: Message,
}

impl Transaction {
    /// Compile and sign. `signers` must cover every signer the message
    /// requires; the payer is always one of them.
    pub fn new_signed(
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
        recent_blockhash: &str,
    ) -> Result<Self> {
        let message = Message::new(instructions, &payer.pubkey(), recent_blockhash)?;
        let message_bytes = message.serialize();

        let signatures = message
            .signer_keys()
            .iter()
            .map(|key| {
                std::iter::once(payer)
                    .chain(signers.iter().copied())
                    .find(|kp| kp.pubkey() == *key)
                    .map(|kp| kp.sign_message(&message_bytes))
                    .ok_or_else(|| SolenError::keypair(format!("missing signer for {}", key)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            signatures,
            message,
        })
    }

    /// Base58 of the first signature, which identifies the transaction
    pub fn signature(&self) -> String {
        self.signatures
            .first()
            .map(|s| s.to_base58())
            .unwrap_or_default()
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        encode_length(&mut out, self.signatures.len());
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&self.message.serialize());
        out
    }

    /// Wire encoding accepted by `sendTransaction`
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.serialize())
    }
}

/// Compact-u16 length prefix
pub(crate) fn encode_length(out: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}
