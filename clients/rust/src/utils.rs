use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::Signer;
use sha2::{Digest, Sha256};
use solana_ed25519_program::new_ed25519_instruction_with_signature;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signer as SolanaSigner},
};

use crate::errors::{DacError, Result};

pub const DISCRIMINATOR_LEN: usize = 8;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemanticVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl SemanticVersion {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

/// `sha256("<namespace>:<name>")` truncated to the discriminator width.
pub fn sighash(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let hash = hasher.finalize();

    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    discriminator
}

pub fn compute_genesis_hash() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"DAC_GENESIS");
    hasher.finalize().into()
}

/// Proof a validator signs over a task result: `sha256(input_cid || output_cid)`.
pub fn compute_validation_proof(input_cid: &str, output_cid: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(input_cid.as_bytes());
    hasher.update(output_cid.as_bytes());
    hasher.finalize().into()
}

/// Message a validator TEE signs before `submit_task_validation`.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubmitTaskValidationMessage {
    pub session_slot_id: u64,
    pub task_slot_id: u64,
    pub payment_amount: u64,
    pub validation_proof: [u8; 32],
    pub approved: bool,
    pub session_completed: bool,
}

impl SubmitTaskValidationMessage {
    /// Ed25519 precompile instruction carrying this message signed by `tee_keypair`.
    /// It must be placed right before the validation instruction.
    pub fn to_ed25519_instruction(&self, tee_keypair: &Keypair) -> Result<Instruction> {
        let message_data = borsh::to_vec(self).map_err(|source| DacError::Encode {
            what: "SubmitTaskValidationMessage",
            source,
        })?;
        Ok(create_ed25519_instruction_with_signature(
            &message_data,
            tee_keypair,
        ))
    }
}

pub fn create_ed25519_instruction_with_signature(
    message: &[u8],
    key_pair: &Keypair,
) -> Instruction {
    let keypair_bytes = key_pair.to_bytes();
    let mut secret_bytes = [0u8; 32];
    secret_bytes.copy_from_slice(&keypair_bytes[..32]);
    let signing_key = ed25519_dalek::SigningKey::from_bytes(&secret_bytes);
    let signature = signing_key.sign(message);

    let mut pubkey_bytes = [0u8; 32];
    pubkey_bytes.copy_from_slice(key_pair.pubkey().as_ref());
    let signature_bytes: [u8; 64] = signature.to_bytes();

    new_ed25519_instruction_with_signature(message, &signature_bytes, &pubkey_bytes)
}
