use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::DacAccount;
use crate::utils::SemanticVersion;

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeMeasurement {
    pub measurement: [u8; 32],
    pub version: SemanticVersion,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub authority: Pubkey,
    pub cid_config: String,
    pub genesis_hash: [u8; 32],
    pub agent_count: u64,
    pub session_count: u64,
    pub task_count: u64,
    pub required_validations: u32,
    pub allowed_models: Vec<u64>,
    pub approved_public_nodes: Vec<Pubkey>,
    pub approved_confidential_nodes: Vec<Pubkey>,
    pub approved_code_measurements: Vec<CodeMeasurement>,
    pub bump: u8,
}

impl NetworkConfig {
    pub fn is_measurement_approved(&self, measurement: &[u8; 32]) -> bool {
        self.approved_code_measurements
            .iter()
            .any(|m| &m.measurement == measurement)
    }

    /// Measurements are kept newest first.
    pub fn get_latest_measurement(&self) -> Option<&CodeMeasurement> {
        self.approved_code_measurements.first()
    }

    pub fn next_agent_slot_id(&self) -> u64 {
        self.agent_count
    }

    pub fn next_session_slot_id(&self) -> u64 {
        self.session_count
    }

    pub fn next_task_slot_id(&self) -> u64 {
        self.task_count
    }

    pub fn approved_nodes(&self, confidential: bool) -> &[Pubkey] {
        if confidential {
            &self.approved_confidential_nodes
        } else {
            &self.approved_public_nodes
        }
    }
}

impl DacAccount for NetworkConfig {
    const NAME: &'static str = "NetworkConfig";
    const DISCRIMINATOR: [u8; 8] = [94, 196, 151, 231, 223, 121, 86, 163];
}
