use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::{DacAccount, StatusField};

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    Pending,
    Active,
    Inactive,
}

impl StatusField for AgentStatus {
    fn to_byte(self) -> u8 {
        self as u8
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub agent_slot_id: u64,
    pub owner: Pubkey,
    pub status: AgentStatus,
    pub agent_config_cid: String,
    pub agent_memory_cid: Option<String>,
    pub approved_validators: Vec<Pubkey>,
    pub rejected_validators: Vec<Pubkey>,
    pub bump: u8,
}

impl Agent {
    pub const STATUS_OFFSET: usize = 8 + 8 + 32;
}

impl DacAccount for Agent {
    const NAME: &'static str = "Agent";
    const DISCRIMINATOR: [u8; 8] = [47, 166, 112, 147, 155, 197, 86, 7];
}
