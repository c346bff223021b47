use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::{DacAccount, StatusField};

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Pending,
    Active,
    Completed,
}

impl StatusField for SessionStatus {
    fn to_byte(self) -> u8 {
        self as u8
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub session_slot_id: u64,
    pub owner: Pubkey,
    pub task: Pubkey,
    pub status: SessionStatus,
    pub is_confidential: bool,
    pub max_iterations: u64, // 0 is infinite
    pub current_iteration: u64,
    pub task_index_start: u64,
    pub task_index_end: u64,
    pub total_shares: u64,
    pub locked_for_tasks: u64,
    pub specification_cid: String,
    pub state_cid: Option<String>,
    pub vault_bump: u8,
    pub bump: u8,
}

impl Session {
    pub const STATUS_OFFSET: usize = 8 + 8 + 32 + 32;

    /// An unowned session can be claimed by whoever sets it first.
    pub fn is_unowned(&self) -> bool {
        self.owner == Pubkey::default()
    }
}

impl DacAccount for Session {
    const NAME: &'static str = "Session";
    const DISCRIMINATOR: [u8; 8] = [243, 81, 72, 115, 214, 188, 72, 144];
}
