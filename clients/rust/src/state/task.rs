use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::{DacAccount, StatusField};

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    Ready,
    Pending,
    Processing,
    AwaitingValidation,
}

impl StatusField for TaskStatus {
    fn to_byte(self) -> u8 {
        self as u8
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum TaskType {
    Completion(u64), // model id
    Custom(u64),     // module identifier
    HumanInLoop,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum ValidationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    pub pubkey: Pubkey,
    pub status: ValidationStatus,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub task_slot_id: u64,
    pub session_slot_id: Option<u64>,
    pub status: TaskStatus,
    pub compute_node: Option<Pubkey>,
    pub task_type: TaskType,
    pub chain_proof: [u8; 32],
    pub task_index: u64,
    pub max_task_cost: u64,
    pub max_call_count: u64,
    pub call_count: u64,
    pub input_cid: Option<String>,
    pub output_cid: Option<String>,
    pub pending_input_cid: Option<String>,
    pub pending_output_cid: Option<String>,
    pub validations: Vec<Validator>,
    pub bump: u8,
}

impl Task {
    /// Only valid for tasks bound to a session: `session_slot_id` is an
    /// `Option<u64>` and shifts the status byte when it is `None`.
    pub const STATUS_OFFSET: usize = 8 + 8 + 1 + 8;

    pub fn approvals(&self) -> usize {
        self.validations
            .iter()
            .filter(|v| v.status == ValidationStatus::Approved)
            .count()
    }
}

impl DacAccount for Task {
    const NAME: &'static str = "Task";
    const DISCRIMINATOR: [u8; 8] = [79, 34, 229, 55, 88, 90, 55, 84];
}
