use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use super::{DacAccount, StatusField};

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Public,
    Confidential,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
    PendingClaim,
    AwaitingValidation,
    Active,
    Disabled,
    Rejected,
}

impl StatusField for NodeStatus {
    fn to_byte(self) -> u8 {
        self as u8
    }
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub owner: Pubkey,
    pub node_pubkey: Pubkey,
    pub node_type: NodeType,
    pub status: NodeStatus,
    pub node_info_cid: Option<String>,
    pub code_measurement: Option<[u8; 32]>,
    pub tee_signing_pubkey: Option<Pubkey>,
    pub node_treasury: Pubkey,
    pub total_earned: u64,
    pub total_tasks_completed: u64,
    pub approved_validators: Vec<Pubkey>,
    pub rejected_validators: Vec<Pubkey>,
    pub bump: u8,
}

impl NodeInfo {
    /// discriminator + owner + node_pubkey + node_type
    pub const STATUS_OFFSET: usize = 8 + 32 + 32 + 1;
}

impl DacAccount for NodeInfo {
    const NAME: &'static str = "NodeInfo";
    const DISCRIMINATOR: [u8; 8] = [93, 115, 220, 31, 154, 192, 155, 97];
}
