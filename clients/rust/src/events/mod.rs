use std::sync::LazyLock;

use borsh::{BorshDeserialize, BorshSerialize};
use chrono::{DateTime, Utc};
use solana_pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::utils::{sighash, DISCRIMINATOR_LEN};

pub mod decoder;

pub use decoder::*;

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TaskClaimed {
    pub session_slot_id: u64,
    pub task_slot_id: u64,
    pub compute_node: Pubkey,
    pub max_task_cost: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TaskResultSubmitted {
    pub session_slot_id: u64,
    pub task_slot_id: u64,
    pub input_cid: String,
    pub output_cid: String,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TaskValidationSubmitted {
    pub session_slot_id: u64,
    pub task_slot_id: u64,
    pub validator: Pubkey,
    pub payment_amount: u64,
    pub approved: bool,
    pub session_completed: bool,
    pub current_iteration: u64,
    pub vault_balance: u64,
    pub locked_for_tasks: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionSet {
    pub session_slot_id: u64,
    pub owner: Pubkey,
    pub agent_slot_id: u64,
    pub task_slot_id: u64,
    pub specification_cid: String,
    pub max_iterations: u64,
    pub initial_deposit: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContributionMade {
    pub session_slot_id: u64,
    pub contributor: Pubkey,
    pub deposit_amount: u64,
    pub shares_minted: u64,
    pub total_shares: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionCompleted {
    pub session_slot_id: u64,
    pub final_iteration: u64,
    pub vault_balance: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodeValidated {
    pub node: Pubkey,
    pub validator: Pubkey,
    pub session_slot_id: Option<u64>,
    pub task_slot_id: Option<u64>,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NodeRejected {
    pub node: Pubkey,
    pub validator: Pubkey,
    pub session_slot_id: Option<u64>,
    pub task_slot_id: Option<u64>,
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct AgentCreated {
    pub agent_slot_id: u64,
    pub owner: Pubkey,
    pub agent_config_cid: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    TaskClaimed,
    TaskResultSubmitted,
    TaskValidationSubmitted,
    SessionSet,
    ContributionMade,
    SessionCompleted,
    NodeValidated,
    NodeRejected,
    AgentCreated,
}

static EVENT_DISCRIMINATORS: LazyLock<[[u8; DISCRIMINATOR_LEN]; 9]> =
    LazyLock::new(|| EventKind::ALL.map(|kind| sighash("event", kind.name())));

impl EventKind {
    pub const ALL: [EventKind; 9] = [
        EventKind::TaskClaimed,
        EventKind::TaskResultSubmitted,
        EventKind::TaskValidationSubmitted,
        EventKind::SessionSet,
        EventKind::ContributionMade,
        EventKind::SessionCompleted,
        EventKind::NodeValidated,
        EventKind::NodeRejected,
        EventKind::AgentCreated,
    ];

    /// Kinds delivered to a feed scoped to one session.
    pub const SESSION_SCOPED: [EventKind; 6] = [
        EventKind::TaskClaimed,
        EventKind::TaskResultSubmitted,
        EventKind::TaskValidationSubmitted,
        EventKind::NodeValidated,
        EventKind::NodeRejected,
        EventKind::SessionCompleted,
    ];

    /// Kinds delivered to the program-wide feed.
    pub const PROGRAM_WIDE: [EventKind; 6] = [
        EventKind::SessionSet,
        EventKind::ContributionMade,
        EventKind::SessionCompleted,
        EventKind::AgentCreated,
        EventKind::NodeValidated,
        EventKind::NodeRejected,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::TaskClaimed => "TaskClaimed",
            EventKind::TaskResultSubmitted => "TaskResultSubmitted",
            EventKind::TaskValidationSubmitted => "TaskValidationSubmitted",
            EventKind::SessionSet => "SessionSet",
            EventKind::ContributionMade => "ContributionMade",
            EventKind::SessionCompleted => "SessionCompleted",
            EventKind::NodeValidated => "NodeValidated",
            EventKind::NodeRejected => "NodeRejected",
            EventKind::AgentCreated => "AgentCreated",
        }
    }

    /// `sha256("event:<Name>")[..8]`, computed once per process.
    pub fn discriminator(self) -> [u8; DISCRIMINATOR_LEN] {
        EVENT_DISCRIMINATORS[self as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DacEvent {
    TaskClaimed(TaskClaimed),
    TaskResultSubmitted(TaskResultSubmitted),
    TaskValidationSubmitted(TaskValidationSubmitted),
    SessionSet(SessionSet),
    ContributionMade(ContributionMade),
    SessionCompleted(SessionCompleted),
    NodeValidated(NodeValidated),
    NodeRejected(NodeRejected),
    AgentCreated(AgentCreated),
}

impl DacEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DacEvent::TaskClaimed(_) => EventKind::TaskClaimed,
            DacEvent::TaskResultSubmitted(_) => EventKind::TaskResultSubmitted,
            DacEvent::TaskValidationSubmitted(_) => EventKind::TaskValidationSubmitted,
            DacEvent::SessionSet(_) => EventKind::SessionSet,
            DacEvent::ContributionMade(_) => EventKind::ContributionMade,
            DacEvent::SessionCompleted(_) => EventKind::SessionCompleted,
            DacEvent::NodeValidated(_) => EventKind::NodeValidated,
            DacEvent::NodeRejected(_) => EventKind::NodeRejected,
            DacEvent::AgentCreated(_) => EventKind::AgentCreated,
        }
    }

    /// Correlation key. `None` when the payload carries no session id.
    pub fn session_slot_id(&self) -> Option<u64> {
        match self {
            DacEvent::TaskClaimed(e) => Some(e.session_slot_id),
            DacEvent::TaskResultSubmitted(e) => Some(e.session_slot_id),
            DacEvent::TaskValidationSubmitted(e) => Some(e.session_slot_id),
            DacEvent::SessionSet(e) => Some(e.session_slot_id),
            DacEvent::ContributionMade(e) => Some(e.session_slot_id),
            DacEvent::SessionCompleted(e) => Some(e.session_slot_id),
            DacEvent::NodeValidated(e) => e.session_slot_id,
            DacEvent::NodeRejected(e) => e.session_slot_id,
            DacEvent::AgentCreated(_) => None,
        }
    }

    pub fn task_slot_id(&self) -> Option<u64> {
        match self {
            DacEvent::TaskClaimed(e) => Some(e.task_slot_id),
            DacEvent::TaskResultSubmitted(e) => Some(e.task_slot_id),
            DacEvent::TaskValidationSubmitted(e) => Some(e.task_slot_id),
            DacEvent::SessionSet(e) => Some(e.task_slot_id),
            DacEvent::NodeValidated(e) => e.task_slot_id,
            DacEvent::NodeRejected(e) => e.task_slot_id,
            DacEvent::ContributionMade(_)
            | DacEvent::SessionCompleted(_)
            | DacEvent::AgentCreated(_) => None,
        }
    }
}

/// An event decoded from one transaction's logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedEvent {
    pub event: DacEvent,
    pub signature: Signature,
    /// Block time for replayed transactions, capture time for live ones.
    pub timestamp: DateTime<Utc>,
}

impl DecodedEvent {
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    pub fn session_slot_id(&self) -> Option<u64> {
        self.event.session_slot_id()
    }

    pub fn task_slot_id(&self) -> Option<u64> {
        self.event.task_slot_id()
    }
}
