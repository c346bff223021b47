use dac_client::utils::SemanticVersion;
use dac_client::{
    AgentCreated, CodeMeasurement, ContributionMade, SessionCompleted, TaskClaimed,
    TaskResultSubmitted,
};
use solana_sdk::pubkey::Pubkey;

//test data
pub const DEFAULT_CID_CONFIG: &str = "QmDefaultConfig";
pub const DEFAULT_ALLOCATE_TASKS: u64 = 3;
pub const DEFAULT_REQUIRED_VALIDATIONS: u32 = 1;
pub const DEFAULT_APPROVED_CODE_MEASUREMENTS: [CodeMeasurement; 1] = [CodeMeasurement {
    measurement: [1u8; 32],
    version: SemanticVersion {
        major: 0,
        minor: 0,
        patch: 0,
    },
}];

// Node test data
pub const DEFAULT_NODE_INFO_CID: &str = "QmNodeInfoCID";
pub const DEFAULT_CODE_MEASUREMENT: [u8; 32] = [1u8; 32];

// Agent test data
pub const DEFAULT_AGENT_SLOT_ID: u64 = 0;
pub const DEFAULT_AGENT_CONFIG_CID: &str = "QmAgentConfigCID";

// Session test data
pub const DEFAULT_SESSION_SLOT_ID: u64 = 1;
pub const OTHER_SESSION_SLOT_ID: u64 = 2;
pub const DEFAULT_SPECIFICATION_CID: &str = "QmSessionSpecificationCID";
pub const DEFAULT_INITIAL_DEPOSIT: u64 = 1_000_000_000; // 1 SOL
pub const DEFAULT_CONTRIBUTION_AMOUNT: u64 = 500_000_000; // 0.5 SOL

// Event test data
pub fn task_claimed(session_slot_id: u64, task_slot_id: u64) -> TaskClaimed {
    TaskClaimed {
        session_slot_id,
        task_slot_id,
        compute_node: Pubkey::new_from_array([11u8; 32]),
        max_task_cost: 10_000,
    }
}

pub fn task_result_submitted(session_slot_id: u64, task_slot_id: u64) -> TaskResultSubmitted {
    TaskResultSubmitted {
        session_slot_id,
        task_slot_id,
        input_cid: "QmInput".to_string(),
        output_cid: "QmOutput".to_string(),
    }
}

pub fn contribution_made(session_slot_id: u64) -> ContributionMade {
    ContributionMade {
        session_slot_id,
        contributor: Pubkey::new_from_array([12u8; 32]),
        deposit_amount: DEFAULT_CONTRIBUTION_AMOUNT,
        shares_minted: DEFAULT_CONTRIBUTION_AMOUNT,
        total_shares: DEFAULT_INITIAL_DEPOSIT + DEFAULT_CONTRIBUTION_AMOUNT,
    }
}

pub fn session_completed(session_slot_id: u64) -> SessionCompleted {
    SessionCompleted {
        session_slot_id,
        final_iteration: 3,
        vault_balance: 0,
    }
}

pub fn agent_created(agent_slot_id: u64) -> AgentCreated {
    AgentCreated {
        agent_slot_id,
        owner: Pubkey::new_from_array([13u8; 32]),
        agent_config_cid: DEFAULT_AGENT_CONFIG_CID.to_string(),
    }
}
