use std::sync::Arc;

use dac_client::pda::{
    find_agent_pda, find_network_config_pda, find_node_info_pda, find_node_treasury_pda,
    find_session_pda, find_session_vault_pda, find_task_pda,
};
use dac_client::{
    Agent, AgentStatus, DacAccount, DacClient, MonitorConfig, NetworkConfig, NodeInfo, NodeStatus,
    NodeType, Session, SessionStatus, Task, TaskStatus, TaskType, TransactionRecord,
    DAC_PROGRAM_ID,
};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use utils::{encode_account, init_tracing, MockRpc};

use crate::setup::test_data::*;

pub struct TestFixture {
    pub rpc: Arc<MockRpc>,
    pub client: DacClient,
    pub program_id: Pubkey,
    pub network_config: Pubkey,
    pub payer: Keypair,
    pub authority: Keypair,

    // Keypairs for testing
    pub public_node_owner: Keypair,
    pub public_node: Keypair,
    pub validator_node: Keypair,
    pub confidential_node: Keypair,
    pub agent_owner: Keypair,
    pub session_owner: Keypair,
}

impl TestFixture {
    pub fn new() -> Self {
        init_tracing();

        let rpc = Arc::new(MockRpc::new());
        let program_id = DAC_PROGRAM_ID;
        let authority = Keypair::new();
        let network_config = find_network_config_pda(&program_id, &authority.pubkey()).0;

        let client = DacClient::new(program_id, authority.pubkey(), rpc.clone(), rpc.clone())
            .with_subscriptions(rpc.clone());

        Self {
            rpc,
            client,
            program_id,
            network_config,
            payer: Keypair::new(),
            authority,
            public_node_owner: Keypair::new(),
            public_node: Keypair::new(),
            validator_node: Keypair::new(),
            confidential_node: Keypair::new(),
            agent_owner: Keypair::new(),
            session_owner: Keypair::new(),
        }
    }

    /// Drops the subscription transport, keeping reads and history.
    pub fn without_subscriptions(mut self) -> Self {
        self.client = DacClient::new(
            self.program_id,
            self.authority.pubkey(),
            self.rpc.clone(),
            self.rpc.clone(),
        );
        self
    }

    pub fn with_monitor_config(mut self, monitor: MonitorConfig) -> Self {
        self.client = self.client.with_monitor_config(monitor);
        self
    }

    pub fn with_network_config(self) -> Self {
        let network_config = NetworkConfig {
            authority: self.authority.pubkey(),
            cid_config: DEFAULT_CID_CONFIG.to_string(),
            genesis_hash: [0u8; 32],
            agent_count: 1,
            session_count: 2,
            task_count: DEFAULT_ALLOCATE_TASKS,
            required_validations: DEFAULT_REQUIRED_VALIDATIONS,
            allowed_models: vec![],
            approved_public_nodes: vec![self.public_node.pubkey()],
            approved_confidential_nodes: vec![],
            approved_code_measurements: DEFAULT_APPROVED_CODE_MEASUREMENTS.to_vec(),
            bump: 255,
        };
        self.rpc.set_account(
            self.network_config,
            encode_account(&network_config),
            LAMPORTS_PER_SOL,
        );
        self
    }

    pub fn with_node(self, node_pubkey: &Pubkey, status: NodeStatus) -> Self {
        self.put_node(node_pubkey, status);
        self
    }

    pub fn with_session(self, session_slot_id: u64, status: SessionStatus) -> Self {
        self.put_session(session_slot_id, status);
        self
    }

    pub fn put_node(&self, node_pubkey: &Pubkey, status: NodeStatus) -> Pubkey {
        let address = find_node_info_pda(&self.program_id, node_pubkey).0;
        let node = NodeInfo {
            owner: self.public_node_owner.pubkey(),
            node_pubkey: *node_pubkey,
            node_type: NodeType::Public,
            status,
            node_info_cid: Some(DEFAULT_NODE_INFO_CID.to_string()),
            code_measurement: None,
            tee_signing_pubkey: None,
            node_treasury: find_node_treasury_pda(&self.program_id, &address).0,
            total_earned: 0,
            total_tasks_completed: 0,
            approved_validators: vec![],
            rejected_validators: vec![],
            bump: 254,
        };
        self.rpc
            .set_account(address, encode_account(&node), LAMPORTS_PER_SOL / 100);
        address
    }

    /// A node account cut right after its status byte: it passes the
    /// discriminator and status filters but its body does not decode.
    pub fn put_truncated_node(&self, node_pubkey: &Pubkey, status: NodeStatus) -> Pubkey {
        let address = find_node_info_pda(&self.program_id, node_pubkey).0;
        let mut data = NodeInfo::DISCRIMINATOR.to_vec();
        data.extend(self.public_node_owner.pubkey().to_bytes());
        data.extend(node_pubkey.to_bytes());
        data.push(NodeType::Public as u8);
        data.push(status as u8);
        assert_eq!(data.len(), NodeInfo::STATUS_OFFSET + 1);
        self.rpc.set_account(address, data, LAMPORTS_PER_SOL / 100);
        address
    }

    pub fn put_agent(&self, agent_slot_id: u64, status: AgentStatus) -> Pubkey {
        let address = find_agent_pda(&self.program_id, &self.network_config, agent_slot_id).0;
        let agent = Agent {
            agent_slot_id,
            owner: self.agent_owner.pubkey(),
            status,
            agent_config_cid: DEFAULT_AGENT_CONFIG_CID.to_string(),
            agent_memory_cid: None,
            approved_validators: vec![],
            rejected_validators: vec![],
            bump: 253,
        };
        self.rpc
            .set_account(address, encode_account(&agent), LAMPORTS_PER_SOL / 100);
        address
    }

    pub fn put_session(&self, session_slot_id: u64, status: SessionStatus) -> Pubkey {
        let address = self.session_address(session_slot_id);
        let session = Session {
            session_slot_id,
            owner: self.session_owner.pubkey(),
            task: find_task_pda(&self.program_id, &self.network_config, session_slot_id).0,
            status,
            is_confidential: false,
            max_iterations: 3,
            current_iteration: 0,
            task_index_start: 0,
            task_index_end: 0,
            total_shares: DEFAULT_INITIAL_DEPOSIT,
            locked_for_tasks: 0,
            specification_cid: DEFAULT_SPECIFICATION_CID.to_string(),
            state_cid: None,
            vault_bump: 252,
            bump: 251,
        };
        self.rpc
            .set_account(address, encode_account(&session), LAMPORTS_PER_SOL / 100);
        address
    }

    pub fn put_task(&self, task_slot_id: u64, session_slot_id: u64, status: TaskStatus) -> Pubkey {
        let address = find_task_pda(&self.program_id, &self.network_config, task_slot_id).0;
        let task = Task {
            task_slot_id,
            session_slot_id: Some(session_slot_id),
            status,
            compute_node: Some(self.public_node.pubkey()),
            task_type: TaskType::Completion(1),
            chain_proof: [0u8; 32],
            task_index: 0,
            max_task_cost: 10_000,
            max_call_count: 4,
            call_count: 0,
            input_cid: None,
            output_cid: None,
            pending_input_cid: None,
            pending_output_cid: None,
            validations: vec![],
            bump: 250,
        };
        self.rpc
            .set_account(address, encode_account(&task), LAMPORTS_PER_SOL / 100);
        address
    }

    pub fn put_vault(&self, session_slot_id: u64, lamports: u64) -> Pubkey {
        let vault = self.vault_address(session_slot_id);
        self.rpc.set_account(vault, vec![], lamports);
        vault
    }

    pub fn session_address(&self, session_slot_id: u64) -> Pubkey {
        find_session_pda(&self.program_id, &self.network_config, session_slot_id).0
    }

    pub fn vault_address(&self, session_slot_id: u64) -> Pubkey {
        find_session_vault_pda(&self.program_id, &self.session_address(session_slot_id)).0
    }

    /// Stores a successful transaction carrying `logs`, indexed under
    /// `addresses`. `seed` makes the signature unique.
    pub fn record_transaction(
        &self,
        addresses: &[Pubkey],
        seed: u8,
        block_time: i64,
        logs: Vec<String>,
    ) -> Signature {
        let signature = Signature::from([seed; 64]);
        self.rpc.add_transaction(
            addresses,
            TransactionRecord {
                signature,
                logs: Some(logs),
                block_time: Some(block_time),
                err: None,
            },
        );
        signature
    }
}
