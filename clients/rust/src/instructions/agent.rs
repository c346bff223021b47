use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use super::{build_instruction, required, CREATE_AGENT_DISCRIMINATOR, VALIDATE_AGENT_DISCRIMINATOR};
use crate::errors::Result;
use crate::pda::{find_agent_pda, find_node_info_pda};
use crate::{DAC_PROGRAM_ID, SYSTEM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct CreateAgentArgs {
    agent_config_cid: String,
}

/// `agent_slot_id` must be the network's current agent count.
#[derive(Clone, Debug)]
pub struct CreateAgentBuilder {
    program_id: Pubkey,
    agent_owner: Option<Pubkey>,
    network_config: Option<Pubkey>,
    agent_slot_id: Option<u64>,
    agent_config_cid: Option<String>,
}

impl Default for CreateAgentBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            agent_owner: None,
            network_config: None,
            agent_slot_id: None,
            agent_config_cid: None,
        }
    }
}

impl CreateAgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn agent_owner(&mut self, agent_owner: Pubkey) -> &mut Self {
        self.agent_owner = Some(agent_owner);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn agent_slot_id(&mut self, agent_slot_id: u64) -> &mut Self {
        self.agent_slot_id = Some(agent_slot_id);
        self
    }

    pub fn agent_config_cid(&mut self, agent_config_cid: impl Into<String>) -> &mut Self {
        self.agent_config_cid = Some(agent_config_cid.into());
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let agent_owner = required(self.agent_owner, "agent_owner")?;
        let network_config = required(self.network_config, "network_config")?;
        let agent_slot_id = required(self.agent_slot_id, "agent_slot_id")?;
        let agent_config_cid = required(self.agent_config_cid.clone(), "agent_config_cid")?;
        let (agent, _) = find_agent_pda(&self.program_id, &network_config, agent_slot_id);

        build_instruction(
            self.program_id,
            "create_agent",
            CREATE_AGENT_DISCRIMINATOR,
            &CreateAgentArgs { agent_config_cid },
            vec![
                AccountMeta::new(agent_owner, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(agent, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }
}

#[derive(Clone, Debug)]
pub struct ValidateAgentBuilder {
    program_id: Pubkey,
    node: Option<Pubkey>,
    network_config: Option<Pubkey>,
    agent_slot_id: Option<u64>,
}

impl Default for ValidateAgentBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            node: None,
            network_config: None,
            agent_slot_id: None,
        }
    }
}

impl ValidateAgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn node(&mut self, node: Pubkey) -> &mut Self {
        self.node = Some(node);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn agent_slot_id(&mut self, agent_slot_id: u64) -> &mut Self {
        self.agent_slot_id = Some(agent_slot_id);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let node = required(self.node, "node")?;
        let network_config = required(self.network_config, "network_config")?;
        let agent_slot_id = required(self.agent_slot_id, "agent_slot_id")?;
        let (agent, _) = find_agent_pda(&self.program_id, &network_config, agent_slot_id);
        let (node_info, _) = find_node_info_pda(&self.program_id, &node);

        build_instruction(
            self.program_id,
            "validate_agent",
            VALIDATE_AGENT_DISCRIMINATOR,
            &(),
            vec![
                AccountMeta::new(node, true),
                AccountMeta::new(agent, false),
                AccountMeta::new(node_info, false),
                AccountMeta::new_readonly(network_config, false),
            ],
        )
    }
}
