use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use super::{
    build_instruction, required, ACTIVATE_NODE_DISCRIMINATOR, CLAIM_COMPUTE_NODE_DISCRIMINATOR,
    CLAIM_CONFIDENTIAL_NODE_DISCRIMINATOR, REGISTER_NODE_DISCRIMINATOR,
    VALIDATE_PUBLIC_NODE_DISCRIMINATOR,
};
use crate::errors::Result;
use crate::pda::{find_network_config_pda, find_node_info_pda, find_node_treasury_pda};
use crate::state::NodeType;
use crate::{DAC_PROGRAM_ID, SYSTEM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct RegisterNodeArgs {
    node_pubkey: Pubkey,
    node_type: NodeType,
}

#[derive(Clone, Debug)]
pub struct RegisterNodeBuilder {
    program_id: Pubkey,
    owner: Option<Pubkey>,
    network_config: Option<Pubkey>,
    node_pubkey: Option<Pubkey>,
    node_type: Option<NodeType>,
}

impl Default for RegisterNodeBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            owner: None,
            network_config: None,
            node_pubkey: None,
            node_type: None,
        }
    }
}

impl RegisterNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn owner(&mut self, owner: Pubkey) -> &mut Self {
        self.owner = Some(owner);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn node_pubkey(&mut self, node_pubkey: Pubkey) -> &mut Self {
        self.node_pubkey = Some(node_pubkey);
        self
    }

    pub fn node_type(&mut self, node_type: NodeType) -> &mut Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let owner = required(self.owner, "owner")?;
        let network_config = required(self.network_config, "network_config")?;
        let node_pubkey = required(self.node_pubkey, "node_pubkey")?;
        let node_type = required(self.node_type, "node_type")?;

        let (node_info, _) = find_node_info_pda(&self.program_id, &node_pubkey);
        let (node_treasury, _) = find_node_treasury_pda(&self.program_id, &node_info);

        build_instruction(
            self.program_id,
            "register_node",
            REGISTER_NODE_DISCRIMINATOR,
            &RegisterNodeArgs {
                node_pubkey,
                node_type,
            },
            vec![
                AccountMeta::new(owner, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(node_info, false),
                AccountMeta::new(node_treasury, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct ClaimComputeNodeArgs {
    node_info_cid: String,
}

/// Signed by the public node itself once its owner registered it.
#[derive(Clone, Debug)]
pub struct ClaimComputeNodeBuilder {
    program_id: Pubkey,
    compute_node: Option<Pubkey>,
    network_config: Option<Pubkey>,
    node_info_cid: Option<String>,
}

impl Default for ClaimComputeNodeBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            compute_node: None,
            network_config: None,
            node_info_cid: None,
        }
    }
}

impl ClaimComputeNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn compute_node(&mut self, compute_node: Pubkey) -> &mut Self {
        self.compute_node = Some(compute_node);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn node_info_cid(&mut self, node_info_cid: impl Into<String>) -> &mut Self {
        self.node_info_cid = Some(node_info_cid.into());
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let compute_node = required(self.compute_node, "compute_node")?;
        let network_config = required(self.network_config, "network_config")?;
        let node_info_cid = required(self.node_info_cid.clone(), "node_info_cid")?;
        let (node_info, _) = find_node_info_pda(&self.program_id, &compute_node);

        build_instruction(
            self.program_id,
            "claim_compute_node",
            CLAIM_COMPUTE_NODE_DISCRIMINATOR,
            &ClaimComputeNodeArgs { node_info_cid },
            vec![
                AccountMeta::new(compute_node, true),
                AccountMeta::new_readonly(network_config, false),
                AccountMeta::new(node_info, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct ClaimConfidentialNodeArgs {
    code_measurement: [u8; 32],
    tee_signing_pubkey: Pubkey,
}

#[derive(Clone, Debug)]
pub struct ClaimConfidentialNodeBuilder {
    program_id: Pubkey,
    confidential_node: Option<Pubkey>,
    network_config: Option<Pubkey>,
    code_measurement: Option<[u8; 32]>,
    tee_signing_pubkey: Option<Pubkey>,
}

impl Default for ClaimConfidentialNodeBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            confidential_node: None,
            network_config: None,
            code_measurement: None,
            tee_signing_pubkey: None,
        }
    }
}

impl ClaimConfidentialNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn confidential_node(&mut self, confidential_node: Pubkey) -> &mut Self {
        self.confidential_node = Some(confidential_node);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn code_measurement(&mut self, code_measurement: [u8; 32]) -> &mut Self {
        self.code_measurement = Some(code_measurement);
        self
    }

    pub fn tee_signing_pubkey(&mut self, tee_signing_pubkey: Pubkey) -> &mut Self {
        self.tee_signing_pubkey = Some(tee_signing_pubkey);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let confidential_node = required(self.confidential_node, "confidential_node")?;
        let network_config = required(self.network_config, "network_config")?;
        let code_measurement = required(self.code_measurement, "code_measurement")?;
        let tee_signing_pubkey = required(self.tee_signing_pubkey, "tee_signing_pubkey")?;
        let (node_info, _) = find_node_info_pda(&self.program_id, &confidential_node);

        build_instruction(
            self.program_id,
            "claim_confidential_node",
            CLAIM_CONFIDENTIAL_NODE_DISCRIMINATOR,
            &ClaimConfidentialNodeArgs {
                code_measurement,
                tee_signing_pubkey,
            },
            vec![
                AccountMeta::new(confidential_node, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(node_info, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct ValidatePublicNodeArgs {
    approved: bool,
}

/// An active node votes on a public node awaiting validation.
#[derive(Clone, Debug)]
pub struct ValidatePublicNodeBuilder {
    program_id: Pubkey,
    node_validating: Option<Pubkey>,
    network_config: Option<Pubkey>,
    node_pubkey: Option<Pubkey>,
    approved: bool,
}

impl Default for ValidatePublicNodeBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            node_validating: None,
            network_config: None,
            node_pubkey: None,
            approved: true,
        }
    }
}

impl ValidatePublicNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn node_validating(&mut self, node_validating: Pubkey) -> &mut Self {
        self.node_validating = Some(node_validating);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    /// The node being validated.
    pub fn node_pubkey(&mut self, node_pubkey: Pubkey) -> &mut Self {
        self.node_pubkey = Some(node_pubkey);
        self
    }

    pub fn approved(&mut self, approved: bool) -> &mut Self {
        self.approved = approved;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let node_validating = required(self.node_validating, "node_validating")?;
        let network_config = required(self.network_config, "network_config")?;
        let node_pubkey = required(self.node_pubkey, "node_pubkey")?;

        let (node_validating_info, _) = find_node_info_pda(&self.program_id, &node_validating);
        let (node_info, _) = find_node_info_pda(&self.program_id, &node_pubkey);

        build_instruction(
            self.program_id,
            "validate_public_node",
            VALIDATE_PUBLIC_NODE_DISCRIMINATOR,
            &ValidatePublicNodeArgs {
                approved: self.approved,
            },
            vec![
                AccountMeta::new(node_validating, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(node_validating_info, false),
                AccountMeta::new(node_info, false),
            ],
        )
    }
}

/// Authority-only activation of a node, bypassing peer validation.
#[derive(Clone, Debug)]
pub struct ActivateNodeBuilder {
    program_id: Pubkey,
    authority: Option<Pubkey>,
    node_pubkey: Option<Pubkey>,
}

impl Default for ActivateNodeBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            authority: None,
            node_pubkey: None,
        }
    }
}

impl ActivateNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn authority(&mut self, authority: Pubkey) -> &mut Self {
        self.authority = Some(authority);
        self
    }

    pub fn node_pubkey(&mut self, node_pubkey: Pubkey) -> &mut Self {
        self.node_pubkey = Some(node_pubkey);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let authority = required(self.authority, "authority")?;
        let node_pubkey = required(self.node_pubkey, "node_pubkey")?;
        let (network_config, _) = find_network_config_pda(&self.program_id, &authority);
        let (node_info, _) = find_node_info_pda(&self.program_id, &node_pubkey);

        build_instruction(
            self.program_id,
            "activate_node",
            ACTIVATE_NODE_DISCRIMINATOR,
            &(),
            vec![
                AccountMeta::new(authority, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(node_info, false),
            ],
        )
    }
}
