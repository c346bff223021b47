use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    signature::Keypair,
};

use super::{
    build_instruction, required, CLAIM_TASK_DISCRIMINATOR, SUBMIT_TASK_DISCRIMINATOR,
    SUBMIT_TASK_RESULT_DISCRIMINATOR, SUBMIT_TASK_VALIDATION_DISCRIMINATOR,
};
use crate::errors::Result;
use crate::pda::{
    find_node_info_pda, find_node_treasury_pda, find_session_pda, find_session_vault_pda,
    find_task_pda,
};
use crate::utils::SubmitTaskValidationMessage;
use crate::{DAC_PROGRAM_ID, INSTRUCTIONS_SYSVAR_ID, SYSTEM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct SubmitTaskArgs {
    input_cid: String,
}

#[derive(Clone, Debug)]
pub struct SubmitTaskBuilder {
    program_id: Pubkey,
    owner: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    task_slot_id: Option<u64>,
    input_cid: Option<String>,
}

impl Default for SubmitTaskBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            owner: None,
            network_config: None,
            session_slot_id: None,
            task_slot_id: None,
            input_cid: None,
        }
    }
}

impl SubmitTaskBuilder {
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

    pub fn session_slot_id(&mut self, session_slot_id: u64) -> &mut Self {
        self.session_slot_id = Some(session_slot_id);
        self
    }

    pub fn task_slot_id(&mut self, task_slot_id: u64) -> &mut Self {
        self.task_slot_id = Some(task_slot_id);
        self
    }

    pub fn input_cid(&mut self, input_cid: impl Into<String>) -> &mut Self {
        self.input_cid = Some(input_cid.into());
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let owner = required(self.owner, "owner")?;
        let network_config = required(self.network_config, "network_config")?;
        let session_slot_id = required(self.session_slot_id, "session_slot_id")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;
        let input_cid = required(self.input_cid.clone(), "input_cid")?;

        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);
        let (session, _) = find_session_pda(&self.program_id, &network_config, session_slot_id);

        build_instruction(
            self.program_id,
            "submit_task",
            SUBMIT_TASK_DISCRIMINATOR,
            &SubmitTaskArgs { input_cid },
            vec![
                AccountMeta::new(owner, true),
                AccountMeta::new(task, false),
                AccountMeta::new(session, false),
                AccountMeta::new_readonly(network_config, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct ClaimTaskArgs {
    max_task_cost: u64,
}

/// Locks `max_task_cost` from the session vault for the claiming node.
#[derive(Clone, Debug)]
pub struct ClaimTaskBuilder {
    program_id: Pubkey,
    compute_node: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    task_slot_id: Option<u64>,
    max_task_cost: Option<u64>,
}

impl Default for ClaimTaskBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            compute_node: None,
            network_config: None,
            session_slot_id: None,
            task_slot_id: None,
            max_task_cost: None,
        }
    }
}

impl ClaimTaskBuilder {
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

    pub fn session_slot_id(&mut self, session_slot_id: u64) -> &mut Self {
        self.session_slot_id = Some(session_slot_id);
        self
    }

    pub fn task_slot_id(&mut self, task_slot_id: u64) -> &mut Self {
        self.task_slot_id = Some(task_slot_id);
        self
    }

    pub fn max_task_cost(&mut self, max_task_cost: u64) -> &mut Self {
        self.max_task_cost = Some(max_task_cost);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let compute_node = required(self.compute_node, "compute_node")?;
        let network_config = required(self.network_config, "network_config")?;
        let session_slot_id = required(self.session_slot_id, "session_slot_id")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;
        let max_task_cost = required(self.max_task_cost, "max_task_cost")?;

        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);
        let (session, _) = find_session_pda(&self.program_id, &network_config, session_slot_id);
        let (vault, _) = find_session_vault_pda(&self.program_id, &session);
        let (compute_node_info, _) = find_node_info_pda(&self.program_id, &compute_node);

        build_instruction(
            self.program_id,
            "claim_task",
            CLAIM_TASK_DISCRIMINATOR,
            &ClaimTaskArgs { max_task_cost },
            vec![
                AccountMeta::new(compute_node, true),
                AccountMeta::new(task, false),
                AccountMeta::new(session, false),
                AccountMeta::new(vault, false),
                AccountMeta::new_readonly(compute_node_info, false),
                AccountMeta::new_readonly(network_config, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct SubmitTaskResultArgs {
    input_cid: String,
    output_cid: String,
}

#[derive(Clone, Debug)]
pub struct SubmitTaskResultBuilder {
    program_id: Pubkey,
    compute_node: Option<Pubkey>,
    network_config: Option<Pubkey>,
    task_slot_id: Option<u64>,
    input_cid: Option<String>,
    output_cid: Option<String>,
}

impl Default for SubmitTaskResultBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            compute_node: None,
            network_config: None,
            task_slot_id: None,
            input_cid: None,
            output_cid: None,
        }
    }
}

impl SubmitTaskResultBuilder {
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

    pub fn task_slot_id(&mut self, task_slot_id: u64) -> &mut Self {
        self.task_slot_id = Some(task_slot_id);
        self
    }

    pub fn input_cid(&mut self, input_cid: impl Into<String>) -> &mut Self {
        self.input_cid = Some(input_cid.into());
        self
    }

    pub fn output_cid(&mut self, output_cid: impl Into<String>) -> &mut Self {
        self.output_cid = Some(output_cid.into());
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let compute_node = required(self.compute_node, "compute_node")?;
        let network_config = required(self.network_config, "network_config")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;
        let input_cid = required(self.input_cid.clone(), "input_cid")?;
        let output_cid = required(self.output_cid.clone(), "output_cid")?;
        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);

        build_instruction(
            self.program_id,
            "submit_task_result",
            SUBMIT_TASK_RESULT_DISCRIMINATOR,
            &SubmitTaskResultArgs {
                input_cid,
                output_cid,
            },
            vec![
                AccountMeta::new(compute_node, true),
                AccountMeta::new(task, false),
                AccountMeta::new_readonly(network_config, false),
            ],
        )
    }
}

/// Validation of a task result. The program reads the verdict from the
/// Ed25519 instruction placed right before this one, see
/// [`SubmitTaskValidationBuilder::instructions`].
#[derive(Clone, Debug)]
pub struct SubmitTaskValidationBuilder {
    program_id: Pubkey,
    validator: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    task_slot_id: Option<u64>,
    compute_node: Option<Pubkey>,
}

impl Default for SubmitTaskValidationBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            validator: None,
            network_config: None,
            session_slot_id: None,
            task_slot_id: None,
            compute_node: None,
        }
    }
}

impl SubmitTaskValidationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn validator(&mut self, validator: Pubkey) -> &mut Self {
        self.validator = Some(validator);
        self
    }

    pub fn network_config(&mut self, network_config: Pubkey) -> &mut Self {
        self.network_config = Some(network_config);
        self
    }

    pub fn session_slot_id(&mut self, session_slot_id: u64) -> &mut Self {
        self.session_slot_id = Some(session_slot_id);
        self
    }

    pub fn task_slot_id(&mut self, task_slot_id: u64) -> &mut Self {
        self.task_slot_id = Some(task_slot_id);
        self
    }

    /// The node that produced the result being validated.
    pub fn compute_node(&mut self, compute_node: Pubkey) -> &mut Self {
        self.compute_node = Some(compute_node);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let validator = required(self.validator, "validator")?;
        let network_config = required(self.network_config, "network_config")?;
        let session_slot_id = required(self.session_slot_id, "session_slot_id")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;
        let compute_node = required(self.compute_node, "compute_node")?;

        let (session, _) = find_session_pda(&self.program_id, &network_config, session_slot_id);
        let (vault, _) = find_session_vault_pda(&self.program_id, &session);
        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);
        let (compute_node_info, _) = find_node_info_pda(&self.program_id, &compute_node);
        let (node_treasury, _) = find_node_treasury_pda(&self.program_id, &compute_node_info);
        let (validator_node_info, _) = find_node_info_pda(&self.program_id, &validator);

        build_instruction(
            self.program_id,
            "submit_task_validation",
            SUBMIT_TASK_VALIDATION_DISCRIMINATOR,
            &(),
            vec![
                AccountMeta::new(validator, true),
                AccountMeta::new(session, false),
                AccountMeta::new(vault, false),
                AccountMeta::new(task, false),
                AccountMeta::new(compute_node_info, false),
                AccountMeta::new(node_treasury, false),
                AccountMeta::new_readonly(validator_node_info, false),
                AccountMeta::new_readonly(network_config, false),
                AccountMeta::new_readonly(INSTRUCTIONS_SYSVAR_ID, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }

    /// The Ed25519 instruction signed by the validator's TEE key followed by
    /// the validation instruction, in transaction order.
    pub fn instructions(
        &self,
        message: &SubmitTaskValidationMessage,
        tee_keypair: &Keypair,
    ) -> Result<Vec<Instruction>> {
        Ok(vec![
            message.to_ed25519_instruction(tee_keypair)?,
            self.instruction()?,
        ])
    }
}
