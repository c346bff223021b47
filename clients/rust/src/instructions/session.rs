use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use super::{
    build_instruction, required, CONTRIBUTE_TO_SESSION_DISCRIMINATOR, CREATE_SESSION_DISCRIMINATOR,
    SET_SESSION_DISCRIMINATOR, WITHDRAW_FROM_SESSION_DISCRIMINATOR,
};
use crate::errors::Result;
use crate::pda::{
    find_agent_pda, find_contribution_pda, find_session_pda, find_session_vault_pda, find_task_pda,
};
use crate::state::TaskType;
use crate::{DAC_PROGRAM_ID, SYSTEM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct CreateSessionArgs {
    is_owned: bool,
    is_confidential: bool,
}

/// Allocates the next session slot and its first task slot. Both slot ids
/// must match the network's current counters.
#[derive(Clone, Debug)]
pub struct CreateSessionBuilder {
    program_id: Pubkey,
    payer: Option<Pubkey>,
    owner: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    task_slot_id: Option<u64>,
    is_owned: bool,
    is_confidential: bool,
}

impl Default for CreateSessionBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            payer: None,
            owner: None,
            network_config: None,
            session_slot_id: None,
            task_slot_id: None,
            is_owned: true,
            is_confidential: false,
        }
    }
}

impl CreateSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn payer(&mut self, payer: Pubkey) -> &mut Self {
        self.payer = Some(payer);
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

    pub fn is_owned(&mut self, is_owned: bool) -> &mut Self {
        self.is_owned = is_owned;
        self
    }

    pub fn is_confidential(&mut self, is_confidential: bool) -> &mut Self {
        self.is_confidential = is_confidential;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let payer = required(self.payer, "payer")?;
        let owner = self.owner.unwrap_or(payer);
        let network_config = required(self.network_config, "network_config")?;
        let session_slot_id = required(self.session_slot_id, "session_slot_id")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;

        let (session, _) = find_session_pda(&self.program_id, &network_config, session_slot_id);
        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);

        build_instruction(
            self.program_id,
            "create_session",
            CREATE_SESSION_DISCRIMINATOR,
            &CreateSessionArgs {
                is_owned: self.is_owned,
                is_confidential: self.is_confidential,
            },
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(owner, true),
                AccountMeta::new(network_config, false),
                AccountMeta::new(session, false),
                AccountMeta::new(task, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }
}

#[derive(BorshSerialize)]
struct SetSessionArgs {
    specification_cid: String,
    max_iterations: u64,
    initial_deposit: u64,
    compute_node: Pubkey,
    task_type: TaskType,
}

/// Activates a pending session: funds the vault, mints the owner's shares
/// and binds the session's task to a compute node.
#[derive(Clone, Debug)]
pub struct SetSessionBuilder {
    program_id: Pubkey,
    owner: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    task_slot_id: Option<u64>,
    agent_slot_id: Option<u64>,
    specification_cid: Option<String>,
    max_iterations: u64,
    initial_deposit: Option<u64>,
    compute_node: Option<Pubkey>,
    task_type: Option<TaskType>,
}

impl Default for SetSessionBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            owner: None,
            network_config: None,
            session_slot_id: None,
            task_slot_id: None,
            agent_slot_id: None,
            specification_cid: None,
            max_iterations: 0,
            initial_deposit: None,
            compute_node: None,
            task_type: None,
        }
    }
}

impl SetSessionBuilder {
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

    pub fn agent_slot_id(&mut self, agent_slot_id: u64) -> &mut Self {
        self.agent_slot_id = Some(agent_slot_id);
        self
    }

    pub fn specification_cid(&mut self, specification_cid: impl Into<String>) -> &mut Self {
        self.specification_cid = Some(specification_cid.into());
        self
    }

    /// `0` runs until the vault is drained.
    pub fn max_iterations(&mut self, max_iterations: u64) -> &mut Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn initial_deposit(&mut self, initial_deposit: u64) -> &mut Self {
        self.initial_deposit = Some(initial_deposit);
        self
    }

    pub fn compute_node(&mut self, compute_node: Pubkey) -> &mut Self {
        self.compute_node = Some(compute_node);
        self
    }

    pub fn task_type(&mut self, task_type: TaskType) -> &mut Self {
        self.task_type = Some(task_type);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let owner = required(self.owner, "owner")?;
        let network_config = required(self.network_config, "network_config")?;
        let session_slot_id = required(self.session_slot_id, "session_slot_id")?;
        let task_slot_id = required(self.task_slot_id, "task_slot_id")?;
        let agent_slot_id = required(self.agent_slot_id, "agent_slot_id")?;
        let specification_cid = required(self.specification_cid.clone(), "specification_cid")?;
        let initial_deposit = required(self.initial_deposit, "initial_deposit")?;
        let compute_node = required(self.compute_node, "compute_node")?;
        let task_type = required(self.task_type.clone(), "task_type")?;

        let (session, _) = find_session_pda(&self.program_id, &network_config, session_slot_id);
        let (vault, _) = find_session_vault_pda(&self.program_id, &session);
        let (owner_contribution, _) = find_contribution_pda(&self.program_id, &session, &owner);
        let (task, _) = find_task_pda(&self.program_id, &network_config, task_slot_id);
        let (agent, _) = find_agent_pda(&self.program_id, &network_config, agent_slot_id);

        build_instruction(
            self.program_id,
            "set_session",
            SET_SESSION_DISCRIMINATOR,
            &SetSessionArgs {
                specification_cid,
                max_iterations: self.max_iterations,
                initial_deposit,
                compute_node,
                task_type,
            },
            vec![
                AccountMeta::new(owner, true),
                AccountMeta::new(session, false),
                AccountMeta::new(vault, false),
                AccountMeta::new(owner_contribution, false),
                AccountMeta::new(task, false),
                AccountMeta::new_readonly(agent, false),
                AccountMeta::new_readonly(network_config, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
        )
    }
}

/// Deposit into or withdraw from a session vault. The two instructions
/// share their account list and differ only in the amount's meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VaultFlow {
    Contribute,
    Withdraw,
}

fn vault_flow_instruction(
    program_id: Pubkey,
    flow: VaultFlow,
    contributor: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    amount: Option<u64>,
) -> Result<Instruction> {
    let contributor = required(contributor, "contributor")?;
    let network_config = required(network_config, "network_config")?;
    let session_slot_id = required(session_slot_id, "session_slot_id")?;

    let (session, _) = find_session_pda(&program_id, &network_config, session_slot_id);
    let (vault, _) = find_session_vault_pda(&program_id, &session);
    let (contribution, _) = find_contribution_pda(&program_id, &session, &contributor);

    let (name, discriminator, amount) = match flow {
        VaultFlow::Contribute => (
            "contribute_to_session",
            CONTRIBUTE_TO_SESSION_DISCRIMINATOR,
            required(amount, "deposit_amount")?,
        ),
        VaultFlow::Withdraw => (
            "withdraw_from_session",
            WITHDRAW_FROM_SESSION_DISCRIMINATOR,
            required(amount, "shares_to_burn")?,
        ),
    };

    build_instruction(
        program_id,
        name,
        discriminator,
        &amount,
        vec![
            AccountMeta::new(contributor, true),
            AccountMeta::new(session, false),
            AccountMeta::new(vault, false),
            AccountMeta::new(contribution, false),
            AccountMeta::new_readonly(network_config, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
    )
}

#[derive(Clone, Debug)]
pub struct ContributeToSessionBuilder {
    program_id: Pubkey,
    contributor: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    deposit_amount: Option<u64>,
}

impl Default for ContributeToSessionBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            contributor: None,
            network_config: None,
            session_slot_id: None,
            deposit_amount: None,
        }
    }
}

impl ContributeToSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn contributor(&mut self, contributor: Pubkey) -> &mut Self {
        self.contributor = Some(contributor);
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

    pub fn deposit_amount(&mut self, deposit_amount: u64) -> &mut Self {
        self.deposit_amount = Some(deposit_amount);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        vault_flow_instruction(
            self.program_id,
            VaultFlow::Contribute,
            self.contributor,
            self.network_config,
            self.session_slot_id,
            self.deposit_amount,
        )
    }
}

#[derive(Clone, Debug)]
pub struct WithdrawFromSessionBuilder {
    program_id: Pubkey,
    contributor: Option<Pubkey>,
    network_config: Option<Pubkey>,
    session_slot_id: Option<u64>,
    shares_to_burn: Option<u64>,
}

impl Default for WithdrawFromSessionBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            contributor: None,
            network_config: None,
            session_slot_id: None,
            shares_to_burn: None,
        }
    }
}

impl WithdrawFromSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program_id(&mut self, program_id: Pubkey) -> &mut Self {
        self.program_id = program_id;
        self
    }

    pub fn contributor(&mut self, contributor: Pubkey) -> &mut Self {
        self.contributor = Some(contributor);
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

    pub fn shares_to_burn(&mut self, shares_to_burn: u64) -> &mut Self {
        self.shares_to_burn = Some(shares_to_burn);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        vault_flow_instruction(
            self.program_id,
            VaultFlow::Withdraw,
            self.contributor,
            self.network_config,
            self.session_slot_id,
            self.shares_to_burn,
        )
    }
}
