use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

use super::{
    build_instruction, required, INITIALIZE_NETWORK_DISCRIMINATOR,
    UPDATE_NETWORK_CONFIG_DISCRIMINATOR,
};
use crate::errors::Result;
use crate::pda::{find_network_config_pda, find_task_pdas};
use crate::state::CodeMeasurement;
use crate::{DAC_PROGRAM_ID, SYSTEM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct InitializeNetworkArgs {
    cid_config: String,
    allocate_tasks: u64,
    approved_code_measurements: Vec<CodeMeasurement>,
    required_validations: u32,
}

/// Creates the network config and pre-allocates `allocate_tasks` task
/// accounts, passed as writable remaining accounts.
#[derive(Clone, Debug)]
pub struct InitializeNetworkBuilder {
    program_id: Pubkey,
    authority: Option<Pubkey>,
    cid_config: Option<String>,
    allocate_tasks: u64,
    approved_code_measurements: Vec<CodeMeasurement>,
    required_validations: u32,
}

impl Default for InitializeNetworkBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            authority: None,
            cid_config: None,
            allocate_tasks: 0,
            approved_code_measurements: Vec::new(),
            required_validations: 1,
        }
    }
}

impl InitializeNetworkBuilder {
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

    pub fn cid_config(&mut self, cid_config: impl Into<String>) -> &mut Self {
        self.cid_config = Some(cid_config.into());
        self
    }

    pub fn allocate_tasks(&mut self, allocate_tasks: u64) -> &mut Self {
        self.allocate_tasks = allocate_tasks;
        self
    }

    pub fn approved_code_measurements(&mut self, measurements: Vec<CodeMeasurement>) -> &mut Self {
        self.approved_code_measurements = measurements;
        self
    }

    pub fn required_validations(&mut self, required_validations: u32) -> &mut Self {
        self.required_validations = required_validations;
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let authority = required(self.authority, "authority")?;
        let cid_config = required(self.cid_config.clone(), "cid_config")?;
        let (network_config, _) = find_network_config_pda(&self.program_id, &authority);

        let mut accounts = vec![
            AccountMeta::new(authority, true),
            AccountMeta::new(network_config, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ];
        accounts.extend(
            find_task_pdas(&self.program_id, &network_config, self.allocate_tasks)
                .into_iter()
                .map(|task| AccountMeta::new(task, false)),
        );

        build_instruction(
            self.program_id,
            "initialize_network",
            INITIALIZE_NETWORK_DISCRIMINATOR,
            &InitializeNetworkArgs {
                cid_config,
                allocate_tasks: self.allocate_tasks,
                approved_code_measurements: self.approved_code_measurements.clone(),
                required_validations: self.required_validations,
            },
            accounts,
        )
    }
}

#[derive(BorshSerialize)]
struct UpdateNetworkConfigArgs {
    cid_config: Option<String>,
    new_code_measurement: Option<CodeMeasurement>,
}

#[derive(Clone, Debug)]
pub struct UpdateNetworkConfigBuilder {
    program_id: Pubkey,
    authority: Option<Pubkey>,
    cid_config: Option<String>,
    new_code_measurement: Option<CodeMeasurement>,
}

impl Default for UpdateNetworkConfigBuilder {
    fn default() -> Self {
        Self {
            program_id: DAC_PROGRAM_ID,
            authority: None,
            cid_config: None,
            new_code_measurement: None,
        }
    }
}

impl UpdateNetworkConfigBuilder {
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

    pub fn cid_config(&mut self, cid_config: impl Into<String>) -> &mut Self {
        self.cid_config = Some(cid_config.into());
        self
    }

    pub fn new_code_measurement(&mut self, measurement: CodeMeasurement) -> &mut Self {
        self.new_code_measurement = Some(measurement);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let authority = required(self.authority, "authority")?;
        let (network_config, _) = find_network_config_pda(&self.program_id, &authority);

        build_instruction(
            self.program_id,
            "update_network_config",
            UPDATE_NETWORK_CONFIG_DISCRIMINATOR,
            &UpdateNetworkConfigArgs {
                cid_config: self.cid_config.clone(),
                new_code_measurement: self.new_code_measurement,
            },
            vec![
                AccountMeta::new(authority, true),
                AccountMeta::new(network_config, false),
            ],
        )
    }
}
