use std::sync::Arc;

use solana_pubkey::Pubkey;
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tracing::{debug, info};

use crate::config::{DacConfig, MonitorConfig};
use crate::errors::{DacError, Result};
use crate::events::DecodedEvent;
use crate::monitor::{
    agent_watch, list_by_status, node_watch, replay_events, session_watch, subscribe_events,
    task_watch, wait_for_status, EntityKey, EventScope, ReplayOptions, StatusWatch,
    SubscriptionHandle, WaitOptions,
};
use crate::pda::{
    find_agent_pda, find_contribution_pda, find_network_config_pda, find_node_info_pda,
    find_session_pda, find_session_vault_pda, find_task_pda,
};
use crate::rpc::{AccountQuery, SubscriptionTransport, TransactionTransport};
use crate::state::{
    Agent, AgentStatus, Contribution, DacAccount, NetworkConfig, NodeInfo, NodeStatus, Session,
    SessionStatus, StatusField, Task, TaskStatus,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionVaultBalance {
    pub session_slot_id: u64,
    pub vault: Pubkey,
    /// Zero when the vault account does not exist.
    pub lamports: u64,
}

/// Entry point of the SDK, bound to one program and one network.
#[derive(Clone)]
pub struct DacClient {
    program_id: Pubkey,
    network_config: Pubkey,
    query: Arc<dyn AccountQuery>,
    transactions: Arc<dyn TransactionTransport>,
    subscriptions: Option<Arc<dyn SubscriptionTransport>>,
    monitor: MonitorConfig,
}

impl DacClient {
    pub fn new(
        program_id: Pubkey,
        network_authority: Pubkey,
        query: Arc<dyn AccountQuery>,
        transactions: Arc<dyn TransactionTransport>,
    ) -> Self {
        let (network_config, _) = find_network_config_pda(&program_id, &network_authority);
        Self {
            program_id,
            network_config,
            query,
            transactions,
            subscriptions: None,
            monitor: MonitorConfig::default(),
        }
    }

    pub fn from_config(
        config: &DacConfig,
        query: Arc<dyn AccountQuery>,
        transactions: Arc<dyn TransactionTransport>,
    ) -> Result<Self> {
        let client = Self::new(
            config.program_id()?,
            config.network_authority()?,
            query,
            transactions,
        )
        .with_monitor_config(config.monitor.clone());
        info!(program_id = %client.program_id, network_config = %client.network_config, "client ready");
        Ok(client)
    }

    pub fn with_subscriptions(mut self, subscriptions: Arc<dyn SubscriptionTransport>) -> Self {
        self.subscriptions = Some(subscriptions);
        self
    }

    pub fn with_monitor_config(mut self, monitor: MonitorConfig) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn network_config_address(&self) -> &Pubkey {
        &self.network_config
    }

    pub fn monitor_config(&self) -> &MonitorConfig {
        &self.monitor
    }

    async fn fetch<T: DacAccount>(&self, address: &Pubkey) -> Result<T> {
        let account = self
            .query
            .get_account(address)
            .await?
            .ok_or_else(|| DacError::AccountNotFound(format!("{} {address}", T::NAME)))?;
        T::from_bytes(&account.data)
    }

    pub async fn get_network_config(&self) -> Result<NetworkConfig> {
        self.fetch(&self.network_config).await
    }

    pub async fn get_node_info(&self, node_pubkey: &Pubkey) -> Result<NodeInfo> {
        let (address, _) = find_node_info_pda(&self.program_id, node_pubkey);
        self.fetch(&address).await
    }

    pub async fn get_agent(&self, agent_slot_id: u64) -> Result<Agent> {
        let (address, _) = find_agent_pda(&self.program_id, &self.network_config, agent_slot_id);
        self.fetch(&address).await
    }

    pub async fn get_session(&self, session_slot_id: u64) -> Result<Session> {
        let (address, _) =
            find_session_pda(&self.program_id, &self.network_config, session_slot_id);
        self.fetch(&address).await
    }

    pub async fn get_task(&self, task_slot_id: u64) -> Result<Task> {
        let (address, _) = find_task_pda(&self.program_id, &self.network_config, task_slot_id);
        self.fetch(&address).await
    }

    pub async fn get_contribution(
        &self,
        session_slot_id: u64,
        contributor: &Pubkey,
    ) -> Result<Contribution> {
        let (session, _) = find_session_pda(&self.program_id, &self.network_config, session_slot_id);
        let (address, _) = find_contribution_pda(&self.program_id, &session, contributor);
        self.fetch(&address).await
    }

    pub async fn list_nodes_by_status(&self, status: NodeStatus) -> Result<Vec<(Pubkey, NodeInfo)>> {
        list_by_status(self.query.as_ref(), &self.program_id, &node_watch(), status).await
    }

    pub async fn list_agents_by_status(&self, status: AgentStatus) -> Result<Vec<(Pubkey, Agent)>> {
        list_by_status(self.query.as_ref(), &self.program_id, &agent_watch(), status).await
    }

    pub async fn list_sessions_by_status(
        &self,
        status: SessionStatus,
    ) -> Result<Vec<(Pubkey, Session)>> {
        list_by_status(self.query.as_ref(), &self.program_id, &session_watch(), status).await
    }

    pub async fn list_tasks_by_status(&self, status: TaskStatus) -> Result<Vec<(Pubkey, Task)>> {
        list_by_status(self.query.as_ref(), &self.program_id, &task_watch(), status).await
    }

    /// Vault balances in request order. Fails as a whole when the batch
    /// lookup fails.
    pub async fn get_session_vault_balances(
        &self,
        session_slot_ids: &[u64],
    ) -> Result<Vec<SessionVaultBalance>> {
        let vaults: Vec<Pubkey> = session_slot_ids
            .iter()
            .map(|session_slot_id| {
                let (session, _) =
                    find_session_pda(&self.program_id, &self.network_config, *session_slot_id);
                find_session_vault_pda(&self.program_id, &session).0
            })
            .collect();

        let accounts = self.query.get_multiple_accounts(&vaults).await?;

        Ok(session_slot_ids
            .iter()
            .zip(vaults)
            .zip(accounts.into_iter().chain(std::iter::repeat(None)))
            .map(|((session_slot_id, vault), account)| SessionVaultBalance {
                session_slot_id: *session_slot_id,
                vault,
                lamports: account.map_or(0, |account| account.lamports),
            })
            .collect())
    }

    /// Signs `instructions` with `payer` and `signers` against the latest
    /// blockhash and submits them as one transaction.
    pub async fn send_instructions(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = self.transactions.latest_blockhash().await?;

        let mut keypairs: Vec<&dyn Signer> = vec![payer];
        for signer in signers {
            if signer.pubkey() != payer.pubkey() {
                keypairs.push(*signer);
            }
        }

        let message = Message::new(instructions, Some(&payer.pubkey()));
        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&keypairs, blockhash)
            .map_err(|e| DacError::Signing(e.to_string()))?;

        let signature = self.transactions.send_transaction(&transaction).await?;
        debug!(%signature, instructions = instructions.len(), "transaction sent");
        Ok(signature)
    }

    /// Generic wait over any [`StatusWatch`]; the typed helpers below cover
    /// the program's account kinds.
    pub async fn wait_for_status<T, S>(
        &self,
        watch: &StatusWatch<T, S>,
        targets: &[EntityKey],
        status: S,
        mut options: WaitOptions,
    ) -> Result<Vec<T>>
    where
        T: Send,
        S: StatusField,
    {
        if options.timeout.is_none() {
            options.timeout = self.monitor.wait_timeout();
        }
        let mut found = wait_for_status(
            self.query.as_ref(),
            self.subscriptions.as_deref(),
            &self.program_id,
            watch,
            targets,
            status,
            options,
        )
        .await?;

        // Target order, skipping targets not reached under `WaitMode::First`.
        Ok(targets.iter().filter_map(|key| found.remove(key)).collect())
    }

    pub async fn wait_for_node_status(
        &self,
        node_pubkeys: &[Pubkey],
        status: NodeStatus,
        options: WaitOptions,
    ) -> Result<Vec<NodeInfo>> {
        let targets: Vec<EntityKey> = node_pubkeys.iter().copied().map(EntityKey::Address).collect();
        self.wait_for_status(&node_watch(), &targets, status, options).await
    }

    pub async fn wait_for_agent_status(
        &self,
        agent_slot_ids: &[u64],
        status: AgentStatus,
        options: WaitOptions,
    ) -> Result<Vec<Agent>> {
        let targets: Vec<EntityKey> = agent_slot_ids.iter().copied().map(EntityKey::Slot).collect();
        self.wait_for_status(&agent_watch(), &targets, status, options).await
    }

    pub async fn wait_for_session_status(
        &self,
        session_slot_ids: &[u64],
        status: SessionStatus,
        options: WaitOptions,
    ) -> Result<Vec<Session>> {
        let targets: Vec<EntityKey> = session_slot_ids.iter().copied().map(EntityKey::Slot).collect();
        self.wait_for_status(&session_watch(), &targets, status, options).await
    }

    pub async fn wait_for_task_status(
        &self,
        task_slot_ids: &[u64],
        status: TaskStatus,
        options: WaitOptions,
    ) -> Result<Vec<Task>> {
        let targets: Vec<EntityKey> = task_slot_ids.iter().copied().map(EntityKey::Slot).collect();
        self.wait_for_status(&task_watch(), &targets, status, options).await
    }

    /// Task, validation and node events of one session.
    pub async fn subscribe_session_events<F>(
        &self,
        session_slot_id: u64,
        callback: F,
    ) -> Result<SubscriptionHandle>
    where
        F: FnMut(DecodedEvent) + Send + 'static,
    {
        subscribe_events(
            self.subscriptions.clone(),
            self.program_id,
            EventScope::Session(session_slot_id),
            callback,
        )
        .await
    }

    /// Session lifecycle, contribution, agent and node events network wide.
    pub async fn subscribe_program_events<F>(&self, callback: F) -> Result<SubscriptionHandle>
    where
        F: FnMut(DecodedEvent) + Send + 'static,
    {
        subscribe_events(
            self.subscriptions.clone(),
            self.program_id,
            EventScope::Program,
            callback,
        )
        .await
    }

    pub async fn session_event_history(
        &self,
        session_slot_id: u64,
        options: ReplayOptions,
    ) -> Vec<DecodedEvent> {
        replay_events(
            self.transactions.as_ref(),
            &self.monitor,
            &self.program_id,
            &self.network_config,
            EventScope::Session(session_slot_id),
            options,
        )
        .await
    }

    /// Task filters do not apply program wide and are ignored.
    pub async fn program_event_history(&self, options: ReplayOptions) -> Vec<DecodedEvent> {
        replay_events(
            self.transactions.as_ref(),
            &self.monitor,
            &self.program_id,
            &self.network_config,
            EventScope::Program,
            ReplayOptions {
                task_slot_id: None,
                ..options
            },
        )
        .await
    }
}
