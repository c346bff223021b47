use std::{path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use solana_pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair};
use tracing::debug;

use crate::errors::{DacError, Result};
use crate::DAC_PROGRAM_ID;

pub const RPC_URL_ENV: &str = "DAC_RPC_URL";
pub const WS_URL_ENV: &str = "DAC_WS_URL";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Hard cap on signatures fetched per replay, whatever the requested limit.
    pub max_signatures: usize,
    /// Transactions fetched concurrently per replay batch.
    pub fetch_batch_size: usize,
    pub session_history_limit: usize,
    pub program_history_limit: usize,
    /// Deadline applied to waits that do not pass their own.
    pub wait_timeout_ms: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_signatures: 100,
            fetch_batch_size: 10,
            session_history_limit: 50,
            program_history_limit: 20,
            wait_timeout_ms: None,
        }
    }
}

impl MonitorConfig {
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DacConfig {
    pub rpc_url: String,
    #[serde(default)]
    pub ws_url: Option<String>,
    #[serde(default)]
    pub program_id: Option<String>,
    pub network_authority: String,
    #[serde(default)]
    pub keypair_path: Option<String>,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl DacConfig {
    /// Reads a YAML file, then applies `DAC_RPC_URL` / `DAC_WS_URL`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DacError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_yaml_str(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        debug!(path = %path.display(), rpc_url = %config.rpc_url, "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| DacError::Config(e.to_string()))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(rpc_url) = lookup(RPC_URL_ENV) {
            self.rpc_url = rpc_url;
        }
        if let Some(ws_url) = lookup(WS_URL_ENV) {
            self.ws_url = Some(ws_url);
        }
    }

    /// The websocket endpoint, derived from the RPC url when not set.
    pub fn ws_url(&self) -> String {
        match &self.ws_url {
            Some(ws_url) => ws_url.clone(),
            None => self
                .rpc_url
                .replacen("https://", "wss://", 1)
                .replacen("http://", "ws://", 1),
        }
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        match &self.program_id {
            Some(program_id) => parse_pubkey("program_id", program_id),
            None => Ok(DAC_PROGRAM_ID),
        }
    }

    pub fn network_authority(&self) -> Result<Pubkey> {
        parse_pubkey("network_authority", &self.network_authority)
    }

    pub fn load_keypair(&self) -> Result<Keypair> {
        let path = self
            .keypair_path
            .as_deref()
            .ok_or(DacError::MissingField("keypair_path"))?;
        let path = shellexpand::tilde(path).to_string();
        read_keypair_file(&path).map_err(|e| DacError::Config(format!("{path}: {e}")))
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| DacError::Config(format!("{field}: {e}")))
}
