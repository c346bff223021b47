//! Status waits, live event feeds and historical replay on top of the
//! transport traits in [`crate::rpc`].

use std::time::Duration;

use solana_pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tokio_util::sync::CancellationToken;

use crate::events::EventKind;

pub mod history;
pub mod status;
pub mod subscription;

pub use history::*;
pub use status::*;
pub use subscription::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaitMode {
    /// Resolve as soon as any target holds the status.
    First,
    /// Resolve once every target holds the status.
    #[default]
    All,
}

#[derive(Clone, Debug, Default)]
pub struct WaitOptions {
    pub mode: WaitMode,
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl WaitOptions {
    pub fn first() -> Self {
        Self {
            mode: WaitMode::First,
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// What a live feed or a replay is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventScope {
    Session(u64),
    Program,
}

impl EventScope {
    /// Event kinds forwarded to live subscribers of this scope.
    pub fn kinds(&self) -> &'static [EventKind] {
        match self {
            EventScope::Session(_) => &EventKind::SESSION_SCOPED,
            EventScope::Program => &EventKind::PROGRAM_WIDE,
        }
    }

    pub fn session_filter(&self) -> Option<u64> {
        match self {
            EventScope::Session(session_slot_id) => Some(*session_slot_id),
            EventScope::Program => None,
        }
    }

    pub fn accepts(&self, kind: EventKind) -> bool {
        self.kinds().contains(&kind)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Keep only events of this task. Events without a task id are kept.
    pub task_slot_id: Option<u64>,
    /// Defaults to the scope's history limit from [`crate::MonitorConfig`].
    pub limit: Option<usize>,
    /// Pagination cursor: only signatures older than this one.
    pub before: Option<Signature>,
}

/// Address whose signatures back a replay, plus the fallback tried when
/// the primary one yields nothing.
pub(crate) fn replay_addresses(
    scope: EventScope,
    program_id: &Pubkey,
    network_config: &Pubkey,
) -> (Pubkey, Option<Pubkey>) {
    match scope {
        EventScope::Session(session_slot_id) => {
            let (session, _) =
                crate::pda::find_session_pda(program_id, network_config, session_slot_id);
            let (vault, _) = crate::pda::find_session_vault_pda(program_id, &session);
            (session, Some(vault))
        }
        EventScope::Program => (*program_id, None),
    }
}
