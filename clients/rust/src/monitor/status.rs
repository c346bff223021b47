use std::collections::{HashMap, HashSet};

use futures::StreamExt;
use solana_pubkey::Pubkey;
use tracing::{debug, info, trace};

use super::{WaitMode, WaitOptions};
use crate::errors::{DacError, Result};
use crate::rpc::{AccountFilter, AccountQuery, SubscriptionTransport};
use crate::state::{
    Agent, AgentStatus, DacAccount, NodeInfo, NodeStatus, Session, SessionStatus, StatusField,
    Task, TaskStatus,
};

/// Identifies a watched entity: an address, or a slot id embedded in the
/// account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Address(Pubkey),
    Slot(u64),
}

/// How to find, decode and key one account kind by its status byte.
pub struct StatusWatch<T, S> {
    pub account: &'static str,
    pub discriminator: [u8; 8],
    pub status_offset: usize,
    pub decode: fn(&[u8]) -> Result<T>,
    /// `None` keys the entity by its own account address.
    pub key_of: fn(&T) -> Option<EntityKey>,
    pub status_of: fn(&T) -> S,
}

impl<T, S> Clone for StatusWatch<T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S> Copy for StatusWatch<T, S> {}

impl<T, S: StatusField> StatusWatch<T, S> {
    pub fn filters(&self, status: S) -> Vec<AccountFilter> {
        vec![
            AccountFilter::memcmp(0, self.discriminator),
            AccountFilter::memcmp(self.status_offset, [status.to_byte()]),
        ]
    }

    /// Decodes an account that passed the server-side filter. Accounts whose
    /// decoded status differs are rejected: the status byte only sits at
    /// `status_offset` for some layouts.
    fn observe(&self, pubkey: Pubkey, data: &[u8], status: S) -> Option<(EntityKey, T)> {
        let item = match (self.decode)(data) {
            Ok(item) => item,
            Err(err) => {
                debug!(account = self.account, %pubkey, error = %err, "skipping undecodable account");
                return None;
            }
        };
        if (self.status_of)(&item) != status {
            trace!(account = self.account, %pubkey, "status byte matched a different layout");
            return None;
        }
        let key = (self.key_of)(&item).unwrap_or(EntityKey::Address(pubkey));
        Some((key, item))
    }
}

pub fn node_watch() -> StatusWatch<NodeInfo, NodeStatus> {
    StatusWatch {
        account: NodeInfo::NAME,
        discriminator: NodeInfo::DISCRIMINATOR,
        status_offset: NodeInfo::STATUS_OFFSET,
        decode: NodeInfo::from_bytes,
        key_of: |node| Some(EntityKey::Address(node.node_pubkey)),
        status_of: |node| node.status,
    }
}

pub fn agent_watch() -> StatusWatch<Agent, AgentStatus> {
    StatusWatch {
        account: Agent::NAME,
        discriminator: Agent::DISCRIMINATOR,
        status_offset: Agent::STATUS_OFFSET,
        decode: Agent::from_bytes,
        key_of: |agent| Some(EntityKey::Slot(agent.agent_slot_id)),
        status_of: |agent| agent.status,
    }
}

pub fn session_watch() -> StatusWatch<Session, SessionStatus> {
    StatusWatch {
        account: Session::NAME,
        discriminator: Session::DISCRIMINATOR,
        status_offset: Session::STATUS_OFFSET,
        decode: Session::from_bytes,
        key_of: |session| Some(EntityKey::Slot(session.session_slot_id)),
        status_of: |session| session.status,
    }
}

/// Only tasks bound to a session can be watched.
pub fn task_watch() -> StatusWatch<Task, TaskStatus> {
    StatusWatch {
        account: Task::NAME,
        discriminator: Task::DISCRIMINATOR,
        status_offset: Task::STATUS_OFFSET,
        decode: Task::from_bytes,
        key_of: |task| Some(EntityKey::Slot(task.task_slot_id)),
        status_of: |task| task.status,
    }
}

/// Point-in-time listing of every account of the watched kind holding `status`.
pub async fn list_by_status<T, S: StatusField>(
    query: &dyn AccountQuery,
    program_id: &Pubkey,
    watch: &StatusWatch<T, S>,
    status: S,
) -> Result<Vec<(Pubkey, T)>> {
    let accounts = query
        .get_program_accounts(program_id, &watch.filters(status))
        .await?;

    Ok(accounts
        .into_iter()
        .filter_map(|account| {
            watch
                .observe(account.pubkey, &account.data, status)
                .map(|(_, item)| (account.pubkey, item))
        })
        .collect())
}

fn is_complete<T>(mode: WaitMode, targets: &HashSet<EntityKey>, found: &HashMap<EntityKey, T>) -> bool {
    match mode {
        WaitMode::First => !found.is_empty(),
        WaitMode::All => targets.iter().all(|key| found.contains_key(key)),
    }
}

/// Resolves once the targets hold `status`, per `options.mode`.
///
/// The current state is checked first; only when it does not satisfy the
/// wait is a single account subscription opened, filtered like the listing.
/// `options.timeout` starts with the call and bounds the listing, the
/// subscribe and the notification loop alike.
/// Errors: [`DacError::MissingSubscriptionTransport`] before any I/O,
/// [`DacError::Timeout`], [`DacError::StreamEnded`] and
/// [`DacError::Cancelled`]. A failing listing call propagates.
pub async fn wait_for_status<T, S>(
    query: &dyn AccountQuery,
    subscriptions: Option<&dyn SubscriptionTransport>,
    program_id: &Pubkey,
    watch: &StatusWatch<T, S>,
    targets: &[EntityKey],
    status: S,
    options: WaitOptions,
) -> Result<HashMap<EntityKey, T>>
where
    T: Send,
    S: StatusField,
{
    let subscriptions = subscriptions.ok_or(DacError::MissingSubscriptionTransport)?;
    if targets.is_empty() {
        return Err(DacError::EmptyTargets);
    }
    let targets: HashSet<EntityKey> = targets.iter().copied().collect();
    let mode = options.mode;

    let cancel = options
        .cancel
        .as_ref()
        .map(|token| token.child_token())
        .unwrap_or_default();
    let _release = cancel.clone().drop_guard();

    let watching = async {
        let mut found = HashMap::new();
        for (pubkey, item) in list_by_status(query, program_id, watch, status).await? {
            let key = (watch.key_of)(&item).unwrap_or(EntityKey::Address(pubkey));
            if targets.contains(&key) {
                found.insert(key, item);
            }
        }
        if is_complete(mode, &targets, &found) {
            debug!(
                account = watch.account,
                ?status,
                found = found.len(),
                "wait satisfied by current state"
            );
            return Ok(found);
        }

        info!(
            account = watch.account,
            ?status,
            targets = targets.len(),
            found = found.len(),
            ?mode,
            "subscribing for status changes"
        );
        let mut stream = subscriptions
            .program_subscribe(program_id, &watch.filters(status), cancel.clone())
            .await?;

        while let Some(notification) = stream.next().await {
            let Some((key, item)) = watch.observe(notification.pubkey, &notification.data, status)
            else {
                continue;
            };
            if !targets.contains(&key) {
                continue;
            }
            trace!(account = watch.account, ?key, "target reached status");
            found.insert(key, item);
            if is_complete(mode, &targets, &found) {
                return Ok(found);
            }
        }
        Err(DacError::StreamEnded {
            status: format!("{status:?}"),
        })
    };

    // The deadline and the token cover the listing and the subscribe call too.
    let outcome = async {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DacError::Cancelled),
            result = watching => result,
        }
    };

    let result = match options.timeout {
        Some(deadline) => match tokio::time::timeout(deadline, outcome).await {
            Ok(result) => result,
            Err(_) => Err(DacError::Timeout {
                expected: match mode {
                    WaitMode::First => 1,
                    WaitMode::All => targets.len(),
                },
                status: format!("{status:?}"),
            }),
        },
        None => outcome.await,
    };

    if let Err(err) = &result {
        debug!(account = watch.account, error = %err, "wait failed");
    }
    result
}
