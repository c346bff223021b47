use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use chrono::Utc;
use futures::StreamExt;
use solana_pubkey::Pubkey;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::EventScope;
use crate::errors::{DacError, Result};
use crate::events::{parse_event_logs, DecodedEvent};
use crate::rpc::{LogNotification, SubscriptionTransport};

/// Stops a live event feed. Dropping the handle cancels it too.
#[derive(Debug)]
pub struct SubscriptionHandle {
    active: Arc<Mutex<bool>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

fn lock(active: &Mutex<bool>) -> MutexGuard<'_, bool> {
    match active.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl SubscriptionHandle {
    /// Stops delivery and releases the underlying subscription. Once this
    /// returns the callback is never invoked again; a callback already
    /// running is waited for, so this must not be called from inside it.
    /// Calling it more than once is a no-op.
    pub fn cancel(&self) {
        let was_active = std::mem::replace(&mut *lock(&self.active), false);

        self.cancel.cancel();
        self.task.abort();
        if was_active {
            debug!("event subscription cancelled");
        }
    }

    /// False once the handle was cancelled or the transport closed the feed.
    /// Never blocks, so the callback may call it; while a callback runs the
    /// feed counts as active.
    pub fn is_active(&self) -> bool {
        match self.active.try_lock() {
            Ok(active) => *active,
            Err(TryLockError::Poisoned(poisoned)) => *poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => true,
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Events of one log notification the scope should see, in log order.
/// Failed transactions and notifications without a signature or logs yield
/// nothing.
pub fn scoped_events(notification: &LogNotification, scope: EventScope) -> Vec<DecodedEvent> {
    if let Some(err) = &notification.err {
        trace!(error = %err, "skipping failed transaction");
        return Vec::new();
    }
    let (Some(signature), Some(logs)) = (&notification.signature, &notification.logs) else {
        trace!("skipping notification without signature or logs");
        return Vec::new();
    };

    let mut events = parse_event_logs(logs, scope.session_filter(), signature, Utc::now());
    events.retain(|event| scope.accepts(event.kind()));
    events
}

/// Opens one log subscription on the program and feeds the scope's events
/// to `callback` in arrival order until the handle is cancelled.
pub async fn subscribe_events<F>(
    subscriptions: Option<Arc<dyn SubscriptionTransport>>,
    program_id: Pubkey,
    scope: EventScope,
    mut callback: F,
) -> Result<SubscriptionHandle>
where
    F: FnMut(DecodedEvent) + Send + 'static,
{
    let subscriptions = subscriptions.ok_or(DacError::MissingSubscriptionTransport)?;

    let cancel = CancellationToken::new();
    let mut stream = subscriptions
        .logs_subscribe(&program_id, cancel.clone())
        .await?;
    info!(%program_id, ?scope, "event subscription opened");

    let active = Arc::new(Mutex::new(true));
    let gate = active.clone();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        loop {
            let notification = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                next = stream.next() => match next {
                    Some(notification) => notification,
                    None => {
                        *lock(&gate) = false;
                        warn!(?scope, "log stream closed by the transport");
                        break;
                    }
                },
            };

            for event in scoped_events(&notification, scope) {
                let active = lock(&gate);
                if !*active {
                    return;
                }
                callback(event);
            }
        }
    });

    Ok(SubscriptionHandle {
        active,
        cancel,
        task,
    })
}
