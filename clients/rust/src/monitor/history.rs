use chrono::{DateTime, Utc};
use futures::future::join_all;
use solana_pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::{debug, warn};

use super::{replay_addresses, EventScope, ReplayOptions};
use crate::config::MonitorConfig;
use crate::events::{parse_event_logs, DecodedEvent};
use crate::rpc::{SignatureInfo, TransactionTransport};

fn block_timestamp(block_time: Option<i64>) -> DateTime<Utc> {
    block_time
        .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        .unwrap_or_else(Utc::now)
}

async fn signatures_for(
    transport: &dyn TransactionTransport,
    primary: &Pubkey,
    fallback: Option<&Pubkey>,
    limit: usize,
    before: Option<Signature>,
) -> Vec<SignatureInfo> {
    match transport
        .get_signatures_for_address(primary, limit, before)
        .await
    {
        Ok(signatures) if !signatures.is_empty() => return signatures,
        Ok(_) => debug!(address = %primary, "no signatures for primary address"),
        Err(err) => warn!(address = %primary, error = %err, "signature fetch failed"),
    }

    let Some(fallback) = fallback else {
        return Vec::new();
    };
    match transport
        .get_signatures_for_address(fallback, limit, before)
        .await
    {
        Ok(signatures) => {
            debug!(address = %fallback, count = signatures.len(), "using fallback address");
            signatures
        }
        Err(err) => {
            warn!(address = %fallback, error = %err, "fallback signature fetch failed");
            Vec::new()
        }
    }
}

/// Events of one transaction. A failed fetch or a transaction without logs
/// contributes nothing.
async fn transaction_events(
    transport: &dyn TransactionTransport,
    signature: Signature,
    scope: EventScope,
    task_slot_id: Option<u64>,
) -> Vec<DecodedEvent> {
    let record = match transport.get_transaction(&signature).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(%signature, "transaction not found");
            return Vec::new();
        }
        Err(err) => {
            warn!(%signature, error = %err, "transaction fetch failed");
            return Vec::new();
        }
    };
    if record.err.is_some() {
        return Vec::new();
    }
    let Some(logs) = record.logs else {
        return Vec::new();
    };

    let mut events = parse_event_logs(
        &logs,
        scope.session_filter(),
        &signature,
        block_timestamp(record.block_time),
    );
    if let Some(task_slot_id) = task_slot_id {
        events.retain(|event| event.task_slot_id().map_or(true, |id| id == task_slot_id));
    }
    events
}

/// Rebuilds past events of `scope`, newest first.
///
/// At most `config.max_signatures` signatures are read. Their transactions
/// are fetched concurrently, `config.fetch_batch_size` at a time, and no new
/// batch starts once `limit` events were gathered. Fetch failures only cost
/// the affected transaction.
pub async fn replay_events(
    transport: &dyn TransactionTransport,
    config: &MonitorConfig,
    program_id: &Pubkey,
    network_config: &Pubkey,
    scope: EventScope,
    options: ReplayOptions,
) -> Vec<DecodedEvent> {
    let limit = options.limit.unwrap_or(match scope {
        EventScope::Session(_) => config.session_history_limit,
        EventScope::Program => config.program_history_limit,
    });
    if limit == 0 {
        return Vec::new();
    }

    let (primary, fallback) = replay_addresses(scope, program_id, network_config);
    let mut signatures = signatures_for(
        transport,
        &primary,
        fallback.as_ref(),
        config.max_signatures,
        options.before,
    )
    .await;
    signatures.truncate(config.max_signatures);

    let batch_size = config.fetch_batch_size.max(1);
    let mut events = Vec::new();
    for batch in signatures.chunks(batch_size) {
        let fetches = batch
            .iter()
            .filter(|info| info.err.is_none())
            .map(|info| transaction_events(transport, info.signature, scope, options.task_slot_id));

        for transaction in join_all(fetches).await {
            events.extend(transaction);
        }
        if events.len() >= limit {
            break;
        }
    }

    debug!(
        ?scope,
        signatures = signatures.len(),
        events = events.len(),
        limit,
        "replayed events"
    );

    // Stable, so events of one transaction keep their log order.
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit);
    events
}
