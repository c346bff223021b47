use std::collections::HashMap;
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use borsh::BorshDeserialize;
use chrono::{DateTime, Utc};
use solana_sdk::signature::Signature;
use tracing::{debug, trace};

use super::{
    AgentCreated, ContributionMade, DacEvent, DecodedEvent, EventKind, NodeRejected,
    NodeValidated, SessionCompleted, SessionSet, TaskClaimed, TaskResultSubmitted,
    TaskValidationSubmitted,
};
use crate::errors::{DacError, Result};
use crate::utils::DISCRIMINATOR_LEN;

/// Prefix the runtime puts in front of data emitted with `sol_log_data`.
pub const PROGRAM_DATA_PREFIX: &str = "Program data: ";

static EVENT_TABLE: LazyLock<HashMap<[u8; DISCRIMINATOR_LEN], EventKind>> = LazyLock::new(|| {
    EventKind::ALL
        .iter()
        .map(|kind| (kind.discriminator(), *kind))
        .collect()
});

pub fn event_kind_for(discriminator: &[u8; DISCRIMINATOR_LEN]) -> Option<EventKind> {
    EVENT_TABLE.get(discriminator).copied()
}

fn decode_body<T: BorshDeserialize>(kind: EventKind, mut body: &[u8]) -> Result<T> {
    T::deserialize(&mut body).map_err(|source| DacError::Decode {
        what: kind.name(),
        source,
    })
}

/// Decodes one raw event payload: discriminator followed by the Borsh body.
pub fn decode_event(data: &[u8]) -> Result<DacEvent> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(DacError::EventTooShort { len: data.len() });
    }
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
    let kind = event_kind_for(&discriminator).ok_or(DacError::UnknownEvent(discriminator))?;
    let body = &data[DISCRIMINATOR_LEN..];

    let event = match kind {
        EventKind::TaskClaimed => DacEvent::TaskClaimed(decode_body::<TaskClaimed>(kind, body)?),
        EventKind::TaskResultSubmitted => {
            DacEvent::TaskResultSubmitted(decode_body::<TaskResultSubmitted>(kind, body)?)
        }
        EventKind::TaskValidationSubmitted => {
            DacEvent::TaskValidationSubmitted(decode_body::<TaskValidationSubmitted>(kind, body)?)
        }
        EventKind::SessionSet => DacEvent::SessionSet(decode_body::<SessionSet>(kind, body)?),
        EventKind::ContributionMade => {
            DacEvent::ContributionMade(decode_body::<ContributionMade>(kind, body)?)
        }
        EventKind::SessionCompleted => {
            DacEvent::SessionCompleted(decode_body::<SessionCompleted>(kind, body)?)
        }
        EventKind::NodeValidated => {
            DacEvent::NodeValidated(decode_body::<NodeValidated>(kind, body)?)
        }
        EventKind::NodeRejected => DacEvent::NodeRejected(decode_body::<NodeRejected>(kind, body)?),
        EventKind::AgentCreated => DacEvent::AgentCreated(decode_body::<AgentCreated>(kind, body)?),
    };
    Ok(event)
}

/// Decodes the base64 payload of a single `Program data:` log line.
/// Lines without the prefix yield `Ok(None)`.
pub fn decode_log_line(line: &str) -> Result<Option<DacEvent>> {
    let Some(payload) = line.strip_prefix(PROGRAM_DATA_PREFIX) else {
        return Ok(None);
    };
    let data = STANDARD.decode(payload.trim())?;
    decode_event(&data).map(Some)
}

/// A present session id must equal the filter; an absent one always passes.
pub fn matches_session_filter(event: &DacEvent, filter_session_slot_id: Option<u64>) -> bool {
    match (filter_session_slot_id, event.session_slot_id()) {
        (Some(filter), Some(session_slot_id)) => filter == session_slot_id,
        _ => true,
    }
}

/// Turns the logs of one transaction into events, in log order.
///
/// Lines that fail to decode are dropped and logged; events whose session id
/// differs from `filter_session_slot_id` are skipped silently.
pub fn parse_event_logs<S: AsRef<str>>(
    logs: &[S],
    filter_session_slot_id: Option<u64>,
    signature: &Signature,
    timestamp: DateTime<Utc>,
) -> Vec<DecodedEvent> {
    let mut events = Vec::new();

    for line in logs {
        let event = match decode_log_line(line.as_ref()) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                debug!(%signature, error = %err, "dropping undecodable program data line");
                continue;
            }
        };

        if !matches_session_filter(&event, filter_session_slot_id) {
            trace!(
                %signature,
                kind = event.kind().name(),
                session_slot_id = ?event.session_slot_id(),
                "event filtered out"
            );
            continue;
        }

        events.push(DecodedEvent {
            event,
            signature: *signature,
            timestamp,
        });
    }

    events
}
