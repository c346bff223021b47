//! Narrow transport interfaces the client talks through. A concrete RPC or
//! websocket client implements these; the SDK never depends on one directly.

use async_trait::async_trait;
use futures::stream::BoxStream;
use solana_pubkey::Pubkey;
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};
use tokio_util::sync::CancellationToken;

use crate::errors::Result;

/// Server-side account filter, applied identically by listings and
/// account subscriptions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountFilter {
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset.saturating_add(bytes.len()))
                .is_some_and(|window| window == bytes.as_slice()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawAccount {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
    pub lamports: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    pub signature: Signature,
    pub logs: Option<Vec<String>>,
    /// Unix seconds.
    pub block_time: Option<i64>,
    pub err: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: Signature,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub err: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountNotification {
    pub pubkey: Pubkey,
    pub data: Vec<u8>,
    pub slot: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogNotification {
    pub signature: Option<Signature>,
    pub logs: Option<Vec<String>>,
    pub err: Option<String>,
}

/// Point-in-time account reads.
#[async_trait]
pub trait AccountQuery: Send + Sync {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>>;

    /// All accounts owned by `program_id` matching every filter.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>>;

    /// One entry per address, in request order.
    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<RawAccount>>>;
}

#[async_trait]
pub trait TransactionTransport: Send + Sync {
    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>>;

    /// Most recent first. `before` is the pagination cursor.
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<Signature>,
    ) -> Result<Vec<SignatureInfo>>;
}

/// Push notifications. Streams end when `cancel` fires or the connection
/// closes.
#[async_trait]
pub trait SubscriptionTransport: Send + Sync {
    async fn program_subscribe(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
        cancel: CancellationToken,
    ) -> Result<BoxStream<'static, AccountNotification>>;

    /// Logs of transactions mentioning `address`.
    async fn logs_subscribe(
        &self,
        address: &Pubkey,
        cancel: CancellationToken,
    ) -> Result<BoxStream<'static, LogNotification>>;
}
