use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use borsh::BorshSerialize;
use dac_client::{
    AccountFilter, AccountNotification, AccountQuery, DacAccount, DacError, EventKind,
    LogNotification, RawAccount, Result, SignatureInfo, SubscriptionTransport, TransactionRecord,
    TransactionTransport, PROGRAM_DATA_PREFIX,
};
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::{BoxStream, StreamExt};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use tokio_util::sync::CancellationToken;

pub const MOCK_BLOCKHASH: Hash = Hash::new_from_array([7u8; 32]);

struct ProgramSubscriber {
    filters: Vec<AccountFilter>,
    sender: UnboundedSender<AccountNotification>,
}

#[derive(Default)]
struct Ledger {
    accounts: BTreeMap<Pubkey, RawAccount>,
    signatures: HashMap<Pubkey, Vec<SignatureInfo>>,
    transactions: HashMap<Signature, TransactionRecord>,
    delays: HashMap<Signature, Duration>,
    failing_addresses: HashSet<Pubkey>,
    failing_transactions: HashSet<Signature>,
    fail_multiple_accounts: bool,
    subscribe_delay: Option<Duration>,
    sent: Vec<Transaction>,
    slot: u64,
}

/// In-memory stand-in for an RPC node and its websocket endpoint.
#[derive(Default)]
pub struct MockRpc {
    ledger: Mutex<Ledger>,
    program_subscribers: Mutex<Vec<ProgramSubscriber>>,
    log_subscribers: Mutex<Vec<UnboundedSender<LogNotification>>>,
    program_subscriptions: AtomicUsize,
    log_subscriptions: AtomicUsize,
    transaction_fetches: AtomicUsize,
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an account and pushes it to every matching program subscriber.
    pub fn set_account(&self, pubkey: Pubkey, data: Vec<u8>, lamports: u64) {
        let slot = {
            let mut ledger = self.ledger.lock().unwrap();
            ledger.slot += 1;
            ledger.accounts.insert(
                pubkey,
                RawAccount {
                    pubkey,
                    data: data.clone(),
                    lamports,
                },
            );
            ledger.slot
        };

        let subscribers = self.program_subscribers.lock().unwrap();
        for subscriber in subscribers.iter() {
            if subscriber.filters.iter().all(|filter| filter.matches(&data)) {
                let _ = subscriber.sender.unbounded_send(AccountNotification {
                    pubkey,
                    data: data.clone(),
                    slot,
                });
            }
        }
    }

    /// Records a transaction and indexes its signature under `addresses`,
    /// newest first.
    pub fn add_transaction(&self, addresses: &[Pubkey], record: TransactionRecord) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.slot += 1;
        let info = SignatureInfo {
            signature: record.signature,
            slot: ledger.slot,
            block_time: record.block_time,
            err: record.err.clone(),
        };
        for address in addresses {
            ledger
                .signatures
                .entry(*address)
                .or_default()
                .insert(0, info.clone());
        }
        ledger.transactions.insert(record.signature, record);
    }

    pub fn delay_transaction(&self, signature: Signature, delay: Duration) {
        self.ledger.lock().unwrap().delays.insert(signature, delay);
    }

    pub fn fail_signatures_for(&self, address: Pubkey) {
        self.ledger.lock().unwrap().failing_addresses.insert(address);
    }

    pub fn fail_transaction(&self, signature: Signature) {
        self.ledger
            .lock()
            .unwrap()
            .failing_transactions
            .insert(signature);
    }

    pub fn fail_multiple_accounts(&self) {
        self.ledger.lock().unwrap().fail_multiple_accounts = true;
    }

    /// Makes every `program_subscribe` stall for `delay` before it registers.
    pub fn delay_subscriptions(&self, delay: Duration) {
        self.ledger.lock().unwrap().subscribe_delay = Some(delay);
    }

    /// Pushes a log notification to every live log subscriber.
    pub fn emit_logs(&self, notification: LogNotification) {
        let subscribers = self.log_subscribers.lock().unwrap();
        for sender in subscribers.iter() {
            let _ = sender.unbounded_send(notification.clone());
        }
    }

    /// Ends every open stream as if the connection dropped.
    pub fn close_subscriptions(&self) {
        self.program_subscribers.lock().unwrap().clear();
        self.log_subscribers.lock().unwrap().clear();
    }

    pub fn program_subscription_count(&self) -> usize {
        self.program_subscriptions.load(Ordering::SeqCst)
    }

    pub fn log_subscription_count(&self) -> usize {
        self.log_subscriptions.load(Ordering::SeqCst)
    }

    pub fn active_program_subscriptions(&self) -> usize {
        self.program_subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|subscriber| !subscriber.sender.is_closed())
            .count()
    }

    pub fn active_log_subscriptions(&self) -> usize {
        self.log_subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }

    pub fn transaction_fetch_count(&self) -> usize {
        self.transaction_fetches.load(Ordering::SeqCst)
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.ledger.lock().unwrap().sent.clone()
    }

    /// Polls until `count` program subscriptions were opened.
    pub async fn wait_for_program_subscribers(&self, count: usize) {
        while self.program_subscription_count() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    pub async fn wait_for_log_subscribers(&self, count: usize) {
        while self.log_subscription_count() < count {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

fn until_cancelled<T: Send + 'static>(
    receiver: futures::channel::mpsc::UnboundedReceiver<T>,
    cancel: CancellationToken,
) -> BoxStream<'static, T> {
    receiver
        .take_until(async move { cancel.cancelled().await })
        .boxed()
}

#[async_trait]
impl AccountQuery for MockRpc {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>> {
        Ok(self.ledger.lock().unwrap().accounts.get(address).cloned())
    }

    async fn get_program_accounts(
        &self,
        _program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>> {
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .accounts
            .values()
            .filter(|account| filters.iter().all(|filter| filter.matches(&account.data)))
            .cloned()
            .collect())
    }

    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<RawAccount>>> {
        let ledger = self.ledger.lock().unwrap();
        if ledger.fail_multiple_accounts {
            return Err(DacError::Transport("getMultipleAccounts unavailable".to_string()));
        }
        Ok(addresses
            .iter()
            .map(|address| ledger.accounts.get(address).cloned())
            .collect())
    }
}

#[async_trait]
impl TransactionTransport for MockRpc {
    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(MOCK_BLOCKHASH)
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let signature = transaction
            .signatures
            .first()
            .copied()
            .ok_or_else(|| DacError::Transport("unsigned transaction".to_string()))?;
        self.ledger.lock().unwrap().sent.push(transaction.clone());
        Ok(signature)
    }

    async fn get_transaction(&self, signature: &Signature) -> Result<Option<TransactionRecord>> {
        self.transaction_fetches.fetch_add(1, Ordering::SeqCst);
        let (delay, failing) = {
            let ledger = self.ledger.lock().unwrap();
            (
                ledger.delays.get(signature).copied(),
                ledger.failing_transactions.contains(signature),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(DacError::Transport(format!("getTransaction {signature} failed")));
        }
        Ok(self.ledger.lock().unwrap().transactions.get(signature).cloned())
    }

    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
        before: Option<Signature>,
    ) -> Result<Vec<SignatureInfo>> {
        let ledger = self.ledger.lock().unwrap();
        if ledger.failing_addresses.contains(address) {
            return Err(DacError::Transport(format!(
                "getSignaturesForAddress {address} failed"
            )));
        }
        let all = ledger.signatures.get(address).cloned().unwrap_or_default();
        let start = match before {
            Some(cursor) => all
                .iter()
                .position(|info| info.signature == cursor)
                .map_or(all.len(), |index| index + 1),
            None => 0,
        };
        Ok(all.into_iter().skip(start).take(limit).collect())
    }
}

#[async_trait]
impl SubscriptionTransport for MockRpc {
    async fn program_subscribe(
        &self,
        _program_id: &Pubkey,
        filters: &[AccountFilter],
        cancel: CancellationToken,
    ) -> Result<BoxStream<'static, AccountNotification>> {
        let delay = self.ledger.lock().unwrap().subscribe_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let (sender, receiver) = unbounded();
        self.program_subscribers.lock().unwrap().push(ProgramSubscriber {
            filters: filters.to_vec(),
            sender,
        });
        self.program_subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(until_cancelled(receiver, cancel))
    }

    async fn logs_subscribe(
        &self,
        _address: &Pubkey,
        cancel: CancellationToken,
    ) -> Result<BoxStream<'static, LogNotification>> {
        let (sender, receiver) = unbounded();
        self.log_subscribers.lock().unwrap().push(sender);
        self.log_subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(until_cancelled(receiver, cancel))
    }
}

/// A `Program data:` log line carrying `event`.
pub fn encode_event_log<E: BorshSerialize>(kind: EventKind, event: &E) -> String {
    let mut data = kind.discriminator().to_vec();
    data.extend(borsh::to_vec(event).expect("Failed to serialize event"));
    format!("{PROGRAM_DATA_PREFIX}{}", STANDARD.encode(data))
}

/// Account bytes as the program stores them: discriminator, then body.
pub fn encode_account<T: DacAccount + BorshSerialize>(account: &T) -> Vec<u8> {
    let mut data = T::DISCRIMINATOR.to_vec();
    data.extend(borsh::to_vec(account).expect("Failed to serialize account"));
    data
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
