//! Nullable relay: scripted redemption results and event logs.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tickity_relay::{LogQuery, RelayError, TicketRelay, TicketUsedLog, UseTicketCall};
use tickity_types::{EventId, TicketId, TxHash, WalletAddress};

/// A relay that records calls and answers from scripts.
///
/// `use_ticket` results are consumed in order; once exhausted the relay
/// answers with a generic error so unexpected submissions are loud.
pub struct NullRelay {
    tickets: Mutex<HashMap<(String, String), Vec<TicketId>>>,
    use_results: Mutex<VecDeque<Result<TxHash, RelayError>>>,
    logs: Mutex<Result<Vec<TicketUsedLog>, RelayError>>,
    submitted: Mutex<Vec<UseTicketCall>>,
    log_queries: Mutex<Vec<LogQuery>>,
    ticket_lookups: AtomicUsize,
}

impl NullRelay {
    pub fn new() -> Self {
        Self {
            tickets: Mutex::new(HashMap::new()),
            use_results: Mutex::new(VecDeque::new()),
            logs: Mutex::new(Ok(Vec::new())),
            submitted: Mutex::new(Vec::new()),
            log_queries: Mutex::new(Vec::new()),
            ticket_lookups: AtomicUsize::new(0),
        }
    }

    /// Give `owner` these tickets for `event`.
    pub fn with_tickets(self, event: &EventId, owner: &WalletAddress, tickets: Vec<TicketId>) -> Self {
        self.tickets.lock().unwrap().insert(
            (event.to_string(), owner.as_str().to_ascii_lowercase()),
            tickets,
        );
        self
    }

    /// Queue the result of the next `use_ticket` call.
    pub fn push_use_result(&self, result: Result<TxHash, RelayError>) {
        self.use_results.lock().unwrap().push_back(result);
    }

    pub fn set_logs(&self, logs: Result<Vec<TicketUsedLog>, RelayError>) {
        *self.logs.lock().unwrap() = logs;
    }

    pub fn submitted(&self) -> Vec<UseTicketCall> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn log_queries(&self) -> Vec<LogQuery> {
        self.log_queries.lock().unwrap().clone()
    }

    pub fn ticket_lookup_count(&self) -> usize {
        self.ticket_lookups.load(Ordering::SeqCst)
    }
}

impl Default for NullRelay {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketRelay for NullRelay {
    async fn tickets_of(
        &self,
        event: &EventId,
        owner: &WalletAddress,
    ) -> Result<Vec<TicketId>, RelayError> {
        self.ticket_lookups.fetch_add(1, Ordering::SeqCst);
        let key = (event.to_string(), owner.as_str().to_ascii_lowercase());
        Ok(self
            .tickets
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn use_ticket(&self, call: &UseTicketCall) -> Result<TxHash, RelayError> {
        self.submitted.lock().unwrap().push(call.clone());
        tokio::task::yield_now().await;
        let next = self.use_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(RelayError::Other("null relay: no scripted result".into())))
    }

    async fn ticket_used_logs(&self, query: &LogQuery) -> Result<Vec<TicketUsedLog>, RelayError> {
        self.log_queries.lock().unwrap().push(query.clone());
        self.logs.lock().unwrap().clone()
    }
}
