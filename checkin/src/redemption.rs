//! Ticket redemption orchestrator.
//!
//! One accepted call to [`RedemptionOrchestrator::redeem`] runs, in order:
//! 1. upload the selfie (if any) and obtain its URL
//! 2. look up the wallet's first ticket for the event
//! 3. submit the "use ticket" call and await its receipt
//! 4. if the relay lost the receipt, wait for the chain to settle and take
//!    the hash of the last `TicketUsed` log instead
//! 5. write the [`CheckInRecord`] to the cache
//!
//! Every outcome lands in the shared [`TransactionState`]; failures never
//! escape as errors. An error state clears itself after
//! [`RedemptionTiming::error_clear_delay`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use tickity_media::{CapturedImage, ImageUploader};
use tickity_relay::{LogQuery, RelayError, TicketRelay, UseTicketCall};
use tickity_store::{CheckInCache, KeyValueStore};
use tickity_types::{CheckInRecord, EventId, TxHash, WalletAddress};

use crate::cancel::CancelToken;
use crate::error::RedemptionError;
use crate::transaction::TransactionState;

/// Fixed delays used by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedemptionTiming {
    /// Wait before scanning logs after a lost receipt.
    pub settle_delay: Duration,
    /// How long an error stays visible before returning to idle.
    pub error_clear_delay: Duration,
}

impl Default for RedemptionTiming {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(5000),
            error_clear_delay: Duration::from_millis(5000),
        }
    }
}

/// Inputs of one redemption attempt.
#[derive(Clone, Copy, Debug)]
pub struct RedemptionRequest<'a> {
    pub event: &'a EventId,
    pub wallet: &'a WalletAddress,
    pub selfie: Option<&'a CapturedImage>,
}

/// How the redemption hash was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationPath {
    Receipt,
    LogScan,
}

/// Result of one call to [`RedemptionOrchestrator::redeem`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Another attempt is in flight; nothing was done.
    Ignored,
    Succeeded {
        record: CheckInRecord,
        path: ConfirmationPath,
    },
    Failed {
        message: String,
    },
    Cancelled,
}

struct Redeemed {
    hash: TxHash,
    image_url: Option<String>,
    path: ConfirmationPath,
    record: CheckInRecord,
}

/// Runs redemptions for one screen, at most one at a time, and owns the
/// resulting [`TransactionState`].
pub struct RedemptionOrchestrator {
    relay: Arc<dyn TicketRelay>,
    uploader: Arc<dyn ImageUploader>,
    cache: CheckInCache<Arc<dyn KeyValueStore>>,
    state: Arc<Mutex<TransactionState>>,
    timing: RedemptionTiming,
    cancel: CancelToken,
}

impl RedemptionOrchestrator {
    /// Create an orchestrator writing check-ins to `store`. Every suspension
    /// point races `cancel`.
    pub fn new(
        relay: Arc<dyn TicketRelay>,
        uploader: Arc<dyn ImageUploader>,
        store: Arc<dyn KeyValueStore>,
        timing: RedemptionTiming,
        cancel: CancelToken,
    ) -> Self {
        Self {
            relay,
            uploader,
            cache: CheckInCache::new(store),
            state: Arc::new(Mutex::new(TransactionState::default())),
            timing,
            cancel,
        }
    }

    /// Snapshot of the current transaction state.
    pub async fn state(&self) -> TransactionState {
        self.state.lock().await.clone()
    }

    /// Close the error overlay immediately.
    pub async fn dismiss(&self) {
        let mut state = self.state.lock().await;
        let attempt = state.attempt;
        state.clear_error(attempt);
    }

    /// The check-in cache redemptions are written to.
    pub fn cache(&self) -> &CheckInCache<Arc<dyn KeyValueStore>> {
        &self.cache
    }

    /// Run one redemption attempt unless another is already in flight.
    pub async fn redeem(&self, request: RedemptionRequest<'_>) -> RedeemOutcome {
        let attempt = match self.state.lock().await.begin() {
            Some(attempt) => attempt,
            None => {
                tracing::debug!(event = %request.event, "redemption already in flight, ignoring");
                return RedeemOutcome::Ignored;
            }
        };

        tracing::info!(event = %request.event, wallet = %request.wallet, attempt, "redeeming ticket");

        match self.execute(request).await {
            Ok(redeemed) => {
                self.state
                    .lock()
                    .await
                    .succeed(redeemed.hash, redeemed.image_url);
                tracing::info!(
                    event = %request.event,
                    hash = %redeemed.hash,
                    path = ?redeemed.path,
                    "ticket redeemed"
                );
                RedeemOutcome::Succeeded {
                    record: redeemed.record,
                    path: redeemed.path,
                }
            }
            Err(RedemptionError::Cancelled(_)) => {
                self.state.lock().await.reset();
                tracing::info!(event = %request.event, "redemption cancelled");
                RedeemOutcome::Cancelled
            }
            Err(e) => {
                let message = e.to_string();
                self.state.lock().await.fail(&message, e.known_hash());
                tracing::warn!(event = %request.event, error = %message, "redemption failed");
                self.schedule_error_clear(attempt);
                RedeemOutcome::Failed { message }
            }
        }
    }

    async fn execute(&self, request: RedemptionRequest<'_>) -> Result<Redeemed, RedemptionError> {
        let image_url = match request.selfie {
            Some(selfie) => Some(
                self.cancel
                    .guard(self.uploader.upload(selfie))
                    .await?
                    .map_err(RedemptionError::Upload)?,
            ),
            None => None,
        };

        let tickets = self
            .cancel
            .guard(self.relay.tickets_of(request.event, request.wallet))
            .await?
            .map_err(RedemptionError::Relay)?;
        let ticket = *tickets
            .first()
            .ok_or_else(|| RedemptionError::NoTicket(request.event.clone()))?;

        let call = UseTicketCall {
            event: request.event.clone(),
            ticket,
            owner: request.wallet.clone(),
            image_url: image_url.clone(),
        };

        let (hash, path) = match self.cancel.guard(self.relay.use_ticket(&call)).await? {
            Ok(hash) => (hash, ConfirmationPath::Receipt),
            Err(RelayError::ReceiptUnavailable(reason)) => {
                tracing::warn!(
                    event = %request.event,
                    %ticket,
                    %reason,
                    "relay lost the receipt, falling back to event log scan"
                );
                (self.recover_from_logs(request.event).await?, ConfirmationPath::LogScan)
            }
            Err(e) => return Err(RedemptionError::Relay(e)),
        };

        let record = CheckInRecord {
            wallet_address: request.wallet.clone(),
            image_url: image_url.clone(),
            transaction_hash: Some(hash),
        };
        self.cache
            .set(request.event, &record)
            .map_err(|source| RedemptionError::Persist { hash, source })?;

        Ok(Redeemed {
            hash,
            image_url,
            path,
            record,
        })
    }

    /// Recover the redemption hash from the contract's `TicketUsed` history.
    ///
    /// Takes the last log over the full block range. Under concurrent
    /// redemptions by other holders that log may not be ours; the heuristic is
    /// kept as-is and flagged in the logs.
    async fn recover_from_logs(&self, event: &EventId) -> Result<TxHash, RedemptionError> {
        self.cancel
            .guard(tokio::time::sleep(self.timing.settle_delay))
            .await?;

        let query = LogQuery::ticket_used_full_range(event.clone());
        let logs = self
            .cancel
            .guard(self.relay.ticket_used_logs(&query))
            .await?
            .map_err(RedemptionError::LogScan)?;

        let last = logs.last().ok_or(RedemptionError::NoTicketUsedLog)?;
        if logs.len() > 1 {
            tracing::warn!(
                %event,
                candidates = logs.len(),
                hash = %last.transaction_hash,
                "taking the last TicketUsed log; it may belong to another holder"
            );
        }
        Ok(last.transaction_hash)
    }

    fn schedule_error_clear(&self, attempt: u64) {
        let state = Arc::clone(&self.state);
        let cancel = self.cancel.clone();
        let delay = self.timing.error_clear_delay;
        tokio::spawn(async move {
            if cancel.guard(tokio::time::sleep(delay)).await.is_err() {
                return;
            }
            if state.lock().await.clear_error(attempt) {
                tracing::debug!(attempt, "redemption error cleared");
            }
        });
    }
}
