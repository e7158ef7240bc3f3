//! The check-in screen for one event.
//!
//! A screen is mounted with the active wallet session (if any). It checks the
//! local cache first: a record owned by the active wallet short-circuits the
//! whole flow. Otherwise it drives the step machine and, once ready, the
//! redemption orchestrator. Dropping the screen cancels whatever is in flight.

use std::sync::Arc;

use tickity_geo::{Geofence, GeofenceDecision, LocationProvider};
use tickity_media::{CapturedImage, ImageUploader, MediaCapture};
use tickity_relay::TicketRelay;
use tickity_store::KeyValueStore;
use tickity_types::{CheckInRecord, EventId, TxHash, WalletAddress};

use crate::cancel::{CancelHandle, CancelToken};
use crate::config::CheckInConfig;
use crate::error::StepError;
use crate::redemption::{RedeemOutcome, RedemptionOrchestrator, RedemptionRequest};
use crate::steps::{CheckInStep, CheckInSteps};
use crate::transaction::{explorer_tx_url, TransactionPhase, TransactionState};

/// The signed-in smart wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSession {
    pub account: WalletAddress,
}

impl WalletSession {
    pub fn new(account: WalletAddress) -> Self {
        Self { account }
    }
}

/// External collaborators of a check-in screen.
#[derive(Clone)]
pub struct CheckInDeps {
    pub relay: Arc<dyn TicketRelay>,
    pub uploader: Arc<dyn ImageUploader>,
    pub store: Arc<dyn KeyValueStore>,
    pub location: Arc<dyn LocationProvider>,
    pub camera: Arc<dyn MediaCapture>,
}

/// What the screen shows right now.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenView {
    SignInRequired,
    AlreadyCheckedIn {
        record: CheckInRecord,
        explorer_url: Option<String>,
    },
    InProgress {
        step: CheckInStep,
        distance_to_event_m: Option<f64>,
    },
    Submitting,
    Succeeded {
        hash: TxHash,
        explorer_url: String,
    },
    Failed {
        message: String,
        explorer_url: Option<String>,
    },
}

/// The check-in screen of one event for the active wallet session.
pub struct CheckInScreen {
    event: EventId,
    session: Option<WalletSession>,
    existing: Option<CheckInRecord>,
    steps: CheckInSteps,
    fence: Geofence,
    explorer_base: String,
    location: Arc<dyn LocationProvider>,
    camera: Arc<dyn MediaCapture>,
    orchestrator: RedemptionOrchestrator,
    cancel: CancelHandle,
    token: CancelToken,
}

impl CheckInScreen {
    /// Mount the screen for `event`.
    ///
    /// A cache read failure is logged and treated as "not checked in yet".
    pub fn mount(
        deps: CheckInDeps,
        config: &CheckInConfig,
        event: EventId,
        session: Option<WalletSession>,
    ) -> Self {
        let cancel = CancelHandle::new();
        let token = cancel.token();
        let orchestrator = RedemptionOrchestrator::new(
            deps.relay,
            deps.uploader,
            deps.store,
            config.timing(),
            token.clone(),
        );

        let existing = session.as_ref().and_then(|s| {
            match orchestrator.cache().get_for_wallet(&event, &s.account) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(%event, error = %e, "could not read check-in cache");
                    None
                }
            }
        });

        tracing::info!(
            %event,
            signed_in = session.is_some(),
            already_checked_in = existing.is_some(),
            "check-in screen mounted"
        );

        Self {
            event,
            session,
            existing,
            steps: CheckInSteps::new(),
            fence: config.geofence(),
            explorer_base: config.explorer_url.clone(),
            location: deps.location,
            camera: deps.camera,
            orchestrator,
            cancel,
            token,
        }
    }

    pub fn event(&self) -> &EventId {
        &self.event
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn steps(&self) -> &CheckInSteps {
        &self.steps
    }

    /// The cached record of the active wallet found at mount.
    pub fn existing_record(&self) -> Option<&CheckInRecord> {
        self.existing.as_ref()
    }

    fn require_open(&self) -> Result<&WalletSession, StepError> {
        let session = self.session.as_ref().ok_or(StepError::SignInRequired)?;
        if self.existing.is_some() {
            return Err(StepError::AlreadyCheckedIn(self.event.clone()));
        }
        Ok(session)
    }

    pub fn verify_email(&mut self) -> Result<(), StepError> {
        self.require_open()?;
        self.steps.verify_email()
    }

    pub async fn verify_location(&mut self) -> Result<GeofenceDecision, StepError> {
        self.require_open()?;
        self.steps
            .verify_location(self.location.as_ref(), &self.fence, &self.token)
            .await
    }

    pub async fn take_selfie(&mut self) -> Result<&CapturedImage, StepError> {
        self.require_open()?;
        self.steps
            .take_selfie(self.camera.as_ref(), &self.token)
            .await
    }

    /// Redeem the wallet's ticket. Only accepted once every step is done,
    /// and only until one redemption has succeeded on this screen.
    ///
    /// Redemption failures are reported in the outcome and in [`Self::view`],
    /// not as `Err`.
    pub async fn redeem(&self) -> Result<RedeemOutcome, StepError> {
        let session = self.require_open()?;
        if self.orchestrator.state().await.phase == TransactionPhase::Success {
            return Err(StepError::AlreadyCheckedIn(self.event.clone()));
        }
        if !self.steps.is_ready() {
            return Err(StepError::OutOfOrder {
                expected: CheckInStep::Ready,
                actual: self.steps.current(),
            });
        }
        let request = RedemptionRequest {
            event: &self.event,
            wallet: &session.account,
            selfie: self.steps.selfie(),
        };
        Ok(self.orchestrator.redeem(request).await)
    }

    pub async fn transaction(&self) -> TransactionState {
        self.orchestrator.state().await
    }

    pub async fn view(&self) -> ScreenView {
        if self.session.is_none() {
            return ScreenView::SignInRequired;
        }
        if let Some(record) = &self.existing {
            return ScreenView::AlreadyCheckedIn {
                record: record.clone(),
                explorer_url: record
                    .transaction_hash
                    .map(|hash| explorer_tx_url(&self.explorer_base, &hash)),
            };
        }

        let state = self.orchestrator.state().await;
        match (state.phase, state.transaction_hash) {
            (TransactionPhase::Loading, _) => ScreenView::Submitting,
            (TransactionPhase::Success, Some(hash)) => ScreenView::Succeeded {
                hash,
                explorer_url: explorer_tx_url(&self.explorer_base, &hash),
            },
            (TransactionPhase::Error, hash) => ScreenView::Failed {
                message: state.error_message,
                explorer_url: hash.map(|h| explorer_tx_url(&self.explorer_base, &h)),
            },
            _ => ScreenView::InProgress {
                step: self.steps.current(),
                distance_to_event_m: self.steps.distance_to_event_m(),
            },
        }
    }

    /// Explorer link for the known redemption hash: this attempt's, or the
    /// cached record's.
    pub async fn explorer_url(&self) -> Option<String> {
        if let Some(url) = self.orchestrator.state().await.explorer_url(&self.explorer_base) {
            return Some(url);
        }
        self.existing
            .as_ref()
            .and_then(|r| r.transaction_hash)
            .map(|hash| explorer_tx_url(&self.explorer_base, &hash))
    }

    pub async fn dismiss_error(&self) {
        self.orchestrator.dismiss().await;
    }

    /// Cancel in-flight step and redemption work.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for CheckInScreen {
    fn drop(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(event = %self.event, "check-in screen dropped, cancelling");
            self.cancel.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickity_nullables::{NullCamera, NullLocation, NullRelay, NullStore, NullUploader};
    use tickity_store::CheckInCache;

    fn deps(store: Arc<NullStore>) -> CheckInDeps {
        CheckInDeps {
            relay: Arc::new(NullRelay::new()),
            uploader: Arc::new(NullUploader::returning("https://img.example/1.jpg")),
            store,
            location: Arc::new(NullLocation::at(CheckInConfig::default().event_location)),
            camera: Arc::new(NullCamera::returning("file:///tmp/selfie.jpg")),
        }
    }

    fn event() -> EventId {
        EventId::new("E1").unwrap()
    }

    fn session(addr: &str) -> Option<WalletSession> {
        Some(WalletSession::new(WalletAddress::parse(addr).unwrap()))
    }

    fn seed(store: &Arc<NullStore>, owner: &str, hash: TxHash) {
        CheckInCache::new(store.clone())
            .set(
                &event(),
                &CheckInRecord {
                    wallet_address: WalletAddress::parse(owner).unwrap(),
                    image_url: None,
                    transaction_hash: Some(hash),
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn no_session_requires_sign_in() {
        let store = Arc::new(NullStore::new());
        let mut screen = CheckInScreen::mount(deps(store), &CheckInConfig::default(), event(), None);
        assert_eq!(screen.view().await, ScreenView::SignInRequired);
        assert!(matches!(screen.verify_email(), Err(StepError::SignInRequired)));
        assert!(matches!(screen.redeem().await, Err(StepError::SignInRequired)));
    }

    #[tokio::test]
    async fn cached_record_of_active_wallet_short_circuits() {
        let store = Arc::new(NullStore::new());
        let hash = TxHash::new([9; 32]);
        seed(&store, "0xABC", hash);

        let config = CheckInConfig::default();
        let mut screen =
            CheckInScreen::mount(deps(store), &config, event(), session("0xabc"));

        let ScreenView::AlreadyCheckedIn { record, explorer_url } = screen.view().await else {
            panic!("expected already checked in");
        };
        assert_eq!(record.transaction_hash, Some(hash));
        assert_eq!(
            explorer_url.as_deref(),
            Some(format!("{}/tx/{hash}", config.explorer_url).as_str())
        );
        assert_eq!(screen.explorer_url().await, explorer_url);
        assert!(matches!(
            screen.verify_email(),
            Err(StepError::AlreadyCheckedIn(_))
        ));
    }

    #[tokio::test]
    async fn record_of_other_wallet_is_ignored() {
        let store = Arc::new(NullStore::new());
        seed(&store, "0xABC", TxHash::new([9; 32]));

        let screen = CheckInScreen::mount(
            deps(store),
            &CheckInConfig::default(),
            event(),
            session("0xDEF"),
        );
        assert!(screen.existing_record().is_none());
        assert_eq!(
            screen.view().await,
            ScreenView::InProgress {
                step: CheckInStep::Email,
                distance_to_event_m: None
            }
        );
        assert_eq!(screen.explorer_url().await, None);
    }

    #[tokio::test]
    async fn redeem_before_ready_is_refused() {
        let store = Arc::new(NullStore::new());
        let mut screen = CheckInScreen::mount(
            deps(store),
            &CheckInConfig::default(),
            event(),
            session("0xABC"),
        );
        screen.verify_email().unwrap();
        let err = screen.redeem().await.unwrap_err();
        assert!(matches!(
            err,
            StepError::OutOfOrder {
                expected: CheckInStep::Ready,
                actual: CheckInStep::Location
            }
        ));
    }

    #[tokio::test]
    async fn cancelled_screen_rejects_step_work() {
        let store = Arc::new(NullStore::new());
        let mut screen = CheckInScreen::mount(
            deps(store),
            &CheckInConfig::default(),
            event(),
            session("0xABC"),
        );
        screen.verify_email().unwrap();
        screen.cancel();
        let err = screen.verify_location().await.unwrap_err();
        assert!(matches!(err, StepError::Cancelled(_)));
        assert_eq!(screen.steps().current(), CheckInStep::Location);
    }
}
