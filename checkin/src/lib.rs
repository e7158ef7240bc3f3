//! Event check-in workflow.
//!
//! A check-in walks through four steps (email, location, selfie, ready) and
//! ends with an on-chain ticket redemption:
//! - [`steps`]: the forward-only step machine, gated by the geofence and camera
//! - [`redemption`]: upload, "use ticket" submission, and the event-log
//!   fallback when the relay loses the receipt
//! - [`transaction`]: the UI-facing redemption state with error auto-clear
//! - [`session`]: the screen that ties a wallet session, the cache and the
//!   steps together
//! - [`cancel`]: explicit cancellation threaded through every suspension point

pub mod cancel;
pub mod config;
pub mod error;
pub mod redemption;
pub mod session;
pub mod steps;
pub mod transaction;

pub use cancel::{CancelHandle, CancelToken, Cancelled};
pub use config::CheckInConfig;
pub use error::{ConfigError, RedemptionError, StepError};
pub use redemption::{
    ConfirmationPath, RedeemOutcome, RedemptionOrchestrator, RedemptionRequest, RedemptionTiming,
};
pub use session::{CheckInDeps, CheckInScreen, ScreenView, WalletSession};
pub use steps::{CheckInStep, CheckInSteps};
pub use transaction::{TransactionPhase, TransactionState};
