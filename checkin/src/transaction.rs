//! UI-facing redemption state.

use serde::Serialize;
use tickity_types::TxHash;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State of the redemption attempt shown to the user.
///
/// `attempt` increases with every accepted submission so that a delayed
/// auto-clear only touches the error it was scheduled for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TransactionState {
    pub phase: TransactionPhase,
    pub error_message: String,
    pub transaction_hash: Option<TxHash>,
    pub image_url: Option<String>,
    pub attempt: u64,
}

impl TransactionState {
    pub fn is_loading(&self) -> bool {
        self.phase == TransactionPhase::Loading
    }

    /// Enter `Loading` for a new attempt, or `None` if one is already in flight.
    pub fn begin(&mut self) -> Option<u64> {
        if self.is_loading() {
            return None;
        }
        self.phase = TransactionPhase::Loading;
        self.error_message.clear();
        self.transaction_hash = None;
        self.image_url = None;
        self.attempt += 1;
        Some(self.attempt)
    }

    pub fn succeed(&mut self, hash: TxHash, image_url: Option<String>) {
        self.phase = TransactionPhase::Success;
        self.error_message.clear();
        self.transaction_hash = Some(hash);
        self.image_url = image_url;
    }

    /// Enter `Error`. A hash learned before the failure is kept for the
    /// explorer link.
    pub fn fail(&mut self, message: impl Into<String>, known_hash: Option<TxHash>) {
        self.phase = TransactionPhase::Error;
        self.error_message = message.into();
        if known_hash.is_some() {
            self.transaction_hash = known_hash;
        }
    }

    /// Return to `Idle` and clear the error message.
    pub fn reset(&mut self) {
        self.phase = TransactionPhase::Idle;
        self.error_message.clear();
    }

    /// Clear the error of `attempt`, leaving newer attempts alone.
    pub fn clear_error(&mut self, attempt: u64) -> bool {
        if self.phase == TransactionPhase::Error && self.attempt == attempt {
            self.reset();
            return true;
        }
        false
    }

    /// Block explorer link for the known transaction, in any phase.
    pub fn explorer_url(&self, explorer_base: &str) -> Option<String> {
        self.transaction_hash
            .map(|hash| explorer_tx_url(explorer_base, &hash))
    }
}

/// `<base>/tx/<hash>`.
pub fn explorer_tx_url(explorer_base: &str, hash: &TxHash) -> String {
    format!("{}/tx/{}", explorer_base.trim_end_matches('/'), hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_blocks_while_loading() {
        let mut state = TransactionState::default();
        assert_eq!(state.begin(), Some(1));
        assert_eq!(state.begin(), None);
        assert_eq!(state.attempt, 1);
    }

    #[test]
    fn begin_clears_previous_outcome() {
        let mut state = TransactionState::default();
        state.begin();
        state.fail("boom", Some(TxHash::new([1; 32])));
        assert_eq!(state.begin(), Some(2));
        assert!(state.error_message.is_empty());
        assert_eq!(state.transaction_hash, None);
    }

    #[test]
    fn clear_error_ignores_stale_attempts() {
        let mut state = TransactionState::default();
        state.begin();
        state.fail("first", None);
        state.begin();
        state.fail("second", None);
        assert!(!state.clear_error(1));
        assert_eq!(state.phase, TransactionPhase::Error);
        assert!(state.clear_error(2));
        assert_eq!(state.phase, TransactionPhase::Idle);
        assert!(state.error_message.is_empty());
    }

    #[test]
    fn explorer_link_available_on_error_with_known_hash() {
        let mut state = TransactionState::default();
        state.begin();
        assert_eq!(state.explorer_url("https://scan.example"), None);
        let hash = TxHash::new([0xaa; 32]);
        state.fail("saving failed", Some(hash));
        assert_eq!(
            state.explorer_url("https://scan.example/").unwrap(),
            format!("https://scan.example/tx/{hash}")
        );
    }
}
