use thiserror::Error;

/// Message the relay returns when an operation landed but its receipt could
/// not be fetched.
pub const RECEIPT_UNAVAILABLE_MARKER: &str = "Failed to get user operation receipt";

const USER_REJECTED_MARKERS: [&str; 2] = ["user rejected", "user denied"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The operation was executed but no receipt came back.
    #[error("receipt unavailable: {0}")]
    ReceiptUnavailable(String),

    #[error("rejected by user: {0}")]
    UserRejected(String),

    #[error("relay network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Map raw relay error text to a typed variant.
    ///
    /// This is the only place error text is inspected; callers match on the
    /// variant.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        if lower.contains(&RECEIPT_UNAVAILABLE_MARKER.to_ascii_lowercase()) {
            RelayError::ReceiptUnavailable(message)
        } else if USER_REJECTED_MARKERS.iter().any(|m| lower.contains(m)) {
            RelayError::UserRejected(message)
        } else {
            RelayError::Other(message)
        }
    }

    pub fn is_receipt_unavailable(&self) -> bool {
        matches!(self, RelayError::ReceiptUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_marker_is_classified() {
        let err = RelayError::classify(
            "UserOperationExecutionError: Failed to get user operation receipt for 0xdead",
        );
        assert!(err.is_receipt_unavailable());
    }

    #[test]
    fn user_rejection_is_classified() {
        assert!(matches!(
            RelayError::classify("User rejected the request."),
            RelayError::UserRejected(_)
        ));
    }

    #[test]
    fn everything_else_is_other() {
        let err = RelayError::classify("execution reverted: ticket already used");
        assert_eq!(
            err,
            RelayError::Other("execution reverted: ticket already used".into())
        );
        assert_eq!(err.to_string(), "execution reverted: ticket already used");
    }
}
