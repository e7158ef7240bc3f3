use thiserror::Error;

/// Errors raised while parsing the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid ticket id: {0}")]
    InvalidTicketId(String),

    #[error("event id must not be empty")]
    EmptyEventId,
}
