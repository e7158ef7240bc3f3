//! Account-abstraction relay interface for ticket redemption.
//!
//! The relay submits contract calls on behalf of the user's smart wallet,
//! awaits their confirmation, and answers historical event-log queries. It is
//! an opaque collaborator; this crate pins down the three operations check-in
//! needs ([`TicketRelay`]) and the typed failures they can produce
//! ([`RelayError`]).

pub mod client;
pub mod error;
pub mod types;

pub use client::RelayClient;
pub use error::RelayError;
pub use types::{BlockTag, LogQuery, TicketUsedLog, UseTicketCall, TICKET_USED_EVENT};

use async_trait::async_trait;
use tickity_types::{EventId, TicketId, TxHash, WalletAddress};

/// Operations the check-in flow needs from the relay.
#[async_trait]
pub trait TicketRelay: Send + Sync {
    /// Ticket ids held by `owner` for `event`, in the order the contract reports them.
    async fn tickets_of(
        &self,
        event: &EventId,
        owner: &WalletAddress,
    ) -> Result<Vec<TicketId>, RelayError>;

    /// Submit the "use ticket" call and wait for its receipt.
    async fn use_ticket(&self, call: &UseTicketCall) -> Result<TxHash, RelayError>;

    /// Historical `TicketUsed` logs matching `query`, in chain order.
    async fn ticket_used_logs(&self, query: &LogQuery) -> Result<Vec<TicketUsedLog>, RelayError>;
}
