//! Request and response shapes exchanged with the relay.

use serde::{Deserialize, Serialize};
use tickity_types::{EventId, TicketId, TxHash, WalletAddress};

/// Name of the contract event emitted when a ticket is redeemed.
pub const TICKET_USED_EVENT: &str = "TicketUsed";

/// The "use ticket" contract call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseTicketCall {
    pub event: EventId,
    pub ticket: TicketId,
    pub owner: WalletAddress,
    /// Persisted check-in photo, uploaded before the call is built.
    pub image_url: Option<String>,
}

/// A block bound for log queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Number(u64),
    Latest,
}

/// A historical event-log query against an event contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogQuery {
    pub event: EventId,
    pub event_name: String,
    pub from_block: BlockTag,
    pub to_block: BlockTag,
}

impl LogQuery {
    /// `TicketUsed` logs over the whole chain history.
    pub fn ticket_used_full_range(event: EventId) -> Self {
        Self {
            event,
            event_name: TICKET_USED_EVENT.to_string(),
            from_block: BlockTag::Number(0),
            to_block: BlockTag::Latest,
        }
    }
}

/// One `TicketUsed` log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUsedLog {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    #[serde(default)]
    pub ticket: Option<TicketId>,
    #[serde(default)]
    pub owner: Option<WalletAddress>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_range_query_spans_genesis_to_latest() {
        let q = LogQuery::ticket_used_full_range(EventId::new("E1").unwrap());
        assert_eq!(q.event_name, "TicketUsed");
        assert_eq!(q.from_block, BlockTag::Number(0));
        assert_eq!(q.to_block, BlockTag::Latest);
    }

    #[test]
    fn log_deserializes_without_optional_fields() {
        let hash = TxHash::new([5; 32]);
        let json = format!(r#"{{"transaction_hash":"{hash}","block_number":42}}"#);
        let log: TicketUsedLog = serde_json::from_str(&json).unwrap();
        assert_eq!(log.transaction_hash, hash);
        assert_eq!(log.block_number, 42);
        assert_eq!(log.ticket, None);
    }
}
