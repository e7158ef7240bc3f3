//! JSON-RPC client for the relay.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tickity_types::{EventId, TicketId, TxHash, WalletAddress};

use crate::types::{LogQuery, TicketUsedLog, UseTicketCall};
use crate::{RelayError, TicketRelay};

/// HTTP client for the relay's JSON-RPC endpoint.
///
/// Requests are `{"action": <name>, ...params}`; responses carry either a
/// `result` or an `error` string. Error strings are classified into
/// [`RelayError`] variants here so nothing downstream inspects text.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    relay_url: String,
}

#[derive(Debug, Deserialize)]
struct TicketsOfResult {
    #[serde(default)]
    tickets: Vec<TicketId>,
}

#[derive(Debug, Deserialize)]
struct UseTicketResult {
    transaction_hash: TxHash,
}

#[derive(Debug, Deserialize)]
struct LogsResult {
    #[serde(default)]
    logs: Vec<TicketUsedLog>,
}

impl RelayClient {
    /// Create a client targeting the given relay URL.
    ///
    /// The request timeout is generous: `use_ticket` blocks until the relay
    /// has a receipt or gives up on one.
    pub fn new(relay_url: impl Into<String>) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RelayError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            relay_url: relay_url.into(),
        })
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RelayError> {
        let mut body = params;
        body.as_object_mut()
            .ok_or_else(|| RelayError::Other("params must be a JSON object".into()))?
            .insert("action".to_string(), serde_json::json!(action));

        tracing::debug!(action, url = %self.relay_url, "relay call");

        let response = self
            .http
            .post(&self.relay_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::Network(format!("failed to read response: {e}")))?;

        parse_response(status, &body)
    }
}

/// Decode a relay response.
///
/// Error envelopes are honoured whatever the HTTP status, so a lost receipt
/// reported with a 5xx still classifies as [`RelayError::ReceiptUnavailable`].
fn parse_response(status: StatusCode, body: &str) -> Result<serde_json::Value, RelayError> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) if status.is_success() => parse_envelope(json),
        Ok(json) => match json.get("error").and_then(|e| e.as_str()) {
            Some(err) => Err(RelayError::classify(err)),
            None => Err(RelayError::Network(format!("relay returned HTTP {status}"))),
        },
        Err(e) if status.is_success() => {
            Err(RelayError::Other(format!("invalid JSON response: {e}")))
        }
        Err(_) => Err(RelayError::Network(format!("relay returned HTTP {status}"))),
    }
}

/// Split a response envelope into its `result` or a classified error.
fn parse_envelope(json: serde_json::Value) -> Result<serde_json::Value, RelayError> {
    if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
        return Err(RelayError::classify(err));
    }
    Ok(json.get("result").cloned().unwrap_or(json))
}

fn decode<T: serde::de::DeserializeOwned>(
    action: &str,
    value: serde_json::Value,
) -> Result<T, RelayError> {
    serde_json::from_value(value)
        .map_err(|e| RelayError::Other(format!("invalid {action} response: {e}")))
}

#[async_trait]
impl TicketRelay for RelayClient {
    async fn tickets_of(
        &self,
        event: &EventId,
        owner: &WalletAddress,
    ) -> Result<Vec<TicketId>, RelayError> {
        let result = self
            .rpc_call(
                "tickets_of",
                serde_json::json!({ "event": event, "owner": owner }),
            )
            .await?;
        let resp: TicketsOfResult = decode("tickets_of", result)?;
        Ok(resp.tickets)
    }

    async fn use_ticket(&self, call: &UseTicketCall) -> Result<TxHash, RelayError> {
        let params = serde_json::to_value(call)
            .map_err(|e| RelayError::Other(format!("failed to encode call: {e}")))?;
        let result = self.rpc_call("use_ticket", params).await?;
        let resp: UseTicketResult = decode("use_ticket", result)?;
        Ok(resp.transaction_hash)
    }

    async fn ticket_used_logs(&self, query: &LogQuery) -> Result<Vec<TicketUsedLog>, RelayError> {
        let params = serde_json::to_value(query)
            .map_err(|e| RelayError::Other(format!("failed to encode query: {e}")))?;
        let result = self.rpc_call("get_logs", params).await?;
        let resp: LogsResult = decode("get_logs", result)?;
        Ok(resp.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_result_is_extracted() {
        let value = parse_envelope(json!({ "result": { "tickets": [3, 7] } })).unwrap();
        let resp: TicketsOfResult = decode("tickets_of", value).unwrap();
        assert_eq!(resp.tickets, vec![TicketId(3), TicketId(7)]);
    }

    #[test]
    fn envelope_error_is_classified() {
        let err = parse_envelope(json!({
            "error": "Failed to get user operation receipt: timed out"
        }))
        .unwrap_err();
        assert!(err.is_receipt_unavailable());
    }

    #[test]
    fn error_envelope_on_server_error_is_still_classified() {
        let err = parse_response(
            StatusCode::BAD_GATEWAY,
            r#"{"error":"Failed to get user operation receipt"}"#,
        )
        .unwrap_err();
        assert!(err.is_receipt_unavailable());

        let err = parse_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"execution reverted"}"#,
        )
        .unwrap_err();
        assert_eq!(err, RelayError::Other("execution reverted".into()));
    }

    #[test]
    fn non_json_server_error_is_network() {
        let err = parse_response(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>").unwrap_err();
        assert!(matches!(err, RelayError::Network(msg) if msg.contains("503")));

        let err = parse_response(StatusCode::BAD_GATEWAY, r#"{"detail":"upstream"}"#).unwrap_err();
        assert!(matches!(err, RelayError::Network(_)));
    }

    #[test]
    fn garbage_success_body_is_other() {
        let err = parse_response(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, RelayError::Other(msg) if msg.starts_with("invalid JSON")));
    }

    #[test]
    fn success_body_goes_through_envelope() {
        let value = parse_response(StatusCode::OK, r#"{"result":{"tickets":[1]}}"#).unwrap();
        let resp: TicketsOfResult = decode("tickets_of", value).unwrap();
        assert_eq!(resp.tickets, vec![TicketId(1)]);
    }

    #[test]
    fn use_ticket_result_decodes_hash() {
        let hash = TxHash::new([0x11; 32]);
        let value = parse_envelope(json!({ "result": { "transaction_hash": hash.to_string() } }))
            .unwrap();
        let resp: UseTicketResult = decode("use_ticket", value).unwrap();
        assert_eq!(resp.transaction_hash, hash);
    }

    #[test]
    fn malformed_result_is_other() {
        let err = decode::<UseTicketResult>("use_ticket", json!({ "hash": 1 })).unwrap_err();
        assert!(matches!(err, RelayError::Other(_)));
    }

    #[tokio::test]
    async fn unreachable_relay_is_network_error() {
        let client = RelayClient::new("http://127.0.0.1:9/rpc").unwrap();
        let err = client
            .tickets_of(
                &EventId::new("E1").unwrap(),
                &WalletAddress::parse("0xABC").unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Network(_)));
    }
}
