//! The persisted per-event check-in record.

use serde::{Deserialize, Serialize};

use crate::{TxHash, WalletAddress};

/// Proof that a wallet redeemed its ticket for an event.
///
/// Serialized as camelCase JSON (`walletAddress`, `imageUrl`, `transactionHash`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    /// Owner at the time of check-in.
    pub wallet_address: WalletAddress,
    /// Remote URL of the uploaded check-in photo.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Hash of the redemption transaction.
    #[serde(default)]
    pub transaction_hash: Option<TxHash>,
}

impl CheckInRecord {
    /// Whether this record belongs to the currently active wallet.
    pub fn is_owned_by(&self, active: &WalletAddress) -> bool {
        self.wallet_address.same_account(active)
    }
}
