//! Per-event check-in cache over a [`KeyValueStore`].

use tickity_types::{CheckInRecord, EventId, WalletAddress};

use crate::{KeyValueStore, StoreError};

/// Namespace prepended to event ids to form storage keys.
pub const KEY_PREFIX: &str = "checkin:";

/// Stores one [`CheckInRecord`] per event as JSON.
pub struct CheckInCache<S> {
    store: S,
}

impl<S: KeyValueStore> CheckInCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn key(event: &EventId) -> String {
        format!("{KEY_PREFIX}{event}")
    }

    /// Read the record for an event, whoever owns it.
    pub fn get(&self, event: &EventId) -> Result<Option<CheckInRecord>, StoreError> {
        let Some(raw) = self.store.get_item(&Self::key(event))? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("check-in record for {event}: {e}")))
    }

    /// Read the record for an event if it belongs to `active`.
    ///
    /// A record written by a different wallet is treated as absent.
    pub fn get_for_wallet(
        &self,
        event: &EventId,
        active: &WalletAddress,
    ) -> Result<Option<CheckInRecord>, StoreError> {
        match self.get(event)? {
            Some(record) if record.is_owned_by(active) => Ok(Some(record)),
            Some(record) => {
                tracing::debug!(
                    %event,
                    owner = %record.wallet_address,
                    active = %active,
                    "ignoring check-in record owned by another wallet"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Overwrite the record for an event.
    pub fn set(&self, event: &EventId, record: &CheckInRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set_item(&Self::key(event), &json)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
