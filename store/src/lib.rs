//! Key-value storage trait and the per-event check-in cache.
//!
//! Every storage backend (LMDB on device, in-memory for testing) implements
//! [`KeyValueStore`]. The rest of the workspace depends only on the trait.

pub mod checkin;
pub mod error;
pub mod kv;

pub use checkin::{CheckInCache, KEY_PREFIX};
pub use error::StoreError;
pub use kv::KeyValueStore;
