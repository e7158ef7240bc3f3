//! LMDB key-value backend for the Tickity check-in cache.
//!
//! Implements [`tickity_store::KeyValueStore`] using the `heed` LMDB bindings.
//! All items live in a single named database within one environment, so
//! check-in records survive process restarts.

pub mod environment;
pub mod error;

pub use environment::LmdbStore;
pub use error::LmdbError;
