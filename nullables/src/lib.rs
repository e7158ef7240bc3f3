//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the check-in flow (storage, location,
//! camera, image upload, relay) sits behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return scripted values
//! - Count and record the calls made to them
//! - Never touch the device, filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod location;
pub mod media;
pub mod relay;
pub mod store;

pub use location::NullLocation;
pub use media::{NullCamera, NullUploader};
pub use relay::NullRelay;
pub use store::NullStore;
