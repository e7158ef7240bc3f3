//! Fundamental types for Tickity check-in.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! wallet addresses, transaction hashes, event and ticket identifiers, coordinates,
//! and the persisted check-in record.

pub mod address;
pub mod error;
pub mod event;
pub mod geo;
pub mod hash;
pub mod record;

pub use address::WalletAddress;
pub use error::TypeError;
pub use event::{EventId, TicketId};
pub use geo::Coordinates;
pub use hash::TxHash;
pub use record::CheckInRecord;
