//! Nullable location: scripted permission and GPS fixes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tickity_geo::{Accuracy, LocationError, LocationProvider};
use tickity_types::Coordinates;

/// A location provider that answers with a fixed position.
pub struct NullLocation {
    granted: AtomicBool,
    position: Mutex<Result<Coordinates, LocationError>>,
    last_accuracy: Mutex<Option<Accuracy>>,
    reads: AtomicUsize,
}

impl NullLocation {
    /// Permission granted, device at `position`.
    pub fn at(position: Coordinates) -> Self {
        Self {
            granted: AtomicBool::new(true),
            position: Mutex::new(Ok(position)),
            last_accuracy: Mutex::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    /// Permission denied.
    pub fn denied() -> Self {
        let null = Self::at(Coordinates::new(0.0, 0.0));
        null.granted.store(false, Ordering::SeqCst);
        null
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn set_position(&self, position: Result<Coordinates, LocationError>) {
        *self.position.lock().unwrap() = position;
    }

    /// Number of position reads performed.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn last_accuracy(&self) -> Option<Accuracy> {
        *self.last_accuracy.lock().unwrap()
    }
}

#[async_trait]
impl LocationProvider for NullLocation {
    async fn request_permission(&self) -> Result<bool, LocationError> {
        Ok(self.granted.load(Ordering::SeqCst))
    }

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, LocationError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        *self.last_accuracy.lock().unwrap() = Some(accuracy);
        self.position.lock().unwrap().clone()
    }
}
