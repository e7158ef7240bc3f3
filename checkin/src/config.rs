//! Check-in configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use tickity_geo::{Geofence, DEFAULT_RADIUS_M};
use tickity_types::Coordinates;
use tickity_utils::LogFormat;

use crate::error::ConfigError;
use crate::redemption::RedemptionTiming;

/// Configuration for the check-in flow.
///
/// Can be loaded from a TOML file via [`CheckInConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckInConfig {
    /// Image upload endpoint (multipart `file` field).
    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// JSON-RPC relay that submits calls for the smart wallet.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    /// Block explorer base; transactions live under `<base>/tx/<hash>`.
    #[serde(default = "default_explorer_url")]
    pub explorer_url: String,

    #[serde(default = "default_geofence_radius_m")]
    pub geofence_radius_m: f64,

    /// Reject positions outside the radius. Off by default: the distance is
    /// computed and reported but never blocks the step.
    #[serde(default)]
    pub enforce_geofence: bool,

    /// Wait before scanning `TicketUsed` logs after a lost receipt.
    #[serde(default = "default_delay_ms")]
    pub settle_delay_ms: u64,

    /// How long a redemption error stays visible.
    #[serde(default = "default_delay_ms")]
    pub error_clear_ms: u64,

    /// Data directory for the check-in cache.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Venue position used as the geofence center.
    #[serde(default = "default_event_location")]
    pub event_location: Coordinates,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_upload_url() -> String {
    "http://localhost:8080/upload".to_string()
}

fn default_relay_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_explorer_url() -> String {
    "https://explorer.tickity.local".to_string()
}

fn default_event_location() -> Coordinates {
    Coordinates::new(37.7749, -122.4194)
}

fn default_geofence_radius_m() -> f64 {
    DEFAULT_RADIUS_M
}

fn default_delay_ms() -> u64 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./tickity_data")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl CheckInConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.geofence_radius_m.is_finite() || self.geofence_radius_m < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "geofence_radius_m must be a non-negative number, got {}",
                self.geofence_radius_m
            )));
        }
        for (name, url) in [
            ("upload_url", &self.upload_url),
            ("relay_url", &self.relay_url),
            ("explorer_url", &self.explorer_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn geofence(&self) -> Geofence {
        Geofence::new(self.event_location)
            .with_radius(self.geofence_radius_m)
            .enforcing(self.enforce_geofence)
    }

    pub fn timing(&self) -> RedemptionTiming {
        RedemptionTiming {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            error_clear_delay: Duration::from_millis(self.error_clear_ms),
        }
    }
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
            relay_url: default_relay_url(),
            explorer_url: default_explorer_url(),
            geofence_radius_m: default_geofence_radius_m(),
            enforce_geofence: false,
            settle_delay_ms: default_delay_ms(),
            error_clear_ms: default_delay_ms(),
            data_dir: default_data_dir(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            event_location: default_event_location(),
        }
    }
}
