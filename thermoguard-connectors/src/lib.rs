//! Host-side collaborators for ThermoGuard
//!
//! ## Overview
//!
//! `thermoguard-core` decides; this crate supplies what the core talks to
//! when it runs on a Linux box or in a simulation:
//!
//! | module | provides |
//! |---|---|
//! | [`config_store`] | settings file of the reference device, read with `serde_json` |
//! | [`mail`] | outbox transport that addresses and records every notification |
//! | [`sim`] | scripted sensor, link and push button |
//! | [`supervisor`] | epoch loop: load settings, connect, tick, restart |
//! | `http` | mail relay transport over HTTP (feature `http`) |
//!
//! ## Epochs
//!
//! The supervisor never repairs a running monitor. When the core reports
//! `Restart`, the epoch is dropped and a new one starts from a fresh
//! settings load, the same way the reference node reboots itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use thermoguard_connectors::{
//!     config_store::JsonSettingsFile,
//!     mail::{MailSettings, Outbox},
//!     sim::{ScriptedButton, ScriptedSensor, SimLink},
//!     supervisor::{NoSession, Supervisor, SupervisorOptions},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = JsonSettingsFile::new("/etc/thermoguard/settings.json");
//! let outbox = Outbox::new(MailSettings::new("monitor@example.com", ["ops@example.com"]));
//!
//! let mut supervisor = Supervisor::new(
//!     settings,
//!     ScriptedSensor::constant(24.5),
//!     SimLink::stable(),
//!     outbox,
//!     ScriptedButton::released(),
//!     NoSession,
//!     SupervisorOptions::default().max_epochs(1),
//! );
//! supervisor.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config_store;
pub mod mail;
pub mod sim;
pub mod supervisor;

#[cfg(feature = "http")]
pub mod http;

pub use config_store::{JsonConfigStore, JsonSettingsFile, SettingsSource, StoredSettings};
pub use mail::{Envelope, MailSettings, Outbox};
pub use supervisor::{ConfigSession, EpochSummary, Supervisor, SupervisorOptions};

use thermoguard_core::errors::ConfigError;
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("Configuration session failed: {0}")]
    Session(String),
}

/// Delivery counters kept by the transports
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// Messages accepted by the transport
    pub messages_sent: u64,
    /// Messages the transport refused or could not deliver
    pub messages_failed: u64,
    /// Body bytes handed over successfully
    pub bytes_sent: u64,
    /// Last failure, if any
    pub last_error: Option<String>,
}

impl ConnectionStats {
    pub(crate) fn record_sent(&mut self, bytes: usize) {
        self.messages_sent += 1;
        self.bytes_sent += bytes as u64;
    }

    pub(crate) fn record_failed(&mut self, error: impl ToString) {
        self.messages_failed += 1;
        self.last_error = Some(error.to_string());
    }
}
