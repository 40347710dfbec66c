//! Mail relay over HTTP
//!
//! Posts each addressed [`Envelope`] as JSON to a relay endpoint that owns
//! the actual SMTP session. One attempt per message: the monitor never
//! retries a notification, so neither does the transport.
//!
//! ```rust,no_run
//! use thermoguard_connectors::http::{RelayConfig, RelayTransport};
//! use thermoguard_connectors::mail::MailSettings;
//!
//! let config = RelayConfig::new("https://relay.example.com/v1/send")
//!     .basic_auth("node-7", "secret")
//!     .timeout_secs(10);
//! let mail = MailSettings::new("node-7@example.com", ["ops@example.com"]);
//! let transport = RelayTransport::new(config, mail)?;
//! # Ok::<(), thermoguard_connectors::http::HttpError>(())
//! ```

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thermoguard_core::errors::SendError;
use thermoguard_core::message::Message;
use thermoguard_core::traits::Transport;
use thiserror::Error;

use crate::mail::{Envelope, MailSettings};
use crate::ConnectionStats;

/// Relay setup errors
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Credentials stay out of logs
        match self {
            AuthMethod::None => f.write_str("None"),
            AuthMethod::Bearer(_) => f.write_str("Bearer(***)"),
            AuthMethod::Basic { username, .. } => write!(f, "Basic({username}:***)"),
        }
    }
}

/// Relay endpoint configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub auth: AuthMethod,
    pub user_agent: String,
}

impl RelayConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(30),
            auth: AuthMethod::None,
            user_agent: format!("ThermoGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// `Authorization` header value, if any
    pub fn authorization(&self) -> Option<String> {
        match &self.auth {
            AuthMethod::None => None,
            AuthMethod::Bearer(token) => Some(format!("Bearer {}", token)),
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", credentials))
            }
        }
    }
}

/// [`Transport`] that hands envelopes to an HTTP mail relay
pub struct RelayTransport {
    config: RelayConfig,
    mail: MailSettings,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl RelayTransport {
    pub fn new(config: RelayConfig, mail: MailSettings) -> Result<Self, HttpError> {
        if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
            return Err(HttpError::Config("Endpoint must start with http:// or https://".into()));
        }
        if mail.recipients.is_empty() {
            return Err(HttpError::Config("At least one recipient is required".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            mail,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    fn payload(&self, message: &Message) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope::address(&self.mail, message))
    }
}

impl Transport for RelayTransport {
    fn send(&mut self, message: &Message) -> Result<(), SendError> {
        let json = match self.payload(message) {
            Ok(json) => json,
            Err(err) => {
                self.stats.record_failed(&err);
                return Err(SendError::Rejected { reason: "envelope not serialisable" });
            }
        };

        let mut request = self
            .agent
            .post(&self.config.endpoint)
            .set("Content-Type", "application/json");
        if let Some(value) = self.config.authorization() {
            request = request.set("Authorization", &value);
        }

        match request.send_string(&json) {
            Ok(_) => {
                self.stats.record_sent(json.len());
                Ok(())
            }
            Err(ureq::Error::Status(code, _)) => {
                log::warn!("Relay answered {} for {}", code, message.kind);
                self.stats.record_failed(format!("status {}", code));
                if code >= 500 {
                    Err(SendError::Transport { reason: "relay server error" })
                } else {
                    Err(SendError::Rejected { reason: "relay refused message" })
                }
            }
            Err(ureq::Error::Transport(err)) => {
                log::warn!("Relay unreachable: {}", err);
                self.stats.record_failed(&err);
                Err(SendError::Transport { reason: "relay unreachable" })
            }
        }
    }
}
