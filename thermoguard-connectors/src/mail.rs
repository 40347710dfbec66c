//! Mail outbox transport
//!
//! Addresses each rendered notification from the configured sender to every
//! recipient and keeps the resulting [`Envelope`]s. The SMTP session itself
//! is out of scope; an outbox is what a relay or a test drains.
//!
//! The outbox holds at most `capacity` envelopes. Once full, the oldest is
//! dropped for each new one, so an undrained outbox stays bounded over
//! indefinite uptime.

use serde::{Deserialize, Serialize};
use thermoguard_core::errors::SendError;
use thermoguard_core::message::Message;
use thermoguard_core::notification::NotificationKind;
use thermoguard_core::traits::Transport;

use crate::config_store::EmailSection;
use crate::ConnectionStats;

/// Author used when the settings file has none
pub const DEFAULT_AUTHOR: &str = "Server temp monitor";

/// Envelopes kept by [`Outbox::new`] before the oldest are dropped
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Sender and recipients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    pub sender: String,
    pub author: String,
    pub recipients: Vec<String>,
}

impl MailSettings {
    pub fn new<I, R>(sender: impl Into<String>, recipients: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            sender: sender.into(),
            author: DEFAULT_AUTHOR.to_owned(),
            recipients: recipients.into_iter().map(Into::into).collect(),
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// `"email"` section of the device settings; blank recipients are skipped
    pub fn from_section(section: &EmailSection) -> Self {
        let sender = section.sender_address.clone().unwrap_or_default();
        let recipients = section
            .recipient_1
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_owned);

        let mut settings = Self::new(sender, recipients);
        if let Some(author) = section.author_name.as_deref().filter(|a| !a.is_empty()) {
            settings.author = author.to_owned();
        }
        settings
    }
}

/// One addressed notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Envelope {
    pub fn address(settings: &MailSettings, message: &Message) -> Self {
        Self {
            kind: message.kind.name().to_owned(),
            from: format!("{} <{}>", settings.author, settings.sender),
            to: settings.recipients.clone(),
            subject: message.subject.to_owned(),
            body: message.body.as_str().to_owned(),
        }
    }

    pub fn is(&self, kind: NotificationKind) -> bool {
        self.kind == kind.name()
    }
}

/// Transport that records addressed envelopes
#[derive(Debug, Clone)]
pub struct Outbox {
    settings: MailSettings,
    envelopes: Vec<Envelope>,
    capacity: usize,
    dropped: u64,
    stats: ConnectionStats,
    online: bool,
}

impl Outbox {
    pub fn new(settings: MailSettings) -> Self {
        Self::with_capacity(settings, DEFAULT_OUTBOX_CAPACITY)
    }

    /// Keep at most `capacity` envelopes (at least one)
    pub fn with_capacity(settings: MailSettings, capacity: usize) -> Self {
        Self {
            settings,
            envelopes: Vec::new(),
            capacity: capacity.max(1),
            dropped: 0,
            stats: ConnectionStats::default(),
            online: true,
        }
    }

    pub fn settings(&self) -> &MailSettings {
        &self.settings
    }

    /// Envelopes still held, oldest first
    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    /// Envelopes discarded because the outbox was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Remove and return everything sent so far
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.envelopes)
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.envelopes.iter().filter(|e| e.is(kind)).count()
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Simulate the mail server going away
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }
}

impl Transport for Outbox {
    fn send(&mut self, message: &Message) -> Result<(), SendError> {
        if self.settings.recipients.is_empty() {
            let err = SendError::Rejected { reason: "no recipients configured" };
            self.stats.record_failed(err);
            return Err(err);
        }
        if !self.online {
            let err = SendError::NotConnected;
            self.stats.record_failed(err);
            return Err(err);
        }

        let envelope = Envelope::address(&self.settings, message);
        log::info!(
            "Mail {} to {}: {}",
            envelope.kind,
            envelope.to.join(", "),
            envelope.subject
        );
        self.stats.record_sent(envelope.body.len());
        if self.envelopes.len() >= self.capacity {
            let excess = self.envelopes.len() + 1 - self.capacity;
            self.envelopes.drain(..excess);
            self.dropped += excess as u64;
            log::debug!("Outbox full, dropped {} oldest envelope(s)", excess);
        }
        self.envelopes.push(envelope);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermoguard_core::message::{render, MessageContext};

    fn alarm() -> Message {
        let ctx = MessageContext { last_reading: Some(36.25), ..Default::default() };
        render(NotificationKind::Alarm, &ctx).unwrap()
    }

    #[test]
    fn addresses_every_recipient() {
        let settings = MailSettings::new("node@example.com", ["a@example.com", "b@example.com"])
            .author("Sala server");
        let mut outbox = Outbox::new(settings);

        outbox.send(&alarm()).unwrap();

        let envelope = &outbox.envelopes()[0];
        assert_eq!(envelope.from, "Sala server <node@example.com>");
        assert_eq!(envelope.to.len(), 2);
        assert_eq!(envelope.subject, "Temperatura sala server - ALLARME");
        assert!(envelope.body.contains("36.25"));
        assert!(envelope.is(NotificationKind::Alarm));
        assert_eq!(outbox.stats().messages_sent, 1);
    }

    #[test]
    fn offline_outbox_reports_failure() {
        let mut outbox = Outbox::new(MailSettings::new("node@example.com", ["ops@example.com"]));
        outbox.set_online(false);

        assert_eq!(outbox.send(&alarm()), Err(SendError::NotConnected));
        assert!(outbox.envelopes().is_empty());
        assert_eq!(outbox.stats().messages_failed, 1);
        assert!(outbox.stats().last_error.is_some());
    }

    #[test]
    fn blank_recipient_from_settings_is_skipped() {
        let section = EmailSection {
            sender_address: Some("node@example.com".into()),
            recipient_1: Some("   ".into()),
            ..Default::default()
        };
        let settings = MailSettings::from_section(&section);
        assert!(settings.recipients.is_empty());
        assert_eq!(settings.author, DEFAULT_AUTHOR);

        let mut outbox = Outbox::new(settings);
        assert!(matches!(outbox.send(&alarm()), Err(SendError::Rejected { .. })));
    }

    #[test]
    fn full_outbox_drops_oldest() {
        let mut outbox =
            Outbox::with_capacity(MailSettings::new("node@example.com", ["ops@example.com"]), 2);
        let reset = render(NotificationKind::AlarmReset, &MessageContext::default()).unwrap();

        outbox.send(&alarm()).unwrap();
        outbox.send(&alarm()).unwrap();
        outbox.send(&reset).unwrap();

        assert_eq!(outbox.envelopes().len(), 2);
        assert!(outbox.envelopes()[0].is(NotificationKind::Alarm));
        assert!(outbox.envelopes()[1].is(NotificationKind::AlarmReset));
        assert_eq!(outbox.dropped(), 1);
        assert_eq!(outbox.stats().messages_sent, 3);
    }

    #[test]
    fn drain_empties_outbox() {
        let mut outbox = Outbox::new(MailSettings::new("node@example.com", ["ops@example.com"]));
        outbox.send(&alarm()).unwrap();
        assert_eq!(outbox.drain().len(), 1);
        assert_eq!(outbox.count(NotificationKind::Alarm), 0);
    }
}
