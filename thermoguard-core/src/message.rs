//! Notification rendering
//!
//! Fixed Italian templates keyed by [`NotificationKind`], interpolating the
//! last reading and a few derived values. Bodies are rendered into a
//! bounded `heapless::String` so the tick path never allocates.

use core::fmt::Write;

use heapless::String;

use crate::constants::{FAULT_ESCALATION_THRESHOLD, MS_PER_HOUR};
use crate::notification::NotificationKind;
use crate::time::Millis;

/// Capacity of a rendered body in bytes
pub const BODY_CAPACITY: usize = 320;

/// Values a template may interpolate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MessageContext {
    /// Most recent successful reading (°C)
    pub last_reading: Option<f32>,
    /// Time since the epoch started
    pub uptime_secs: u64,
    /// Heartbeat spacing, when heartbeats are enabled
    pub heartbeat_interval: Option<Millis>,
}

/// A rendered notification, ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// What triggered the message
    pub kind: NotificationKind,
    /// Mail subject line
    pub subject: &'static str,
    /// Rendered body text
    pub body: String<BODY_CAPACITY>,
}

/// Subject line for each kind
pub const fn subject(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::PreAlarm => "Temperatura sala server - Soglia di attenzione superata",
        NotificationKind::Alarm => "Temperatura sala server - ALLARME",
        NotificationKind::AlarmReset => "Temperatura sala server - Allarme rientrato",
        NotificationKind::SensorFailure => "Server Temp Monitor - SENSORE GUASTO",
        NotificationKind::Heartbeat => "Temperatura sala server - I'm alive!",
    }
}

struct Reading(Option<f32>);

impl core::fmt::Display for Reading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(celsius) => write!(f, "{:.2}", celsius),
            None => f.write_str("n/d"),
        }
    }
}

/// Render the message for `kind`
///
/// Fails only if the body outgrows [`BODY_CAPACITY`].
pub fn render(kind: NotificationKind, ctx: &MessageContext) -> Result<Message, core::fmt::Error> {
    let mut body = String::new();
    let reading = Reading(ctx.last_reading);

    match kind {
        NotificationKind::PreAlarm | NotificationKind::Alarm => {
            write!(body, "La temperatura ha superato i {} °C.", reading)?;
        }
        NotificationKind::AlarmReset => {
            write!(
                body,
                "La temperatura è tornata sotto la soglia di attenzione. \
                 L'ultima misurazione è stata di {} °C.",
                reading
            )?;
        }
        NotificationKind::SensorFailure => {
            write!(
                body,
                "Le ultime {} letture della temperatura non hanno avuto successo. \n\
                 La temperatura della sala server non è sotto controllo. \n\n\
                 Controllare il sensore.",
                FAULT_ESCALATION_THRESHOLD
            )?;
        }
        NotificationKind::Heartbeat => {
            write!(
                body,
                "Sono vivo e sto controllando la sala server. \
                 L'ultima misurazione è stata di {} °C.\nSono acceso da {} secondi.",
                reading, ctx.uptime_secs
            )?;
            if let Some(interval) = ctx.heartbeat_interval {
                write!(
                    body,
                    " La prossima email di questo tipo sarà inviata tra {} ore",
                    interval / MS_PER_HOUR
                )?;
            }
        }
    }

    Ok(Message {
        kind,
        subject: subject(kind),
        body,
    })
}
