//! Network-facing collaborators

use crate::errors::SendError;
use crate::message::Message;

/// Network association (WiFi, Ethernet)
pub trait Connectivity {
    /// Start association; returns whether the link came up
    fn connect(&mut self) -> bool;

    /// Check if the link is currently up
    fn is_connected(&self) -> bool;
}

/// Delivers rendered notifications
///
/// A failed send is reported back but never retried by the monitor.
pub trait Transport {
    /// Hand over one message; one attempt only
    fn send(&mut self, message: &Message) -> Result<(), SendError>;
}

impl<C: Connectivity + ?Sized> Connectivity for &mut C {
    fn connect(&mut self) -> bool {
        (**self).connect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, message: &Message) -> Result<(), SendError> {
        (**self).send(message)
    }
}
