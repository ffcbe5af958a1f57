//! Notification delivery from the engine to clients.
//!
//! The engine reports outcomes synchronously through [`NotificationSink`];
//! [`ChannelSink`] forwards them onto a tokio channel so that rendering and
//! delivery happen outside the tick.

use tokio::sync::mpsc;

use myelin_core::{Notification, NotificationSink};

/// Receiving half handed to clients by the runtime builder.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sink that forwards every notification onto an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        // Best-effort: a dropped receiver only means nobody is listening.
        if self.tx.send(notification).is_err() {
            tracing::trace!("notification receiver dropped");
        }
    }
}
