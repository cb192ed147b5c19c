//! Events delivered into the session loop.

use crate::interpreter::Intent;
use crate::speech::RecognitionErrorKind;
use crossbeam_channel::{SendError, Sender, TrySendError};

/// Something for the session to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Cumulative transcript from the recognizer.
    Transcript { text: String, listening: bool },
    RecognitionError(RecognitionErrorKind),
    /// A button press or other direct command, bypassing interpretation.
    Ui(Intent),
    Shutdown,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Transcript { .. } => "transcript",
            Event::RecognitionError(_) => "recognition-error",
            Event::Ui(_) => "ui",
            Event::Shutdown => "shutdown",
        }
    }
}

/// Producer handle for the session.
///
/// The channel has no buffer: [`offer`](Self::offer) only succeeds while the
/// session is idle and waiting, so events that arrive during processing are
/// dropped instead of queued.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    pub(crate) fn new(tx: Sender<Event>) -> Self {
        Self { tx }
    }

    /// Hand over an event if the session is waiting for one.
    ///
    /// Returns `false` when the event was dropped.
    pub fn offer(&self, event: Event) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::debug!(event = event.name(), "session busy, event dropped");
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::debug!(event = event.name(), "session gone, event dropped");
                false
            }
        }
    }

    pub fn transcript(&self, text: impl Into<String>, listening: bool) -> bool {
        self.offer(Event::Transcript {
            text: text.into(),
            listening,
        })
    }

    pub fn recognition_error(&self, kind: RecognitionErrorKind) -> bool {
        self.offer(Event::RecognitionError(kind))
    }

    pub fn ui(&self, intent: Intent) -> bool {
        self.offer(Event::Ui(intent))
    }

    /// Wait until the session takes the event.
    ///
    /// For scripted input that must not be lost, and for shutdown.
    pub fn deliver(&self, event: Event) -> Result<(), SendError<Event>> {
        self.tx.send(event)
    }

    pub fn shutdown(&self) -> bool {
        self.deliver(Event::Shutdown).is_ok()
    }
}
