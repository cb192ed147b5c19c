//! Single-consumer session loop.
//!
//! Transcripts, recognition errors and UI intents arrive as [`Event`]s over
//! a rendezvous channel. The session interprets them, dispatches to the
//! state machine, and applies the returned effects to the ports. A pending
//! recognition retry is a timer in the same `select!`, so nothing else ever
//! touches the machine.

pub mod event;

pub use event::{Event, EventSender};

use crate::clock::Clock;
use crate::config::Config;
use crate::haptics::Haptics;
use crate::interpreter::Intent;
use crate::journey::{Effect, JourneyStateMachine, Phase};
use crate::speech::{ListenOptions, RecognitionErrorKind, Recognizer, Speaker};
use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The outside world as seen by the session.
pub struct Ports {
    pub speaker: Box<dyn Speaker>,
    pub recognizer: Box<dyn Recognizer>,
    pub haptics: Box<dyn Haptics>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub listen: ListenOptions,
    /// Wait before restarting recognition after a retryable error.
    pub retry_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            listen: ListenOptions::default(),
            retry_delay: Duration::from_millis(crate::defaults::RETRY_DELAY_MS),
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            listen: ListenOptions {
                continuous: config.speech.continuous,
                language: config.speech.language.clone(),
            },
            retry_delay: config.feedback.retry_delay(),
        }
    }
}

/// Snapshot of what a status display would show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub phase: Phase,
    pub current_stop: Option<String>,
    pub last_error: Option<String>,
    pub last_spoken: Option<String>,
    /// Last listening flag reported with a transcript.
    pub engine_listening: bool,
    pub retry_pending: bool,
}

/// Whether the loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Session {
    machine: JourneyStateMachine,
    ports: Ports,
    settings: SessionSettings,
    tx: Sender<Event>,
    rx: Receiver<Event>,
    retry_at: Option<Instant>,
    last_error: Option<String>,
    last_spoken: Option<String>,
    engine_listening: bool,
}

impl Session {
    pub fn new(machine: JourneyStateMachine, ports: Ports, settings: SessionSettings) -> Self {
        let (tx, rx) = bounded(0);
        Self {
            machine,
            ports,
            settings,
            tx,
            rx,
            retry_at: None,
            last_error: None,
            last_spoken: None,
            engine_listening: false,
        }
    }

    /// A producer handle. Any number may exist.
    pub fn sender(&self) -> EventSender {
        EventSender::new(self.tx.clone())
    }

    pub fn machine(&self) -> &JourneyStateMachine {
        &self.machine
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.machine.phase(),
            current_stop: self
                .machine
                .journey()
                .map(|j| j.current_stop().name.clone()),
            last_error: self.last_error.clone(),
            last_spoken: self.last_spoken.clone(),
            engine_listening: self.engine_listening,
            retry_pending: self.retry_at.is_some(),
        }
    }

    /// Consume events until [`Event::Shutdown`].
    pub fn run(&mut self) {
        tracing::info!("session started");
        let rx = self.rx.clone();
        loop {
            let retry = match self.retry_at {
                Some(at) => crossbeam_channel::at(at),
                None => crossbeam_channel::never(),
            };
            select! {
                recv(rx) -> event => {
                    let Ok(event) = event else { break };
                    if self.handle(event) == Flow::Stop {
                        break;
                    }
                }
                recv(retry) -> _ => self.fire_retry(),
            }
        }
        if let Err(e) = self.ports.recognizer.stop_listening() {
            tracing::warn!("failed to stop recognition on shutdown: {e}");
        }
        tracing::info!("session stopped");
    }

    /// Handle one event to completion.
    pub fn handle(&mut self, event: Event) -> Flow {
        tracing::debug!(event = event.name(), "session event");
        match event {
            Event::Transcript { text, listening } => {
                self.engine_listening = listening;
                self.on_transcript(&text);
            }
            Event::RecognitionError(kind) => self.on_recognition_error(kind),
            Event::Ui(intent) => self.run_intent(intent),
            Event::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    /// Restart recognition if a retry is pending and still wanted.
    pub fn fire_retry(&mut self) {
        if self.retry_at.take().is_none() {
            return;
        }
        if !self.machine.is_listening_eligible() {
            tracing::debug!("retry skipped, no longer listening-eligible");
            return;
        }
        tracing::debug!("restarting recognition");
        self.apply(&[Effect::StartListening]);
    }

    fn on_transcript(&mut self, text: &str) {
        if !self.machine.is_listening_eligible() {
            tracing::debug!("transcript ignored while idle");
            return;
        }
        let intent = self.machine.interpret(text);
        if intent == Intent::Unknown {
            return;
        }
        tracing::info!(intent = intent.name(), transcript = text, "voice command");
        self.run_intent(intent);
    }

    fn run_intent(&mut self, intent: Intent) {
        let now = self.ports.clock.now();
        let outcome = self.machine.dispatch(intent, &now);
        if outcome.dropped {
            return;
        }
        self.apply(&outcome.effects);
        self.machine.finish_processing();
    }

    fn on_recognition_error(&mut self, kind: RecognitionErrorKind) {
        let Some(error) = kind.journey_error() else {
            tracing::warn!(code = %kind, "recognition error");
            return;
        };
        let now = self.ports.clock.now();
        let effects = self.machine.report_error(&error, &now);
        self.apply(&effects);

        if self.machine.is_listening_eligible() {
            self.apply(&[Effect::ResetTranscript]);
            self.retry_at = Some(Instant::now() + self.settings.retry_delay);
        } else {
            self.apply(&[Effect::StopListening, Effect::ResetTranscript]);
        }
    }

    fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            let result = match effect {
                Effect::Speak(text) => {
                    self.last_spoken = Some(text.clone());
                    self.ports.speaker.speak(text)
                }
                Effect::Vibrate(pattern) => self.ports.haptics.vibrate(pattern),
                Effect::StartListening => {
                    self.ports.recognizer.start_listening(&self.settings.listen)
                }
                Effect::StopListening => self.ports.recognizer.stop_listening(),
                Effect::ResetTranscript => self.ports.recognizer.reset_transcript(),
                Effect::ShowError(message) => {
                    self.last_error = Some(message.clone());
                    Ok(())
                }
                Effect::ClearError => {
                    self.last_error = None;
                    Ok(())
                }
            };
            if let Err(e) = result {
                tracing::warn!(effect = ?effect, "port call failed: {e}");
            }
        }
    }
}
