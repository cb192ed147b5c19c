//! Ride application entry point.
//!
//! Wires config, the bundled catalog, the persisted journey log and the
//! console ports into a [`Session`], then feeds it from stdin:
//! stdin line → event → session → announcements on stdout.

use crate::catalog::{StaticCatalog, TransitCatalog};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::history::{FileLogStore, JourneyLog};
use crate::interpreter::Intent;
use crate::journey::{JourneyStateMachine, MachineSettings};
use crate::output::{ConsoleHaptics, ConsoleRecognizer, ConsoleSpeaker, render_status};
use crate::session::{Event, Ports, Session, SessionSettings};
use crate::speech::RecognitionErrorKind;
use anyhow::Context;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

/// Open the persisted journey log named by the config.
pub fn open_log(config: &Config) -> anyhow::Result<JourneyLog> {
    let path = config.history_path()?;
    tracing::debug!(path = %path.display(), "opening journey log");
    JourneyLog::load(Box::new(FileLogStore::new(&path)))
        .with_context(|| format!("Failed to load journey history from {}", path.display()))
}

pub fn build_machine(
    config: &Config,
    catalog: Arc<dyn TransitCatalog>,
    log: JourneyLog,
) -> JourneyStateMachine {
    JourneyStateMachine::new(catalog, log, MachineSettings::from_config(config))
}

/// Turn one line of rider input into an event.
///
/// `/word` lines are buttons, `!code` lines simulate recognizer errors, and
/// anything else is a transcript. Blank lines yield nothing.
pub fn parse_line(line: &str) -> Result<Option<Event>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(code) = line.strip_prefix('!') {
        return Ok(Some(Event::RecognitionError(
            RecognitionErrorKind::from_code(code),
        )));
    }

    let Some(command) = line.strip_prefix('/') else {
        return Ok(Some(Event::Transcript {
            text: line.to_string(),
            listening: true,
        }));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    let intent = match name {
        "fetch" => Intent::BeginSelection,
        "select" if argument.is_empty() => Intent::AskDestination,
        "select" => Intent::SelectDestination(argument.to_string()),
        "next" => Intent::AdvanceStop,
        "arrived" => Intent::ConfirmDestinationReached,
        "getoff" => Intent::GetOff,
        "exit" => Intent::ExitRoute,
        "back" => Intent::CancelSelection,
        "logs" => Intent::ReadLogs,
        "clear" => Intent::ClearLogs,
        "time" => Intent::QueryTime,
        "help" => Intent::Help,
        "quit" => return Ok(Some(Event::Shutdown)),
        other => return Err(format!("Unknown command: /{other}")),
    };
    Ok(Some(Event::Ui(intent)))
}

/// Run the interactive ride until stdin closes or `/quit`.
pub fn run_ride(config: &Config, color: bool, quiet: bool) -> anyhow::Result<()> {
    let log = open_log(config)?;
    let machine = build_machine(config, Arc::new(StaticCatalog::derby()), log);
    let ports = Ports {
        speaker: Box::new(ConsoleSpeaker::new(color)),
        recognizer: Box::new(ConsoleRecognizer::new(color)),
        haptics: Box::new(ConsoleHaptics::new(color)),
        clock: Arc::new(SystemClock),
    };
    let mut session = Session::new(machine, ports, SessionSettings::from_config(config));
    let sender = session.sender();

    if !quiet {
        eprintln!("Type /fetch to choose a destination, /help for commands, /quit to leave.");
    }

    let reader = thread::Builder::new()
        .name("voicebus-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("voicebus: failed to read input: {e}");
                        break;
                    }
                };
                match parse_line(&line) {
                    Ok(Some(Event::Shutdown)) => break,
                    Ok(Some(event)) => {
                        if sender.deliver(event).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                }
            }
            sender.shutdown();
        })
        .context("Failed to spawn input thread")?;

    session.run();

    if reader.join().is_err() {
        eprintln!("voicebus: input thread panicked");
    }
    if !quiet {
        render_status(&session.status(), color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ui(line: &str) -> Intent {
        match parse_line(line) {
            Ok(Some(Event::Ui(intent))) => intent,
            other => panic!("expected UI intent for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_transcript() {
        assert_eq!(
            parse_line("  next bus to pride park "),
            Ok(Some(Event::Transcript {
                text: "next bus to pride park".to_string(),
                listening: true,
            }))
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn test_parse_buttons() {
        assert_eq!(ui("/fetch"), Intent::BeginSelection);
        assert_eq!(
            ui("/select  Pride Park "),
            Intent::SelectDestination("Pride Park".to_string())
        );
        assert_eq!(ui("/select"), Intent::AskDestination);
        assert_eq!(ui("/next"), Intent::AdvanceStop);
        assert_eq!(ui("/arrived"), Intent::ConfirmDestinationReached);
        assert_eq!(ui("/getoff"), Intent::GetOff);
        assert_eq!(ui("/exit"), Intent::ExitRoute);
        assert_eq!(ui("/back"), Intent::CancelSelection);
        assert_eq!(ui("/logs"), Intent::ReadLogs);
        assert_eq!(ui("/clear"), Intent::ClearLogs);
        assert_eq!(ui("/time"), Intent::QueryTime);
        assert_eq!(ui("/help"), Intent::Help);
    }

    #[test]
    fn test_parse_quit_and_unknown() {
        assert_eq!(parse_line("/quit"), Ok(Some(Event::Shutdown)));
        assert_eq!(
            parse_line("/teleport"),
            Err("Unknown command: /teleport".to_string())
        );
    }

    #[test]
    fn test_parse_recognizer_errors() {
        assert_eq!(
            parse_line("!no-speech"),
            Ok(Some(Event::RecognitionError(RecognitionErrorKind::NoSpeech)))
        );
        assert_eq!(
            parse_line("!audio-capture"),
            Ok(Some(Event::RecognitionError(
                RecognitionErrorKind::AudioCapture
            )))
        );
        assert_eq!(
            parse_line("!network"),
            Ok(Some(Event::RecognitionError(RecognitionErrorKind::Other(
                "network".to_string()
            ))))
        );
    }

    #[test]
    fn test_open_log_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.history.path = Some(dir.path().join("journeys.json"));

        let log = open_log(&config).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_open_log_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journeys.json");
        std::fs::write(&path, "{broken").unwrap();
        let mut config = Config::default();
        config.history.path = Some(path);

        let err = open_log(&config).unwrap_err();
        assert!(
            err.to_string().contains("Failed to load journey history"),
            "got: {err}"
        );
    }

    #[test]
    fn test_build_machine_uses_config_feedback() {
        let mut config = Config::default();
        config.feedback.haptics = false;
        config.feedback.error_cooldown_ms = 250;
        let log = JourneyLog::new(Box::new(crate::history::MemoryLogStore::new()));

        let machine = build_machine(&config, Arc::new(StaticCatalog::derby()), log);

        assert!(!machine.settings().haptics);
        assert_eq!(machine.throttle().cooldown_ms(), 250);
    }
}
