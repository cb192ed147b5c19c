//! Terminal renderings of the ports for the interactive ride.
//!
//! Announcements and haptics go to stdout so a transcript of the ride can
//! be piped; diagnostics stay on stderr via `tracing`.

use crate::error::Result;
use crate::haptics::Haptics;
use crate::session::SessionStatus;
use crate::speech::{ListenOptions, Recognizer, Speaker};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn print_line(line: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// "200-100-200 ms"
pub fn format_pattern(pattern: &[u64]) -> String {
    let steps: Vec<String> = pattern.iter().map(u64::to_string).collect();
    format!("{} ms", steps.join("-"))
}

pub fn format_announcement(text: &str, color: bool) -> String {
    format!("{} {}", paint(">>", BOLD, color), paint(text, GREEN, color))
}

/// One-paragraph status block.
pub fn format_status(status: &SessionStatus, color: bool) -> String {
    let mut lines = vec![format!(
        "{} {}",
        paint("Phase:", DIM, color),
        status.phase.name()
    )];
    if let Some(stop) = &status.current_stop {
        lines.push(format!("{} {stop}", paint("Stop:", DIM, color)));
    }
    if let Some(error) = &status.last_error {
        lines.push(format!(
            "{} {}",
            paint("Error:", DIM, color),
            paint(error, RED, color)
        ));
    }
    if status.retry_pending {
        lines.push(paint("Retrying recognition...", DIM, color));
    }
    lines.join("\n")
}

pub fn render_status(status: &SessionStatus, color: bool) -> Result<()> {
    print_line(&format_status(status, color))
}

/// Speaks by printing. Each line replaces the last, so nothing to cancel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSpeaker {
    color: bool,
}

impl ConsoleSpeaker {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str) -> Result<()> {
        print_line(&format_announcement(text, self.color))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleHaptics {
    color: bool,
}

impl ConsoleHaptics {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Haptics for ConsoleHaptics {
    fn vibrate(&self, pattern: &[u64]) -> Result<()> {
        print_line(&paint(
            &format!("~ bzz {}", format_pattern(pattern)),
            DIM,
            self.color,
        ))
    }
}

/// Microphone stand-in: stdin is always open, so this only reports
/// transitions between listening and not.
#[derive(Debug, Default)]
pub struct ConsoleRecognizer {
    listening: AtomicBool,
    color: bool,
}

impl ConsoleRecognizer {
    pub fn new(color: bool) -> Self {
        Self {
            listening: AtomicBool::new(false),
            color,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

impl Recognizer for ConsoleRecognizer {
    fn start_listening(&self, options: &ListenOptions) -> Result<()> {
        if !self.listening.swap(true, Ordering::SeqCst) {
            print_line(&paint(
                &format!("[listening, {}]", options.language),
                DIM,
                self.color,
            ))?;
        }
        Ok(())
    }

    fn stop_listening(&self) -> Result<()> {
        if self.listening.swap(false, Ordering::SeqCst) {
            print_line(&paint("[microphone off]", DIM, self.color))?;
        }
        Ok(())
    }

    fn reset_transcript(&self) -> Result<()> {
        Ok(())
    }
}
