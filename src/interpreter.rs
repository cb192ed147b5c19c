//! Rule-based voice command interpreter.
//!
//! Classifies a cumulative transcript into exactly one [`Intent`]. Rules are
//! checked top to bottom and the first hit wins; matching is
//! case-insensitive substring containment, so commands are deliberately
//! permissive supersets of natural speech. The order is behaviour: a
//! transcript may contain phrases for several rules.

use crate::catalog::TransitCatalog;
use crate::resolver::DestinationResolver;

/// A classified rider command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the destination prompt. Only produced by the UI.
    BeginSelection,
    /// Start a journey towards the given text (a key or raw rider text).
    SelectDestination(String),
    /// "next bus" without a destination phrase.
    AskDestination,
    AdvanceStop,
    ConfirmDestinationReached,
    GetOff,
    ExitRoute,
    CancelSelection,
    ReadLogs,
    ClearLogs,
    QueryTime,
    Help,
    /// Nothing recognised; listening continues untouched.
    Unknown,
}

impl Intent {
    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::BeginSelection => "begin-selection",
            Intent::SelectDestination(_) => "select-destination",
            Intent::AskDestination => "ask-destination",
            Intent::AdvanceStop => "advance-stop",
            Intent::ConfirmDestinationReached => "confirm-destination-reached",
            Intent::GetOff => "get-off",
            Intent::ExitRoute => "exit-route",
            Intent::CancelSelection => "cancel-selection",
            Intent::ReadLogs => "read-logs",
            Intent::ClearLogs => "clear-logs",
            Intent::QueryTime => "query-time",
            Intent::Help => "help",
            Intent::Unknown => "unknown",
        }
    }
}

/// What is on screen when the transcript arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterpretContext {
    /// The destination prompt is open; destination names take precedence.
    pub selection_open: bool,
}

/// Phrase triggering the "next bus" rule.
const NEXT_BUS: &str = "next bus";

/// Keyword rules after the two destination rules, in precedence order.
const KEYWORD_RULES: &[(&[&str], Intent)] = &[
    (&["reached this stop", "next stop"], Intent::AdvanceStop),
    (
        &["i have reached my destination"],
        Intent::ConfirmDestinationReached,
    ),
    (&["get off here", "stop here", "get off"], Intent::GetOff),
    (
        &[
            "exit route",
            "exit this route",
            "exit the route",
            "i'm done",
            "i\u{2019}m done",
        ],
        Intent::ExitRoute,
    ),
    (&["go back"], Intent::CancelSelection),
    (&["read logs"], Intent::ReadLogs),
    (&["clear logs"], Intent::ClearLogs),
    (&["what time is it", "tell me the time"], Intent::QueryTime),
    (&["help", "what can i say"], Intent::Help),
];

/// Phrases the rider can say, for the help announcement.
pub const SPOKEN_COMMANDS: &[&str] = &[
    "next bus to a destination",
    "next stop",
    "I have reached my destination",
    "get off here",
    "exit route",
    "go back",
    "read logs",
    "clear logs",
    "what time is it",
];

/// Transcript classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInterpreter {
    resolver: DestinationResolver,
}

impl CommandInterpreter {
    pub fn new(resolver: DestinationResolver) -> Self {
        Self { resolver }
    }

    pub fn interpret(
        &self,
        transcript: &str,
        context: InterpretContext,
        catalog: &dyn TransitCatalog,
    ) -> Intent {
        let command = transcript.trim().to_lowercase();
        if command.is_empty() {
            return Intent::Unknown;
        }

        if context.selection_open
            && let Some(key) = self.resolver.resolve(&command, catalog)
        {
            return Intent::SelectDestination(key);
        }

        if command.contains(NEXT_BUS) {
            return match destination_phrase(&command) {
                Some(destination) => Intent::SelectDestination(destination.to_string()),
                None => Intent::AskDestination,
            };
        }

        KEYWORD_RULES
            .iter()
            .find(|(phrases, _)| phrases.iter().any(|p| command.contains(p)))
            .map(|(_, intent)| intent.clone())
            .unwrap_or(Intent::Unknown)
    }
}

/// Extract the text after the leftmost "to"/"for" that is followed by
/// whitespace and something non-blank.
fn destination_phrase(command: &str) -> Option<&str> {
    for (i, _) in command.char_indices() {
        let rest = &command[i..];
        let tail = if let Some(tail) = rest.strip_prefix("to") {
            tail
        } else if let Some(tail) = rest.strip_prefix("for") {
            tail
        } else {
            continue;
        };
        if !tail.starts_with(char::is_whitespace) {
            continue;
        }
        let destination = tail.trim();
        if !destination.is_empty() {
            return Some(destination);
        }
    }
    None
}
