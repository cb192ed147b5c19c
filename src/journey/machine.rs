//! The journey state machine.
//!
//! Consumes [`Intent`]s and returns [`Effect`]s; it never touches a port
//! itself. The phase is derived from two facts, whether the destination
//! prompt is open and whether a journey is active, so a rider can reopen
//! the prompt mid-ride and go back to the running journey.

use crate::catalog::{TransitCatalog, title_case};
use crate::config::Config;
use crate::defaults;
use crate::history::{JourneyLog, LogEntry};
use crate::interpreter::{CommandInterpreter, Intent, InterpretContext, SPOKEN_COMMANDS};
use crate::journey::error::JourneyError;
use crate::journey::types::{Effect, Journey, Outcome, Phase};
use crate::resolver::DestinationResolver;
use crate::throttle::ErrorThrottle;
use jiff::Zoned;
use std::sync::Arc;

pub const FINAL_STOP_TEXT: &str = "You've reached the final stop.";
pub const DESTINATION_REACHED_TEXT: &str = "You have reached your destination.";
pub const ROUTE_EXITED_TEXT: &str = "Route exited. Choose a new destination.";
pub const SELECTION_CANCELLED_TEXT: &str = "Route selection cancelled.";
pub const LOGS_CLEARED_TEXT: &str = "Logs cleared.";

/// How many destinations the selection prompt offers as examples.
const PROMPT_EXAMPLES: usize = 3;

type Step = Result<Vec<Effect>, JourneyError>;

/// Feedback knobs of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSettings {
    pub error_cooldown_ms: u64,
    /// Haptic pulse for confirmations. Ignored when `haptics` is off.
    pub vibration_pattern: Vec<u64>,
    pub haptics: bool,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            error_cooldown_ms: defaults::ERROR_COOLDOWN_MS,
            vibration_pattern: defaults::VIBRATION_PATTERN.to_vec(),
            haptics: true,
        }
    }
}

impl MachineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            error_cooldown_ms: config.feedback.error_cooldown_ms,
            vibration_pattern: config.feedback.vibration_pattern.clone(),
            haptics: config.feedback.haptics,
        }
    }
}

#[derive(Debug, Default)]
struct MachineState {
    prompt_open: bool,
    journey: Option<Journey>,
    /// Set by `dispatch`, cleared by `finish_processing` once the effects
    /// have been applied.
    processing: bool,
}

pub struct JourneyStateMachine {
    catalog: Arc<dyn TransitCatalog>,
    resolver: DestinationResolver,
    interpreter: CommandInterpreter,
    state: MachineState,
    log: JourneyLog,
    throttle: ErrorThrottle,
    settings: MachineSettings,
}

impl JourneyStateMachine {
    pub fn new(catalog: Arc<dyn TransitCatalog>, log: JourneyLog, settings: MachineSettings) -> Self {
        let resolver = DestinationResolver::default();
        Self {
            catalog,
            resolver,
            interpreter: CommandInterpreter::new(resolver),
            state: MachineState::default(),
            log,
            throttle: ErrorThrottle::new(settings.error_cooldown_ms),
            settings,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.state.prompt_open {
            Phase::SelectingDestination
        } else if self.state.journey.is_some() {
            Phase::EnRoute
        } else {
            Phase::Idle
        }
    }

    pub fn is_listening_eligible(&self) -> bool {
        self.phase().is_listening_eligible()
    }

    pub fn is_processing(&self) -> bool {
        self.state.processing
    }

    pub fn journey(&self) -> Option<&Journey> {
        self.state.journey.as_ref()
    }

    pub fn log(&self) -> &JourneyLog {
        &self.log
    }

    pub fn throttle(&self) -> &ErrorThrottle {
        &self.throttle
    }

    pub fn settings(&self) -> &MachineSettings {
        &self.settings
    }

    /// Classify a transcript against the current screen.
    pub fn interpret(&self, transcript: &str) -> Intent {
        let context = InterpretContext {
            selection_open: self.state.prompt_open,
        };
        self.interpreter
            .interpret(transcript, context, self.catalog.as_ref())
    }

    /// Run one intent to completion.
    ///
    /// Errors are turned into throttled announcements. Every recognised
    /// intent ends by re-arming recognition when the new phase is
    /// listening-eligible and stopping it otherwise; `Unknown` leaves
    /// recognition alone.
    ///
    /// While a previous intent is still being processed (see
    /// [`finish_processing`](Self::finish_processing)) the intent is dropped.
    pub fn dispatch(&mut self, intent: Intent, now: &Zoned) -> Outcome {
        if self.state.processing {
            tracing::debug!(intent = intent.name(), "intent dropped, machine busy");
            return Outcome::dropped();
        }
        self.state.processing = true;

        let name = intent.name();
        let recognised = intent != Intent::Unknown;
        let result = self.apply(intent, now);
        let mut outcome = match result {
            Ok(effects) => Outcome {
                effects,
                ..Outcome::default()
            },
            Err(error) => {
                tracing::debug!(intent = name, error = error.kind(), "intent failed");
                Outcome {
                    effects: self.report_error(&error, now),
                    error: Some(error),
                    dropped: false,
                }
            }
        };
        if recognised {
            outcome.effects.extend(self.listening_effects());
        }
        tracing::debug!(intent = name, phase = self.phase().name(), "dispatched");
        outcome
    }

    /// Release the processing guard taken by [`dispatch`](Self::dispatch).
    pub fn finish_processing(&mut self) {
        self.state.processing = false;
    }

    /// Announce an error if the throttle lets it through.
    pub fn report_error(&mut self, error: &JourneyError, now: &Zoned) -> Vec<Effect> {
        let now_ms = now.timestamp().as_millisecond();
        if !self.throttle.admit(error, now_ms) {
            tracing::debug!(error = error.kind(), "error announcement suppressed");
            return Vec::new();
        }
        let message = error.to_string();
        vec![Effect::ShowError(message.clone()), Effect::Speak(message)]
    }

    fn apply(&mut self, intent: Intent, now: &Zoned) -> Step {
        match intent {
            Intent::BeginSelection => self.begin_selection(),
            Intent::SelectDestination(text) => self.select_destination(&text, now),
            Intent::AskDestination => Err(JourneyError::MissingDestinationPhrase),
            Intent::AdvanceStop => self.advance_stop(),
            Intent::ConfirmDestinationReached => self.confirm_destination_reached(),
            Intent::GetOff => self.get_off(),
            Intent::ExitRoute => self.exit_route(),
            Intent::CancelSelection => self.cancel_selection(),
            Intent::ReadLogs => Ok(self.read_logs(now)),
            Intent::ClearLogs => Ok(self.clear_logs()),
            Intent::QueryTime => Ok(query_time(now)),
            Intent::Help => Ok(vec![Effect::Speak(help_text())]),
            Intent::Unknown => Ok(Vec::new()),
        }
    }

    /// Open the destination prompt.
    pub fn begin_selection(&mut self) -> Step {
        self.state.prompt_open = true;
        self.throttle.reset();
        Ok(vec![Effect::ClearError, Effect::Speak(self.selection_prompt())])
    }

    /// Start a journey on the first service for `text`, replacing any
    /// journey already running.
    pub fn select_destination(&mut self, text: &str, now: &Zoned) -> Step {
        let key = self
            .resolver
            .resolve(text, self.catalog.as_ref())
            .ok_or(JourneyError::DestinationNotFound)?;
        let services = self.catalog.services_for(&key);
        let Some(service) = services.first() else {
            return Err(JourneyError::DestinationNotFound);
        };
        let journey = Journey::start(service, self.catalog.stops_for(&service.service_id))?;

        if let Some(previous) = self.state.journey.take() {
            tracing::info!(journey = %previous.journey_id, "journey replaced");
            self.log.abandon(previous.journey_id);
        }
        self.log.append(LogEntry::start(
            journey.journey_id,
            text.trim(),
            journey.service_id.clone(),
            journey.route_names(),
            now.timestamp(),
        ));
        tracing::info!(
            journey = %journey.journey_id,
            service = %journey.service_id,
            destination = %key,
            "journey started"
        );

        let departures = services
            .iter()
            .map(|s| {
                format!(
                    "Bus {} to {} at {}.",
                    s.service_id, s.destination_label, s.departure_time
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        let summary = format!("{departures} Stops: {}.", journey.route_names().join(", "));

        self.state.journey = Some(journey);
        self.state.prompt_open = false;

        let mut effects = vec![Effect::ClearError, Effect::Speak(summary)];
        effects.extend(self.haptic());
        Ok(effects)
    }

    /// Move to the next stop, or end the journey at the final one.
    pub fn advance_stop(&mut self) -> Step {
        let journey = self
            .state
            .journey
            .as_mut()
            .ok_or(JourneyError::NoRouteSelected)?;
        let journey_id = journey.journey_id;
        let Some(stop) = journey.advance().map(|s| s.name.clone()) else {
            return Ok(self.finish_journey(FINAL_STOP_TEXT.to_string()));
        };

        self.log
            .update_active(journey_id, |entry| entry.stops_taken.push(stop.clone()));
        let mut effects = vec![Effect::ClearError, Effect::Speak(format!("Next stop: {stop}."))];
        effects.extend(self.haptic());
        Ok(effects)
    }

    /// End the journey if the rider really is at the final stop.
    pub fn confirm_destination_reached(&mut self) -> Step {
        let journey = self
            .state
            .journey
            .as_ref()
            .ok_or(JourneyError::NoRouteSelected)?;
        if !journey.is_at_final_stop() {
            return Err(JourneyError::PrematureDestinationClaim);
        }
        Ok(self.finish_journey(DESTINATION_REACHED_TEXT.to_string()))
    }

    /// End the journey at the current stop.
    pub fn get_off(&mut self) -> Step {
        let journey = self
            .state
            .journey
            .as_ref()
            .ok_or(JourneyError::NoRouteSelected)?;
        let announcement = format!("You got off at {}.", journey.current_stop().name);
        let mut effects = self.finish_journey(announcement);
        effects.extend(self.haptic());
        Ok(effects)
    }

    /// Drop the journey and the prompt without recording a get-off stop.
    pub fn exit_route(&mut self) -> Step {
        if self.state.journey.is_none() && !self.state.prompt_open {
            return Err(JourneyError::NoRouteSelected);
        }
        if let Some(journey) = self.state.journey.take() {
            tracing::info!(journey = %journey.journey_id, "route exited");
            self.log.abandon(journey.journey_id);
        }
        self.state.prompt_open = false;

        let mut effects = vec![
            Effect::ClearError,
            Effect::Speak(ROUTE_EXITED_TEXT.to_string()),
        ];
        effects.extend(self.haptic());
        Ok(effects)
    }

    /// Close the prompt. A journey running underneath keeps going.
    pub fn cancel_selection(&mut self) -> Step {
        if !self.state.prompt_open {
            return Err(JourneyError::NoRouteSelected);
        }
        self.state.prompt_open = false;
        self.throttle.reset();
        Ok(vec![
            Effect::ClearError,
            Effect::Speak(SELECTION_CANCELLED_TEXT.to_string()),
        ])
    }

    pub fn read_logs(&self, now: &Zoned) -> Vec<Effect> {
        vec![Effect::Speak(self.log.read_aloud_text(now.time_zone()))]
    }

    pub fn clear_logs(&mut self) -> Vec<Effect> {
        self.log.clear();
        tracing::info!("journey log cleared");
        vec![Effect::Speak(LOGS_CLEARED_TEXT.to_string())]
    }

    fn finish_journey(&mut self, announcement: String) -> Vec<Effect> {
        if let Some(mut journey) = self.state.journey.take() {
            journey.complete();
            let stop = journey.current_stop().name.clone();
            tracing::info!(journey = %journey.journey_id, stop = %stop, "journey finished");
            self.log.finalize(journey.journey_id, &stop);
        }
        self.state.prompt_open = false;
        vec![Effect::ClearError, Effect::Speak(announcement)]
    }

    fn haptic(&self) -> Option<Effect> {
        (self.settings.haptics && !self.settings.vibration_pattern.is_empty())
            .then(|| Effect::Vibrate(self.settings.vibration_pattern.clone()))
    }

    fn listening_effects(&self) -> [Effect; 2] {
        if self.is_listening_eligible() {
            [Effect::ResetTranscript, Effect::StartListening]
        } else {
            [Effect::StopListening, Effect::ResetTranscript]
        }
    }

    fn selection_prompt(&self) -> String {
        let examples: Vec<String> = self
            .catalog
            .destination_keys()
            .into_iter()
            .take(PROMPT_EXAMPLES)
            .map(title_case)
            .collect();
        if examples.is_empty() {
            return "Select a destination.".to_string();
        }
        format!("Select a destination, like {}.", spoken_list(&examples))
    }
}

fn query_time(now: &Zoned) -> Vec<Effect> {
    vec![Effect::Speak(format!("The time is {}.", now.strftime("%H:%M")))]
}

fn help_text() -> String {
    let commands: Vec<String> = SPOKEN_COMMANDS.iter().map(|c| (*c).to_string()).collect();
    format!("You can say: {}.", spoken_list(&commands))
}

/// "a", "a or b", "a, b, or c".
fn spoken_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [head @ .., last] => format!("{}, or {last}", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DestinationEntry, RouteEntry, ServiceEntry, StaticCatalog};
    use crate::history::MemoryLogStore;
    use jiff::tz::TimeZone;
    use jiff::{SignedDuration, Timestamp};

    const PRIDE_PARK_SUMMARY: &str = "Bus 1A to Pride Park at 15:30. \
        Bus 1C to Pride Park at 15:40. \
        Stops: Morledge, Derwent Street, Pride Park, Alvaston.";

    fn t0() -> Zoned {
        // 2026-10-16 15:30:00 UTC
        Timestamp::from_second(1_792_164_600)
            .unwrap()
            .to_zoned(TimeZone::UTC)
    }

    fn later(ms: i64) -> Zoned {
        t0().checked_add(SignedDuration::from_millis(ms)).unwrap()
    }

    fn machine() -> (JourneyStateMachine, MemoryLogStore) {
        let store = MemoryLogStore::new();
        let log = JourneyLog::new(Box::new(store.clone()));
        let machine = JourneyStateMachine::new(
            Arc::new(StaticCatalog::derby()),
            log,
            MachineSettings::default(),
        );
        (machine, store)
    }

    /// Dispatch and release the guard, as the session does.
    fn run(machine: &mut JourneyStateMachine, intent: Intent, now: &Zoned) -> Outcome {
        let outcome = machine.dispatch(intent, now);
        machine.finish_processing();
        outcome
    }

    fn select(machine: &mut JourneyStateMachine, text: &str) -> Outcome {
        run(machine, Intent::SelectDestination(text.to_string()), &t0())
    }

    #[test]
    fn test_initial_state_is_idle() {
        let (machine, _store) = machine();
        assert_eq!(machine.phase(), Phase::Idle);
        assert!(machine.journey().is_none());
        assert!(!machine.is_listening_eligible());
        assert!(!machine.is_processing());
    }

    #[test]
    fn test_begin_selection_announces_prompt_and_arms_listening() {
        let (mut m, _store) = machine();
        let outcome = run(&mut m, Intent::BeginSelection, &t0());

        assert_eq!(m.phase(), Phase::SelectingDestination);
        assert_eq!(
            outcome.effects,
            vec![
                Effect::ClearError,
                Effect::Speak(
                    "Select a destination, like Pride Park, Derby Station, or City Centre."
                        .to_string()
                ),
                Effect::ResetTranscript,
                Effect::StartListening,
            ]
        );
    }

    #[test]
    fn test_select_destination_starts_journey() {
        let (mut m, store) = machine();
        run(&mut m, Intent::BeginSelection, &t0());

        let outcome = select(&mut m, "pride park");

        assert_eq!(outcome.error, None);
        assert_eq!(m.phase(), Phase::EnRoute);
        let journey = m.journey().unwrap();
        assert_eq!(journey.service_id, "1A");
        assert_eq!(journey.current_stop().name, "Morledge");
        assert_eq!(
            outcome.effects,
            vec![
                Effect::ClearError,
                Effect::Speak(PRIDE_PARK_SUMMARY.to_string()),
                Effect::Vibrate(vec![200, 100, 200]),
                Effect::ResetTranscript,
                Effect::StartListening,
            ]
        );

        let entry = &m.log().entries()[0];
        assert_eq!(entry.journey_id, journey.journey_id);
        assert_eq!(entry.destination_query, "pride park");
        assert_eq!(entry.stops_taken, vec!["Morledge".to_string()]);
        assert_eq!(entry.timestamp, t0().timestamp());
        assert!(store.snapshot().is_some());
    }

    #[test]
    fn test_select_destination_resolves_colloquial_text() {
        let (mut m, _store) = machine();
        select(&mut m, "the moon");
        assert!(m.journey().is_none());

        select(&mut m, "Chellaston please");
        assert_eq!(m.journey().unwrap().service_id, "2A");
    }

    #[test]
    fn test_unknown_destination_is_not_found() {
        let (mut m, _store) = machine();
        run(&mut m, Intent::BeginSelection, &t0());

        let outcome = select(&mut m, "the moon");

        assert_eq!(outcome.error, Some(JourneyError::DestinationNotFound));
        assert_eq!(m.phase(), Phase::SelectingDestination);
        assert_eq!(
            outcome.spoken(),
            vec!["No buses found for this destination."]
        );
        assert!(m.log().is_empty());
    }

    const DEPOT_DESTINATIONS: &[DestinationEntry] = &[DestinationEntry {
        key: "depot",
        services: &[ServiceEntry {
            service_id: "X1",
            operator: "Arriva",
            origin_stop: "Depot",
            destination_label: "Depot",
            departure_time: "05:00",
        }],
    }];

    const DEPOT_ROUTES: &[RouteEntry] = &[RouteEntry {
        service_id: "X1",
        stops: &["Depot"],
    }];

    #[test]
    fn test_single_stop_route_is_invalid() {
        let log = JourneyLog::new(Box::new(MemoryLogStore::new()));
        let mut m = JourneyStateMachine::new(
            Arc::new(StaticCatalog::new(DEPOT_DESTINATIONS, DEPOT_ROUTES)),
            log,
            MachineSettings::default(),
        );

        let outcome = select(&mut m, "depot");

        assert_eq!(outcome.error, Some(JourneyError::InvalidRoute));
        assert!(m.journey().is_none());
        assert!(m.log().is_empty());
        assert_eq!(outcome.spoken(), vec!["Invalid route: Not enough stops."]);
    }

    #[test]
    fn test_advance_through_route_finalizes_at_last_stop() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let id = m.journey().unwrap().journey_id;

        for expected in ["Derwent Street", "Pride Park", "Alvaston"] {
            let outcome = run(&mut m, Intent::AdvanceStop, &t0());
            assert_eq!(outcome.spoken(), vec![format!("Next stop: {expected}.")]);
            assert!(outcome.effects.contains(&Effect::Vibrate(vec![200, 100, 200])));
        }
        assert_eq!(m.phase(), Phase::EnRoute);

        let outcome = run(&mut m, Intent::AdvanceStop, &t0());
        assert_eq!(outcome.spoken(), vec![FINAL_STOP_TEXT]);
        assert_eq!(m.phase(), Phase::Idle);
        assert!(outcome.effects.ends_with(&[Effect::StopListening, Effect::ResetTranscript]));

        let entry = m.log().get(id).unwrap();
        assert_eq!(entry.got_off_at.as_deref(), Some("Alvaston"));
        assert_eq!(entry.stops_taken, entry.full_route);
        assert!(!entry.is_open());
    }

    #[test]
    fn test_get_off_finalizes_at_current_stop() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let id = m.journey().unwrap().journey_id;
        run(&mut m, Intent::AdvanceStop, &t0());

        let outcome = run(&mut m, Intent::GetOff, &t0());

        assert_eq!(outcome.spoken(), vec!["You got off at Derwent Street."]);
        assert!(outcome.effects.contains(&Effect::Vibrate(vec![200, 100, 200])));
        assert_eq!(m.phase(), Phase::Idle);
        let entry = m.log().get(id).unwrap();
        assert_eq!(entry.got_off_at.as_deref(), Some("Derwent Street"));
        assert_eq!(
            entry.stops_taken,
            vec!["Morledge".to_string(), "Derwent Street".to_string()]
        );
    }

    #[test]
    fn test_get_off_at_first_stop() {
        let (mut m, _store) = machine();
        select(&mut m, "alvaston");
        let id = m.journey().unwrap().journey_id;

        run(&mut m, Intent::GetOff, &t0());

        assert_eq!(m.log().get(id).unwrap().got_off_at.as_deref(), Some("Morledge"));
    }

    #[test]
    fn test_confirm_destination_before_final_stop_is_premature() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");

        let outcome = run(&mut m, Intent::ConfirmDestinationReached, &t0());

        assert_eq!(outcome.error, Some(JourneyError::PrematureDestinationClaim));
        assert_eq!(m.phase(), Phase::EnRoute);
        assert_eq!(m.journey().unwrap().current_stop_index(), 0);
    }

    #[test]
    fn test_confirm_destination_at_final_stop() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let id = m.journey().unwrap().journey_id;
        for _ in 0..3 {
            run(&mut m, Intent::AdvanceStop, &t0());
        }

        let outcome = run(&mut m, Intent::ConfirmDestinationReached, &t0());

        assert_eq!(outcome.spoken(), vec![DESTINATION_REACHED_TEXT]);
        assert_eq!(m.phase(), Phase::Idle);
        assert_eq!(m.log().get(id).unwrap().got_off_at.as_deref(), Some("Alvaston"));
    }

    #[test]
    fn test_journey_ops_without_journey_are_rejected() {
        for intent in [
            Intent::AdvanceStop,
            Intent::ConfirmDestinationReached,
            Intent::GetOff,
            Intent::ExitRoute,
            Intent::CancelSelection,
        ] {
            let (mut m, _store) = machine();
            let outcome = run(&mut m, intent.clone(), &t0());
            assert_eq!(
                outcome.error,
                Some(JourneyError::NoRouteSelected),
                "intent: {}",
                intent.name()
            );
            assert_eq!(m.phase(), Phase::Idle);
        }
    }

    #[test]
    fn test_exit_route_abandons_journey() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let id = m.journey().unwrap().journey_id;
        run(&mut m, Intent::AdvanceStop, &t0());

        let outcome = run(&mut m, Intent::ExitRoute, &t0());

        assert_eq!(outcome.spoken(), vec![ROUTE_EXITED_TEXT]);
        assert_eq!(m.phase(), Phase::Idle);
        let entry = m.log().get(id).unwrap();
        assert_eq!(entry.got_off_at, None);
        assert!(!entry.is_open());
        assert_eq!(entry.stops_taken.len(), 2);
    }

    #[test]
    fn test_exit_route_from_open_prompt() {
        let (mut m, _store) = machine();
        run(&mut m, Intent::BeginSelection, &t0());

        let outcome = run(&mut m, Intent::ExitRoute, &t0());

        assert_eq!(outcome.error, None);
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn test_cancel_selection_returns_to_running_journey() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        run(&mut m, Intent::BeginSelection, &t0());
        assert_eq!(m.phase(), Phase::SelectingDestination);

        let outcome = run(&mut m, Intent::CancelSelection, &t0());

        assert_eq!(outcome.spoken(), vec![SELECTION_CANCELLED_TEXT]);
        assert_eq!(m.phase(), Phase::EnRoute);
        assert!(outcome.effects.ends_with(&[Effect::ResetTranscript, Effect::StartListening]));
    }

    #[test]
    fn test_cancel_selection_without_journey_goes_idle() {
        let (mut m, _store) = machine();
        run(&mut m, Intent::BeginSelection, &t0());

        run(&mut m, Intent::CancelSelection, &t0());

        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn test_journey_ops_work_while_reselecting() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        run(&mut m, Intent::BeginSelection, &t0());

        let outcome = run(&mut m, Intent::AdvanceStop, &t0());

        assert_eq!(outcome.spoken(), vec!["Next stop: Derwent Street."]);
        assert_eq!(m.phase(), Phase::SelectingDestination);
    }

    #[test]
    fn test_new_selection_replaces_active_journey() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let first = m.journey().unwrap().journey_id;

        select(&mut m, "chellaston");

        let second = m.journey().unwrap().journey_id;
        assert_ne!(first, second);
        assert_eq!(m.log().len(), 2);
        let abandoned = m.log().get(first).unwrap();
        assert!(!abandoned.is_open());
        assert_eq!(abandoned.got_off_at, None);
        assert!(m.log().get(second).unwrap().is_open());
    }

    #[test]
    fn test_ask_destination_requests_phrase() {
        let (mut m, _store) = machine();
        let outcome = run(&mut m, Intent::AskDestination, &t0());
        assert_eq!(
            outcome.spoken(),
            vec!["Please specify a destination, like Pride Park."]
        );
        assert_eq!(
            outcome.effects[0],
            Effect::ShowError("Please specify a destination, like Pride Park.".to_string())
        );
    }

    #[test]
    fn test_errors_within_cooldown_are_silent() {
        let (mut m, _store) = machine();

        let first = run(&mut m, Intent::AdvanceStop, &t0());
        let second = run(&mut m, Intent::GetOff, &later(4999));
        let third = run(&mut m, Intent::GetOff, &later(5000));

        assert_eq!(first.spoken().len(), 1);
        assert!(second.spoken().is_empty());
        assert_eq!(second.error, Some(JourneyError::NoRouteSelected));
        assert!(!second.effects.iter().any(|e| matches!(e, Effect::ShowError(_))));
        assert_eq!(third.spoken().len(), 1);
    }

    #[test]
    fn test_begin_selection_resets_throttle() {
        let (mut m, _store) = machine();
        run(&mut m, Intent::AdvanceStop, &t0());
        run(&mut m, Intent::BeginSelection, &later(10));

        let outcome = select(&mut m, "the moon");

        assert_eq!(outcome.spoken(), vec!["No buses found for this destination."]);
    }

    #[test]
    fn test_unknown_has_no_effects() {
        let (mut m, _store) = machine();
        select(&mut m, "pride park");
        let outcome = run(&mut m, Intent::Unknown, &t0());
        assert!(outcome.effects.is_empty());
        assert_eq!(outcome.error, None);
    }

    #[test]
    fn test_read_and_clear_logs() {
        let (mut m, store) = machine();
        select(&mut m, "pride park");
        run(&mut m, Intent::GetOff, &t0());

        let read = run(&mut m, Intent::ReadLogs, &t0());
        assert!(read.spoken()[0].starts_with("Journey 1. Selected destination: pride park, Bus 1A."));

        let cleared = run(&mut m, Intent::ClearLogs, &t0());
        assert_eq!(cleared.spoken(), vec![LOGS_CLEARED_TEXT]);
        assert!(m.log().is_empty());
        assert_eq!(store.snapshot(), None);

        let read = run(&mut m, Intent::ReadLogs, &t0());
        assert_eq!(read.spoken(), vec!["No logs available yet."]);
    }

    #[test]
    fn test_query_time_and_help() {
        let (mut m, _store) = machine();
        let time = run(&mut m, Intent::QueryTime, &t0());
        assert_eq!(time.spoken(), vec!["The time is 15:30."]);

        let help = run(&mut m, Intent::Help, &t0());
        let text = help.spoken()[0];
        assert!(text.starts_with("You can say: next bus to a destination, next stop,"));
        assert!(text.ends_with(", or what time is it."));
    }

    #[test]
    fn test_dispatch_while_processing_is_dropped() {
        let (mut m, _store) = machine();
        let first = m.dispatch(Intent::BeginSelection, &t0());
        assert!(!first.dropped);
        assert!(m.is_processing());

        let second = m.dispatch(Intent::CancelSelection, &t0());
        assert!(second.dropped);
        assert!(second.effects.is_empty());
        assert_eq!(m.phase(), Phase::SelectingDestination);

        m.finish_processing();
        let third = m.dispatch(Intent::CancelSelection, &t0());
        assert!(!third.dropped);
        assert_eq!(m.phase(), Phase::Idle);
    }

    #[test]
    fn test_haptics_disabled() {
        let log = JourneyLog::new(Box::new(MemoryLogStore::new()));
        let settings = MachineSettings {
            haptics: false,
            ..MachineSettings::default()
        };
        let mut m = JourneyStateMachine::new(Arc::new(StaticCatalog::derby()), log, settings);

        let outcome = select(&mut m, "pride park");

        assert!(!outcome.effects.iter().any(|e| matches!(e, Effect::Vibrate(_))));
    }

    #[test]
    fn test_interpret_uses_prompt_context() {
        let (mut m, _store) = machine();
        assert_eq!(m.interpret("pride park"), Intent::Unknown);
        run(&mut m, Intent::BeginSelection, &t0());
        assert_eq!(
            m.interpret("pride park"),
            Intent::SelectDestination("pride park".to_string())
        );
    }

    #[test]
    fn test_spoken_list() {
        let items = |xs: &[&str]| xs.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(spoken_list(&items(&[])), "");
        assert_eq!(spoken_list(&items(&["a"])), "a");
        assert_eq!(spoken_list(&items(&["a", "b"])), "a or b");
        assert_eq!(spoken_list(&items(&["a", "b", "c"])), "a, b, or c");
    }
}
