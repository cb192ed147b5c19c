//! Data types for the journey state machine.

use crate::catalog::{BusService, RouteStop};
use crate::journey::error::JourneyError;
use uuid::Uuid;

/// Where the rider is in the selection/ride cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No prompt, no journey. Recognition is off.
    Idle,
    /// The destination prompt is open. A journey may still be running
    /// underneath it.
    SelectingDestination,
    /// Riding an active journey.
    EnRoute,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::SelectingDestination => "selecting-destination",
            Phase::EnRoute => "en-route",
        }
    }

    /// Whether recognition should be running in this phase.
    pub fn is_listening_eligible(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyStatus {
    Active,
    Completed,
}

/// A ride along one service's route.
///
/// `visited_stops` starts with the first stop and only grows;
/// `current_stop_index` never leaves the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    pub journey_id: Uuid,
    pub service_id: String,
    pub destination_label: String,
    route: Vec<RouteStop>,
    current_stop_index: usize,
    visited_stops: Vec<String>,
    status: JourneyStatus,
}

impl Journey {
    /// Board `service` at the first stop of `route`.
    ///
    /// Fails with [`JourneyError::InvalidRoute`] when the route has fewer
    /// than two stops.
    pub fn start(service: &BusService, route: Vec<RouteStop>) -> Result<Self, JourneyError> {
        let [first, _, ..] = route.as_slice() else {
            return Err(JourneyError::InvalidRoute);
        };
        let visited_stops = vec![first.name.clone()];
        Ok(Self {
            journey_id: Uuid::new_v4(),
            service_id: service.service_id.clone(),
            destination_label: service.destination_label.clone(),
            route,
            current_stop_index: 0,
            visited_stops,
            status: JourneyStatus::Active,
        })
    }

    pub fn route(&self) -> &[RouteStop] {
        &self.route
    }

    pub fn route_names(&self) -> Vec<String> {
        self.route.iter().map(|s| s.name.clone()).collect()
    }

    pub fn current_stop_index(&self) -> usize {
        self.current_stop_index
    }

    pub fn current_stop(&self) -> &RouteStop {
        // A journey cannot be built from a route shorter than two stops.
        &self.route[self.current_stop_index]
    }

    pub fn visited_stops(&self) -> &[String] {
        &self.visited_stops
    }

    pub fn status(&self) -> JourneyStatus {
        self.status
    }

    pub fn is_at_final_stop(&self) -> bool {
        self.current_stop_index + 1 >= self.route.len()
    }

    /// Move to the next stop and return it, or `None` at the final stop.
    pub fn advance(&mut self) -> Option<&RouteStop> {
        if self.is_at_final_stop() {
            return None;
        }
        self.current_stop_index += 1;
        let stop = &self.route[self.current_stop_index];
        self.visited_stops.push(stop.name.clone());
        Some(stop)
    }

    pub fn complete(&mut self) {
        self.status = JourneyStatus::Completed;
    }
}

/// Side effect requested by the state machine, applied by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Say this, cancelling whatever is being said.
    Speak(String),
    Vibrate(Vec<u64>),
    StartListening,
    StopListening,
    /// Drop the accumulated transcript so the next command starts clean.
    ResetTranscript,
    /// Show an error line in the status area.
    ShowError(String),
    ClearError,
}

/// Result of dispatching one intent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub effects: Vec<Effect>,
    /// The error the intent ran into, announced or not.
    pub error: Option<JourneyError>,
    /// The intent arrived while another was being handled and was ignored.
    pub dropped: bool,
}

impl Outcome {
    pub fn dropped() -> Self {
        Self {
            dropped: true,
            ..Self::default()
        }
    }

    /// Spoken lines, in order.
    pub fn spoken(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Speak(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
