//! Rider-facing journey errors.
//!
//! None of these are fatal. The `Display` text is the sentence that gets
//! spoken and shown, subject to the error throttle.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    /// A journey-only or prompt-only command outside its valid state.
    #[error("No route selected. Select a destination first.")]
    NoRouteSelected,

    /// The destination text matched no catalog entry.
    #[error("No buses found for this destination.")]
    DestinationNotFound,

    /// The matched route has fewer than two stops.
    #[error("Invalid route: Not enough stops.")]
    InvalidRoute,

    /// Arrival claimed before the final stop.
    #[error("You have not reached your destination yet.")]
    PrematureDestinationClaim,

    /// "next bus" without a destination.
    #[error("Please specify a destination, like Pride Park.")]
    MissingDestinationPhrase,

    /// The recognizer heard nothing.
    #[error("Didn't catch that. Try again.")]
    RecognitionNoSpeech,

    /// The recognizer could not open the microphone.
    #[error("Didn't catch that. Try again.")]
    RecognitionAudioCapture,
}

impl JourneyError {
    /// Stable kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            JourneyError::NoRouteSelected => "no-route-selected",
            JourneyError::DestinationNotFound => "destination-not-found",
            JourneyError::InvalidRoute => "invalid-route",
            JourneyError::PrematureDestinationClaim => "premature-destination-claim",
            JourneyError::MissingDestinationPhrase => "missing-destination-phrase",
            JourneyError::RecognitionNoSpeech => "recognition-no-speech",
            JourneyError::RecognitionAudioCapture => "recognition-audio-capture",
        }
    }
}
