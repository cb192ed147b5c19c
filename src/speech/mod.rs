//! Speech ports: synthesis out, recognition in.

pub mod recognition;
pub mod synthesis;

pub use recognition::{
    ListenOptions, RecognitionErrorKind, Recognizer, RecognizerCall, RecordingRecognizer,
};
pub use synthesis::{RecordingSpeaker, Speaker};
