//! Journey state: phases, the active journey, and the machine driving them.

pub mod error;
pub mod machine;
pub mod types;

pub use error::JourneyError;
pub use machine::{JourneyStateMachine, MachineSettings};
pub use types::{Effect, Journey, JourneyStatus, Outcome, Phase};
