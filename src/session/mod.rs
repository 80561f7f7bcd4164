//! Session lifecycle: state machine, status handle, and orchestration of
//! capture, transcription, and summarization.

pub mod machine;
pub mod status;

pub use machine::{SessionMachine, SessionStartOptions};
pub use status::{SessionPhase, SessionState, SessionStatusHandle};
