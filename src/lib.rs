//! Briefly: meeting capture, transcription and bullet-point summarization.
//!
//! The core is a capture-transcribe-summarize pipeline: an external ffmpeg
//! process records the meeting, an injectable speech engine turns the
//! finished audio into text, and a chunked summarizer condenses the
//! transcript into ordered bullet points. The session machine in
//! [`session`] ties the three together and is driven over a local HTTP API.

pub mod api;
pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod global;
pub mod session;
pub mod summary;
pub mod transcription;

pub use error::PipelineError;
