//! Audio capture for one recording session.
//!
//! An external ffmpeg process mixes the microphone and system loopback
//! inputs into a mono 16 kHz WAV file. The capture device is an exclusive
//! resource: at most one process may be active at a time, enforced by a
//! single-slot guard in [`FfmpegCapture`].

pub mod command;
pub mod recorder;

pub use command::{capture_args, ffmpeg_available, TARGET_SAMPLE_RATE};
pub use recorder::{AudioCapture, FfmpegCapture};
