pub mod args;
pub mod summarize;
pub mod transcribe;

pub use args::{Cli, CliCommand, SummarizeCliArgs, TranscribeCliArgs};
pub use summarize::handle_summarize_command;
pub use transcribe::handle_transcribe_command;
