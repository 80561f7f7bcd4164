use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "briefly")]
#[command(about = "Meeting capture, transcription and summarization", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Transcribe and summarize a finished audio file
    Transcribe(TranscribeCliArgs),
    /// Summarize a transcript text file into bullet points
    Summarize(SummarizeCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct TranscribeCliArgs {
    /// Path to the audio file to transcribe
    pub file: PathBuf,
    /// Skip summarization and print only the transcript
    #[arg(long)]
    pub no_summary: bool,
}

#[derive(ClapArgs, Debug)]
pub struct SummarizeCliArgs {
    /// Path to a plain-text transcript file
    pub file: PathBuf,
    /// Override the configured chunk size in characters
    #[arg(long)]
    pub max_chunk: Option<usize>,
}
