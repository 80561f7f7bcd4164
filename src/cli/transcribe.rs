//! One-shot transcription of an existing audio file from the command line.

use crate::cli::TranscribeCliArgs;
use crate::config::Config;
use crate::summary::{RemoteSummaryEngine, Summarizer};
use crate::transcription::Transcriber;
use anyhow::Result;
use std::sync::Arc;

pub async fn handle_transcribe_command(args: TranscribeCliArgs) -> Result<()> {
    let config = Config::load()?;

    let transcriber = Transcriber::from_config(&config.speech)?;
    let transcript = transcriber.transcribe(&args.file).await?;

    println!("Transcript:\n{}", transcript);

    if args.no_summary {
        return Ok(());
    }

    let engine = Arc::new(RemoteSummaryEngine::new(&config.summary.api_endpoint)?);
    let summarizer = Summarizer::new(engine, &config.summary);
    let bullets = summarizer.summarize(&transcript).await?;

    println!("\nBullet Points:");
    for bullet in bullets {
        println!("- {}", bullet);
    }

    Ok(())
}
