//! Offline summarization of a transcript text file.

use crate::cli::SummarizeCliArgs;
use crate::config::Config;
use crate::summary::{RemoteSummaryEngine, Summarizer};
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn handle_summarize_command(args: SummarizeCliArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(max_chunk) = args.max_chunk {
        config.summary.max_chunk_chars = max_chunk;
    }

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read transcript file {:?}", args.file))?;

    let engine = Arc::new(RemoteSummaryEngine::new(&config.summary.api_endpoint)?);
    let summarizer = Summarizer::new(engine, &config.summary);
    let bullets = summarizer.summarize(&text).await?;

    for bullet in bullets {
        println!("- {}", bullet);
    }

    Ok(())
}
