//! Service composition root.
//!
//! Constructs the capture backend, the speech and summarization engines
//! (once, shared by reference), wires them into the session machine, starts
//! the API server, and runs the command loop.

use crate::api::{ApiCommand, ApiServer};
use crate::capture::FfmpegCapture;
use crate::config::Config;
use crate::export::{ShellCommandHook, SummaryFileExporter};
use crate::global;
use crate::session::{SessionMachine, SessionPhase, SessionStatusHandle};
use crate::summary::{RemoteSummaryEngine, Summarizer};
use crate::transcription::Transcriber;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn run_service() -> Result<()> {
    info!("Starting Briefly service");

    let config = Config::load()?;

    let (tx, mut rx) = mpsc::channel::<ApiCommand>(10);

    let capture = Arc::new(FfmpegCapture::new(config.capture.clone()));
    let transcriber = Arc::new(Transcriber::from_config(&config.speech)?);
    let summary_engine = Arc::new(RemoteSummaryEngine::new(&config.summary.api_endpoint)?);
    let summarizer = Arc::new(Summarizer::new(summary_engine, &config.summary));
    let exporter = Arc::new(SummaryFileExporter::new(global::artifacts_dir()?));

    let hook = if config.export.post_command.trim().is_empty() {
        None
    } else {
        Some(Arc::new(ShellCommandHook::new(
            config.export.post_command.clone(),
            config.export.post_command_timeout_seconds,
        )) as Arc<dyn crate::export::PostSessionHook>)
    };

    let status_handle = SessionStatusHandle::default();
    let machine = SessionMachine::new(
        capture,
        transcriber,
        summarizer,
        exporter,
        hook,
        status_handle.clone(),
        global::recordings_dir()?,
    );

    let api_server = ApiServer::new(config.api.port, tx, status_handle.clone());
    let port = config.api.port;
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("Briefly is ready!");
    info!(
        "Start a session: curl -X POST http://127.0.0.1:{}/sessions/start",
        port
    );

    while let Some(command) = rx.recv().await {
        match command {
            ApiCommand::Start { options, reply } => {
                let result = machine.begin(options).await;
                match &result {
                    Ok(state) => info!(
                        "Session {} recording",
                        state.id.map(|id| id.to_string()).unwrap_or_default()
                    ),
                    Err(e) => error!("Failed to start session: {}", e),
                }
                let _ = reply.send(result);
            }
            ApiCommand::Stop { reply } => {
                let result = machine.end().await;
                match &result {
                    Ok(state) if state.phase == SessionPhase::Stopped => {
                        info!("Recording stopped, processing audio");
                        if let Err(e) = machine.process().await {
                            error!("Failed to start processing: {}", e);
                        }
                    }
                    Ok(state) => info!("Session is currently {}", state.phase.as_str()),
                    Err(e) => error!("Failed to stop session: {}", e),
                }
                let _ = reply.send(result);
            }
            ApiCommand::Process { reply } => {
                let result = machine.process().await.map(|_| ());
                if let Err(e) = &result {
                    error!("Failed to start processing: {}", e);
                }
                let _ = reply.send(result);
            }
        }
    }

    Ok(())
}
