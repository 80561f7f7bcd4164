//! Session control endpoints.
//!
//! Provides HTTP endpoints for:
//! - Starting a session (POST /sessions/start)
//! - Stopping a session and kicking off processing (POST /sessions/stop)
//! - Re-running processing for a stopped session (POST /sessions/process)
//! - Polling session status (GET /sessions/status)
//!
//! Each command carries a oneshot reply channel so the handler can report
//! the machine's actual outcome: a busy device answers 409, a recording
//! with no audio answers 422, and so on per the `ApiError` mapping.

use crate::api::error::{ApiError, ApiResult};
use crate::error::PipelineError;
use crate::session::{SessionStartOptions, SessionState, SessionStatusHandle};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Commands forwarded to the session machine loop. The loop sends the
/// operation's result back on `reply`.
pub enum ApiCommand {
    Start {
        options: SessionStartOptions,
        reply: oneshot::Sender<Result<SessionState, PipelineError>>,
    },
    Stop {
        reply: oneshot::Sender<Result<SessionState, PipelineError>>,
    },
    Process {
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
}

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionsState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: SessionStatusHandle,
}

/// Request body for the start endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SessionStartRequest {
    pub meeting_link: Option<String>,
}

pub fn router(state: SessionsState) -> Router {
    Router::new()
        .route("/sessions/start", post(start_session))
        .route("/sessions/stop", post(stop_session))
        .route("/sessions/process", post(process_session))
        .route("/sessions/status", get(session_status))
        .with_state(state)
}

async fn start_session(
    State(state): State<SessionsState>,
    body: Option<Json<SessionStartRequest>>,
) -> ApiResult<Json<Value>> {
    let options = SessionStartOptions {
        meeting_link: body.and_then(|Json(req)| req.meeting_link),
    };

    info!("Session start command received via API");

    let started = send_command(&state, |reply| ApiCommand::Start { options, reply })
        .await?
        .map_err(|e| ApiError::from(&e))?;

    Ok(Json(json!({
        "success": true,
        "session_id": started.id.map(|id| id.to_string()),
        "phase": started.phase.as_str(),
        "audio_path": started.audio_path.map(|p| p.to_string_lossy().to_string()),
    })))
}

async fn stop_session(State(state): State<SessionsState>) -> ApiResult<Json<Value>> {
    info!("Session stop command received via API");

    let stopped = send_command(&state, |reply| ApiCommand::Stop { reply })
        .await?
        .map_err(|e| ApiError::from(&e))?;

    Ok(Json(json!({
        "success": true,
        "session_id": stopped.id.map(|id| id.to_string()),
        "phase": stopped.phase.as_str(),
        "duration_seconds": stopped.duration_seconds(),
    })))
}

async fn process_session(State(state): State<SessionsState>) -> ApiResult<Json<Value>> {
    info!("Session process command received via API");

    send_command(&state, |reply| ApiCommand::Process { reply })
        .await?
        .map_err(|e| ApiError::conflict(e.to_string()))?;

    let status = state.status.get().await;
    Ok(Json(json!({
        "success": true,
        "session_id": status.id.map(|id| id.to_string()),
        "phase": status.phase.as_str(),
    })))
}

async fn session_status(State(state): State<SessionsState>) -> Json<Value> {
    let status = state.status.get().await;
    Json(session_status_json(&status))
}

/// Send a command to the machine loop and wait for its reply.
async fn send_command<T>(
    state: &SessionsState,
    command: impl FnOnce(oneshot::Sender<T>) -> ApiCommand,
) -> Result<T, ApiError> {
    let (reply, rx) = oneshot::channel();
    state
        .tx
        .send(command(reply))
        .await
        .map_err(|_| ApiError::internal("session machine loop is not running"))?;

    rx.await
        .map_err(|_| ApiError::internal("session machine dropped the reply"))
}

fn session_status_json(status: &SessionState) -> Value {
    json!({
        "phase": status.phase.as_str(),
        "session_id": status.id.map(|id| id.to_string()),
        "meeting_link": status.meeting_link,
        "audio_path": status.audio_path.as_ref().map(|p| p.to_string_lossy().to_string()),
        "duration_seconds": status.duration_seconds(),
        "transcript": status.transcript,
        "bullets": status.bullets,
        "error_kind": status.error_kind,
        "last_error": status.last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPhase;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::path::PathBuf;
    use tower::ServiceExt;
    use uuid::Uuid;

    /// Router backed by a loop that answers every command with a fixed
    /// start/stop result.
    fn stub_router(
        start: impl Fn() -> Result<SessionState, PipelineError> + Send + 'static,
        stop: impl Fn() -> Result<SessionState, PipelineError> + Send + 'static,
    ) -> Router {
        let (tx, mut rx) = mpsc::channel::<ApiCommand>(4);
        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    ApiCommand::Start { reply, .. } => {
                        let _ = reply.send(start());
                    }
                    ApiCommand::Stop { reply } => {
                        let _ = reply.send(stop());
                    }
                    ApiCommand::Process { reply } => {
                        let _ = reply.send(Ok(()));
                    }
                }
            }
        });

        router(SessionsState {
            tx,
            status: SessionStatusHandle::default(),
        })
    }

    fn recording_state() -> SessionState {
        SessionState {
            phase: SessionPhase::Recording,
            id: Some(Uuid::new_v4()),
            audio_path: Some(PathBuf::from("/tmp/meeting.wav")),
            ..Default::default()
        }
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_start_success_is_ok() {
        let app = stub_router(|| Ok(recording_state()), || Ok(SessionState::default()));
        let response = app.oneshot(post("/sessions/start")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_start_while_busy_is_conflict() {
        let app = stub_router(
            || Err(PipelineError::CaptureBusy),
            || Ok(SessionState::default()),
        );
        let response = app.oneshot(post("/sessions/start")).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_stop_with_no_audio_is_unprocessable() {
        let app = stub_router(
            || Ok(recording_state()),
            || {
                Err(PipelineError::NoAudioCaptured {
                    path: PathBuf::from("/tmp/meeting.wav"),
                })
            },
        );
        let response = app.oneshot(post("/sessions/stop")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_status_json_carries_error_kind() {
        let mut state = SessionState::default();
        state.phase = SessionPhase::Failed;
        state.error_kind = Some("no_audio_captured");
        state.last_error = Some("no audio was captured".to_string());

        let value = session_status_json(&state);
        assert_eq!(value["phase"], "failed");
        assert_eq!(value["error_kind"], "no_audio_captured");
    }

    #[test]
    fn test_status_json_includes_bullets_when_summarized() {
        let mut state = SessionState::default();
        state.phase = SessionPhase::Summarized;
        state.bullets = Some(vec!["We shipped it.".to_string()]);

        let value = session_status_json(&state);
        assert_eq!(value["phase"], "summarized");
        assert_eq!(value["bullets"][0], "We shipped it.");
    }
}
