//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::{
    error::StateError,
    state::{AppState, SessionEvent, SessionStatus, SettingsUpdate},
    view::ViewModel,
};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Request body for the single-duration endpoints
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DurationRequest {
    pub seconds: u64,
}

/// Turn the outcome of a session command into an HTTP response
fn command_response(state: &AppState, result: Result<SessionStatus, StateError>, message: &str) -> Response {
    match result {
        Ok(session) => Json(ApiResponse::ok(message.to_string(), session)).into_response(),
        Err(e) if e.is_invalid_input() => {
            warn!("Rejected session command: {}", e);
            match state.get_status() {
                Ok(session) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::error(e.to_string(), session)),
                )
                    .into_response(),
                Err(e) => {
                    error!("Failed to get session status: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        Err(e) => {
            error!("Session command failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle POST /toggle - Start the speech phase, or stop and re-arm
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Response {
    let result = state.toggle();
    let message = match &result {
        Ok(session) if session.phase.is_active() => "Session started",
        _ => "Session stopped",
    };
    command_response(&state, result, message)
}

/// Handle POST /reset - Re-arm the session with the current settings
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Response {
    info!("Reset endpoint called");
    command_response(&state, state.initialize(), "Session reset")
}

/// Handle PUT /settings - Change one or both durations
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    if update.is_empty() {
        return match state.get_status() {
            Ok(session) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("No settings given".to_string(), session)),
            )
                .into_response(),
            Err(e) => {
                error!("Failed to get session status: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    command_response(&state, state.update_settings(update), "Settings updated, session reset")
}

/// Handle PUT /settings/speech - Change the speech duration
pub async fn speech_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Response {
    command_response(
        &state,
        state.set_speech_duration(request.seconds),
        "Speech duration updated, session reset",
    )
}

/// Handle PUT /settings/discussion - Change the discussion duration
pub async fn discussion_duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DurationRequest>,
) -> Response {
    command_response(
        &state,
        state.set_discussion_duration(request.seconds),
        "Discussion duration updated, session reset",
    )
}

/// Handle GET /status - Return the session status and its view model
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let session = match state.get_status() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get session status: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();
    let view = ViewModel::from_status(&session);

    Ok(Json(StatusResponse {
        session,
        view,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

fn event_name(event: &SessionEvent) -> &'static str {
    match event {
        SessionEvent::PhaseChanged { .. } => "phase_changed",
        SessionEvent::Tick { .. } => "tick",
    }
}

/// Handle GET /events - Stream phase changes and ticks as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Event stream client connected");
    let events = state.subscribe_events();

    let stream = stream::unfold(events, |mut events| async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let sse = match Event::default().event(event_name(&event)).json_data(&event) {
                        Ok(sse) => sse,
                        Err(e) => {
                            warn!("Failed to encode session event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok(sse), events));
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Event stream client lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
