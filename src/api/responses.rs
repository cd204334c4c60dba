//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::SessionStatus,
    view::ViewModel,
};

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: SessionStatus,
    pub view: ViewModel,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, session: SessionStatus) -> Self {
        let view = ViewModel::from_status(&session);
        Self {
            status,
            message,
            timestamp: Utc::now(),
            session,
            view,
        }
    }

    /// Create a success response
    pub fn ok(message: String, session: SessionStatus) -> Self {
        Self::new("ok".to_string(), message, session)
    }

    /// Create an error response carrying the unchanged session
    pub fn error(message: String, session: SessionStatus) -> Self {
        Self::new("error".to_string(), message, session)
    }
}

/// Full status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub session: SessionStatus,
    pub view: ViewModel,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
