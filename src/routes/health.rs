//! Health check endpoints
//!
//! - /health, /healthz - Liveness probe (is the service running?)
//! - /version - Build metadata for deployment verification

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use serde::Serialize;

use crate::server::AppState;

/// Liveness response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub healthy: bool,
    pub status: &'static str,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Currently attached streaming listeners
    pub listeners: usize,
    pub max_listeners: usize,
    /// Loaded principle count
    pub principles: usize,
    pub timestamp: String,
}

/// Build version information
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

pub fn build_health_response(state: &AppState) -> HealthResponse {
    let registry = &state.registry;
    HealthResponse {
        healthy: true,
        status: if registry.is_at_capacity() { "degraded" } else { "online" },
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        listeners: registry.listener_count(),
        max_listeners: registry.config().max_listeners,
        principles: state.scorer.table().len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

/// GET /health
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    super::json_ok(&build_health_response(state))
}

/// GET /version
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "maat-engine",
    };
    super::json_ok(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use crate::principles::PrincipleTable;

    #[test]
    fn test_health_counts_listeners() {
        let state = AppState::new(Args::default(), PrincipleTable::default());
        let (_handle, _rx) = state.registry.try_attach().unwrap();

        let health = build_health_response(&state);
        assert!(health.healthy);
        assert_eq!(health.status, "online");
        assert_eq!(health.listeners, 1);
        assert_eq!(health.principles, 9);
    }

    #[test]
    fn test_health_serialization() {
        let state = AppState::new(Args::default(), PrincipleTable::default());
        let json = serde_json::to_string(&build_health_response(&state)).unwrap();
        assert!(json.contains("\"maxListeners\""));
        assert!(json.contains("\"healthy\":true"));
    }

    #[test]
    fn test_version_info_status() {
        assert_eq!(version_info().status(), hyper::StatusCode::OK);
    }
}
