//! Informational root endpoint

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::server::AppState;

pub const SERVICE_NAME: &str = "MA'AT Engine API";

/// Static service metadata returned by `GET /`
#[derive(Debug, Serialize)]
pub struct RootInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
    pub principles: usize,
    pub status: &'static str,
}

pub fn build_root_info(state: &AppState) -> RootInfo {
    let endpoints = BTreeMap::from([
        ("POST /validate", "REST API for validation"),
        ("WS /ws", "WebSocket for real-time validation"),
        ("GET /health", "Liveness probe"),
        ("GET /version", "Build information"),
    ]);

    RootInfo {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
        principles: state.scorer.table().len(),
        status: "☥ Ready to validate thoughts in real-time",
    }
}

/// GET /
pub fn root_info(state: &AppState) -> Response<Full<Bytes>> {
    super::json_ok(&build_root_info(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use crate::principles::PrincipleTable;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_root_info_body() {
        let state = AppState::new(Args::default(), PrincipleTable::default());
        let response = root_info(&state);
        assert_eq!(response.status(), hyper::StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["service"], "MA'AT Engine API");
        assert_eq!(json["principles"], 9);
        assert!(json["endpoints"]["POST /validate"].is_string());
        assert!(json["endpoints"]["WS /ws"].is_string());
    }
}
