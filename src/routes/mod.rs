//! HTTP routes for the MA'AT engine

pub mod health;
pub mod info;
pub mod stream;
pub mod validate;

pub use health::{health_check, version_info};
pub use info::root_info;
pub use stream::handle_stream;
pub use validate::handle_validate;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use hyper::{Response, StatusCode};

use crate::types::MaatError;

/// JSON response with permissive CORS
pub(crate) fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Serialize `value` as a 200 JSON response
pub(crate) fn json_ok<T: serde::Serialize>(value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_string(value) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => error_response(MaatError::Internal(format!("serialization failed: {}", e))),
    }
}

/// Map an engine error onto its HTTP response
pub(crate) fn error_response(err: MaatError) -> Response<Full<Bytes>> {
    let (status, body) = err.into_status_code_and_body();
    json_response(status, body)
}
