//! Request/response validation endpoint
//!
//! `POST /validate` with `{"message": "..."}` returns the scored result.
//! An empty message is scored like any other text; only an unreadable or
//! malformed body is rejected.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::scorer::{ScoreResult, Scorer};
use crate::server::AppState;
use crate::types::{MaatError, Result};

/// Body of `POST /validate`
#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    pub message: String,
}

/// Parse a request body and score its message
pub fn validate_body(scorer: &Scorer, body: &[u8]) -> Result<ScoreResult> {
    let request: ValidationRequest = serde_json::from_slice(body)?;
    Ok(scorer.score(&request.message))
}

/// POST /validate
pub async fn handle_validate(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body = match req.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Validate request body error: {}", e);
            return super::error_response(MaatError::BadRequest(
                "Failed to read request body".to_string(),
            ));
        }
    };

    match validate_body(&state.scorer, &body) {
        Ok(result) => {
            debug!(
                coherence = result.coherence,
                field = %result.emotional_field,
                "Validated request"
            );
            super::json_ok(&result)
        }
        Err(err) => {
            warn!("Validate request rejected: {}", err);
            super::error_response(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principles::PrincipleTable;
    use crate::scorer::EmotionalField;

    fn scorer() -> Scorer {
        Scorer::new(Arc::new(PrincipleTable::default()))
    }

    #[test]
    fn test_validate_body() {
        let result = validate_body(&scorer(), br#"{"message": "I seek truth and justice"}"#).unwrap();
        assert_eq!(&result.matched_principle_ids[..2], &[1, 2]);
    }

    #[test]
    fn test_empty_message_is_not_an_error() {
        let result = validate_body(&scorer(), br#"{"message": ""}"#).unwrap();
        assert_eq!(result.coherence, 30.0);
        assert_eq!(result.emotional_field, EmotionalField::Negative);
    }

    #[test]
    fn test_malformed_bodies_are_bad_requests() {
        let bodies: [&[u8]; 4] = [b"not json", br#"{"text": "hi"}"#, br#"{"message": 42}"#, b""];
        for body in bodies {
            let err = validate_body(&scorer(), body).unwrap_err();
            assert!(matches!(err, MaatError::BadRequest(_)));
        }
    }
}
