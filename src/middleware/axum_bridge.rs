//! axum integration for [`RequestValidator`].
//!
//! Install [`validate_request`] with `route_layer` so path parameters are
//! already matched when it runs:
//!
//! ```rust,ignore
//! let validator = Arc::new(validate(Some(body_schema), None, None));
//! let app = Router::new()
//!     .route("/users/:id", post(create_user))
//!     .route_layer(middleware::from_fn_with_state(validator, validate_request));
//! ```

use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{FromRequestParts, Query, RawPathParams, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use super::{Rejection, RequestParts, RequestValidator};

/// Largest request body buffered for validation.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.body())).into_response()
    }
}

/// Middleware function: rejects the request with `400` and the error list,
/// or forwards it with its body intact.
pub async fn validate_request(
    State(validator): State<Arc<RequestValidator>>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "failed to buffer request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let request_parts = RequestParts {
        body: body_value(&bytes),
        params: Value::Object(path_params(&mut parts).await),
        query: Value::Object(query_params(&parts)),
    };

    if let Err(rejection) = validator.check(&request_parts) {
        return rejection.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// An empty body validates as an empty object; unparsable JSON as `null`.
fn body_value(bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Object(Map::new());
    }
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

async fn path_params(parts: &mut Parts) -> Map<String, Value> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(value)))
            .collect(),
        Err(_) => Map::new(),
    }
}

fn query_params(parts: &Parts) -> Map<String, Value> {
    match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
        Ok(Query(pairs)) => pairs
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect(),
        Err(err) => {
            tracing::debug!(error = %err, "failed to parse query string");
            Map::new()
        }
    }
}
