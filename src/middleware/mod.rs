//! Request-level adapter around the schema check.
//!
//! A [`RequestValidator`] holds up to three schemas, one each for the
//! request body, path parameters and query string. Checking a request
//! either lets it continue or produces a [`Rejection`] carrying every
//! error found, which renders as a client-error response.

#[cfg(feature = "axum")]
pub mod axum_bridge;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ValidatorConfig;
use crate::types::{Place, Schema};
use crate::validation::{ValidationError, Validator};

/// The parsed fragments of an incoming request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParts {
    pub body: Value,
    pub params: Value,
    pub query: Value,
}

impl Default for RequestParts {
    fn default() -> Self {
        Self {
            body: Value::Object(Map::new()),
            params: Value::Object(Map::new()),
            query: Value::Object(Map::new()),
        }
    }
}

impl RequestParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }
}

/// Checks requests against optional body, params and query schemas.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    body: Option<Schema>,
    params: Option<Schema>,
    query: Option<Schema>,
    validator: Validator,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, schema: Schema) -> Self {
        self.body = Some(schema);
        self
    }

    pub fn with_params(mut self, schema: Schema) -> Self {
        self.params = Some(schema);
        self
    }

    pub fn with_query(mut self, schema: Schema) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.validator = Validator::with_config(config);
        self
    }

    /// All errors for the request: body first, then params, then query.
    /// Fragments without a schema are not checked.
    pub fn errors(&self, request: &RequestParts) -> Vec<ValidationError> {
        let checks = [
            (&self.body, &request.body, Place::body()),
            (&self.params, &request.params, Place::params()),
            (&self.query, &request.query, Place::query()),
        ];

        checks
            .into_iter()
            .filter_map(|(schema, data, place)| {
                schema
                    .as_ref()
                    .map(|schema| self.validator.check(data, schema, &place))
            })
            .flatten()
            .collect()
    }

    /// `Ok(())` when the request may continue down the pipeline.
    pub fn check(&self, request: &RequestParts) -> Result<(), Rejection> {
        let errors = self.errors(request);
        if errors.is_empty() {
            return Ok(());
        }

        tracing::debug!(errors = errors.len(), "request rejected by schema validation");
        Err(Rejection::new(errors))
    }
}

/// Build a request validator from optional body, params and query schemas.
pub fn validate(
    body: Option<Schema>,
    params: Option<Schema>,
    query: Option<Schema>,
) -> RequestValidator {
    RequestValidator {
        body,
        params,
        query,
        validator: Validator::new(),
    }
}

/// A request that failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("request rejected with {} validation error(s)", .errors.len())]
pub struct Rejection {
    errors: Vec<ValidationError>,
}

impl Rejection {
    /// HTTP status a rejection is answered with.
    pub const STATUS: u16 = 400;

    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn status(&self) -> u16 {
        Self::STATUS
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    pub fn body(&self) -> RejectionBody {
        RejectionBody {
            error: true,
            data: RejectionData {
                validation_errors: self.errors.clone(),
            },
        }
    }
}

/// Response body of a rejected request:
/// `{ "error": true, "data": { "validationErrors": [..] } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionBody {
    pub error: bool,
    pub data: RejectionData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionData {
    pub validation_errors: Vec<ValidationError>,
}
