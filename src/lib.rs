//! # request-schema
//!
//! Declarative validation of request payloads. A compact schema names the
//! constraints each field must satisfy; checking data against it yields a
//! list of structured errors, empty when the data conforms.
//!
//! ## Features
//!
//! - **Typed rules**: `required`, `type`, `equals`, `isEmail`, `regexp`,
//!   string length bounds and array element types, parsed once into a
//!   closed [`Rule`] set
//! - **Nested objects**: `_store` describes the shape of object-valued
//!   fields and is checked recursively
//! - **Whitelists**: `_allowedProps` rejects unexpected keys in bodies and
//!   query strings
//! - **Request adapter**: body, params and query checked together, with a
//!   ready-made `400` response body (and axum middleware behind the `axum`
//!   feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use request_schema::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let schema: Schema = r#"{
//!     "email": { "required": true, "type": "string", "isEmail": true },
//!     "age": { "type": "number" }
//! }"#
//! .parse()?;
//!
//! let errors = check(&json!({ "age": "42" }), &schema, &Place::body());
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].msg, "value is undefined");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod types;
pub mod validation;

pub use config::ValidatorConfig;
pub use error::{Result, SchemaError};
pub use middleware::{
    Rejection, RejectionBody, RejectionData, RequestParts, RequestValidator, validate,
};
pub use types::*;
pub use validation::{ValidationError, Validator, check};
