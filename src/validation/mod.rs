#![allow(clippy::uninlined_format_args)]

pub mod engine;
pub mod predicates;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Place;

pub use engine::{
    DEPTH_EXCEEDED, EMPTY_OBJECT, FORBIDDEN_PROPERTY, INVALID_EMAIL, NOT_OBJECT,
    PATTERN_MISMATCH, VALUE_UNDEFINED, Validator, check,
};

/// One rule violation found in the data.
///
/// Serializes as `{ "param": .., "msg": .., "place": .. }`, leaving out
/// `param` for errors about the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// Human-readable message
    pub msg: String,

    /// Validation context the field belongs to
    pub place: Place,
}

impl ValidationError {
    /// Error about the whole object at `place`.
    pub fn new(msg: impl Into<String>, place: &Place) -> Self {
        Self {
            param: None,
            msg: msg.into(),
            place: place.clone(),
        }
    }

    pub fn for_param(param: impl Into<String>, msg: impl Into<String>, place: &Place) -> Self {
        Self {
            param: Some(param.into()),
            msg: msg.into(),
            place: place.clone(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}.{}: {}", self.place, param, self.msg),
            None => write!(f, "{}: {}", self.place, self.msg),
        }
    }
}
