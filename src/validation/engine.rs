//! Schema-driven check of one data fragment.
//!
//! A check runs in two phases. Structural checks (empty data, whitelist)
//! may end the check early at their own level. Otherwise every schema
//! field is evaluated rule by rule and errors accumulate, recursing into
//! nested objects described by [`Rule::Nested`].

use serde_json::Value;

use super::ValidationError;
use super::predicates::{
    is_email, join_literals, loose_string, matches_kind, own_key_count, own_keys,
    strict_equals, utf16_len,
};
use crate::config::ValidatorConfig;
use crate::types::{FieldSpec, Place, Rule, Schema, ValueKind};

pub const EMPTY_OBJECT: &str = "Empty object now allowed";
pub const FORBIDDEN_PROPERTY: &str = "forbidden property";
pub const VALUE_UNDEFINED: &str = "value is undefined";
pub const NOT_OBJECT: &str = "value is not object";
pub const INVALID_EMAIL: &str = "invalid email";
pub const PATTERN_MISMATCH: &str = "value is not corresponds specified regular expression";
pub const DEPTH_EXCEEDED: &str = "maximum nesting depth exceeded";

/// Stateless schema checker. One instance can serve any number of
/// concurrent checks.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Check `data` against `schema`, attributing errors to `place`.
    ///
    /// Returns the errors in evaluation order; an empty vector means the
    /// data conforms.
    pub fn check(&self, data: &Value, schema: &Schema, place: &Place) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.check_into(data, schema, place, &mut errors);

        tracing::debug!(place = %place, errors = errors.len(), "schema check finished");
        errors
    }

    fn check_into(
        &self,
        data: &Value,
        schema: &Schema,
        place: &Place,
        errors: &mut Vec<ValidationError>,
    ) {
        tracing::trace!(place = %place, fields = schema.len(), "checking fragment");

        let structural = self.structural_errors(data, schema, place);
        if !structural.is_empty() {
            errors.extend(structural);
            return;
        }

        for (name, spec) in schema.fields() {
            self.check_field(data.get(name), name, spec, place, errors);
        }
    }

    fn structural_errors(
        &self,
        data: &Value,
        schema: &Schema,
        place: &Place,
    ) -> Vec<ValidationError> {
        if own_key_count(data) == 0 {
            return vec![ValidationError::new(EMPTY_OBJECT, place)];
        }

        if !place.enforces_whitelist() {
            return Vec::new();
        }
        let Some(allowed) = schema.allowed_props() else {
            return Vec::new();
        };

        own_keys(data)
            .into_iter()
            .filter(|key| !allowed.contains(key))
            .map(|key| ValidationError::for_param(key, FORBIDDEN_PROPERTY, place))
            .collect()
    }

    fn check_field(
        &self,
        value: Option<&Value>,
        name: &str,
        spec: &FieldSpec,
        place: &Place,
        errors: &mut Vec<ValidationError>,
    ) {
        // Absent fields only answer to `required`.
        let Some(value) = value else {
            if spec.is_required() {
                errors.push(ValidationError::for_param(name, VALUE_UNDEFINED, place));
            }
            return;
        };

        let declared = spec.declared_kind();
        let fail = |errors: &mut Vec<ValidationError>, msg: String| {
            errors.push(ValidationError::for_param(name, msg, place));
        };

        for rule in spec.rules() {
            match rule {
                Rule::Required => {}
                Rule::Type(kind) => {
                    if !matches_kind(*kind, value) {
                        fail(errors, format!("value in not {}", kind));
                    }
                }
                Rule::Equals(allowed) => {
                    if !allowed.iter().any(|candidate| strict_equals(candidate, value)) {
                        fail(errors, format!("must equal one of [{}]", join_literals(allowed)));
                    }
                }
                Rule::Email => {
                    if !is_email(&loose_string(value)) {
                        fail(errors, INVALID_EMAIL.to_string());
                    }
                }
                Rule::Pattern(pattern) => {
                    if !pattern.is_match(&loose_string(value)) {
                        fail(errors, PATTERN_MISMATCH.to_string());
                    }
                }
                Rule::MaxStringLength(bound) => {
                    if let Some(length) = string_length(declared, *bound, value) {
                        if length > *bound {
                            fail(errors, format!("max string length is {}", bound));
                        }
                    }
                }
                Rule::MinStringLength(bound) => {
                    if let Some(length) = string_length(declared, *bound, value) {
                        if length < *bound {
                            fail(errors, format!("min string length is {}", bound));
                        }
                    }
                }
                Rule::ArrayElementType(kind) => {
                    if declared != Some(ValueKind::Array) {
                        continue;
                    }
                    if let Some(items) = value.as_array() {
                        if items.iter().any(|item| !matches_kind(*kind, item)) {
                            fail(
                                errors,
                                format!("array should contain elements with type {}", kind),
                            );
                        }
                    }
                }
                Rule::Nested(nested) => {
                    if place.is_body_rooted() {
                        self.check_nested(value, name, nested, place, errors);
                    }
                }
            }
        }
    }

    fn check_nested(
        &self,
        value: &Value,
        name: &str,
        nested: &Schema,
        place: &Place,
        errors: &mut Vec<ValidationError>,
    ) {
        if !value.is_object() {
            errors.push(ValidationError::for_param(name, NOT_OBJECT, place));
            return;
        }
        if nested.is_empty() {
            return;
        }

        let child = place.child(name);
        if child.depth() > self.config.max_depth {
            tracing::warn!(
                place = %place,
                field = name,
                max_depth = self.config.max_depth,
                "nested schema exceeds maximum depth"
            );
            errors.push(ValidationError::for_param(name, DEPTH_EXCEEDED, place));
            return;
        }

        self.check_into(value, nested, &child, errors);
    }
}

/// Length of a string value when a length bound applies to it: the field
/// is declared `type: "string"` and the bound is positive.
fn string_length(declared: Option<ValueKind>, bound: usize, value: &Value) -> Option<usize> {
    if declared != Some(ValueKind::String) || bound == 0 {
        return None;
    }
    value.as_str().map(utf16_len)
}

/// Check `data` against `schema` with the default configuration.
pub fn check(data: &Value, schema: &Schema, place: &Place) -> Vec<ValidationError> {
    Validator::new().check(data, schema, place)
}
