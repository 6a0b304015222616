use regex::Regex;
use serde_json::Value;

use super::kind::ValueKind;
use super::schema::Schema;
use crate::error::{Result, SchemaError};

/// A compiled `regexp` constraint. Keeps the source text for reporting and
/// for writing the schema back out.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let regex =
            Regex::new(&source).map_err(|err| SchemaError::invalid_pattern(source.clone(), err))?;
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Unanchored search, like `RegExp.prototype.test`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One constraint of a field spec.
///
/// Rules of a field run in the order of [`Rule::rank`], independent of the
/// order they were declared in.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Field must be present in the data.
    Required,
    /// Runtime shape of the value.
    Type(ValueKind),
    /// Value must be one of the listed literals.
    Equals(Vec<Value>),
    /// Value must look like an email address.
    Email,
    /// Value must match the regular expression.
    Pattern(Pattern),
    /// Upper bound on string length, only for `type: "string"` fields.
    MaxStringLength(usize),
    /// Lower bound on string length, only for `type: "string"` fields.
    MinStringLength(usize),
    /// Type every array element must have, only for `type: "array"` fields.
    ArrayElementType(ValueKind),
    /// Shape of a nested object value. Only applies under body-rooted places
    /// and always runs last.
    Nested(Schema),
}

impl Rule {
    pub fn rank(&self) -> u8 {
        match self {
            Rule::Required => 0,
            Rule::Type(_) => 1,
            Rule::Equals(_) => 2,
            Rule::Email => 3,
            Rule::Pattern(_) => 4,
            Rule::MaxStringLength(_) => 5,
            Rule::MinStringLength(_) => 6,
            Rule::ArrayElementType(_) => 7,
            Rule::Nested(_) => 8,
        }
    }

    /// Constraint name used in the JSON schema layout.
    pub fn key(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Nested(_) => "_store",
            Rule::Type(_) => "type",
            Rule::Equals(_) => "equals",
            Rule::Email => "isEmail",
            Rule::Pattern(_) => "regexp",
            Rule::MaxStringLength(_) => "maxStringLength",
            Rule::MinStringLength(_) => "minStringLength",
            Rule::ArrayElementType(_) => "arrayElementType",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Rule::Required | Rule::Email => Value::Bool(true),
            Rule::Nested(schema) => schema.to_value(),
            Rule::Type(kind) | Rule::ArrayElementType(kind) => Value::from(kind.as_str()),
            Rule::Equals(values) => Value::Array(values.clone()),
            Rule::Pattern(pattern) => Value::from(pattern.as_str()),
            Rule::MaxStringLength(bound) | Rule::MinStringLength(bound) => Value::from(*bound),
        }
    }
}
