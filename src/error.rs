use thiserror::Error;

/// Errors raised while building or loading a schema.
///
/// Validation itself never fails: rule violations are reported as
/// [`crate::ValidationError`] values. This type only covers schemas that
/// cannot be turned into a typed rule set.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Invalid spec for field '{field}': {message}")]
    InvalidFieldSpec { field: String, message: String },

    #[error("Unknown type name: {name}")]
    UnknownType { name: String },

    #[error("Invalid regular expression '{source_text}': {source}")]
    InvalidPattern {
        source_text: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid place: {place}")]
    InvalidPlace { place: String },

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    pub fn invalid_field_spec(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldSpec {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn invalid_pattern(source_text: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            source_text: source_text.into(),
            source,
        }
    }

    pub fn invalid_place(place: impl Into<String>) -> Self {
        Self::InvalidPlace {
            place: place.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
