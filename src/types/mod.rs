pub mod kind;
pub mod place;
pub mod rule;
pub mod schema;

pub use kind::ValueKind;
pub use place::{Location, Place};
pub use rule::{Pattern, Rule};
pub use schema::{ALLOWED_PROPS_KEY, FieldSpec, Schema};
