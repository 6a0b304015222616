use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;

use super::kind::ValueKind;
use super::rule::{Pattern, Rule};
use crate::error::{Result, SchemaError};

/// Schema-level key holding the property whitelist.
pub const ALLOWED_PROPS_KEY: &str = "_allowedProps";

/// Validation rules for one data shape: an ordered set of fields plus an
/// optional whitelist of permitted keys.
///
/// Nested objects are described by [`Rule::Nested`], which owns its schema,
/// so a schema is always a finite tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
    allowed_props: Option<Vec<String>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing an existing spec with the same name in place.
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    pub fn with_allowed_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_props = Some(props.into_iter().map(Into::into).collect());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, spec)| spec)
    }

    pub fn allowed_props(&self) -> Option<&[String]> {
        self.allowed_props.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// A schema with neither fields nor a whitelist checks nothing beyond
    /// the empty-object guard.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.allowed_props.is_none()
    }

    /// Number of object levels this schema describes (1 for a flat schema).
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .flat_map(|(_, spec)| spec.rules())
            .filter_map(|rule| match rule {
                Rule::Nested(nested) => Some(nested.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Build a schema from its compact JSON layout:
    /// `{ "<field>": { "<constraint>": <value>, .. }, "_allowedProps": [..] }`.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid_schema("schema must be a JSON object"))?;

        let mut schema = Schema::new();
        for (key, spec) in map {
            if key == ALLOWED_PROPS_KEY {
                schema.allowed_props = Some(parse_allowed_props(spec)?);
                continue;
            }
            schema = schema.with_field(key.clone(), FieldSpec::from_value(key, spec)?);
        }

        Ok(schema)
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, spec) in &self.fields {
            map.insert(name.clone(), spec.to_value());
        }
        if let Some(props) = &self.allowed_props {
            map.insert(
                ALLOWED_PROPS_KEY.to_string(),
                Value::Array(props.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self> {
        Schema::from_value(value)
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Schema::from_value(&value)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Schema::from_value(&value).map_err(serde::de::Error::custom)
    }
}

fn parse_allowed_props(value: &Value) -> Result<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| SchemaError::invalid_schema("_allowedProps must be an array"))?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                SchemaError::invalid_schema(format!(
                    "_allowedProps entries must be strings, found {}",
                    item
                ))
            })
        })
        .collect()
}

/// Constraints applied to one field, kept sorted by [`Rule::rank`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    rules: Vec<Rule>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule at its rank, replacing a rule of the same constraint.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        let rank = rule.rank();
        match self.rules.binary_search_by_key(&rank, Rule::rank) {
            Ok(index) => self.rules[index] = rule,
            Err(index) => self.rules.insert(index, rule),
        }
        self
    }

    pub fn required(self) -> Self {
        self.with_rule(Rule::Required)
    }

    pub fn with_nested(self, schema: Schema) -> Self {
        self.with_rule(Rule::Nested(schema))
    }

    pub fn with_type(self, kind: ValueKind) -> Self {
        self.with_rule(Rule::Type(kind))
    }

    pub fn with_equals<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.with_rule(Rule::Equals(values.into_iter().map(Into::into).collect()))
    }

    pub fn with_email(self) -> Self {
        self.with_rule(Rule::Email)
    }

    pub fn with_pattern(self, source: impl Into<String>) -> Result<Self> {
        Ok(self.with_rule(Rule::Pattern(Pattern::new(source)?)))
    }

    pub fn with_max_length(self, bound: usize) -> Self {
        self.with_rule(Rule::MaxStringLength(bound))
    }

    pub fn with_min_length(self, bound: usize) -> Self {
        self.with_rule(Rule::MinStringLength(bound))
    }

    pub fn with_array_element_type(self, kind: ValueKind) -> Self {
        self.with_rule(Rule::ArrayElementType(kind))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required))
    }

    /// The kind named by the `type` constraint, which gates the length and
    /// array element rules.
    pub fn declared_kind(&self) -> Option<ValueKind> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Type(kind) => Some(*kind),
            _ => None,
        })
    }

    pub fn from_value(field: &str, value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            SchemaError::invalid_field_spec(field, "field spec must be a JSON object")
        })?;

        let mut spec = FieldSpec::new();
        for (constraint, payload) in map {
            spec = match constraint.as_str() {
                "required" => match expect_bool(field, constraint, payload)? {
                    true => spec.required(),
                    false => spec,
                },
                "_store" => {
                    if !payload.is_object() {
                        return Err(SchemaError::invalid_field_spec(
                            field,
                            "_store must be a JSON object",
                        ));
                    }
                    spec.with_nested(Schema::from_value(payload)?)
                }
                "type" => spec.with_type(expect_kind(field, constraint, payload)?),
                "equals" => {
                    let values = payload.as_array().ok_or_else(|| {
                        SchemaError::invalid_field_spec(field, "equals must be an array")
                    })?;
                    spec.with_rule(Rule::Equals(values.clone()))
                }
                "isEmail" => match expect_bool(field, constraint, payload)? {
                    true => spec.with_email(),
                    false => spec,
                },
                "regexp" => {
                    let source = payload.as_str().ok_or_else(|| {
                        SchemaError::invalid_field_spec(field, "regexp must be a string")
                    })?;
                    spec.with_pattern(source)?
                }
                "maxStringLength" => match parse_bound(payload) {
                    Some(bound) => spec.with_max_length(bound),
                    None => spec,
                },
                "minStringLength" => match parse_bound(payload) {
                    Some(bound) => spec.with_min_length(bound),
                    None => spec,
                },
                "arrayElementType" => {
                    spec.with_array_element_type(expect_kind(field, constraint, payload)?)
                }
                ALLOWED_PROPS_KEY => spec,
                other => {
                    tracing::debug!(field, constraint = other, "ignoring unknown constraint");
                    spec
                }
            };
        }

        Ok(spec)
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .rules
            .iter()
            .map(|rule| (rule.key().to_string(), rule.payload()))
            .collect();
        Value::Object(map)
    }
}

fn expect_bool(field: &str, constraint: &str, payload: &Value) -> Result<bool> {
    payload.as_bool().ok_or_else(|| {
        SchemaError::invalid_field_spec(field, format!("{} must be a boolean", constraint))
    })
}

fn expect_kind(field: &str, constraint: &str, payload: &Value) -> Result<ValueKind> {
    payload
        .as_str()
        .ok_or_else(|| {
            SchemaError::invalid_field_spec(field, format!("{} must be a type name", constraint))
        })?
        .parse()
}

/// Loose integer reading of a length bound: numbers are truncated, strings
/// use their leading integer (`"12abc"` is 12, `"0x10"` is 16). Bounds that
/// are not positive integers are not enforced and read as `None`.
fn parse_bound(payload: &Value) -> Option<usize> {
    let bound = match payload {
        Value::Number(number) => number.as_f64().map(f64::trunc)?,
        Value::String(text) => leading_integer(text)?,
        _ => return None,
    };

    if bound.is_finite() && bound >= 1.0 {
        Some(bound as usize)
    } else {
        None
    }
}

fn leading_integer(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end]
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit));
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_compact_layout() {
        let schema = Schema::from_value(&json!({
            "name": { "required": true, "type": "string", "maxStringLength": 20 },
            "role": { "equals": ["admin", "user"] },
            "_allowedProps": ["name", "role"]
        }))
        .unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.allowed_props(), Some(&["name".to_string(), "role".to_string()][..]));

        let name = schema.field("name").unwrap();
        assert!(name.is_required());
        assert_eq!(name.declared_kind(), Some(ValueKind::String));
        assert_eq!(
            name.rules(),
            &[
                Rule::Required,
                Rule::Type(ValueKind::String),
                Rule::MaxStringLength(20)
            ]
        );
    }

    #[test]
    fn test_field_order_follows_source() {
        let schema: Schema = r#"{ "zeta": {}, "alpha": {}, "mid": {} }"#.parse().unwrap();
        let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rules_sorted_regardless_of_declaration_order() {
        let spec = FieldSpec::from_value(
            "tags",
            &json!({ "arrayElementType": "string", "type": "array", "required": true }),
        )
        .unwrap();
        assert_eq!(
            spec.rules(),
            &[
                Rule::Required,
                Rule::Type(ValueKind::Array),
                Rule::ArrayElementType(ValueKind::String)
            ]
        );
    }

    #[test]
    fn test_false_flags_add_no_rules() {
        let spec =
            FieldSpec::from_value("x", &json!({ "required": false, "isEmail": false })).unwrap();
        assert!(spec.rules().is_empty());
    }

    #[test]
    fn test_non_positive_bounds_are_dropped() {
        let spec = FieldSpec::from_value(
            "x",
            &json!({ "type": "string", "maxStringLength": 0, "minStringLength": "-3" }),
        )
        .unwrap();
        assert_eq!(spec.rules(), &[Rule::Type(ValueKind::String)]);

        let spec = FieldSpec::from_value("x", &json!({ "maxStringLength": " 12 " })).unwrap();
        assert_eq!(spec.rules(), &[Rule::MaxStringLength(12)]);
    }

    #[test]
    fn test_bounds_read_leading_integer() {
        let spec = FieldSpec::from_value(
            "s",
            &json!({ "maxStringLength": "12abc", "minStringLength": 2.5 }),
        )
        .unwrap();
        assert_eq!(
            spec.rules(),
            &[Rule::MaxStringLength(12), Rule::MinStringLength(2)]
        );

        assert_eq!(parse_bound(&json!("0x10")), Some(16));
        assert_eq!(parse_bound(&json!("+7 chars")), Some(7));
        assert_eq!(parse_bound(&json!(0.5)), None);
        assert_eq!(parse_bound(&json!("abc")), None);
        assert_eq!(parse_bound(&json!("")), None);
        assert_eq!(parse_bound(&json!(true)), None);
        assert_eq!(parse_bound(&json!(null)), None);
    }

    #[test]
    fn test_unknown_and_field_level_keys_are_skipped() {
        let spec = FieldSpec::from_value(
            "name",
            &json!({ "type": "string", "description": "display name", "_allowedProps": ["x"] }),
        )
        .unwrap();
        assert_eq!(spec.rules(), &[Rule::Type(ValueKind::String)]);
    }

    #[test]
    fn test_builder_replaces_same_constraint() {
        let spec = FieldSpec::new()
            .with_max_length(5)
            .required()
            .with_max_length(8);
        assert_eq!(spec.rules(), &[Rule::Required, Rule::MaxStringLength(8)]);
    }

    #[test]
    fn test_nested_schema_and_depth() {
        let schema = Schema::from_value(&json!({
            "addr": {
                "type": "object",
                "_store": {
                    "geo": { "_store": { "lat": { "type": "number" } } }
                }
            }
        }))
        .unwrap();
        assert_eq!(schema.depth(), 3);
    }

    #[test]
    fn test_schema_errors() {
        assert!(matches!(
            Schema::from_value(&json!([])).unwrap_err(),
            SchemaError::InvalidSchema { .. }
        ));
        assert!(matches!(
            Schema::from_value(&json!({ "a": "required" })).unwrap_err(),
            SchemaError::InvalidFieldSpec { .. }
        ));
        assert!(matches!(
            Schema::from_value(&json!({ "a": { "type": "int" } })).unwrap_err(),
            SchemaError::UnknownType { .. }
        ));
        assert!(matches!(
            Schema::from_value(&json!({ "a": { "regexp": "(" } })).unwrap_err(),
            SchemaError::InvalidPattern { .. }
        ));
        assert!(matches!(
            Schema::from_value(&json!({ "_allowedProps": "a" })).unwrap_err(),
            SchemaError::InvalidSchema { .. }
        ));
    }

    #[test]
    fn test_serialize_back_to_compact_layout() {
        let source = json!({
            "email": { "required": true, "type": "string", "isEmail": true },
            "addr": { "_store": { "city": { "type": "string", "regexp": "^[A-Z]" } } },
            "_allowedProps": ["email", "addr"]
        });
        let schema = Schema::from_value(&source).unwrap();
        assert_eq!(serde_json::to_value(&schema).unwrap(), source);

        let reparsed: Schema = serde_json::from_value(source).unwrap();
        assert_eq!(reparsed, schema);
    }
}
