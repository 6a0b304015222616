//! Helpers behind the `request-schema` binary: loading JSON documents and
//! rendering reports.

use clap::ValueEnum;
use serde_json::Value;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::middleware::{RejectionBody, RejectionData};
use crate::types::{Rule, Schema};
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_schema(path: &Path) -> Result<Schema> {
    let value = load_json(path)?;
    tracing::debug!(path = %path.display(), "loaded schema document");
    Schema::from_value(&value)
}

pub fn render(errors: &[ValidationError], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(errors)),
        OutputFormat::Json => render_json(errors),
    }
}

/// One line per error, or `valid` when there are none.
pub fn render_text(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "valid".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The response body a request adapter would send for these errors.
pub fn render_json(errors: &[ValidationError]) -> Result<String> {
    let body = RejectionBody {
        error: !errors.is_empty(),
        data: RejectionData {
            validation_errors: errors.to_vec(),
        },
    };
    Ok(serde_json::to_string_pretty(&body)?)
}

/// Human-readable outline of a schema's fields and rules.
pub fn describe_schema(schema: &Schema) -> String {
    let mut out = String::new();
    describe_into(schema, 0, &mut out);
    out
}

fn describe_into(schema: &Schema, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);

    if let Some(props) = schema.allowed_props() {
        let _ = writeln!(out, "{}_allowedProps: {}", pad, props.join(", "));
    }

    for (name, spec) in schema.fields() {
        let summary: Vec<String> = spec
            .rules()
            .iter()
            .filter(|rule| !matches!(rule, Rule::Nested(_)))
            .map(describe_rule)
            .collect();
        let _ = writeln!(out, "{}{}: {}", pad, name, summary.join(", "));

        for rule in spec.rules() {
            if let Rule::Nested(nested) = rule {
                let _ = writeln!(out, "{}  _store:", pad);
                describe_into(nested, indent + 2, out);
            }
        }
    }
}

fn describe_rule(rule: &Rule) -> String {
    match rule {
        Rule::Required | Rule::Email => rule.key().to_string(),
        _ => match rule.payload() {
            Value::String(text) => format!("{}={}", rule.key(), text),
            payload => format!("{}={}", rule.key(), payload),
        },
    }
}
