//! Field parsing helpers for configuration documents.
//!
//! Each helper returns `Ok(None)` when the key is absent (or `null`) so callers decide between a
//! default and a `MissingField` error.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::model::OutputFormat;

fn lookup<'a>(document: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    document.get(field).filter(|value| !value.is_null())
}

/// Non-negative integer given either as a JSON number or a decimal string.
pub(crate) fn parse_count(
    document: &Map<String, Value>,
    field: &'static str,
) -> ConfigResult<Option<usize>> {
    let Some(value) = lookup(document, field) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                unsigned
            } else if number.as_i64().is_some() {
                return Err(ConfigError::invalid(field, number, "negative"));
            } else {
                return Err(ConfigError::invalid(field, number, "not_an_integer"));
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::invalid(field, text, "not_an_integer"))?,
        other => return Err(ConfigError::invalid(field, other, "not_an_integer")),
    };

    usize::try_from(parsed)
        .map(Some)
        .map_err(|_| ConfigError::invalid(field, parsed, "out_of_range"))
}

pub(crate) fn parse_flag(
    document: &Map<String, Value>,
    field: &'static str,
) -> ConfigResult<Option<bool>> {
    match lookup(document, field) {
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(ConfigError::invalid(field, other, "not_a_boolean")),
    }
}

pub(crate) fn parse_output_format(
    document: &Map<String, Value>,
    field: &'static str,
) -> ConfigResult<Option<OutputFormat>> {
    match lookup(document, field) {
        None => Ok(None),
        Some(Value::String(text)) => text.parse().map(Some),
        Some(other) => Err(ConfigError::invalid(field, other, "not_a_string")),
    }
}

pub(crate) fn parse_path(
    document: &Map<String, Value>,
    field: &'static str,
) -> ConfigResult<Option<PathBuf>> {
    match lookup(document, field) {
        None => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => {
            Err(ConfigError::invalid(field, text, "empty"))
        }
        Some(Value::String(text)) => Ok(Some(PathBuf::from(text))),
        Some(other) => Err(ConfigError::invalid(field, other, "not_a_string")),
    }
}
