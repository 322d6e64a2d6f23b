//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde_json::{Map, Value};

use forgekit_core::Attributes;

use crate::cli::AttributeArgs;
use crate::error::CliError;

/// Parse one `key=value` pair. Integers, booleans, and arrays are taken
/// as JSON; anything else (`8.3`, `null`, objects) stays a plain string.
pub fn parse_pair(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| CliError::Validation {
        field: "attr".into(),
        reason: format!("expected KEY=VALUE, got '{raw}'"),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "attr".into(),
            reason: format!("empty key in '{raw}'"),
        });
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Bool(_) | Value::Array(_) | Value::String(_))) => v,
        Ok(Value::Number(n)) if n.is_i64() => Value::Number(n),
        _ => Value::String(value.to_owned()),
    };
    Ok((key.to_owned(), value))
}

/// Read a `.toml` or JSON attribute file.
pub fn read_attribute_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let value: Value = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation {
            field: path.display().to_string(),
            reason: "expected an object of attributes".into(),
        }),
    }
}

/// File attributes first, then `-a` pairs on top.
pub fn read_attributes(args: &AttributeArgs) -> Result<Attributes, CliError> {
    let mut map = match args.file {
        Some(ref path) => read_attribute_file(path)?,
        None => Map::new(),
    };
    for raw in &args.attrs {
        let (key, value) = parse_pair(raw)?;
        map.insert(key, value);
    }
    Ok(Attributes::from_json(Value::Object(map))?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}
