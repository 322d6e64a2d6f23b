//! Output formatting: JSON, YAML, table, plain.

use std::io::{self, Write};

use tabled::{Table, Tabled, settings::Style};

use forgekit_core::Attributes;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render one resource's attributes.
pub fn render_attributes(format: OutputFormat, attrs: &Attributes) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(attrs)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(attrs)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(attrs)?),
        OutputFormat::Table => {
            let rows: Vec<FieldRow> = attrs
                .iter()
                .map(|(field, value)| FieldRow {
                    field: field.clone(),
                    value: value.to_string(),
                })
                .collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(attrs
            .string(Attributes::ID)
            .ok()
            .flatten()
            .unwrap_or_default()),
    }
}

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Attributes {
        Attributes::from_json(json!({ "id": 7, "name": "web", "aliases": ["a.test", "b.test"] }))
            .unwrap()
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_attributes(OutputFormat::JsonCompact, &sample()).unwrap();
        assert_eq!(out, r#"{"aliases":["a.test","b.test"],"id":7,"name":"web"}"#);
    }

    #[test]
    fn plain_prints_the_id() {
        assert_eq!(render_attributes(OutputFormat::Plain, &sample()).unwrap(), "7");
    }

    #[test]
    fn table_lists_every_field() {
        let out = render_attributes(OutputFormat::Table, &sample()).unwrap();
        assert!(out.contains("Field"));
        assert!(out.contains("name"));
        assert!(out.contains("web"));
    }
}
