//! `forgekit fields <kind>`: which attributes a kind accepts.

use serde::Serialize;
use tabled::Tabled;

use forgekit_core::ResourceKind;

use crate::cli::{FieldsArgs, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Set by")]
    set_by: &'static str,
    #[tabled(rename = "Change replaces")]
    replaces: bool,
}

fn rows(kind: ResourceKind) -> Vec<FieldRow> {
    let immutable = kind.immutable_fields();
    let inputs = kind.input_fields().iter().map(|&field| FieldRow {
        field,
        set_by: "caller",
        replaces: immutable.contains(&field),
    });
    let computed = kind.computed_fields().iter().map(|&field| FieldRow {
        field,
        set_by: "forge",
        replaces: false,
    });
    inputs.chain(computed).collect()
}

pub fn handle(args: &FieldsArgs, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let rows = rows(args.kind);
    let out = match config::output_format(global, cfg) {
        OutputFormat::Table => output::render_table(&rows),
        OutputFormat::Yaml => serde_yaml::to_string(&rows)?,
        OutputFormat::JsonCompact => serde_json::to_string(&rows)?,
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        OutputFormat::Plain => rows.iter().map(|r| r.field).collect::<Vec<_>>().join("\n"),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_inputs_all_replace() {
        let rows = rows(ResourceKind::Key);
        assert!(
            rows.iter()
                .filter(|r| r.set_by == "caller")
                .all(|r| r.replaces)
        );
        assert!(rows.iter().any(|r| r.field == "id" && r.set_by == "forge"));
    }

    #[test]
    fn server_name_is_updatable() {
        let rows = rows(ResourceKind::Server);
        let name = rows.iter().find(|r| r.field == "name");
        assert!(name.is_some_and(|r| !r.replaces));
    }
}
