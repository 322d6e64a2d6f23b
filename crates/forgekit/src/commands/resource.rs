//! create / read / update / delete / lookup handlers.

use tracing::info;

use forgekit_core::{Attributes, Reconciler};

use crate::cli::{GlobalOpts, OutputFormat, ResourceArgs, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn id_of(attrs: &Attributes) -> String {
    attrs
        .string(Attributes::ID)
        .ok()
        .flatten()
        .unwrap_or_else(|| "<no id>".into())
}

fn print(format: OutputFormat, attrs: &Attributes, quiet: bool) -> Result<(), CliError> {
    output::print_output(&output::render_attributes(format, attrs)?, quiet);
    Ok(())
}

pub async fn create(
    reconciler: &Reconciler,
    args: &ResourceArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let desired = util::read_attributes(&args.attributes)?;
    info!(kind = %args.kind, "creating");
    let state = reconciler.create(args.kind, &desired).await?;
    print(format, &state, global.quiet)
}

pub async fn read(
    reconciler: &Reconciler,
    args: &ResourceArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let current = util::read_attributes(&args.attributes)?;
    match reconciler.read(args.kind, &current).await? {
        Some(state) => print(format, &state, global.quiet),
        None => Err(CliError::NotFound {
            kind: args.kind.to_string(),
            id: id_of(&current),
        }),
    }
}

pub async fn update(
    reconciler: &Reconciler,
    args: &UpdateArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let current = Attributes::from_json(util::read_attribute_file(&args.current)?.into())?;
    let desired = util::read_attributes(&args.desired)?;
    info!(kind = %args.kind, id = %id_of(&current), "updating");
    let state = reconciler.update(args.kind, &current, &desired).await?;
    print(format, &state, global.quiet)
}

pub async fn delete(
    reconciler: &Reconciler,
    args: &ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let current = util::read_attributes(&args.attributes)?;
    let id = id_of(&current);
    if !util::confirm(&format!("Delete {} {id}?", args.kind), global.yes)? {
        eprintln!("Aborted.");
        return Ok(());
    }
    reconciler.delete(args.kind, &current).await?;
    if !global.quiet {
        eprintln!("Deleted {} {id}", args.kind);
    }
    Ok(())
}

pub async fn lookup(
    reconciler: &Reconciler,
    args: &ResourceArgs,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    let query = util::read_attributes(&args.attributes)?;
    let found = reconciler
        .lookup(args.kind, &query)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                CliError::NotFound {
                    kind: args.kind.to_string(),
                    id: id_of(&query),
                }
            } else {
                e.into()
            }
        })?;
    print(format, &found, global.quiet)
}
