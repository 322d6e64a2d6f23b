//! Command dispatch: CLI args -> reconciler -> output formatting.

pub mod config_cmd;
pub mod fields;
pub mod resource;
pub mod util;

use forgekit_core::Reconciler;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Dispatch a Forge-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    reconciler: &Reconciler,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let format = config::output_format(global, cfg);
    match cmd {
        Command::Create(args) => resource::create(reconciler, &args, global, format).await,
        Command::Read(args) => resource::read(reconciler, &args, global, format).await,
        Command::Update(args) => resource::update(reconciler, &args, global, format).await,
        Command::Delete(args) => resource::delete(reconciler, &args, global).await,
        Command::Lookup(args) => resource::lookup(reconciler, &args, global, format).await,
        Command::Config(_) | Command::Fields(_) | Command::Completions(_) => {
            Err(CliError::Validation {
                field: "command".into(),
                reason: "handled before connecting".into(),
            })
        }
    }
}
