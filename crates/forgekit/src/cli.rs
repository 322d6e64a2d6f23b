//! Clap derive structures for the `forgekit` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use forgekit_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// forgekit -- declarative Laravel Forge resources from the command line
#[derive(Debug, Parser)]
#[command(
    name = "forgekit",
    version,
    about = "Reconcile Laravel Forge servers, sites, and their resources",
    long_about = "Create, read, update, and delete Forge resources from plain attribute files.\n\n\
        Asynchronous resources (servers, jobs, daemons, certificates) are polled\n\
        until Forge reports them ready.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "FORGEKIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "FORGEKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// API root, e.g. https://forge.laravel.com/api/v1 (overrides profile)
    #[arg(long, env = "FORGEKIT_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API token (overrides profile, env, and keyring)
    #[arg(long, global = true)]
    pub api_token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "FORGEKIT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FORGEKIT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Field/value table
    Table,
    /// The id only
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a resource and wait until it is ready
    Create(ResourceArgs),

    /// Refresh a resource's attributes from Forge
    Read(ResourceArgs),

    /// Move a resource from its current to its desired attributes
    Update(UpdateArgs),

    /// Delete a resource
    #[command(alias = "rm")]
    Delete(ResourceArgs),

    /// Look up a server or site by id
    Lookup(ResourceArgs),

    /// Show which fields a resource kind accepts
    Fields(FieldsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Attributes come from an optional file, then `-a` pairs override them.
#[derive(Debug, Args)]
pub struct AttributeArgs {
    /// JSON or TOML attribute file
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Attribute as key=value; values parse as JSON when valid
    #[arg(long = "attr", short = 'a', value_name = "KEY=VALUE")]
    pub attrs: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource kind
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    #[command(flatten)]
    pub attributes: AttributeArgs,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Resource kind
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Attributes as last created or read (must include the id)
    #[arg(long)]
    pub current: PathBuf,

    /// Desired attributes
    #[command(flatten)]
    pub desired: AttributeArgs,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,
}

fn parse_kind(raw: &str) -> Result<ResourceKind, String> {
    raw.parse().map_err(|_| {
        let names: &[&str] = <ResourceKind as strum::VariantNames>::VARIANTS;
        format!("unknown kind '{raw}', expected one of: {}", names.join(", "))
    })
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display the loaded configuration with secrets masked
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an API token for the active profile in the system keyring
    SetToken,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
