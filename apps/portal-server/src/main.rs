use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use discovery_resolver_sdk::BackendGroup;
use mimalloc::MiMalloc;

use portal_server::AppConfig;
use portal_server::commands::{self, AuthorizeInput};
use portal_server::logging::init_logging;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Portal backend
#[derive(Parser)]
#[command(name = "portal-server", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend role (catalog, techdocs, main)
    #[arg(long, global = true)]
    role: Option<BackendGroup>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the backend and run until interrupted (default)
    Run,
    /// Resolve the base URL of a plugin
    Resolve {
        plugin_id: String,
        /// Resolve the browser-facing URL instead of the internal one
        #[arg(long)]
        external: bool,
    },
    /// Evaluate a permission against the configured policy
    Authorize(AuthorizeArgs),
    /// Validate the configuration and print a summary
    CheckConfig,
    /// Print the plugin route table
    Routes,
}

#[derive(Args)]
struct AuthorizeArgs {
    /// Permission name, e.g. catalog.entity.update
    permission: String,
    /// Resource type for resource permissions, e.g. catalog-entity
    #[arg(long)]
    resource_type: Option<String>,
    /// Requester user entity ref; omit for an unauthenticated request
    #[arg(long)]
    user: Option<String>,
    /// Ownership entity ref of the requester (repeatable, needs --user)
    #[arg(long = "ref", requires = "user")]
    refs: Vec<String>,
    /// Owner ref of the target entity, resolves a conditional decision (repeatable)
    #[arg(long = "owner")]
    owners: Vec<String>,
}

impl From<AuthorizeArgs> for AuthorizeInput {
    fn from(args: AuthorizeArgs) -> Self {
        Self {
            permission: args.permission,
            resource_type: args.resource_type,
            user: args.user,
            refs: args.refs,
            owners: args.owners,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = AppConfig::load(cli.config.as_deref())?;
    if let Some(role) = cli.role {
        cfg.backend.role = role;
    }
    if let Some(level) = cli.log_level {
        cfg.logging.level = level;
    }
    if cli.json_logs {
        cfg.logging.json = true;
    }

    init_logging(&cfg.logging)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::run(&cfg).await?,
        Command::Resolve {
            plugin_id,
            external,
        } => println!("{}", commands::resolve(&cfg, &plugin_id, external).await?),
        Command::Authorize(args) => {
            let output = commands::authorize(&cfg, &args.into()).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::CheckConfig => {
            let summary = commands::check_config(&cfg)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Routes => print!("{}", commands::routes(&cfg)?),
    }
    Ok(())
}
