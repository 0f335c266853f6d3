//! `tabview` - browse a table held by a remote query engine
//!
//! ```text
//! tabview schema
//! tabview query --filter "age:GREATER_THAN:30" --sort name --sort age:desc --page 2
//! tabview edit 42 email new@example.com --search smith
//! tabview delete --filter "status:EQUALS:inactive" --yes
//! tabview metrics --watch 5
//! tabview --session reports clear --yes
//! ```

mod args;
mod commands;
mod logging;
mod render;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use args::QueryArgs;
use commands::Runner;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "tabview", version, about = "Browse a table held by a remote query engine")]
struct Cli {
    /// Engine API root, e.g. http://localhost:8080/api/v1
    #[arg(long, env = "TABVIEW_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Session whose table to browse
    #[arg(long, env = "TABVIEW_SESSION", global = true)]
    session: Option<String>,

    /// Settings file (defaults to <config dir>/tabview/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the table's columns and their capabilities
    Schema,

    /// Show one page of the table
    Query(QueryArgs),

    /// Set one field of one record, then show the refreshed page
    Edit {
        /// Value of the record's `id` (or `_id`)
        record_id: String,
        field: String,
        value: String,
        /// Query that brings the record onto the page
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Delete every record matching the query
    Delete {
        #[command(flatten)]
        query: QueryArgs,
        /// Actually delete; without this only the match count is shown
        #[arg(long)]
        yes: bool,
    },

    /// Export the whole table to a file on the engine host
    Export,

    /// Show engine metrics
    Metrics {
        /// Refresh every SECS seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Show engine health and session status
    Status,

    /// List the sessions the engine holds
    Sessions,

    /// Remove every row of the session's table
    Clear {
        /// Actually clear; without this only the row count is shown
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings =
        Settings::load(cli.config.as_deref())?.with_overrides(cli.base_url, cli.session);
    let _log_guard = logging::init(logging::LoggingConfig::for_verbosity(
        cli.verbose,
        settings.json_logs,
    ))?;

    tracing::debug!(
        base_url = %settings.base_url,
        session = %settings.session_id,
        "starting"
    );

    let runner = Runner::new(settings)?;
    match cli.command {
        Command::Schema => runner.schema().await,
        Command::Query(query) => runner.query(&query).await,
        Command::Edit {
            record_id,
            field,
            value,
            query,
        } => runner.edit(&record_id, &field, &value, &query).await,
        Command::Delete { query, yes } => runner.delete(&query, yes).await,
        Command::Export => runner.export().await,
        Command::Metrics { watch } => runner.metrics(watch).await,
        Command::Status => runner.status().await,
        Command::Sessions => runner.sessions().await,
        Command::Clear { yes } => runner.clear(yes).await,
    }
}
