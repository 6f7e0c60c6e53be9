//! Avaliacao - service feedback collection server
//!
//! Entry point: serves the feedback web application, or runs one-off
//! database maintenance commands.

use avaliacao_core::{
    api::ApiServer,
    config::{ServerConfig, ADDR_ENV, DB_PATH_ENV, DEFAULT_ADDR, DEFAULT_DB_PATH},
    export, FeedbackStore, SqliteFeedbackStore,
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "avaliacao")]
#[command(about = "Service feedback collection with reports and spreadsheet export", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database path
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Server address
    #[arg(long, global = true, env = ADDR_ENV, default_value = DEFAULT_ADDR)]
    addr: SocketAddr,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create the database file and schema
    Init,

    /// Export all feedback to a spreadsheet file
    Export {
        /// Output path
        #[arg(short, long, default_value = export::EXPORT_FILENAME)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!(
        "avaliacao={level},avaliacao_core={level},tower_http={level}",
        level = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Avaliacao v{} starting...", env!("CARGO_PKG_VERSION"));

    match cli.command {
        None | Some(Commands::Serve) => {
            serve(ServerConfig {
                addr: cli.addr,
                db_path: cli.db_path,
            })
            .await
        }
        Some(Commands::Init) => {
            let db_path = cli.db_path;
            ensure_parent_dir(&db_path)?;

            SqliteFeedbackStore::open(&db_path).await?;

            println!("✓ Database initialized: {}", db_path.display());
            Ok(())
        }
        Some(Commands::Export { output }) => {
            let db_path = cli.db_path;
            let store = SqliteFeedbackStore::open(&db_path).await?;

            let records = store.export_all().await?;
            export::write_xlsx(&records, &output)?;

            println!("✓ Exported {} records to {}", records.len(), output.display());
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    ensure_parent_dir(&config.db_path)?;

    let store = SqliteFeedbackStore::open(&config.db_path).await?;
    info!("Using database: {}", config.db_path.display());

    ApiServer::new(config, Arc::new(store)).serve().await
}

fn ensure_parent_dir(db_path: &Path) -> std::io::Result<()> {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["avaliacao"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(cli.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_cli_explicit_values() {
        let cli = Cli::try_parse_from([
            "avaliacao",
            "serve",
            "--addr",
            "127.0.0.1:8080",
            "--db-path",
            "data/feedback.db",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.addr.port(), 8080);
        assert_eq!(cli.db_path, PathBuf::from("data/feedback.db"));

        let cli = Cli::try_parse_from(["avaliacao", "--db-path", "other.db", "init"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init)));
        assert_eq!(cli.db_path, PathBuf::from("other.db"));
    }

    #[test]
    fn test_cli_rejects_bad_addr() {
        assert!(Cli::try_parse_from(["avaliacao", "--addr", "not-an-address"]).is_err());
    }

    #[test]
    fn test_cli_reads_env_vars() {
        let command = Cli::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(OsStr::to_os_string)
        };

        assert_eq!(env_of("addr").as_deref(), Some(OsStr::new(ADDR_ENV)));
        assert_eq!(env_of("db_path").as_deref(), Some(OsStr::new(DB_PATH_ENV)));
    }
}
