mod error;
mod tui;

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use villa_core::config::SiteConfig;
use villa_core::seed::Catalog;
use villa_core::site::SiteState;

use crate::error::CliResult;
use crate::tui::run_tui;

#[derive(Parser, Debug)]
#[command(name = "villa-cli")]
#[command(about = "Terminal storefront for browsing 99Villa properties", long_about = None)]
struct Cli {
    /// TOML site configuration; built-in defaults when omitted
    #[arg(long, env = "VILLA_CONFIG")]
    config: Option<PathBuf>,
    /// Catalog JSON as written by `villa-tools export`
    #[arg(long, env = "VILLA_CATALOG")]
    catalog: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    init_logging()?;

    let cli = Cli::parse();

    let config = SiteConfig::load_or_default(cli.config.as_deref())?;
    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_json(&std::fs::read_to_string(path)?)?,
        None => Catalog::seed(),
    };
    info!(
        "Opening {} storefront with {} properties",
        config.brand,
        catalog.all_properties().len()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let token = CancellationToken::new();
    let site = SiteState::new(config, catalog);
    run_tui(&runtime, site, token)
}

/// Where storefront logs go. The terminal itself is drawn on, so the
/// default is a state file, falling back to discarding them.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    Stdout,
    File(PathBuf),
    Discard,
}

impl LogTarget {
    fn from_env(value: Option<&str>) -> Self {
        match value {
            Some("stderr") => LogTarget::Stderr,
            Some("stdout") => LogTarget::Stdout,
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None => default_log_path().map_or(LogTarget::Discard, LogTarget::File),
        }
    }
}

fn init_logging() -> CliResult<()> {
    let target = LogTarget::from_env(std::env::var("VILLA_CLI_LOG").ok().as_deref());
    let builder = tracing_subscriber::fmt().with_env_filter("INFO");
    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::Stdout => builder.with_writer(std::io::stdout).init(),
        LogTarget::File(path) => match open_log_file(&path) {
            Ok(file) => builder.with_writer(file).with_ansi(false).init(),
            // An explicit path must be writable; the default one may not be.
            Err(err) if std::env::var_os("VILLA_CLI_LOG").is_some() => return Err(err),
            Err(_) => builder.with_writer(std::io::sink).init(),
        },
        LogTarget::Discard => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn default_log_path() -> Option<PathBuf> {
    let state_dir = match std::env::var("XDG_STATE_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            let home = PathBuf::from(std::env::var("HOME").ok()?);
            if cfg!(target_os = "macos") {
                return Some(home.join("Library/Logs/villa-cli.log"));
            }
            home.join(".local/state")
        }
    };
    Some(state_dir.join("villa-cli").join("villa-cli.log"))
}

fn open_log_file(path: &Path) -> CliResult<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(file)
}
