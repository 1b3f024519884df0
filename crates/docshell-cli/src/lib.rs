//! Startup code shared by the `docshell` and `docshell-export` binaries.

use clap::Parser;
use docshell_core::{ConfigKeys, ConnectionManager, ShellError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Properties file with `dbconnection` and `dbname`
    #[arg(default_value = ConfigKeys::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Install the global subscriber. Logs go to stderr so stdout only carries
/// command output.
pub fn init_logging(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Open the connection described by `config` and announce the database.
pub fn open_connection(config: &Path) -> Result<ConnectionManager, ShellError> {
    let connection = ConnectionManager::connect(config)?;
    println!("Connected db : {}", connection.database_name());
    Ok(connection)
}

/// Report an error that ends the process, with its cause chain.
pub fn report_fatal(context: &str, err: ShellError) {
    error!("{}: {}", context, err);
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{:?}", anyhow::Error::new(err).context(context.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let args = Args::try_parse_from(["docshell"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config.properties"));
        assert!(!args.debug);
    }

    #[test]
    fn test_config_path_and_debug() {
        let args = Args::try_parse_from(["docshell", "prod.properties", "--debug"]).unwrap();
        assert_eq!(args.config, PathBuf::from("prod.properties"));
        assert!(args.debug);
    }
}
