//! docshell-export - print the export form of every request, index and history
//! record, then the total.

use clap::Parser;
use docshell_cli::{init_logging, open_connection, report_fatal, Args};
use docshell_core::{ConnectionManager, ExportCollections, Exporter, Result};
use std::io;
use std::process::ExitCode;
use tracing::info;

fn export(connection: &ConnectionManager) -> Result<u64> {
    let collections = connection
        .config()
        .map(|config| config.export.clone())
        .unwrap_or_else(ExportCollections::default);
    info!(
        "Exporting {}, {} and {}",
        collections.request, collections.index, collections.history
    );
    Exporter::new(connection.store()?, &collections).run(&mut io::stdout().lock())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let mut connection = match open_connection(&args.config) {
        Ok(connection) => connection,
        Err(e) => {
            let code = e.exit_code();
            report_fatal("Failed to connect", e);
            return ExitCode::from(code);
        }
    };

    let result = export(&connection);
    connection.close();

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.exit_code();
            report_fatal("Export failed", e);
            ExitCode::from(code)
        }
    }
}
