//! docshell - interactive shell for a document database.
//!
//! Reads commands from stdin until `q`, `quit`, `exit` or end of input. Type
//! `help` for the list of supported command forms.

use clap::Parser;
use docshell_cli::{init_logging, open_connection, report_fatal, Args};
use docshell_core::Session;
use std::io;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    info!("Starting docshell with config {}", args.config.display());

    let mut connection = match open_connection(&args.config) {
        Ok(connection) => connection,
        Err(e) => {
            let code = e.exit_code();
            report_fatal("Failed to connect", e);
            return ExitCode::from(code);
        }
    };

    let stdin = io::stdin();
    let result = Session::new(&connection).run(
        stdin.lock(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    connection.close();

    match result {
        Ok(summary) => {
            info!(
                "Bye ({} commands, {} failed)",
                summary.executed, summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code();
            report_fatal("Session aborted", e);
            ExitCode::from(code)
        }
    }
}
