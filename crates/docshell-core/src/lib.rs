//! docshell core - command grammar, dispatch and connection lifecycle for an
//! interactive document database client.
//!
//! The crate turns whitespace-separated input lines into database operations
//! and runs them against a single connection. It can be used without the
//! binaries, for example to drive a session from a script or a test.
//!
//! # Example
//!
//! ```rust,ignore
//! use docshell_core::{ConnectionManager, Session};
//!
//! fn main() -> docshell_core::Result<()> {
//!     let mut connection = ConnectionManager::connect("config.properties")?;
//!     let stdin = std::io::stdin();
//!     let summary = Session::new(&connection).run(
//!         stdin.lock(),
//!         &mut std::io::stdout(),
//!         &mut std::io::stderr(),
//!     )?;
//!     println!("{} commands", summary.executed);
//!     connection.close();
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod operations;
pub mod properties;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use command::{parse_line, Command, Input, EXIT_TOKENS, USAGE};
pub use config::{ConfigKeys, ExportCollections, ShellConfig};
pub use connection::ConnectionManager;
pub use error::{Result, ShellError};
pub use export::{Exportable, ExportRecord, Exporter, HistoryRecord, IndexRecord, RequestRecord};
pub use operations::Operations;
pub use properties::Properties;
pub use session::{Session, SessionState, SessionSummary, Termination};
#[cfg(feature = "mongodb")]
pub use store::MongoStore;
pub use store::{Document, DocumentStore, Filter, MemoryStore};
