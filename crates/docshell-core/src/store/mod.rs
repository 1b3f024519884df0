//! Document store abstraction.
//!
//! The shell only needs a handful of calls from the database: name listing,
//! counting, filtered scans, single inserts and single deletes. They are
//! expressed by [`DocumentStore`] so the dispatcher runs the same against the
//! MongoDB driver and the in-memory backend.

mod memory;
#[cfg(feature = "mongodb")]
mod mongo;

pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

use crate::error::Result;
use serde_json::{Map, Value};
use std::fmt;

/// A schema-less record, represented as a JSON object.
pub type Document = Map<String, Value>;

/// Iterator over documents returned by a scan.
pub type DocumentIter<'a> = Box<dyn Iterator<Item = Result<Document>> + 'a>;

/// Single-field predicate used to select documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// `field` equals the string `value`.
    Eq { field: String, value: String },
    /// `field` matches the regular expression `pattern`.
    Regex { field: String, pattern: String },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn regex(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Regex {
            field: field.into(),
            pattern: pattern.into(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "{{}}"),
            Filter::Eq { field, value } => write!(f, "{{{}: {:?}}}", field, value),
            Filter::Regex { field, pattern } => write!(f, "{{{}: /{}/}}", field, pattern),
        }
    }
}

/// Synchronous document database backend.
///
/// One store is bound to one database for its whole lifetime.
pub trait DocumentStore: Send + Sync {
    /// Name of the database this store is bound to.
    fn database_name(&self) -> &str;

    /// Names of all databases visible to the client.
    fn list_database_names(&self) -> Result<Vec<String>>;

    /// Names of all collections in the bound database.
    fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Number of documents in `collection`. Missing collections count as empty.
    fn count(&self, collection: &str) -> Result<u64>;

    /// Documents of `collection` matching `filter`, in natural order.
    fn find<'a>(&'a self, collection: &str, filter: &Filter) -> Result<DocumentIter<'a>>;

    /// Insert one new document.
    fn insert_one(&self, collection: &str, document: Document) -> Result<()>;

    /// Remove the first document matching `filter` and return it.
    ///
    /// Removes at most one document.
    fn find_one_and_delete(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    /// Release client resources. Called once before the store is dropped.
    fn close(&self) {}
}

/// Canonical single-line JSON text of a document.
pub fn to_json(document: &Document) -> String {
    Value::Object(document.clone()).to_string()
}
