//! In-process document store.

use super::{Document, DocumentIter, DocumentStore, Filter};
use crate::error::{Result, ShellError};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Document store kept entirely in memory.
///
/// Behaves like a single MongoDB database for the calls the shell makes:
/// collections appear on first insert, documents keep insertion order and an
/// ObjectId-shaped `_id` is assigned when the inserted document has none.
pub struct MemoryStore {
    database: String,
    /// Other database names reported by `list_database_names`.
    other_databases: Vec<String>,
    collections: Mutex<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            other_databases: Vec::new(),
            collections: Mutex::new(BTreeMap::new()),
        }
    }

    /// Report additional database names alongside the bound one.
    pub fn with_databases<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_databases = names.into_iter().map(Into::into).collect();
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Vec<Document>>>> {
        self.collections
            .lock()
            .map_err(|e| ShellError::operation(format!("Failed to lock store: {}", e)))
    }
}

impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    fn list_database_names(&self) -> Result<Vec<String>> {
        let mut names = vec![self.database.clone()];
        for name in &self.other_databases {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }

    fn list_collection_names(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn count(&self, collection: &str) -> Result<u64> {
        Ok(self.lock()?.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    fn find<'a>(&'a self, collection: &str, filter: &Filter) -> Result<DocumentIter<'a>> {
        let matcher = Matcher::compile(filter)?;
        let matches: Vec<Document> = self
            .lock()?
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matcher.matches(d)).cloned().collect())
            .unwrap_or_default();
        Ok(Box::new(matches.into_iter().map(Ok)))
    }

    fn insert_one(&self, collection: &str, mut document: Document) -> Result<()> {
        if !document.contains_key("_id") {
            document.insert("_id".to_string(), new_object_id());
        }
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    fn find_one_and_delete(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let matcher = Matcher::compile(filter)?;
        let mut collections = self.lock()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|d| matcher.matches(d))
            .map(|idx| docs.remove(idx)))
    }
}

/// ObjectId-shaped extended JSON value (`{"$oid": <24 hex digits>}`).
fn new_object_id() -> Value {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    json!({ "$oid": &hex[..24] })
}

/// A filter prepared for evaluation against in-memory documents.
enum Matcher<'f> {
    All,
    Eq { path: &'f str, value: &'f str },
    Regex { path: &'f str, regex: Regex },
}

impl<'f> Matcher<'f> {
    fn compile(filter: &'f Filter) -> Result<Self> {
        Ok(match filter {
            Filter::All => Matcher::All,
            Filter::Eq { field, value } => Matcher::Eq { path: field, value },
            Filter::Regex { field, pattern } => {
                let regex = Regex::new(pattern).map_err(|e| ShellError::Operation {
                    message: format!("Invalid regular expression '{}'", pattern),
                    source: Some(Box::new(e)),
                })?;
                Matcher::Regex { path: field, regex }
            }
        })
    }

    fn matches(&self, document: &Document) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Eq { path, value } => {
                lookup(document, path).is_some_and(|v| any_string(v, |s| s == *value))
            }
            Matcher::Regex { path, regex } => {
                lookup(document, path).is_some_and(|v| any_string(v, |s| regex.is_match(s)))
            }
        }
    }
}

/// Resolve a dotted field path.
fn lookup<'d>(document: &'d Document, path: &str) -> Option<&'d Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// String test applied to a value, or to each element of an array value.
fn any_string(value: &Value, test: impl Fn(&str) -> bool) -> bool {
    match value {
        Value::String(s) => test(s),
        Value::Array(items) => items.iter().any(|item| item.as_str().is_some_and(&test)),
        _ => false,
    }
}
