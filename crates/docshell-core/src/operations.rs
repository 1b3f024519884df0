//! Operations behind each shell command.
//!
//! Every database operation writes a start banner naming itself and its
//! arguments, its results, and an end banner. A failing operation stops
//! before its end banner.

use crate::command::{Command, USAGE};
use crate::error::{Result, ShellError};
use crate::store::{to_json, Document, DocumentStore, Filter};
use serde_json::Value;
use std::io::Write;
use tracing::debug;

/// Executes commands against a store, printing to `out`.
pub struct Operations<'a, W: Write> {
    store: &'a dyn DocumentStore,
    out: W,
}

impl<'a, W: Write> Operations<'a, W> {
    pub fn new(store: &'a dyn DocumentStore, out: W) -> Self {
        Self { store, out }
    }

    /// Give back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run one command.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        debug!("Executing {}", command);
        match command {
            Command::Help | Command::Usage { .. } => self.print_usage(),
            Command::ListDatabases => self.list_databases(),
            Command::ListCollections => self.list_collections(),
            Command::Count { collection } => self.count(collection).map(|_| ()),
            Command::ScanAll { collection } => self.scan_all(collection),
            Command::WriteJson { collection, json } => self.write_json(collection, json),
            Command::FindEq {
                collection,
                field,
                value,
            } => self.find_eq(collection, field, value),
            Command::WriteKeyValue {
                collection,
                field,
                value,
            } => self.write_key_value(collection, field, value),
            Command::DeleteOne {
                collection,
                field,
                value,
            } => self.delete_one(collection, field, value).map(|_| ()),
            Command::FindRegex {
                collection,
                field,
                pattern,
            } => self.find_regex(collection, field, pattern),
        }
    }

    pub fn print_usage(&mut self) -> Result<()> {
        writeln!(self.out, "{}", USAGE)?;
        Ok(())
    }

    pub fn list_databases(&mut self) -> Result<()> {
        self.start("list dbs")?;
        for name in self.store.list_database_names()? {
            writeln!(self.out, "{}", name)?;
        }
        self.end("list dbs")
    }

    pub fn list_collections(&mut self) -> Result<()> {
        let store = self.store;
        self.start(&format!("list collections : db = {}", store.database_name()))?;
        for name in store.list_collection_names()? {
            writeln!(self.out, "{}", name)?;
        }
        self.end("list collections")
    }

    /// Print and return the number of documents in `collection`.
    pub fn count(&mut self, collection: &str) -> Result<u64> {
        self.start(&format!("querying size : collection = {}", collection))?;
        let size = self.store.count(collection)?;
        writeln!(self.out, "{}", size)?;
        self.end("querySize")?;
        Ok(size)
    }

    pub fn scan_all(&mut self, collection: &str) -> Result<()> {
        self.start(&format!("querying all : collection = {}", collection))?;
        self.print_matches(collection, &Filter::All)?;
        self.end("queryAll")
    }

    pub fn find_eq(&mut self, collection: &str, field: &str, value: &str) -> Result<()> {
        self.start(&format!(
            "querying : collection = {}; key = {}; value = {}",
            collection, field, value
        ))?;
        self.print_matches(collection, &Filter::eq(field, value))?;
        self.end("query")
    }

    pub fn find_regex(&mut self, collection: &str, field: &str, pattern: &str) -> Result<()> {
        self.start(&format!(
            "querying regex : collection = {}; key = {}; pattern = {}",
            collection, field, pattern
        ))?;
        self.print_matches(collection, &Filter::regex(field, pattern))?;
        self.end("queryRegex")
    }

    /// Insert `json`, which must be a JSON object.
    pub fn write_json(&mut self, collection: &str, json: &str) -> Result<()> {
        self.start(&format!("write to : collection = {}; json = {}", collection, json))?;
        let document = parse_document(json)?;
        self.store.insert_one(collection, document)?;
        self.end("write")
    }

    /// Insert the single-field document `{field: value}`.
    pub fn write_key_value(&mut self, collection: &str, field: &str, value: &str) -> Result<()> {
        self.start(&format!(
            "writeKeyValue to : collection = {}; key = {}; value = {}",
            collection, field, value
        ))?;
        let mut document = Document::new();
        document.insert(field.to_string(), Value::String(value.to_string()));
        self.store.insert_one(collection, document)?;
        self.end("writeKeyValue")
    }

    /// Delete the first document where `field` equals `value`.
    pub fn delete_one(
        &mut self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>> {
        self.start(&format!(
            "delete : collection = {}; key = {}; value = {}",
            collection, field, value
        ))?;
        let deleted = self
            .store
            .find_one_and_delete(collection, &Filter::eq(field, value))?;
        match &deleted {
            Some(document) => self.end(&format!("delete : {}", to_json(document)))?,
            None => self.end("delete with nothing deleted")?,
        }
        Ok(deleted)
    }

    fn print_matches(&mut self, collection: &str, filter: &Filter) -> Result<()> {
        let store = self.store;
        for document in store.find(collection, filter)? {
            writeln!(self.out, "{}", to_json(&document?))?;
        }
        Ok(())
    }

    fn start(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, " ----- {}", text)?;
        Ok(())
    }

    fn end(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, " ----- end {} -----", text)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Parse command-line JSON into a document.
pub fn parse_document(json: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(document) => Ok(document),
        other => Err(ShellError::parse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
