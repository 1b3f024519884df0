//! One-shot export of the request, index and history collections.
//!
//! Each record kind renders itself through [`Exportable`]. The exporter loads
//! all three collections in full before printing anything, so a failed load
//! produces no partial output.

use crate::config::ExportCollections;
use crate::error::Result;
use crate::store::{to_json, Document, DocumentStore, Filter};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, info};

/// A record that can render its own export line.
pub trait Exportable {
    fn to_export_string(&self) -> String;
}

/// A record kind stored in one of the export collections.
pub trait ExportRecord: Exportable + Sized {
    /// Tag written at the start of each export line.
    const KIND: &'static str;

    fn from_document(document: Document) -> Self;
}

macro_rules! export_record {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            document: Document,
        }

        impl Exportable for $name {
            fn to_export_string(&self) -> String {
                export_line(Self::KIND, &self.document)
            }
        }

        impl ExportRecord for $name {
            const KIND: &'static str = $kind;

            fn from_document(document: Document) -> Self {
                Self { document }
            }
        }
    };
}

export_record!(
    /// An image request.
    RequestRecord,
    "request"
);
export_record!(
    /// An image index entry.
    IndexRecord,
    "index"
);
export_record!(
    /// An image history event.
    HistoryRecord,
    "history"
);

/// `<kind>\t<id>\t<remaining fields as JSON>`
fn export_line(kind: &str, document: &Document) -> String {
    let mut fields = document.clone();
    let id = fields.remove("_id");
    format!("{}\t{}\t{}", kind, render_id(id.as_ref()), to_json(&fields))
}

fn render_id(id: Option<&Value>) -> String {
    match id {
        None => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => match map.get("$oid").and_then(Value::as_str) {
            Some(oid) if map.len() == 1 => oid.to_string(),
            _ => Value::Object(map.clone()).to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Load every document of `collection` as records of kind `R`.
pub fn load_all<R: ExportRecord>(store: &dyn DocumentStore, collection: &str) -> Result<Vec<R>> {
    let records = store
        .find(collection, &Filter::All)?
        .map(|document| document.map(R::from_document))
        .collect::<Result<Vec<R>>>()?;
    debug!("Loaded {} {} records from {}", records.len(), R::KIND, collection);
    Ok(records)
}

/// Batch exporter over the three export collections.
pub struct Exporter<'a> {
    store: &'a dyn DocumentStore,
    collections: &'a ExportCollections,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a dyn DocumentStore, collections: &'a ExportCollections) -> Self {
        Self { store, collections }
    }

    /// Print every record's export line followed by the total, and return
    /// the total.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<u64> {
        let requests: Vec<RequestRecord> = load_all(self.store, &self.collections.request)?;
        let indexes: Vec<IndexRecord> = load_all(self.store, &self.collections.index)?;
        let history: Vec<HistoryRecord> = load_all(self.store, &self.collections.history)?;

        let mut total = 0;
        total += write_records(out, &requests)?;
        total += write_records(out, &indexes)?;
        total += write_records(out, &history)?;

        writeln!(out, "Exported with total {}", total)?;
        out.flush()?;
        info!("Exported {} records", total);
        Ok(total)
    }
}

fn write_records<W: Write>(out: &mut W, records: &[impl Exportable]) -> Result<u64> {
    let mut written = 0;
    for record in records {
        writeln!(out, "{}", record.to_export_string())?;
        written += 1;
    }
    Ok(written)
}
