//! MongoDB backend using the driver's synchronous API.

use super::{Document, DocumentIter, DocumentStore, Filter};
use crate::error::{Result, ShellError};
use mongodb::bson::{doc, Bson, Document as BsonDocument};
use mongodb::sync::{Client, Collection, Database};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Document store backed by a live MongoDB client.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Open a client for `uri` and bind it to `database`.
    ///
    /// The driver connects lazily, so a `ping` is issued here to surface
    /// unreachable servers at startup instead of on the first command.
    pub fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).map_err(|e| ShellError::Connect {
            message: format!("Invalid connection string: {}", e),
            source: Some(Box::new(e)),
        })?;
        let database = client.database(database);

        debug!("Pinging database {}", database.name());
        database
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| ShellError::Connect {
                message: format!("Failed to reach database '{}': {}", database.name(), e),
                source: Some(Box::new(e)),
            })?;

        info!("Connected to database {}", database.name());
        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection(name)
    }
}

impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str {
        self.database.name()
    }

    fn list_database_names(&self) -> Result<Vec<String>> {
        Ok(self.client.list_database_names().run()?)
    }

    fn list_collection_names(&self) -> Result<Vec<String>> {
        Ok(self.database.list_collection_names().run()?)
    }

    fn count(&self, collection: &str) -> Result<u64> {
        Ok(self.collection(collection).count_documents(doc! {}).run()?)
    }

    fn find<'a>(&'a self, collection: &str, filter: &Filter) -> Result<DocumentIter<'a>> {
        debug!("find {} {}", collection, filter);
        let cursor = self
            .collection(collection)
            .find(filter_document(filter))
            .run()?;
        Ok(Box::new(cursor.map(|next| {
            next.map(from_bson).map_err(ShellError::from)
        })))
    }

    fn insert_one(&self, collection: &str, document: Document) -> Result<()> {
        let document = to_bson(document)?;
        let result = self.collection(collection).insert_one(document).run()?;
        debug!("Inserted document with _id {}", result.inserted_id);
        Ok(())
    }

    fn find_one_and_delete(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        debug!("findOneAndDelete {} {}", collection, filter);
        Ok(self
            .collection(collection)
            .find_one_and_delete(filter_document(filter))
            .run()?
            .map(from_bson))
    }

    fn close(&self) {
        debug!("Shutting down client for {}", self.database.name());
        self.client.clone().shutdown().run();
    }
}

fn filter_document(filter: &Filter) -> BsonDocument {
    let mut document = BsonDocument::new();
    match filter {
        Filter::All => {}
        Filter::Eq { field, value } => {
            document.insert(field.clone(), value.clone());
        }
        Filter::Regex { field, pattern } => {
            document.insert(field.clone(), doc! { "$regex": pattern.clone() });
        }
    }
    document
}

/// Relaxed extended JSON view of a BSON document.
fn from_bson(document: BsonDocument) -> Document {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Parse a JSON object, including extended JSON such as `{"$oid": ..}`
/// values, into BSON.
fn to_bson(document: Document) -> Result<BsonDocument> {
    match Bson::try_from(Value::Object(document)) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(other) => Err(ShellError::parse(format!(
            "expected a document, got a {:?} value",
            other.element_type()
        ))),
        Err(e) => Err(ShellError::Parse {
            message: e.to_string(),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_filter_documents() {
        assert_eq!(filter_document(&Filter::All), doc! {});
        assert_eq!(filter_document(&Filter::eq("name", "bob")), doc! { "name": "bob" });
        assert_eq!(
            filter_document(&Filter::regex("name", "^b")),
            doc! { "name": { "$regex": "^b" } }
        );
    }

    #[test]
    fn test_bson_conversion_keeps_fields() {
        let original = object(json!({"name": "bob", "age": 42, "tags": ["a"]}));
        let bson = to_bson(original).unwrap();
        assert_eq!(bson.get_str("name").unwrap(), "bob");
        let back = from_bson(bson);
        assert_eq!(back["name"], json!("bob"));
        assert_eq!(back["age"], json!(42));
        assert_eq!(back["tags"], json!(["a"]));
    }

    #[test]
    fn test_extended_json_object_id() {
        let original = object(json!({"_id": {"$oid": "5f1e4c2b9d3a4b0012345678"}}));
        let bson = to_bson(original).unwrap();
        assert!(matches!(bson.get("_id"), Some(Bson::ObjectId(_))));
    }

    #[test]
    fn test_top_level_extended_json_is_rejected() {
        let err = to_bson(object(json!({"$oid": "5f1e4c2b9d3a4b0012345678"}))).unwrap_err();
        assert!(matches!(err, ShellError::Parse { .. }));
    }
}
