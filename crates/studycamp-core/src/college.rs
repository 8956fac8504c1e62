use bson::{Bson, Document};
use serde_json::{Map, Value};

use crate::json::bson_to_json;

/// A college from the catalogue.
///
/// Colleges are maintained out of band; the API only reads them. Apart from
/// `_id` and an optional `name`, every field is carried through untouched in
/// `attributes`. The `_id` is kept as stored, whatever its BSON type.
#[derive(Debug, Clone, PartialEq)]
pub struct College {
    /// Stored identifier, usually an ObjectId.
    pub id: Option<Bson>,
    /// Display name, when the document has a string `name`.
    pub name: Option<String>,
    /// Remaining fields in stored order.
    pub attributes: Document,
}

impl College {
    /// Renders the college as the JSON object served to clients.
    pub fn into_json(self) -> Value {
        let mut object = Map::new();
        if let Some(id) = self.id {
            object.insert("_id".to_string(), bson_to_json(id));
        }
        if let Some(name) = self.name {
            object.insert("name".to_string(), Value::String(name));
        }
        for (key, value) in self.attributes {
            object.insert(key, bson_to_json(value));
        }
        Value::Object(object)
    }
}

impl From<Document> for College {
    fn from(mut doc: Document) -> Self {
        let id = doc.remove("_id");
        let name = if matches!(doc.get("name"), Some(Bson::String(_))) {
            doc.remove("name").and_then(|v| v.as_str().map(str::to_owned))
        } else {
            None
        };

        Self {
            id,
            name,
            attributes: doc,
        }
    }
}
