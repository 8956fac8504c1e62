use bson::{doc, oid::ObjectId, Bson, Document};
use serde_json::{Map, Value};

use crate::error::CoreResult;
use crate::json::{bson_to_json, json_object_to_document};

/// A candidate's application, as submitted through `POST /candidate`.
///
/// Submissions are append-only and never validated: `email` is expected but
/// not required, and any other submitted field is kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSubmission {
    /// Identifier, once the store has assigned one (or the caller supplied an ObjectId).
    pub id: Option<ObjectId>,
    /// Applicant email when submitted as a string.
    pub email: Option<String>,
    /// Everything else that was submitted.
    pub fields: Document,
}

impl CandidateSubmission {
    /// Builds a submission from a raw JSON request body.
    pub fn from_payload(payload: &Map<String, Value>) -> CoreResult<Self> {
        let doc = json_object_to_document(payload)?;
        Ok(Self::from(doc))
    }

    /// Filter selecting the submissions for `email`, or all of them.
    #[must_use]
    pub fn email_filter(email: Option<&str>) -> Document {
        match email {
            Some(email) => doc! { "email": email },
            None => Document::new(),
        }
    }

    /// Converts the submission into the document written to storage.
    #[must_use]
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        if let Some(id) = self.id {
            doc.insert("_id", id);
        }
        if let Some(email) = self.email {
            doc.insert("email", email);
        }
        for (key, value) in self.fields {
            doc.insert(key, value);
        }
        doc
    }

    /// Renders the submission as the JSON object served to clients.
    pub fn into_json(self) -> Value {
        let mut object = Map::new();
        if let Some(id) = self.id {
            object.insert("_id".to_string(), Value::String(id.to_hex()));
        }
        if let Some(email) = self.email {
            object.insert("email".to_string(), Value::String(email));
        }
        for (key, value) in self.fields {
            object.insert(key, bson_to_json(value));
        }
        Value::Object(object)
    }
}

impl From<Document> for CandidateSubmission {
    fn from(mut doc: Document) -> Self {
        // Non-ObjectId ids and non-string emails stay in `fields` untouched.
        let id = match doc.get("_id") {
            Some(Bson::ObjectId(oid)) => {
                let oid = *oid;
                doc.remove("_id");
                Some(oid)
            }
            _ => None,
        };
        let email = if matches!(doc.get("email"), Some(Bson::String(_))) {
            doc.remove("email").and_then(|v| v.as_str().map(str::to_owned))
        } else {
            None
        };

        Self {
            id,
            email,
            fields: doc,
        }
    }
}
