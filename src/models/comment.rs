use chrono::{DateTime, Utc};
use mongodb::bson;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stored shape returned by the comments projection
/// `{name: 1, email: 1, text: 1, date: 1}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentDoc {
    pub name: String,
    pub email: String,
    pub text: String,
    pub date: bson::DateTime,
}

/// Comment response entry with an RFC3339 timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub name: String,
    pub email: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

impl From<CommentDoc> for CommentView {
    fn from(doc: CommentDoc) -> Self {
        Self {
            name: doc.name,
            email: doc.email,
            text: doc.text,
            date: doc.date.to_chrono(),
        }
    }
}

/// Input to the add-comment operation. The identifier and timestamp are
/// assigned at insertion time.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub movie_id: ObjectId,
    pub text: String,
}

/// Confirmation returned after a successful insert.
#[derive(Debug, Clone, Serialize)]
pub struct InsertConfirmation {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    pub inserted_id: String,
}
