use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Stored shape returned by the title search projection `{title: 1}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieTitleDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
}

/// Title-search response entry.
#[derive(Debug, Clone, Serialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
}

impl From<MovieTitleDoc> for MovieSummary {
    fn from(doc: MovieTitleDoc) -> Self {
        Self { id: doc.id.to_hex(), title: doc.title }
    }
}

/// Details projection of a movie document. Seed data leaves some fields
/// unset, so everything but the title is defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub directors: Vec<String>,
    #[serde(default)]
    pub plot: Option<String>,
}
