// Unified movie interface - catalog and comment access over the document store

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, from_document, DateTime, Document};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{CommentDoc, CommentView, InsertConfirmation, MovieDetails, MovieSummary,
             MovieTitleDoc, NewComment},
    store::{DocumentStore, FindOpts},
};

pub const MOVIES_COLLECTION: &str = "movies";
pub const COMMENTS_COLLECTION: &str = "comments";

/// Access layer for the four HTTP operations. Query construction lives
/// here; the store facade stays generic.
#[derive(Clone)]
pub struct MovieInterface {
    store: DocumentStore,
}

impl MovieInterface {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    // Accessor for the store facade (for callers that need raw queries)
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Movies whose title contains the term, case-insensitively, reduced
    /// to `{id, title}`.
    pub async fn search_movies_by_title(&self, title: &str) -> AppResult<Vec<MovieSummary>> {
        let opts = FindOpts { projection: Some(doc! { "title": 1 }), ..FindOpts::default() };
        let docs = self.store.find(MOVIES_COLLECTION, title_filter(title), opts).await?;

        let mut movies = Vec::with_capacity(docs.len());
        for document in docs {
            let parsed: MovieTitleDoc = from_document(document)?;
            movies.push(MovieSummary::from(parsed));
        }
        Ok(movies)
    }

    /// Details projection of one movie, by identity.
    pub async fn movie_details(&self, movie_id: ObjectId) -> AppResult<MovieDetails> {
        let projection = doc! { "_id": 0, "title": 1, "year": 1, "directors": 1, "plot": 1 };
        let found = self
            .store
            .find_one(MOVIES_COLLECTION, doc! { "_id": movie_id }, Some(projection))
            .await?;

        match found {
            Some(document) => Ok(from_document(document)?),
            None => Err(AppError::NotFound(format!("movie {} not found", movie_id.to_hex()))),
        }
    }

    /// All comments attached to a movie. No sort is applied; order is
    /// whatever the store returns.
    pub async fn comments_for_movie(&self, movie_id: ObjectId) -> AppResult<Vec<CommentView>> {
        let opts = FindOpts {
            projection: Some(doc! { "_id": 0, "name": 1, "email": 1, "text": 1, "date": 1 }),
            ..FindOpts::default()
        };
        let docs = self
            .store
            .find(COMMENTS_COLLECTION, doc! { "movie_id": movie_id }, opts)
            .await?;

        let mut comments = Vec::with_capacity(docs.len());
        for document in docs {
            let parsed: CommentDoc = from_document(document)?;
            comments.push(CommentView::from(parsed));
        }
        Ok(comments)
    }

    /// Insert a comment with a driver-generated identifier and the
    /// insertion-time timestamp.
    pub async fn add_comment(&self, comment: NewComment) -> AppResult<InsertConfirmation> {
        let document = doc! {
            "name": comment.name,
            "email": comment.email,
            "movie_id": comment.movie_id,
            "text": comment.text,
            "date": DateTime::now(),
        };
        let result = self.store.insert_one(COMMENTS_COLLECTION, document).await?;

        let inserted_id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };
        Ok(InsertConfirmation { acknowledged: true, inserted_id })
    }
}

/// Substring match delegated to the store's native pattern operator.
fn title_filter(title: &str) -> Document {
    doc! { "title": { "$regex": title, "$options": "i" } }
}

fn parse_movie_id(raw: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::MalformedId(raw.to_string()))
}

/// Non-empty string field of a JSON body.
fn require_str<'a>(body: &'a Value, field: &'static str) -> AppResult<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingParameter(field))
}

// HTTP Request types

#[derive(Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct MovieIdQuery {
    #[serde(rename = "movieId")]
    pub movie_id: Option<String>,
}

impl MovieIdQuery {
    fn parsed(&self) -> AppResult<ObjectId> {
        let raw = self
            .movie_id
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or(AppError::MissingParameter("movieId"))?;
        parse_movie_id(raw)
    }
}

// HTTP Handlers

pub async fn get_movies_by_title_handler(
    State(interface): State<MovieInterface>,
    Query(params): Query<TitleQuery>,
) -> Result<Json<Vec<MovieSummary>>, AppError> {
    let title = params
        .title
        .filter(|value| !value.is_empty())
        .ok_or(AppError::MissingParameter("title"))?;

    let movies = interface.search_movies_by_title(&title).await?;
    tracing::debug!(title = %title, matched = movies.len(), "title search response");
    Ok(Json(movies))
}

pub async fn get_movie_details_handler(
    State(interface): State<MovieInterface>,
    Query(params): Query<MovieIdQuery>,
) -> Result<Json<MovieDetails>, AppError> {
    let movie_id = params.parsed()?;
    let details = interface.movie_details(movie_id).await?;
    tracing::debug!(movie_id = %movie_id, title = %details.title, "details response");
    Ok(Json(details))
}

pub async fn get_comments_handler(
    State(interface): State<MovieInterface>,
    Query(params): Query<MovieIdQuery>,
) -> Result<Json<Vec<CommentView>>, AppError> {
    let movie_id = params.parsed()?;
    let comments = interface.comments_for_movie(movie_id).await?;
    tracing::debug!(movie_id = %movie_id, count = comments.len(), "comments response");
    Ok(Json(comments))
}

pub async fn add_comment_handler(
    State(interface): State<MovieInterface>,
    Json(body): Json<Value>,
) -> Result<Json<InsertConfirmation>, AppError> {
    let comment = NewComment {
        name: require_str(&body, "name")?.to_string(),
        email: require_str(&body, "email")?.to_string(),
        movie_id: parse_movie_id(require_str(&body, "movieId")?)?,
        text: require_str(&body, "text")?.to_string(),
    };

    let confirmation = interface.add_comment(comment).await?;
    tracing::debug!(inserted_id = %confirmation.inserted_id, "comment inserted");
    Ok(Json(confirmation))
}

// Create unified router
pub fn create_movie_router(interface: MovieInterface) -> Router {
    Router::new()
        .route("/getMoviesByTitle", get(get_movies_by_title_handler))
        .route("/details", get(get_movie_details_handler))
        .route("/comments", get(get_comments_handler))
        .route("/addComment", post(add_comment_handler))
        .with_state(interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_filter_uses_case_insensitive_regex() {
        let filter = title_filter("matrix");
        let pattern = filter.get_document("title").unwrap();
        assert_eq!(pattern.get_str("$regex").unwrap(), "matrix");
        assert_eq!(pattern.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn parse_movie_id_accepts_valid_hex() {
        let oid = ObjectId::new();
        assert_eq!(parse_movie_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn parse_movie_id_rejects_garbage() {
        let err = parse_movie_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::MalformedId(_)));
    }

    #[test]
    fn movie_id_query_requires_value() {
        let query = MovieIdQuery { movie_id: None };
        assert!(matches!(query.parsed().unwrap_err(), AppError::MissingParameter("movieId")));

        let query = MovieIdQuery { movie_id: Some(String::new()) };
        assert!(matches!(query.parsed().unwrap_err(), AppError::MissingParameter("movieId")));
    }

    #[test]
    fn require_str_rejects_missing_and_empty_fields() {
        let body = json!({ "name": "Ana", "email": "" });
        assert_eq!(require_str(&body, "name").unwrap(), "Ana");
        assert!(matches!(
            require_str(&body, "email").unwrap_err(),
            AppError::MissingParameter("email")
        ));
        assert!(matches!(
            require_str(&body, "text").unwrap_err(),
            AppError::MissingParameter("text")
        ));
    }
}
