// Document and response shapes for the movies and comments collections

pub mod comment;
pub mod movie;

pub use comment::{CommentDoc, CommentView, InsertConfirmation, NewComment};
pub use movie::{MovieDetails, MovieSummary, MovieTitleDoc};
