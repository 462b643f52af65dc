use std::sync::Arc;

use crate::{
    config::Config,
    movie_interface::MovieInterface,
    store::{ConnectionManager, DocumentStore},
};

#[derive(Clone)]
pub struct AppState {
    pub movie_interface: MovieInterface,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Establish the shared store connection once, up front
        let connection = Arc::new(ConnectionManager::new());
        connection.connect(&config.database).await?;

        // The driver dials lazily; verify the store is actually reachable
        connection.ping().await?;

        let movie_interface = MovieInterface::new(DocumentStore::new(connection));

        Ok(Self { movie_interface, config })
    }
}
