use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tokio::sync::RwLock;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

struct ActiveConnection {
    client: Client,
    database: Database,
}

/// Owns the single client/database handle pair shared by every query.
///
/// Connection pooling and request multiplexing are the driver's concern;
/// this type only tracks whether a connection is active.
pub struct ConnectionManager {
    active: RwLock<Option<ActiveConnection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self { active: RwLock::new(None) }
    }

    /// Establish the client and database handles.
    ///
    /// Idempotent: a call while a connection is active returns without
    /// touching the driver.
    pub async fn connect(&self, config: &DatabaseConfig) -> AppResult<()> {
        let mut guard = self.active.write().await;
        if guard.is_some() {
            tracing::debug!("connect called with an active connection, skipping");
            return Ok(());
        }

        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|err| AppError::Connection(err.to_string()))?;
        options.app_name = config.app_name.clone();

        let client = Client::with_options(options)
            .map_err(|err| AppError::Connection(err.to_string()))?;
        let database = client.database(&config.db_name);

        tracing::info!(db = %config.db_name, "document store connection established");
        *guard = Some(ActiveConnection { client, database });
        Ok(())
    }

    /// Terminate the active connection.
    pub async fn close(&self) -> AppResult<()> {
        let mut guard = self.active.write().await;
        match guard.take() {
            Some(active) => {
                active.client.shutdown().await;
                tracing::info!("document store connection closed");
                Ok(())
            }
            None => Err(AppError::NotConnected),
        }
    }

    /// Handle to the active database. Fails fast when no connection is
    /// active; callers do not attempt to reconnect.
    pub async fn database(&self) -> AppResult<Database> {
        let guard = self.active.read().await;
        guard
            .as_ref()
            .map(|active| active.database.clone())
            .ok_or(AppError::NotConnected)
    }

    pub async fn is_connected(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Round-trip to the store. The driver dials lazily, so this is the
    /// bootstrap check that the configured store is actually reachable.
    pub async fn ping(&self) -> AppResult<()> {
        let database = self.database().await?;
        database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> DatabaseConfig {
        DatabaseConfig {
            uri: "mongodb://localhost:27017".to_string(),
            db_name: "mflix_test".to_string(),
            app_name: None,
        }
    }

    #[tokio::test]
    async fn connect_establishes_handles() {
        let manager = ConnectionManager::new();
        assert!(!manager.is_connected().await);

        manager.connect(&local_config()).await.unwrap();
        assert!(manager.is_connected().await);
        assert!(manager.database().await.is_ok());
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let manager = ConnectionManager::new();
        manager.connect(&local_config()).await.unwrap();

        // A second call must be a no-op: it succeeds even with an unusable
        // URI because no new establishment is attempted.
        let broken = DatabaseConfig {
            uri: "this is not a connection string".to_string(),
            db_name: "other".to_string(),
            app_name: None,
        };
        manager.connect(&broken).await.unwrap();
        assert!(manager.is_connected().await);
    }

    #[tokio::test]
    async fn connect_rejects_malformed_uri() {
        let manager = ConnectionManager::new();
        let broken = DatabaseConfig {
            uri: "this is not a connection string".to_string(),
            db_name: "mflix_test".to_string(),
            app_name: None,
        };
        let err = manager.connect(&broken).await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
        assert!(!manager.is_connected().await);
    }

    #[tokio::test]
    async fn database_requires_active_connection() {
        let manager = ConnectionManager::new();
        let err = manager.database().await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn close_without_connection_fails() {
        let manager = ConnectionManager::new();
        let err = manager.close().await.unwrap_err();
        assert!(matches!(err, AppError::NotConnected));
    }

    #[tokio::test]
    async fn close_then_reconnect() {
        let manager = ConnectionManager::new();
        manager.connect(&local_config()).await.unwrap();
        manager.close().await.unwrap();
        assert!(!manager.is_connected().await);

        manager.connect(&local_config()).await.unwrap();
        assert!(manager.is_connected().await);
    }
}
