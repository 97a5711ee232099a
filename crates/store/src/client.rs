//! Store connection handle.

use mongodb::{Client, Database};
use tracing::info;

use crate::error::Result;

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string, e.g. `mongodb://localhost:27017`.
    pub uri: String,
    /// Database name.
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "Zepp".to_string(),
        }
    }
}

/// Explicit, injected connection handle.
///
/// Acquired once at process start and released with [`StoreClient::close`]
/// at shutdown; stores borrow collections from it instead of sharing a
/// global client.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    database: Database,
}

impl StoreClient {
    /// Connect and select the configured database.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.database);
        info!("Connected to document store at {}", config.uri);
        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Release the connection. Called once during shutdown.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("Document store connection closed");
    }
}
