use std::time::Duration;

use bson::{doc, Document};
use mongodb::{
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::users::{Token, User};

const USERS: &str = "users";
const TOKENS: &str = "tokens";

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("MongoDB URI is not defined in the configuration")]
    MissingUri,
    #[error("error connecting to the database: {0}")]
    Connect(#[source] mongodb::error::Error),
    #[error("error creating indexes: {0}")]
    Indexes(#[source] mongodb::error::Error),
    #[error("error disconnecting from the database: {0}")]
    Disconnect(String),
}

/// Owns the driver's connection pool from `connect` until `disconnect`.
pub struct Database {
    client: Client,
    db: mongodb::Database,
    shutdown_timeout: Duration,
}

impl Database {
    /// Opens the pool, pings the deployment and makes sure the indexes exist.
    ///
    /// An empty URI is rejected before the driver is touched.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if cfg.uri.trim().is_empty() {
            error!("MongoDB URI is not defined in the configuration");
            return Err(DatabaseError::MissingUri);
        }

        let mut options = ClientOptions::parse(&cfg.uri).await.map_err(|e| {
            error!(error = %e, "invalid MongoDB connection string");
            DatabaseError::Connect(e)
        })?;
        options.app_name = Some(cfg.app_name.clone());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        if let Some(max) = cfg.max_pool_size {
            options.max_pool_size = Some(max);
        }

        let client = Client::with_options(options).map_err(DatabaseError::Connect)?;
        let db = client.database(&cfg.db_name);

        if let Err(e) = db.run_command(doc! { "ping": 1 }, None).await {
            error!(error = %e, db = %cfg.db_name, "error connecting to the database");
            return Err(DatabaseError::Connect(e));
        }

        let database = Self {
            client,
            db,
            shutdown_timeout: cfg.shutdown_timeout,
        };
        database.ensure_indexes().await?;

        info!(db = %cfg.db_name, app = %cfg.app_name, "connected to the database");
        Ok(database)
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    pub fn tokens(&self) -> Collection<Token> {
        self.db.collection(TOKENS)
    }

    async fn ensure_indexes(&self) -> Result<(), DatabaseError> {
        let unique = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{field}_unique"))
                        .build(),
                )
                .build()
        };

        self.users()
            .create_indexes([unique("username"), unique("email")], None)
            .await
            .map_err(DatabaseError::Indexes)?;

        self.tokens()
            .create_index(
                IndexModel::builder().keys(doc! { "userId": 1 }).build(),
                None,
            )
            .await
            .map_err(DatabaseError::Indexes)?;

        Ok(())
    }

    /// Closes the pool, giving in-flight operations up to the configured timeout.
    pub async fn disconnect(self) -> Result<(), DatabaseError> {
        let db_name = self.db.name().to_string();
        match tokio::time::timeout(self.shutdown_timeout, self.client.shutdown()).await {
            Ok(()) => {
                info!(db = %db_name, "disconnected from the database");
                Ok(())
            }
            Err(elapsed) => {
                error!(db = %db_name, error = %elapsed, "error disconnecting from the database");
                Err(DatabaseError::Disconnect(elapsed.to_string()))
            }
        }
    }
}
