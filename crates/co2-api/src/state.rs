use std::sync::Arc;
use std::time::Duration;

use co2_client::CollectionClient;
use co2_dashboard::{COLLECTIONS, Dashboard};

use crate::error::ApiError;

pub type SharedClient = Arc<dyn CollectionClient>;

/// Result of the startup probe. A failed probe halts the dashboard: every
/// page shows the error and no query runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Connection {
    Connected { keyspace: String },
    Failed(String),
}

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard<SharedClient>>,
    pub connection: Arc<Connection>,
}

impl AppState {
    /// Probe the database once. Blocks on the network.
    pub fn connect(client: SharedClient, keyspace: &str, cache_ttl: Duration) -> Self {
        let dashboard = Dashboard::new(client, cache_ttl);
        let connection = match dashboard.probe() {
            Ok(existing) => {
                let missing: Vec<&str> = COLLECTIONS
                    .iter()
                    .copied()
                    .filter(|c| !existing.iter().any(|e| e == c))
                    .collect();
                if !missing.is_empty() {
                    tracing::warn!(?missing, "catalog collections absent from keyspace");
                }
                tracing::info!(keyspace, collections = existing.len(), "connected");
                Connection::Connected {
                    keyspace: keyspace.to_string(),
                }
            }
            Err(e) => {
                tracing::error!(keyspace, error = %e, "database connection failed");
                Connection::Failed(e.to_string())
            }
        };
        Self {
            dashboard: Arc::new(dashboard),
            connection: Arc::new(connection),
        }
    }

    pub fn ensure_connected(&self) -> Result<(), ApiError> {
        match self.connection.as_ref() {
            Connection::Connected { .. } => Ok(()),
            Connection::Failed(msg) => Err(ApiError::Halted(msg.clone())),
        }
    }
}
