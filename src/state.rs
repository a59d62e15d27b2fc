use std::sync::Arc;

use anyhow::Context;
use sqlx::{mysql::MySqlPoolOptions, Connection};
use tracing::info;

use crate::config::AppConfig;
use crate::users::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Opens the pool and pings it; any failure aborts startup.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = MySqlPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_with(config.database.connect_options()?)
            .await
            .context("connect to database")?;

        db.acquire()
            .await
            .context("acquire database connection")?
            .ping()
            .await
            .context("ping database")?;

        info!("database successfully configured");
        Ok(Self::from_store(Arc::new(db)))
    }

    pub fn from_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::users::memory::MemoryStore>) {
        let store = Arc::new(crate::users::memory::MemoryStore::default());
        (Self::from_store(store.clone()), store)
    }
}
