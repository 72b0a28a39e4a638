use std::sync::Arc;

use diesel::PgConnection;

use crate::{config::Config, database::connection::DbPool, error::AppError};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub pool: DbPool,
}

impl AppState {
    pub fn new(config: Config, pool: DbPool) -> SharedState {
        Arc::new(Self { config, pool })
    }

    /// Runs blocking database work on a pooled connection.
    pub async fn run<F, T>(&self, function: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            function(&mut *connection)
        })
        .await?
    }
}
