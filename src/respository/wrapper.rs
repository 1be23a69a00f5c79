use crate::config::Settings;
use crate::respository::{
    connect_db, setup_db_schema, MemoryRepository, PostgreSQLRepository, Repository,
};
use crate::types::{AppError, BlockRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Repository selected at startup from the settings.
pub enum RepositoryWrapper {
    Memory(Arc<MemoryRepository>),
    PostgreSQL(Arc<PostgreSQLRepository>),
}

impl RepositoryWrapper {
    pub async fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        if settings.repository.memory_db {
            Ok(RepositoryWrapper::Memory(Arc::new(MemoryRepository::new())))
        } else {
            let db_connection_pool = connect_db(&settings.repository.postgresql_url)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to connect to PostgreSQL: {}", e))
                })?;
            setup_db_schema(&db_connection_pool).await.map_err(|e| {
                AppError::Database(format!("Failed to setup database schema: {}", e))
            })?;
            Ok(RepositoryWrapper::PostgreSQL(Arc::new(
                PostgreSQLRepository::new(Arc::new(db_connection_pool)),
            )))
        }
    }
}

#[async_trait]
impl Repository for RepositoryWrapper {
    async fn upsert_block(&self, block: &BlockRecord) -> Result<(), AppError> {
        match self {
            RepositoryWrapper::Memory(r) => r.upsert_block(block).await,
            RepositoryWrapper::PostgreSQL(r) => r.upsert_block(block).await,
        }
    }

    async fn get_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
        match self {
            RepositoryWrapper::Memory(r) => r.get_blocks().await,
            RepositoryWrapper::PostgreSQL(r) => r.get_blocks().await,
        }
    }
}
