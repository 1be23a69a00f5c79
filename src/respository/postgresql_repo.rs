use crate::respository::r#trait::Repository;
use crate::types::{AppError, BlockRecord};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct PostgreSQLRepository {
    pool: Arc<PgPool>,
}

impl PostgreSQLRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PostgreSQLRepository {
    async fn upsert_block(&self, block: &BlockRecord) -> Result<(), AppError> {
        crate::respository::postgresql::upsert_block(&self.pool, block).await
    }

    async fn get_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
        crate::respository::postgresql::get_blocks(&self.pool).await
    }
}
