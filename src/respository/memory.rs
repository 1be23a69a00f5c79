use crate::respository::r#trait::Repository;
use crate::types::{AppError, BlockRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory repository, used by tests and by `repository.memory_db`
/// deployments that have no Postgres at hand.
#[derive(Clone)]
pub struct MemoryRepository {
    // block_number -> record
    blocks: Arc<RwLock<HashMap<i64, BlockRecord>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            blocks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn upsert_block(&self, block: &BlockRecord) -> Result<(), AppError> {
        let mut blocks = self.blocks.write().await;
        blocks.insert(block.block_number, block.clone());
        Ok(())
    }

    async fn get_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
        let blocks = self.blocks.read().await;
        let mut list: Vec<BlockRecord> = blocks.values().cloned().collect();
        // Newest first; equal timestamps fall back to the block number so
        // the order stays deterministic.
        list.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.block_number.cmp(&a.block_number))
        });
        Ok(list)
    }
}
