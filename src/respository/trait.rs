use crate::types::{AppError, BlockRecord};
use async_trait::async_trait;

/// Storage seam for block records. Backends keep at most one row per
/// block number; re-upserting overwrites every non-key field.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Insert the block, or overwrite the existing row with the same
    /// block number.
    async fn upsert_block(&self, block: &BlockRecord) -> Result<(), AppError>;

    /// All stored blocks, newest timestamp first.
    async fn get_blocks(&self) -> Result<Vec<BlockRecord>, AppError>;
}
