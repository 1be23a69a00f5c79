use crate::types::{AppError, BlockRecord};
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn connect_db(db_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
}

const BLOCKS_TABLE_NAME: &str = "blocks";

// Ensure the blocks table exists
pub async fn setup_db_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            block_number BIGINT NOT NULL UNIQUE,
            timestamp TIMESTAMPTZ NOT NULL,
            hash VARCHAR(128),
            mix_digest VARCHAR(128),
            base_fee BIGINT,
            coinbase VARCHAR(128),
            latest_tx_hash VARCHAR(128),
            tx_count INTEGER
        )
        "#,
        BLOCKS_TABLE_NAME
    ))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn upsert_block(pool: &PgPool, block: &BlockRecord) -> Result<(), AppError> {
    let query = format!(
        r#"
        INSERT INTO {0} (block_number, timestamp, hash, mix_digest, base_fee, coinbase, latest_tx_hash, tx_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (block_number) DO UPDATE SET
            timestamp = EXCLUDED.timestamp,
            hash = EXCLUDED.hash,
            mix_digest = EXCLUDED.mix_digest,
            base_fee = EXCLUDED.base_fee,
            coinbase = EXCLUDED.coinbase,
            latest_tx_hash = EXCLUDED.latest_tx_hash,
            tx_count = EXCLUDED.tx_count
        "#,
        BLOCKS_TABLE_NAME
    );

    sqlx::query(&query)
        .bind(block.block_number)
        .bind(block.timestamp)
        .bind(&block.hash)
        .bind(&block.mix_digest)
        .bind(block.base_fee)
        .bind(&block.coinbase)
        .bind(&block.latest_tx_hash)
        .bind(block.tx_count)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::Database(format!(
                "Failed to upsert block {}: {}",
                block.block_number, e
            ))
        })?;
    Ok(())
}

pub async fn get_blocks(pool: &PgPool) -> Result<Vec<BlockRecord>, AppError> {
    let query = format!(
        "SELECT block_number, timestamp, hash, mix_digest, base_fee, coinbase, latest_tx_hash, tx_count FROM {} ORDER BY timestamp DESC",
        BLOCKS_TABLE_NAME
    );

    sqlx::query_as::<_, BlockRecord>(&query)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch blocks: {}", e)))
}
