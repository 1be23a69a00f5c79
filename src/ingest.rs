use crate::bitquery::BitqueryClient;
use crate::respository::Repository;
use crate::types::{AppError, BlockRecord};
use log::{error, info};

#[derive(Debug, Default)]
pub struct IngestReport {
  pub stored: usize,
  pub failures: Vec<IngestFailure>,
}

#[derive(Debug)]
pub struct IngestFailure {
  pub block_number: i64,
  pub message: String,
}

impl IngestReport {
  pub fn is_clean(&self) -> bool {
    self.failures.is_empty()
  }

  pub fn describe_failures(&self) -> String {
    self
      .failures
      .iter()
      .map(|f| format!("block {}: {}", f.block_number, f.message))
      .collect::<Vec<_>>()
      .join("; ")
  }
}

/// One fetch-and-store cycle: pull the latest page of blocks from
/// Bitquery and upsert each one. Rows are independent, so one failed
/// write does not stop the rest of the batch; failures come back
/// aggregated in the report.
pub async fn fetch_and_store(
  client: &BitqueryClient,
  repository: &dyn Repository,
) -> Result<IngestReport, AppError> {
  info!("Fetching latest blocks from Bitquery...");
  let fetched = client.fetch_latest_blocks().await?;
  info!("Fetched {} blocks", fetched.len());
  Ok(store_blocks(repository, &fetched).await)
}

pub async fn store_blocks(repository: &dyn Repository, blocks: &[BlockRecord]) -> IngestReport {
  let mut report = IngestReport::default();

  for block in blocks {
    match repository.upsert_block(block).await {
      Ok(()) => report.stored += 1,
      Err(e) => {
        error!("Failed to store block {}: {}", block.block_number, e);
        report.failures.push(IngestFailure {
          block_number: block.block_number,
          message: e.to_string(),
        });
      }
    }
  }

  report
}

#[cfg(test)]
mod tests {
  use super::store_blocks;
  use crate::respository::{MemoryRepository, Repository};
  use crate::types::{AppError, BlockRecord};
  use async_trait::async_trait;
  use chrono::{Duration, TimeZone, Utc};
  use std::collections::HashSet;

  fn block(number: i64) -> BlockRecord {
    let base = Utc.with_ymd_and_hms(2025, 8, 6, 12, 0, 0).unwrap();
    BlockRecord {
      block_number: number,
      timestamp: base + Duration::seconds(number),
      hash: None,
      mix_digest: None,
      base_fee: None,
      coinbase: None,
      latest_tx_hash: None,
      tx_count: None,
    }
  }

  /// Fails upserts for a fixed set of block numbers, stores the rest.
  struct FlakyRepository {
    inner: MemoryRepository,
    failing: HashSet<i64>,
  }

  #[async_trait]
  impl Repository for FlakyRepository {
    async fn upsert_block(&self, block: &BlockRecord) -> Result<(), AppError> {
      if self.failing.contains(&block.block_number) {
        return Err(AppError::Database("connection reset".to_string()));
      }
      self.inner.upsert_block(block).await
    }

    async fn get_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
      self.inner.get_blocks().await
    }
  }

  #[tokio::test]
  async fn stores_every_block_on_the_happy_path() {
    let repo = MemoryRepository::new();
    let batch: Vec<BlockRecord> = (100..110).map(block).collect();

    let report = store_blocks(&repo, &batch).await;

    assert!(report.is_clean());
    assert_eq!(report.stored, 10);

    let stored = repo.get_blocks().await.unwrap();
    let numbers: Vec<i64> = stored.iter().map(|b| b.block_number).collect();
    assert_eq!(numbers, (100..110).rev().collect::<Vec<i64>>());
  }

  #[tokio::test]
  async fn continues_past_failed_upserts_and_aggregates_them() {
    let repo = FlakyRepository {
      inner: MemoryRepository::new(),
      failing: [102, 105].into_iter().collect(),
    };
    let batch: Vec<BlockRecord> = (100..110).map(block).collect();

    let report = store_blocks(&repo, &batch).await;

    assert_eq!(report.stored, 8);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.failures[0].block_number, 102);
    assert_eq!(report.failures[1].block_number, 105);

    let details = report.describe_failures();
    assert!(details.contains("block 102"));
    assert!(details.contains("block 105"));

    // Blocks after the failed ones still landed.
    let stored = repo.get_blocks().await.unwrap();
    assert!(stored.iter().any(|b| b.block_number == 109));
  }

  #[tokio::test]
  async fn storing_the_same_batch_twice_is_idempotent() {
    let repo = MemoryRepository::new();
    let batch: Vec<BlockRecord> = (100..110).map(block).collect();

    store_blocks(&repo, &batch).await;
    let report = store_blocks(&repo, &batch).await;

    assert!(report.is_clean());
    assert_eq!(repo.get_blocks().await.unwrap().len(), 10);
  }
}
