use async_trait::async_trait;
use reqwest::Client;

use crate::types::{AppError, BlockRecord};

/// The two backend operations one poll cycle needs.
#[async_trait]
pub trait PollTarget: Send + Sync {
  /// Ask the backend to fetch from Bitquery and store the result.
  async fn trigger_fetch(&self) -> Result<(), AppError>;

  /// Reload the stored block list.
  async fn load_blocks(&self) -> Result<Vec<BlockRecord>, AppError>;
}

pub struct HttpPollTarget {
  client: Client,
  backend_url: String,
}

impl HttpPollTarget {
  pub fn new(backend_url: &str) -> Self {
    Self {
      client: Client::new(),
      backend_url: backend_url.trim_end_matches('/').to_string(),
    }
  }
}

#[async_trait]
impl PollTarget for HttpPollTarget {
  async fn trigger_fetch(&self) -> Result<(), AppError> {
    let response = self
      .client
      .post(format!("{}/api/fetch-blocks", self.backend_url))
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(AppError::Client(format!(
        "Failed to fetch & save: {}",
        response.status().as_u16()
      )));
    }
    Ok(())
  }

  async fn load_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
    let response = self
      .client
      .get(format!("{}/api/blocks", self.backend_url))
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(AppError::Client(format!(
        "Failed to load blocks: {}",
        response.status().as_u16()
      )));
    }

    Ok(response.json().await?)
  }
}
