use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ====== Block record (persisted) ======
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
  pub block_number: i64,
  pub timestamp: DateTime<Utc>,
  pub hash: Option<String>,
  pub mix_digest: Option<String>,
  pub base_fee: Option<i64>,
  pub coinbase: Option<String>,
  pub latest_tx_hash: Option<String>,
  pub tx_count: Option<i32>,
}

// ====== Transfer record (computed per request, never persisted) ======
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
  pub block_number: i64,
  pub timestamp: DateTime<Utc>,
  pub tx_hash: Option<String>,
  pub symbol: Option<String>,
  pub name: Option<String>,
  pub amount: Option<Decimal>,
  pub image_url: String,
}

// ====== Unified Error Type ======
#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("API Client error: {0}")]
  Client(String),

  #[error("Bitquery API error: {message}")]
  Api {
    status: Option<u16>,
    headers: Vec<(String, String)>,
    message: String,
  },

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Initialization error: {0}")]
  Initialization(String),

  #[error("Database error: {0}")]
  Database(String),
}

// ====== Error Conversions (From impls) ======

impl From<reqwest::Error> for AppError {
  fn from(err: reqwest::Error) -> Self {
    AppError::Client(format!("Reqwest error: {}", err))
  }
}

impl From<sqlx::Error> for AppError {
  fn from(err: sqlx::Error) -> Self {
    AppError::Database(format!("SQLx error: {}", err))
  }
}

impl From<std::io::Error> for AppError {
  fn from(err: std::io::Error) -> Self {
    AppError::Initialization(format!("IO error: {}", err))
  }
}

impl From<serde_json::Error> for AppError {
  fn from(err: serde_json::Error) -> Self {
    AppError::Client(format!("JSON parse error: {}", err))
  }
}

impl From<config::ConfigError> for AppError {
  fn from(err: config::ConfigError) -> Self {
    AppError::Config(err.to_string())
  }
}
