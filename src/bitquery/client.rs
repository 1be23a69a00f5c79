use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::bitquery::model::{
  parse_block_time, BlockEntry, BlocksData, GraphQlResponse, TransferEntry, TransfersData,
};
use crate::bitquery::token_logo::token_logo_url;
use crate::types::{AppError, BlockRecord, TransferRecord};

const BLOCKS_QUERY: &str = r#"
{
  EVM(network: eth, dataset: archive) {
    Blocks(limit: {count: 10}) {
      Block {
        Number
        Time
        Hash
        MixDigest
        BaseFee
        Coinbase
        TxHash
        TxCount
      }
    }
  }
}
"#;

const TRANSFERS_QUERY: &str = r#"
{
  EVM(network: eth, dataset: archive) {
    Transfers(limit: {count: 10}) {
      Transaction {
        Hash
        Block {
          Number
          Time
        }
      }
      Currency {
        Address
        Symbol
        Name
      }
      Amount
      From {
        Address
      }
      To {
        Address
      }
    }
  }
}
"#;

#[derive(Clone)]
pub struct BitqueryClient {
  client: Client,
  api_url: String,
  api_key: String,
}

impl BitqueryClient {
  pub fn new(api_url: String, api_key: String) -> Self {
    Self {
      client: Client::new(),
      api_url,
      api_key,
    }
  }

  pub async fn fetch_latest_blocks(&self) -> Result<Vec<BlockRecord>, AppError> {
    let data: BlocksData = self.execute(BLOCKS_QUERY).await?;
    data
      .evm
      .map(|evm| evm.blocks)
      .unwrap_or_default()
      .into_iter()
      .map(map_block)
      .collect()
  }

  pub async fn fetch_latest_transfers(&self) -> Result<Vec<TransferRecord>, AppError> {
    let data: TransfersData = self.execute(TRANSFERS_QUERY).await?;
    data
      .evm
      .map(|evm| evm.transfers)
      .unwrap_or_default()
      .into_iter()
      .map(map_transfer)
      .collect()
  }

  async fn execute<T>(&self, query: &str) -> Result<T, AppError>
  where
    T: DeserializeOwned,
  {
    let payload = json!({ "query": query });

    let response = self
      .client
      .post(&self.api_url)
      .bearer_auth(&self.api_key)
      .header("Content-Type", "application/json")
      .json(&payload)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
          (
            name.to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
          )
        })
        .collect();
      let body = response.text().await.unwrap_or_default();
      return Err(AppError::Api {
        status: Some(status.as_u16()),
        headers,
        message: if body.is_empty() {
          format!("request failed with status {}", status)
        } else {
          body
        },
      });
    }

    let envelope: GraphQlResponse<T> = response.json().await?;

    if let Some(errors) = envelope.errors {
      if !errors.is_empty() {
        let message = errors
          .into_iter()
          .map(|e| e.message)
          .collect::<Vec<_>>()
          .join("; ");
        return Err(AppError::Api {
          status: None,
          headers: Vec::new(),
          message,
        });
      }
    }

    envelope
      .data
      .ok_or_else(|| AppError::Client("GraphQL response carried no data".to_string()))
  }
}

fn map_block(entry: BlockEntry) -> Result<BlockRecord, AppError> {
  let fields = entry.block;

  let block_number = fields
    .number
    .as_ref()
    .and_then(|n| n.as_i64())
    .ok_or_else(|| AppError::Client("block entry is missing a parseable Number".to_string()))?;

  let timestamp = fields
    .time
    .as_deref()
    .and_then(parse_block_time)
    .ok_or_else(|| {
      AppError::Client(format!(
        "block {} is missing a parseable Time",
        block_number
      ))
    })?;

  Ok(BlockRecord {
    block_number,
    timestamp,
    hash: fields.hash,
    mix_digest: fields.mix_digest,
    base_fee: fields.base_fee.as_ref().and_then(|n| n.as_i64()),
    coinbase: fields.coinbase,
    latest_tx_hash: fields.tx_hash,
    tx_count: fields.tx_count.as_ref().and_then(|n| n.as_i32()),
  })
}

fn map_transfer(entry: TransferEntry) -> Result<TransferRecord, AppError> {
  let transaction = entry.transaction.unwrap_or_default();
  let block = transaction.block.unwrap_or_default();
  let currency = entry.currency.unwrap_or_default();

  let block_number = block
    .number
    .as_ref()
    .and_then(|n| n.as_i64())
    .ok_or_else(|| AppError::Client("transfer entry is missing a parseable block Number".to_string()))?;

  let timestamp = block.time.as_deref().and_then(parse_block_time).ok_or_else(|| {
    AppError::Client(format!(
      "transfer in block {} is missing a parseable Time",
      block_number
    ))
  })?;

  let image_url = token_logo_url(currency.address.as_deref());

  Ok(TransferRecord {
    block_number,
    timestamp,
    tx_hash: transaction.hash,
    symbol: currency.symbol,
    name: currency.name,
    amount: entry.amount.as_ref().and_then(|n| n.as_decimal()),
    image_url,
  })
}
