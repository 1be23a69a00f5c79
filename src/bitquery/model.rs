use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

// ====== GraphQL envelope ======

#[derive(Deserialize, Debug)]
pub struct GraphQlResponse<T> {
  pub data: Option<T>,
  pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize, Debug)]
pub struct GraphQlError {
  pub message: String,
}

// ====== Blocks query response ======

#[derive(Deserialize, Debug)]
pub struct BlocksData {
  #[serde(rename = "EVM")]
  pub evm: Option<EvmBlocks>,
}

#[derive(Deserialize, Debug)]
pub struct EvmBlocks {
  #[serde(rename = "Blocks", default)]
  pub blocks: Vec<BlockEntry>,
}

#[derive(Deserialize, Debug)]
pub struct BlockEntry {
  #[serde(rename = "Block")]
  pub block: BlockFields,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct BlockFields {
  pub number: Option<RawNumber>,
  pub time: Option<String>,
  pub hash: Option<String>,
  pub mix_digest: Option<String>,
  pub base_fee: Option<RawNumber>,
  pub coinbase: Option<String>,
  pub tx_hash: Option<String>,
  pub tx_count: Option<RawNumber>,
}

// ====== Transfers query response ======

#[derive(Deserialize, Debug)]
pub struct TransfersData {
  #[serde(rename = "EVM")]
  pub evm: Option<EvmTransfers>,
}

#[derive(Deserialize, Debug)]
pub struct EvmTransfers {
  #[serde(rename = "Transfers", default)]
  pub transfers: Vec<TransferEntry>,
}

// From/To come back in the payload as well; nothing downstream reads
// them, so they stay out of the model.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TransferEntry {
  pub transaction: Option<TransferTransaction>,
  pub currency: Option<TransferCurrency>,
  pub amount: Option<RawNumber>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TransferTransaction {
  pub hash: Option<String>,
  pub block: Option<TransferBlock>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TransferBlock {
  pub number: Option<RawNumber>,
  pub time: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct TransferCurrency {
  pub address: Option<String>,
  pub symbol: Option<String>,
  pub name: Option<String>,
}

// ====== Scalar coercion ======

// Bitquery serializes most numeric scalars as strings; some arrive as
// plain JSON numbers depending on the field.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RawNumber {
  Int(i64),
  Float(f64),
  Text(String),
}

impl RawNumber {
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      RawNumber::Int(value) => Some(*value),
      RawNumber::Float(value) if value.is_finite() => Some(*value as i64),
      RawNumber::Float(_) => None,
      RawNumber::Text(text) => {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
          return Some(value);
        }
        // parseInt semantics: "7.5" coerces to 7
        trimmed
          .parse::<f64>()
          .ok()
          .filter(|value| value.is_finite())
          .map(|value| value as i64)
      }
    }
  }

  pub fn as_i32(&self) -> Option<i32> {
    self.as_i64().and_then(|value| i32::try_from(value).ok())
  }

  pub fn as_decimal(&self) -> Option<Decimal> {
    match self {
      RawNumber::Int(value) => Some(Decimal::from(*value)),
      RawNumber::Float(value) => Decimal::from_f64_retain(*value),
      RawNumber::Text(text) => Decimal::from_str(text.trim()).ok(),
    }
  }
}

// Bitquery's Time scalar is RFC 3339; the space-separated form shows up
// on some datasets.
pub fn parse_block_time(raw: &str) -> Option<DateTime<Utc>> {
  let trimmed = raw.trim();
  if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
    return Some(parsed.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
    .ok()
    .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
  use super::{parse_block_time, RawNumber};
  use chrono::{Datelike, Timelike};

  #[test]
  fn string_number_parses_to_i64() {
    assert_eq!(RawNumber::Text("22914072".to_string()).as_i64(), Some(22914072));
  }

  #[test]
  fn float_string_truncates_like_parse_int() {
    assert_eq!(RawNumber::Text("7.561".to_string()).as_i64(), Some(7));
  }

  #[test]
  fn plain_numbers_pass_through() {
    assert_eq!(RawNumber::Int(42).as_i64(), Some(42));
    assert_eq!(RawNumber::Float(42.9).as_i64(), Some(42));
  }

  #[test]
  fn garbage_number_is_none() {
    assert_eq!(RawNumber::Text("not-a-number".to_string()).as_i64(), None);
  }

  #[test]
  fn decimal_amount_parses_from_string() {
    let amount = RawNumber::Text("1250.000001".to_string()).as_decimal();
    assert_eq!(amount, Some("1250.000001".parse().unwrap()));
  }

  #[test]
  fn parses_rfc3339_time() {
    let parsed = parse_block_time("2025-08-06T10:20:30Z").expect("rfc3339 should parse");
    assert_eq!(parsed.year(), 2025);
    assert_eq!(parsed.hour(), 10);
  }

  #[test]
  fn parses_space_separated_time() {
    let parsed = parse_block_time("2025-08-06 10:20:30").expect("space form should parse");
    assert_eq!(parsed.month(), 8);
    assert_eq!(parsed.minute(), 20);
  }

  #[test]
  fn rejects_unparseable_time() {
    assert!(parse_block_time("yesterday").is_none());
  }
}
