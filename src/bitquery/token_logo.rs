use alloy_primitives::Address;
use std::str::FromStr;

pub const PLACEHOLDER_LOGO_URL: &str = "https://via.placeholder.com/64?text=NA";

const TRUSTWALLET_ASSETS_BASE: &str =
  "https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets";

/// Trust Wallet keys its asset directory by EIP-55 checksummed address.
/// Missing or malformed addresses fall back to the placeholder instead of
/// failing the surrounding response.
pub fn token_logo_url(address: Option<&str>) -> String {
  match address.and_then(checksummed_address) {
    Some(checksum) => format!("{}/{}/logo.png", TRUSTWALLET_ASSETS_BASE, checksum),
    None => PLACEHOLDER_LOGO_URL.to_string(),
  }
}

fn checksummed_address(address: &str) -> Option<String> {
  Address::from_str(address.trim())
    .ok()
    .map(|parsed| parsed.to_checksum(None))
}
