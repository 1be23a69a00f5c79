mod client;
mod model;
mod token_logo;

pub use client::BitqueryClient;
pub use token_logo::{token_logo_url, PLACEHOLDER_LOGO_URL};
