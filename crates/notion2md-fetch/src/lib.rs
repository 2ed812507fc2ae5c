//! notion2md-fetch: network collaborators for notion2md
//!
//! This crate provides:
//! - [`NotionClient`]: pages and block trees from the content API
//! - [`HttpImageStore`]: downloads images into the site's static folder
//! - [`OpenGraphScraper`]: link metadata for bookmark blocks
//!
//! Everything that touches the network is behind the default `http` feature.

pub mod error;

#[cfg(feature = "http")]
pub mod client;
#[cfg(feature = "http")]
pub mod images;
#[cfg(feature = "http")]
pub mod opengraph;

pub use error::{Error, Result};

#[cfg(feature = "http")]
pub use client::{DEFAULT_BASE_URL, NOTION_VERSION, NotionClient};
#[cfg(feature = "http")]
pub use images::{HttpImageStore, image_file_name, join_link};
#[cfg(feature = "http")]
pub use opengraph::{OpenGraphScraper, parse_metadata};

/// Per-request timeout of every client in this crate
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Blocking HTTP client shared by the collaborators
#[cfg(feature = "http")]
fn http_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("notion2md/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
