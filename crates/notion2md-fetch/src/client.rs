//! Notion content API client

use notion_blocks::{Block, Document, Page, RawBlock};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::http_client;

/// API version sent with every request
pub const NOTION_VERSION: &str = "2022-06-28";

/// Public API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Children are requested in pages of this size (the API maximum)
const PAGE_SIZE: &str = "100";

/// Block kinds whose children are separate pages and are not fetched
const SEPARATE_PAGE_KINDS: &[&str] = &["child_page", "child_database"];

/// Blocking client for the pages and blocks endpoints
pub struct NotionClient {
    http: Client,
    base_url: String,
    token: String,
}

/// One page of a children listing
#[derive(Debug, Deserialize)]
struct BlockList {
    results: Vec<RawBlock>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl NotionClient {
    /// Create a client authenticating with an integration token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        })
    }

    /// Use another endpoint (e.g. a proxy or a test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch page metadata
    pub fn page(&self, page_id: &str) -> Result<Page> {
        let url = self.endpoint(&format!("v1/pages/{}", page_id))?;
        self.get(url)
    }

    /// Fetch the full block tree below `block_id`
    ///
    /// Children of nested blocks are fetched recursively, depth first.
    pub fn blocks(&self, block_id: &str) -> Result<Vec<Block>> {
        self.children(block_id)?
            .into_iter()
            .map(|raw| Block::try_from(raw).map_err(Error::from))
            .collect()
    }

    /// Fetch a page together with its block tree
    pub fn document(&self, page_id: &str) -> Result<Document> {
        let page = self.page(page_id)?;
        log::info!("Fetching blocks of page {}", page.id);
        let blocks = self.blocks(page_id)?;
        Ok(Document::new(page, blocks))
    }

    fn children(&self, block_id: &str) -> Result<Vec<RawBlock>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = self.endpoint(&format!("v1/blocks/{}/children", block_id))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("page_size", PAGE_SIZE);
                if let Some(cursor) = &cursor {
                    query.append_pair("start_cursor", cursor);
                }
            }

            let list: BlockList = self.get(url)?;
            blocks.extend(list.results);

            match list.next_cursor {
                Some(next) if list.has_more => cursor = Some(next),
                _ => break,
            }
        }

        for block in &mut blocks {
            if !block.has_children || SEPARATE_PAGE_KINDS.contains(&block.kind.as_str()) {
                continue;
            }
            if let Some(id) = block.id.clone() {
                log::debug!("Fetching children of {} block {}", block.kind, id);
                block.children = self.children(&id)?;
            }
        }

        Ok(blocks)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| Error::InvalidUrl {
            url: raw,
            reason: e.to_string(),
        })
    }

    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()?;
        Ok(check_status(response)?.json()?)
    }
}

/// Turn a non-success response into [`Error::Status`] carrying the API message
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(err) if !err.message.is_empty() => format!("{} ({})", err.message, err.code),
        _ => status.canonical_reason().unwrap_or("request failed").to_string(),
    };

    Err(Error::Status {
        status: status.as_u16(),
        message,
    })
}
