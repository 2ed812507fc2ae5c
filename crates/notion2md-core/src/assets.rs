//! External collaborators used during rendering
//!
//! The renderer never touches the network or the filesystem itself. Images
//! and bookmark metadata are obtained through these traits; network-backed
//! implementations live in `notion2md-fetch`.

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Open Graph style metadata of an external page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkMetadata {
    pub title: String,
    pub description: String,
    /// Preview image URL
    pub image: String,
    /// Canonical URL of the page
    pub url: String,
}

/// Failure to store an image
///
/// `path` is whatever reference could be derived before the failure; it
/// may be empty or point at a file that was never written. The renderer
/// still uses it so the image reference stays in the output.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ImageError {
    pub path: String,
    pub source: Error,
}

impl ImageError {
    pub fn new(path: impl Into<String>, source: Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Stores remote images and returns the path under which the site serves them
pub trait ImageStore {
    fn store(&mut self, url: &str) -> std::result::Result<String, ImageError>;
}

/// Scrapes metadata of external pages for bookmark blocks
pub trait MetadataScraper {
    fn scrape(&mut self, url: &str) -> Result<LinkMetadata>;
}

/// Collaborators for one generation run
pub struct Collaborators<'a> {
    pub images: &'a mut dyn ImageStore,
    pub scraper: &'a mut dyn MetadataScraper,
    pub diagnostics: &'a mut dyn Diagnostics,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        images: &'a mut dyn ImageStore,
        scraper: &'a mut dyn MetadataScraper,
        diagnostics: &'a mut dyn Diagnostics,
    ) -> Self {
        Self {
            images,
            scraper,
            diagnostics,
        }
    }
}

/// Collaborator that never leaves the process
///
/// Images keep their remote URL and bookmarks get no metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

impl ImageStore for Offline {
    fn store(&mut self, url: &str) -> std::result::Result<String, ImageError> {
        Ok(url.to_string())
    }
}

impl MetadataScraper for Offline {
    fn scrape(&mut self, url: &str) -> Result<LinkMetadata> {
        Ok(LinkMetadata {
            url: url.to_string(),
            ..Default::default()
        })
    }
}
