//! Image downloads into the site's static folder

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use notion2md_core::{ImageError, ImageStore, RenderConfig};
use reqwest::blocking::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::http_client;

/// Downloads images to a folder and returns the path the site serves them under
///
/// Each URL is downloaded at most once per store.
pub struct HttpImageStore {
    http: Client,
    folder: PathBuf,
    link: String,
    stored: HashMap<String, String>,
}

impl HttpImageStore {
    pub fn new(folder: impl Into<PathBuf>, link: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            folder: folder.into(),
            link: link.into(),
            stored: HashMap::new(),
        })
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        Self::new(&config.images_folder, &config.images_link)
    }

    fn download(&self, url: &str) -> std::result::Result<String, ImageError> {
        let fail = |path: &str, err: Error| ImageError::new(path, err.into());

        let name = image_file_name(url).map_err(|e| fail("", e))?;
        let bytes = self.fetch(url).map_err(|e| fail("", e))?;

        fs::create_dir_all(&self.folder).map_err(|e| fail("", e.into()))?;
        let path = self.folder.join(&name);
        let mut file = File::create(&path).map_err(|e| fail(&name, e.into()))?;

        let link = join_link(&self.link, &name);
        file.write_all(&bytes).map_err(|e| fail(&link, e.into()))?;

        log::info!("Downloaded {} to {}", url, path.display());
        Ok(link)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}

impl ImageStore for HttpImageStore {
    fn store(&mut self, url: &str) -> std::result::Result<String, ImageError> {
        if let Some(link) = self.stored.get(url) {
            return Ok(link.clone());
        }
        let link = self.download(url)?;
        self.stored.insert(url.to_string(), link.clone());
        Ok(link)
    }
}

/// Local file name for an image: `<host>_<last path segment>`
///
/// The query string (signed URLs carry one) does not take part.
pub fn image_file_name(url: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| invalid("no host"))?;
    let file = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| invalid("no file name"))?;

    Ok(format!("{}_{}", host, file))
}

/// Join the public images path and a file name with exactly one slash
pub fn join_link(link: &str, name: &str) -> String {
    format!("{}/{}", link.trim_end_matches('/'), name)
}
