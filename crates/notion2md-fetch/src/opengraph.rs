//! Open Graph metadata for bookmark blocks

use std::cell::RefCell;
use std::rc::Rc;

use lol_html::{RewriteStrSettings, element, rewrite_str, text};
use notion2md_core::{LinkMetadata, MetadataScraper};
use reqwest::blocking::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::http_client;

/// Scrapes `og:*` tags of bookmarked pages
pub struct OpenGraphScraper {
    http: Client,
}

impl OpenGraphScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: http_client()?,
        })
    }

    fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }
        Ok(response.text()?)
    }
}

impl MetadataScraper for OpenGraphScraper {
    fn scrape(&mut self, url: &str) -> notion2md_core::Result<LinkMetadata> {
        let html = self.fetch(url)?;
        Ok(parse_metadata(&html, url)?)
    }
}

/// Tags seen while scanning a document
#[derive(Debug, Clone, Default)]
struct Found {
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    og_url: Option<String>,
    title: String,
    description: Option<String>,
    canonical: Option<String>,
}

/// Extract link metadata from an HTML document
///
/// Open Graph tags win; `<title>`, `<meta name="description">` and
/// `<link rel="canonical">` fill the gaps. Relative image and canonical
/// URLs are resolved against `page_url`.
pub fn parse_metadata(html: &str, page_url: &str) -> Result<LinkMetadata> {
    let state = Rc::new(RefCell::new(Found::default()));

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("meta[content]", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let key = el
                            .get_attribute("property")
                            .or_else(|| el.get_attribute("name"))
                            .unwrap_or_default()
                            .to_ascii_lowercase();
                        let content = el.get_attribute("content").unwrap_or_default();

                        let mut state = state.borrow_mut();
                        let slot = match key.as_str() {
                            "og:title" => &mut state.og_title,
                            "og:description" => &mut state.og_description,
                            "og:image" => &mut state.og_image,
                            "og:url" => &mut state.og_url,
                            "description" => &mut state.description,
                            _ => return Ok(()),
                        };
                        // The first occurrence of a tag counts
                        if slot.is_none() {
                            *slot = Some(content);
                        }
                        Ok(())
                    }
                }),
                element!("link[rel][href]", {
                    let state = Rc::clone(&state);
                    move |el| {
                        let is_canonical = el
                            .get_attribute("rel")
                            .is_some_and(|rel| rel.split_whitespace().any(|r| r == "canonical"));
                        let mut state = state.borrow_mut();
                        if is_canonical && state.canonical.is_none() {
                            state.canonical = el.get_attribute("href");
                        }
                        Ok(())
                    }
                }),
                text!("head > title", {
                    let state = Rc::clone(&state);
                    move |t| {
                        state.borrow_mut().title.push_str(t.as_str());
                        Ok(())
                    }
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| Error::Html(err.to_string()))?;

    let found = Rc::try_unwrap(state)
        .map(|cell| cell.into_inner())
        .unwrap_or_else(|rc| rc.borrow().clone());

    let base = Url::parse(page_url).ok();
    let resolve = |value: String| match &base {
        Some(base) => base
            .join(&value)
            .map(|url| url.to_string())
            .unwrap_or(value),
        None => value,
    };

    let title = found.title.trim().to_string();
    Ok(LinkMetadata {
        title: found
            .og_title
            .or_else(|| (!title.is_empty()).then_some(title))
            .unwrap_or_default(),
        description: found
            .og_description
            .or(found.description)
            .unwrap_or_default(),
        image: found.og_image.map(&resolve).unwrap_or_default(),
        url: found
            .og_url
            .or(found.canonical)
            .map(&resolve)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    #[test]
    fn test_open_graph_tags() {
        let html = r#"<!DOCTYPE html>
            <html><head>
            <title>Fallback title</title>
            <meta property="og:title" content="Kale recipes">
            <meta property="og:description" content="Ten ways to cook kale">
            <meta property="og:image" content="https://example.com/kale.jpg">
            <meta property="og:url" content="https://example.com/recipes">
            </head><body></body></html>"#;

        let metadata = parse_metadata(html, "https://example.com/recipes?ref=1").unwrap();
        assert_eq!(
            metadata,
            LinkMetadata {
                title: "Kale recipes".to_string(),
                description: "Ten ways to cook kale".to_string(),
                image: "https://example.com/kale.jpg".to_string(),
                url: "https://example.com/recipes".to_string(),
            }
        );
    }

    #[test]
    fn test_fallback_tags() {
        let html = r#"<html><head>
            <title>
              Plain page
            </title>
            <meta name="description" content="No Open Graph here">
            <link rel="canonical" href="/plain">
            </head></html>"#;

        let metadata = parse_metadata(html, "https://example.com/plain?utm=x").unwrap();
        assert_eq!(metadata.title, "Plain page");
        assert_eq!(metadata.description, "No Open Graph here");
        assert_eq!(metadata.image, "");
        assert_eq!(metadata.url, "https://example.com/plain");
    }

    #[test]
    fn test_relative_image_resolved() {
        let html = r#"<head><meta property="og:image" content="/static/cover.png"></head>"#;
        let metadata = parse_metadata(html, "https://example.com/blog/post").unwrap();
        assert_eq!(metadata.image, "https://example.com/static/cover.png");
    }

    #[test]
    fn test_first_tag_wins() {
        let html = r#"<head>
            <meta property="og:title" content="First">
            <meta property="og:title" content="Second">
            </head>"#;
        assert_eq!(parse_metadata(html, "https://example.com").unwrap().title, "First");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(
            parse_metadata("", "https://example.com").unwrap(),
            LinkMetadata::default()
        );
    }

    #[test]
    fn test_scrape() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/article");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(r#"<html><head><meta property="og:title" content="Article"></head></html>"#);
        });

        let mut scraper = OpenGraphScraper::new().unwrap();
        let metadata = scraper.scrape(&server.url("/article")).unwrap();

        mock.assert();
        assert_eq!(metadata.title, "Article");
        assert_eq!(metadata.url, "");
    }

    #[test]
    fn test_scrape_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/missing");
            then.status(404);
        });

        let mut scraper = OpenGraphScraper::new().unwrap();
        let err = scraper.scrape(&server.url("/missing")).unwrap_err();
        assert_eq!(err.to_string(), "Fetch error: 404: Not Found");
    }
}
