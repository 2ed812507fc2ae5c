//! Inline rich text spans
//!
//! Notion represents inline text as a list of spans, each with its own
//! annotations. The API shape is flattened into [`RichText`] on the way in.

use serde::{Deserialize, Serialize};

/// Style annotations attached to a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    /// Color name as reported by the API (e.g. "red", "blue_background")
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: "default".to_string(),
        }
    }
}

/// A single styled run of inline text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRichText", into = "RawRichText")]
pub struct RichText {
    /// Text content of the span
    pub content: String,
    /// Hyperlink target, if the span is a link
    pub link: Option<String>,
    pub annotations: Annotations,
}

impl RichText {
    /// Create an unstyled span
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
            annotations: Annotations::default(),
        }
    }

    /// Create an unstyled link span
    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            link: Some(url.into()),
            ..Self::plain(content)
        }
    }

    pub fn bold(mut self) -> Self {
        self.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.annotations.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.annotations.underline = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.annotations.strikethrough = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.annotations.code = true;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.annotations.color = color.into();
        self
    }
}

/// Concatenate the unstyled content of a list of spans
pub fn plain_text(spans: &[RichText]) -> String {
    spans.iter().map(|s| s.content.as_str()).collect()
}

/// Wire shape of a span as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRichText {
    #[serde(rename = "type", default = "text_kind")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<RawText>,
    #[serde(default)]
    annotations: Annotations,
    #[serde(default)]
    plain_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawText {
    #[serde(default)]
    content: String,
    #[serde(default)]
    link: Option<RawLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLink {
    url: String,
}

fn text_kind() -> String {
    "text".to_string()
}

impl From<RawRichText> for RichText {
    fn from(raw: RawRichText) -> Self {
        match raw.text {
            Some(text) if raw.kind == "text" => Self {
                content: text.content,
                link: text.link.map(|l| l.url),
                annotations: raw.annotations,
            },
            // Mentions and equations only carry a rendered plain_text
            _ => Self {
                content: raw.plain_text,
                link: raw.href,
                annotations: raw.annotations,
            },
        }
    }
}

impl From<RichText> for RawRichText {
    fn from(span: RichText) -> Self {
        Self {
            kind: text_kind(),
            text: Some(RawText {
                content: span.content.clone(),
                link: span.link.clone().map(|url| RawLink { url }),
            }),
            annotations: span.annotations,
            plain_text: span.content,
            href: span.link,
        }
    }
}
