//! Block tree types
//!
//! A page body is an ordered sequence of [`Block`]s. Container kinds own
//! their children; everything the renderer does not model is kept as
//! [`Block::Unsupported`] with the raw kind name.
//!
//! On the wire a block looks like the Notion API object
//! `{"type": "paragraph", "paragraph": {...}, "has_children": true}` with an
//! additional `children` array holding the already-fetched child blocks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rich_text::RichText;

/// Payload shared by paragraphs, headings, quotes and list items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(skip)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip)]
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(flatten)]
    pub source: FileObject,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Code {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
    /// Language name as reported by the API ("plain text" for none)
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// A file reference: either hosted by Notion or an external URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileObject {
    External { external: ExternalFile },
    File { file: HostedFile },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFile {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedFile {
    pub url: String,
    /// Signed URLs of hosted files expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

impl FileObject {
    pub fn external(url: impl Into<String>) -> Self {
        Self::External {
            external: ExternalFile { url: url.into() },
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::File { file } => &file.url,
        }
    }
}

/// Page or callout icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
    External { external: ExternalFile },
    File { file: HostedFile },
    #[serde(other)]
    Other,
}

impl Icon {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Self::Emoji {
            emoji: emoji.into(),
        }
    }

    /// The emoji glyph, if this is an emoji icon
    pub fn as_emoji(&self) -> Option<&str> {
        match self {
            Self::Emoji { emoji } => Some(emoji),
            _ => None,
        }
    }
}

/// One node of the content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock", into = "RawBlock")]
pub enum Block {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    Callout(Callout),
    Bookmark(Bookmark),
    Quote(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    Image(Image),
    Code(Code),
    Divider,
    /// Any kind without a dedicated variant; `kind` is the API type name
    /// (`"unsupported"` when the API itself cannot represent the block)
    Unsupported { kind: String },
}

impl Block {
    pub fn paragraph(rich_text: Vec<RichText>) -> Self {
        Self::Paragraph(TextBlock::new(rich_text))
    }

    /// Create a heading of the given level (clamped to 1..=3)
    pub fn heading(level: u8, rich_text: Vec<RichText>) -> Self {
        let text = TextBlock::new(rich_text);
        match level {
            0 | 1 => Self::Heading1(text),
            2 => Self::Heading2(text),
            _ => Self::Heading3(text),
        }
    }

    pub fn quote(rich_text: Vec<RichText>) -> Self {
        Self::Quote(TextBlock::new(rich_text))
    }

    pub fn bulleted(rich_text: Vec<RichText>) -> Self {
        Self::BulletedListItem(TextBlock::new(rich_text))
    }

    pub fn numbered(rich_text: Vec<RichText>) -> Self {
        Self::NumberedListItem(TextBlock::new(rich_text))
    }

    pub fn callout(icon: Option<Icon>, rich_text: Vec<RichText>) -> Self {
        Self::Callout(Callout {
            rich_text,
            icon,
            children: Vec::new(),
        })
    }

    pub fn bookmark(url: impl Into<String>) -> Self {
        Self::Bookmark(Bookmark {
            url: url.into(),
            caption: Vec::new(),
        })
    }

    pub fn image(source: FileObject, caption: Vec<RichText>) -> Self {
        Self::Image(Image { source, caption })
    }

    pub fn code(language: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Code(Code {
            rich_text: vec![RichText::plain(content)],
            language: language.into(),
            caption: Vec::new(),
        })
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported { kind: kind.into() }
    }

    /// Replace the children of a container block; other kinds are returned unchanged
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        if let Some(slot) = self.children_mut() {
            *slot = children;
        }
        self
    }

    /// API type name of this block
    pub fn kind(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::Callout(_) => "callout",
            Self::Bookmark(_) => "bookmark",
            Self::Quote(_) => "quote",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::Image(_) => "image",
            Self::Code(_) => "code",
            Self::Divider => "divider",
            Self::Unsupported { kind } => kind,
        }
    }

    /// Child blocks (empty for leaf kinds)
    pub fn children(&self) -> &[Block] {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Quote(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b) => &b.children,
            Self::Callout(c) => &c.children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Self::Paragraph(b)
            | Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Quote(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b) => Some(&mut b.children),
            Self::Callout(c) => Some(&mut c.children),
            _ => None,
        }
    }
}

impl TextBlock {
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text,
            children: Vec::new(),
        }
    }
}

/// Untyped block as it travels over the wire
///
/// The payload keeps every key of the API object except the ones lifted
/// into fields, so the typed payload is found under `payload[kind]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawBlock>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl RawBlock {
    /// Typed payload of this block, if present
    fn take_payload<T: DeserializeOwned>(&mut self) -> Result<T, serde_json::Error> {
        let value = self
            .payload
            .remove(&self.kind)
            .unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::from_value(value).map_err(|err| {
            <serde_json::Error as serde::de::Error>::custom(format!(
                "invalid {} block: {}",
                self.kind, err
            ))
        })
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let children = std::mem::take(&mut raw.children)
            .into_iter()
            .map(Block::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let block = match raw.kind.as_str() {
            "paragraph" => Self::Paragraph(raw.take_payload()?),
            "heading_1" => Self::Heading1(raw.take_payload()?),
            "heading_2" => Self::Heading2(raw.take_payload()?),
            "heading_3" => Self::Heading3(raw.take_payload()?),
            "callout" => Self::Callout(raw.take_payload()?),
            "bookmark" => Self::Bookmark(raw.take_payload()?),
            "quote" => Self::Quote(raw.take_payload()?),
            "bulleted_list_item" => Self::BulletedListItem(raw.take_payload()?),
            "numbered_list_item" => Self::NumberedListItem(raw.take_payload()?),
            "image" => Self::Image(raw.take_payload()?),
            "code" => Self::Code(raw.take_payload()?),
            "divider" => Self::Divider,
            _ => Self::Unsupported {
                kind: raw.kind.clone(),
            },
        };

        Ok(block.with_children(children))
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let kind = block.kind().to_string();
        let children: Vec<RawBlock> = block.children().iter().cloned().map(Into::into).collect();

        let payload = match &block {
            Block::Paragraph(b)
            | Block::Heading1(b)
            | Block::Heading2(b)
            | Block::Heading3(b)
            | Block::Quote(b)
            | Block::BulletedListItem(b)
            | Block::NumberedListItem(b) => serde_json::to_value(b),
            Block::Callout(c) => serde_json::to_value(c),
            Block::Bookmark(b) => serde_json::to_value(b),
            Block::Image(i) => serde_json::to_value(i),
            Block::Code(c) => serde_json::to_value(c),
            Block::Divider | Block::Unsupported { .. } => Ok(Value::Object(Map::new())),
        }
        .unwrap_or_else(|_| Value::Object(Map::new()));

        let mut map = Map::new();
        map.insert(kind.clone(), payload);

        Self {
            id: None,
            kind,
            has_children: !children.is_empty(),
            children,
            payload: map,
        }
    }
}
