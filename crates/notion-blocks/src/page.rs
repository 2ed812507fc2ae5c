//! Page metadata and the offline document format

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::block::{Block, FileObject, Icon};
use crate::rich_text::RichText;

/// Page metadata as returned by the pages endpoint
///
/// Properties are kept as raw JSON so templates can reach any of them;
/// the accessors below decode the common property types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub last_edited_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FileObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Page {
    /// Title spans (from the single property of type `title`)
    pub fn title(&self) -> Vec<RichText> {
        self.properties
            .values()
            .find(|p| property_type(p) == Some("title"))
            .and_then(|p| decode(p, "title"))
            .unwrap_or_default()
    }

    /// Spans of a `rich_text` property
    pub fn rich_text_property(&self, name: &str) -> Option<Vec<RichText>> {
        self.typed_property(name, "rich_text")
            .and_then(|p| decode(p, "rich_text"))
    }

    /// Option names of a `multi_select` property (empty if absent)
    pub fn multi_select_property(&self, name: &str) -> Vec<String> {
        self.typed_property(name, "multi_select")
            .and_then(|p| decode::<Vec<SelectOption>>(p, "multi_select"))
            .map(|options| options.into_iter().map(|o| o.name).collect())
            .unwrap_or_default()
    }

    /// Option name of a `select` property
    pub fn select_property(&self, name: &str) -> Option<String> {
        self.typed_property(name, "select")
            .and_then(|p| decode::<Option<SelectOption>>(p, "select"))
            .flatten()
            .map(|o| o.name)
    }

    fn typed_property(&self, name: &str, kind: &str) -> Option<&Value> {
        self.properties
            .get(name)
            .filter(|p| property_type(p) == Some(kind))
    }
}

#[derive(Debug, Deserialize)]
struct SelectOption {
    name: String,
}

fn property_type(property: &Value) -> Option<&str> {
    property.get("type").and_then(Value::as_str)
}

fn decode<T: serde::de::DeserializeOwned>(property: &Value, key: &str) -> Option<T> {
    serde_json::from_value(property.get(key)?.clone()).ok()
}

/// A page together with its block tree
///
/// This is the format written by `fetch` and read back for offline renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page: Page,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(page: Page, blocks: Vec<Block>) -> Self {
        Self { page, blocks }
    }

    /// Serialize the document to a pretty-printed JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Page {
        serde_json::from_str(
            r#"{
                "object": "page",
                "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
                "created_time": "2022-03-01T19:05:00.000Z",
                "last_edited_time": "2022-07-06T20:25:00.000Z",
                "cover": {"type": "external", "external": {"url": "https://upload.wikimedia.org/cover.jpg"}},
                "icon": {"type": "emoji", "emoji": "🥬"},
                "url": "https://www.notion.so/Tuscan-kale-598337872cf94fdf8782e53db20768a5",
                "properties": {
                    "Name": {"id": "title", "type": "title", "title": [
                        {"type": "text", "text": {"content": "Tuscan kale"}, "plain_text": "Tuscan kale"}
                    ]},
                    "Description": {"id": "_Tc_", "type": "rich_text", "rich_text": [
                        {"type": "text", "text": {"content": "A dark green leafy vegetable"}}
                    ]},
                    "Tags": {"id": "%40Q", "type": "multi_select", "multi_select": [
                        {"id": "1", "name": "Vegetables", "color": "green"},
                        {"id": "2", "name": "Greens", "color": "yellow"}
                    ]},
                    "Category": {"id": "c", "type": "select", "select": {"id": "x", "name": "Recipes", "color": "red"}},
                    "Empty": {"id": "e", "type": "select", "select": null}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_title() {
        let page = sample_page();
        assert_eq!(page.title(), vec![RichText::plain("Tuscan kale")]);
    }

    #[test]
    fn test_rich_text_property() {
        let page = sample_page();
        assert_eq!(
            page.rich_text_property("Description"),
            Some(vec![RichText::plain("A dark green leafy vegetable")])
        );
        // Wrong type is not decoded
        assert_eq!(page.rich_text_property("Tags"), None);
        assert_eq!(page.rich_text_property("Missing"), None);
    }

    #[test]
    fn test_select_properties() {
        let page = sample_page();
        assert_eq!(page.multi_select_property("Tags"), vec!["Vegetables", "Greens"]);
        assert!(page.multi_select_property("Missing").is_empty());
        assert_eq!(page.select_property("Category"), Some("Recipes".to_string()));
        assert_eq!(page.select_property("Empty"), None);
    }

    #[test]
    fn test_cover_and_icon() {
        let page = sample_page();
        assert_eq!(
            page.cover.as_ref().map(FileObject::url),
            Some("https://upload.wikimedia.org/cover.jpg")
        );
        assert_eq!(page.icon.as_ref().and_then(Icon::as_emoji), Some("🥬"));
    }

    #[test]
    fn test_page_without_title_property() {
        let page = Page {
            id: "x".to_string(),
            ..Default::default()
        };
        assert!(page.title().is_empty());
    }
}
