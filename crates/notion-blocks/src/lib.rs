//! notion-blocks: typed model of Notion pages and block trees
//!
//! This crate provides:
//! - Rich text spans with style annotations
//! - A closed [`Block`] enum for the block kinds that can be rendered
//! - Page metadata with property accessors
//! - A JSON document format holding a page and its full block tree
//!
//! # Example
//!
//! ```
//! use notion_blocks::{Block, RichText};
//!
//! let json = r#"{
//!     "type": "heading_1",
//!     "heading_1": {"rich_text": [{"type": "text", "text": {"content": "Hello"}}]}
//! }"#;
//!
//! let block: Block = serde_json::from_str(json).unwrap();
//! assert_eq!(block, Block::heading(1, vec![RichText::plain("Hello")]));
//! ```

pub mod block;
pub mod page;
pub mod rich_text;

pub use block::{
    Block, Bookmark, Callout, Code, ExternalFile, FileObject, HostedFile, Icon, Image, RawBlock,
    TextBlock,
};
pub use page::{Document, Page};
pub use rich_text::{Annotations, RichText, plain_text};
