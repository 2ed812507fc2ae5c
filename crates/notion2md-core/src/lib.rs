//! notion2md-core: Core library for rendering Notion pages to Hugo Markdown
//!
//! This crate provides:
//! - Rich text to inline Markdown conversion
//! - Block tree rendering with nested quote and list prefixes
//! - Hugo shortcodes for callouts (admonitions) and bookmarks
//! - Front matter templates ("archetypes") filled with page metadata
//!
//! Network access is kept out of this crate. Images and link metadata are
//! obtained through the [`ImageStore`] and [`MetadataScraper`] traits, and
//! [`Offline`] implements both without leaving the process.
//!
//! # Example
//!
//! ```
//! use notion_blocks::{Block, RichText};
//! use notion2md_core::{
//!     blocks_to_markdown, Collaborators, CollectDiagnostics, Offline, RenderConfig,
//! };
//!
//! let blocks = vec![
//!     Block::heading(2, vec![RichText::plain("Intro")]),
//!     Block::paragraph(vec![RichText::plain("Hello").bold()]),
//! ];
//!
//! let (mut images, mut scraper) = (Offline, Offline);
//! let mut diagnostics = CollectDiagnostics::default();
//! let mut collaborators = Collaborators::new(&mut images, &mut scraper, &mut diagnostics);
//!
//! let markdown = blocks_to_markdown(&blocks, &RenderConfig::default(), &mut collaborators).unwrap();
//! assert_eq!(markdown, "## Intro\n\n**Hello**\n");
//! ```

pub mod admonition;
pub mod archetype;
pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod render;
pub mod rich_text;
pub mod wrap;

use std::io::Write;

use notion_blocks::Document;

pub use admonition::admonition_kind;
pub use archetype::{Archetype, ArchetypeFields};
pub use assets::{Collaborators, ImageError, ImageStore, LinkMetadata, MetadataScraper, Offline};
pub use config::RenderConfig;
pub use diagnostics::{CollectDiagnostics, Diagnostics, LogDiagnostics, Notice};
pub use error::{Error, Result};
pub use render::{PrefixStack, Renderer, blocks_to_markdown};
pub use rich_text::format_rich_text;
pub use wrap::{WRAP_WIDTH, word_wrap};

/// Generate a complete content file for `document`
///
/// The archetype named by `config.archetype_file` is parsed first; a broken
/// template aborts before any image is downloaded.
pub fn generate<W: Write>(
    out: W,
    document: &Document,
    config: &RenderConfig,
    collaborators: &mut Collaborators<'_>,
) -> Result<()> {
    let archetype = Archetype::load(&config.archetype_file)?;
    generate_with(&archetype, out, document, config, collaborators)
}

/// Generate a content file using an already parsed archetype
pub fn generate_with<W: Write>(
    archetype: &Archetype,
    out: W,
    document: &Document,
    config: &RenderConfig,
    collaborators: &mut Collaborators<'_>,
) -> Result<()> {
    let content = blocks_to_markdown(&document.blocks, config, collaborators)?;

    let mut fields = ArchetypeFields::from_page(&document.page, config, collaborators);
    fields.content = content;

    log::debug!(
        "filling archetype {} for page {}",
        archetype.name(),
        document.page.id
    );
    archetype.render(&fields, out)
}
