//! Block tree to Markdown rendering
//!
//! Walks a sibling sequence depth-first and writes one line per emission.
//! Nested content inherits a prefix stack (quote markers, list indentation)
//! that is prepended to every line it produces.

use std::io::{self, Write};

use notion_blocks::{Block, RichText};

use crate::admonition::admonition_kind;
use crate::assets::{Collaborators, LinkMetadata};
use crate::config::RenderConfig;
use crate::diagnostics::Notice;
use crate::error::Result;
use crate::rich_text::format_rich_text;
use crate::wrap::{WRAP_WIDTH, word_wrap};

/// Marker Hugo uses to cut the summary
const MORE_MARKER: &str = "<!-- more -->";

/// Language name the API uses for unlabelled code
const PLAIN_TEXT_LANGUAGE: &str = "plain text";

/// Render a block sequence to a Markdown string
pub fn blocks_to_markdown(
    blocks: &[Block],
    config: &RenderConfig,
    collaborators: &mut Collaborators<'_>,
) -> Result<String> {
    let mut buffer = Vec::new();
    Renderer::new(config, collaborators).render(&mut buffer, blocks)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Prefixes inherited by nested blocks, outermost first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixStack {
    parts: Vec<&'static str>,
    joined: String,
}

impl PrefixStack {
    /// A new stack with `prefix` added as the innermost entry
    pub fn push(&self, prefix: &'static str) -> Self {
        let mut parts = self.parts.clone();
        parts.push(prefix);
        Self {
            joined: parts.concat(),
            parts,
        }
    }

    /// Concatenation of all prefixes
    pub fn as_str(&self) -> &str {
        &self.joined
    }

    /// `self` followed by `extra`, used as a continuation prefix for wrapping
    fn extended(&self, extra: &str) -> String {
        format!("{}{}", self.joined, extra)
    }

    fn line(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        writeln!(out, "{}{}", self.joined, text)
    }

    /// Blank separator line; trailing whitespace of the prefix is dropped
    fn blank(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.joined.trim_end())
    }

    /// Prefix every line of a multi-line text
    fn lines(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        for line in text.split('\n') {
            self.line(out, line)?;
        }
        Ok(())
    }
}

/// Tracks whether the previous sibling continued a list run
#[derive(Debug, Default)]
struct ListRun {
    bulleted: bool,
    numbered: bool,
}

/// Recursive block renderer
pub struct Renderer<'r, 'a> {
    config: &'r RenderConfig,
    collaborators: &'r mut Collaborators<'a>,
}

impl<'r, 'a> Renderer<'r, 'a> {
    pub fn new(config: &'r RenderConfig, collaborators: &'r mut Collaborators<'a>) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    /// Write `blocks` and their descendants to `out` in document order
    pub fn render<W: Write>(&mut self, out: &mut W, blocks: &[Block]) -> Result<()> {
        self.render_blocks(out, blocks, &PrefixStack::default())?;
        Ok(())
    }

    fn render_blocks(
        &mut self,
        out: &mut dyn Write,
        blocks: &[Block],
        prefixes: &PrefixStack,
    ) -> io::Result<()> {
        if blocks.is_empty() {
            return Ok(());
        }

        let mut run = ListRun::default();
        let last_index = blocks.len() - 1;

        for (index, block) in blocks.iter().enumerate() {
            // A list run ends at the first sibling of another kind
            if run.bulleted && !matches!(block, Block::BulletedListItem(_)) {
                run.bulleted = false;
                prefixes.blank(out)?;
            }
            if run.numbered && !matches!(block, Block::NumberedListItem(_)) {
                run.numbered = false;
                prefixes.blank(out)?;
            }

            match block {
                Block::Paragraph(p) => {
                    let text = format_rich_text(&p.rich_text);
                    if !text.is_empty() {
                        prefixes.line(out, &word_wrap(&text, WRAP_WIDTH, prefixes.as_str()))?;
                        if index < last_index {
                            prefixes.blank(out)?;
                        }
                    }
                    self.render_blocks(out, &p.children, prefixes)?;
                }
                Block::Heading1(h) => Self::heading(out, prefixes, "#", &h.rich_text)?,
                Block::Heading2(h) => Self::heading(out, prefixes, "##", &h.rich_text)?,
                Block::Heading3(h) => Self::heading(out, prefixes, "###", &h.rich_text)?,
                Block::Callout(c) => {
                    if !self.config.use_shortcodes {
                        continue;
                    }
                    let kind = admonition_kind(c.icon.as_ref().and_then(|i| i.as_emoji()));
                    prefixes.line(out, &format!("{{{{< admonition {} >}}}}", kind))?;
                    prefixes.lines(out, &format_rich_text(&c.rich_text))?;
                    self.render_blocks(out, &c.children, prefixes)?;
                    prefixes.line(out, "{{< /admonition >}}")?;
                    prefixes.blank(out)?;
                }
                Block::Bookmark(b) => {
                    if !self.config.use_shortcodes {
                        prefixes.line(out, &format!("[{0}]({0})", b.url))?;
                        continue;
                    }
                    let metadata = self.scrape(&b.url);
                    prefixes.lines(out, &bookmark_shortcode(&b.url, &metadata))?;
                }
                Block::Quote(q) => {
                    let text = format_rich_text(&q.rich_text);
                    let wrapped = word_wrap(&text, WRAP_WIDTH, &prefixes.extended("> "));
                    prefixes.line(out, &format!("> {}", wrapped))?;
                    self.render_blocks(out, &q.children, &prefixes.push("> "))?;
                    prefixes.blank(out)?;
                }
                Block::BulletedListItem(item) => {
                    run.bulleted = true;
                    let text = format_rich_text(&item.rich_text);
                    let wrapped = word_wrap(&text, WRAP_WIDTH, &prefixes.extended("  "));
                    prefixes.line(out, &format!("- {}", wrapped))?;
                    self.render_blocks(out, &item.children, &prefixes.push("    "))?;
                }
                Block::NumberedListItem(item) => {
                    run.numbered = true;
                    // Markdown renumbers ordered lists, so every item is "1."
                    let text = hang(&format_rich_text(&item.rich_text), "   ");
                    prefixes.lines(out, &format!("1. {}", text))?;
                    self.render_blocks(out, &item.children, &prefixes.push("    "))?;
                }
                Block::Image(image) => {
                    let src = self.store_image(image.source.url());
                    let mut caption = format_rich_text(&image.caption);
                    if caption.is_empty() {
                        caption = "image".to_string();
                    }
                    prefixes.lines(out, &format!("![{}]({})", caption, src))?;
                    prefixes.blank(out)?;
                }
                Block::Code(code) => {
                    let body = format_rich_text(&code.rich_text);
                    let fence = "`".repeat(calculate_fence_length(&body));
                    if code.language == PLAIN_TEXT_LANGUAGE {
                        prefixes.line(out, &fence)?;
                    } else {
                        prefixes.line(out, &format!("{}{}", fence, code.language))?;
                    }
                    prefixes.lines(out, &body)?;
                    prefixes.line(out, &fence)?;
                    prefixes.blank(out)?;
                }
                Block::Divider => {
                    prefixes.line(out, MORE_MARKER)?;
                    prefixes.blank(out)?;
                }
                Block::Unsupported { kind } => {
                    let notice = if kind == "unsupported" {
                        Notice::UnsupportedBlock
                    } else {
                        Notice::UnhandledBlock { kind: kind.clone() }
                    };
                    self.collaborators.diagnostics.notice(notice);
                }
            }
        }

        // Close a run that reaches the end of the sequence
        if run.bulleted || run.numbered {
            prefixes.blank(out)?;
        }

        Ok(())
    }

    fn heading(
        out: &mut dyn Write,
        prefixes: &PrefixStack,
        marker: &str,
        rich_text: &[RichText],
    ) -> io::Result<()> {
        prefixes.lines(out, &format!("{} {}", marker, format_rich_text(rich_text)))?;
        prefixes.blank(out)
    }

    /// Stored image path, or the fallback path of a failed store
    fn store_image(&mut self, url: &str) -> String {
        match self.collaborators.images.store(url) {
            Ok(path) => path,
            Err(err) => {
                self.collaborators.diagnostics.notice(Notice::ImageFailed {
                    url: url.to_string(),
                    message: err.source.to_string(),
                });
                err.path
            }
        }
    }

    fn scrape(&mut self, url: &str) -> LinkMetadata {
        match self.collaborators.scraper.scrape(url) {
            Ok(metadata) => metadata,
            Err(err) => {
                self.collaborators.diagnostics.notice(Notice::BookmarkFailed {
                    url: url.to_string(),
                    message: err.to_string(),
                });
                LinkMetadata::default()
            }
        }
    }
}

/// Indent every line after the first by `indent`
fn hang(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{}", indent))
}

/// Hugo `bookmark` shortcode carrying scraped metadata
fn bookmark_shortcode(url: &str, metadata: &LinkMetadata) -> String {
    let target = if metadata.url.is_empty() {
        url
    } else {
        metadata.url.as_str()
    };
    format!(
        r#"{{{{< bookmark url="{}" title="{}" img="{}" >}}}}{}{{{{< /bookmark >}}}}"#,
        escape_attribute(target),
        escape_attribute(&metadata.title),
        escape_attribute(&metadata.image),
        metadata.description,
    )
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Calculate the minimum fence length needed for a code block.
///
/// The fence must be longer than any sequence of consecutive backticks in the content.
/// Returns at least 3 (the minimum for a valid fenced code block).
fn calculate_fence_length(content: &str) -> usize {
    let mut max_backticks = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_backticks = max_backticks.max(current_run);
        } else {
            current_run = 0;
        }
    }

    3.max(max_backticks + 1)
}
