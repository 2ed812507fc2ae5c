//! Front matter templates
//!
//! An archetype is a Hugo content template. Placeholders use `[[ ... ]]`
//! so that Hugo's own `{{ ... }}` shortcodes can appear in the template and
//! pass through untouched.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
    handlebars_helper, no_escape,
};
use notion_blocks::{Page, RichText, plain_text};
use serde::Serialize;
use serde_json::Value;

use crate::assets::Collaborators;
use crate::config::RenderConfig;
use crate::diagnostics::Notice;
use crate::error::{Error, Result};
use crate::rich_text::format_rich_text;

handlebars_helper!(repeat: |s: str, n: u64| s.repeat(n as usize));
handlebars_helper!(slugify: |s: str| slug::slugify(s));

fn add(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    arithmetic(h, out, |a, b| a.checked_add(b).ok_or("overflow"))
}

fn sub(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    arithmetic(h, out, |a, b| a.checked_sub(b).ok_or("overflow"))
}

fn mul(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    arithmetic(h, out, |a, b| a.checked_mul(b).ok_or("overflow"))
}

/// Integer division; a zero divisor fails the render
fn div(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    arithmetic(h, out, |a, b| match b {
        0 => Err("division by zero"),
        _ => a.checked_div(b).ok_or("overflow"),
    })
}

/// Apply `op` to the two integer parameters of `h`
fn arithmetic(
    h: &Helper,
    out: &mut dyn Output,
    op: fn(i64, i64) -> std::result::Result<i64, &'static str>,
) -> HelperResult {
    let a = integer_param(h, 0)?;
    let b = integer_param(h, 1)?;
    let value = op(a, b)
        .map_err(|reason| RenderErrorReason::Other(format!("{}: {}", h.name(), reason)))?;
    out.write(&value.to_string())?;
    Ok(())
}

/// Render a rich text array (as found in page properties) to inline Markdown
fn rich(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .map(|p| p.value().clone())
        .unwrap_or(Value::Null);
    if value.is_null() {
        return Ok(());
    }
    let spans: Vec<RichText> = serde_json::from_value(value)
        .map_err(|e| RenderErrorReason::Other(format!("rich: {}", e)))?;
    out.write(&format_rich_text(&spans))?;
    Ok(())
}

fn integer_param(h: &Helper, index: usize) -> std::result::Result<i64, RenderErrorReason> {
    h.param(index)
        .and_then(|p| p.value().as_i64())
        .ok_or_else(|| {
            RenderErrorReason::Other(format!(
                "{}: parameter {} must be an integer",
                h.name(),
                index
            ))
        })
}

/// Rewrite `[[ ]]` placeholders to handlebars syntax, escaping literal `{{`
pub fn translate_delimiters(source: &str) -> String {
    source
        .replace("{{", "\\{{")
        .replace("[[", "{{")
        .replace("]]", "}}")
}

/// A parsed front matter template
pub struct Archetype {
    registry: Handlebars<'static>,
    name: String,
}

impl Archetype {
    /// Read and parse the template at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::Template(format!(
                "error parsing archetype file: {}: {}",
                path.display(),
                e
            ))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "archetype".to_string());
        Self::parse(&name, &source)
    }

    /// Parse a template from source text
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        // Output is Markdown, not HTML
        registry.register_escape_fn(no_escape);

        registry.register_helper("add", Box::new(add));
        registry.register_helper("sub", Box::new(sub));
        registry.register_helper("mul", Box::new(mul));
        registry.register_helper("div", Box::new(div));
        registry.register_helper("repeat", Box::new(repeat));
        registry.register_helper("rich", Box::new(rich));
        registry.register_helper("slug", Box::new(slugify));

        registry.register_template_string(name, translate_delimiters(source))?;

        Ok(Self {
            registry,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill the template with `fields` and write the result to `out`
    pub fn render<W: Write>(&self, fields: &ArchetypeFields, out: W) -> Result<()> {
        self.registry.render_to_write(&self.name, fields, out)?;
        Ok(())
    }
}

/// Data available to archetype templates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArchetypeFields {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    /// Site path of the stored cover image, empty without a cover
    pub banner: String,
    pub creation_date: String,
    pub last_modification: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    /// Raw page properties keyed by property name
    pub properties: BTreeMap<String, Value>,
    /// Rendered Markdown body
    pub content: String,
}

impl ArchetypeFields {
    /// Collect the page metadata; `content` is left empty
    pub fn from_page(
        page: &Page,
        config: &RenderConfig,
        collaborators: &mut Collaborators<'_>,
    ) -> Self {
        let description = page
            .rich_text_property(&config.description_property)
            .map(|spans| plain_text(&spans))
            .unwrap_or_default();

        Self {
            id: page.id.clone(),
            url: page.url.clone(),
            title: plain_text(&page.title()),
            description,
            banner: banner(page, collaborators),
            creation_date: page.created_time.clone(),
            last_modification: page.last_edited_time.clone(),
            tags: page.multi_select_property(&config.tags_property),
            categories: page.multi_select_property(&config.categories_property),
            properties: page.properties.clone(),
            content: String::new(),
        }
    }
}

fn banner(page: &Page, collaborators: &mut Collaborators<'_>) -> String {
    let Some(cover) = &page.cover else {
        return String::new();
    };
    match collaborators.images.store(cover.url()) {
        Ok(path) => path,
        Err(err) => {
            collaborators.diagnostics.notice(Notice::ImageFailed {
                url: cover.url().to_string(),
                message: err.source.to_string(),
            });
            String::new()
        }
    }
}
