//! Inline rich text to Markdown
//!
//! Emphasis tiers are mutually exclusive: code wins over everything, then
//! bold+italic, bold, italic. Underline and strikethrough wrap the result,
//! with underline taking precedence. Colors are not rendered.

use notion_blocks::{Annotations, RichText};

/// Convert a list of spans to inline Markdown, trimmed of surrounding whitespace
pub fn format_rich_text(spans: &[RichText]) -> String {
    let mut output = String::new();
    for span in spans {
        output.push_str(&format_span(span));
    }
    output.trim().to_string()
}

/// Convert a single span, wrapping links before applying emphasis
pub fn format_span(span: &RichText) -> String {
    match &span.link {
        Some(url) => emphasize(&format!("[{}]({})", span.content, url), &span.annotations),
        None => emphasize(&span.content, &span.annotations),
    }
}

/// Apply the emphasis markers described by `annotations` to `text`
pub fn emphasize(text: &str, annotations: &Annotations) -> String {
    if annotations.code {
        return format!("`{}`", text);
    }

    let inner = match (annotations.bold, annotations.italic) {
        (true, true) => format!("***{}***", text),
        (true, false) => format!("**{}**", text),
        (false, true) => format!("*{}*", text),
        (false, false) => text.to_string(),
    };

    if annotations.underline {
        format!("__{}__", inner)
    } else if annotations.strikethrough {
        format!("~~{}~~", inner)
    } else {
        inner
    }
}
