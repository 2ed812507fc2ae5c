//! Callout icon to admonition kind mapping

/// Map a callout emoji to an admonition kind understood by the site theme.
///
/// Emoji variation selectors are ignored, so "⚠" and "⚠️" map alike.
/// Unknown glyphs and missing icons map to `"note"`.
pub fn admonition_kind(emoji: Option<&str>) -> &'static str {
    let Some(emoji) = emoji else {
        return "note";
    };

    match emoji.trim_end_matches('\u{fe0f}') {
        "⚠" => "warning",
        "💡" => "tip",
        "🐞" => "bug",
        "❓" | "❔" => "question",
        "❌" | "🧨" | "💣" => "failure",
        "✅" | "🆗" | "☑" | "✔" => "success",
        "☠" | "⛔" | "🛑" => "danger",
        "📋" => "abstract",
        "💬" => "quote",
        "ℹ" => "info",
        "✍" => "example",
        _ => "note",
    }
}
