//! Word wrapping with a continuation prefix

/// Column at which rendered paragraphs, quotes and list items wrap
pub const WRAP_WIDTH: usize = 80;

/// Wrap `text` so that no line holds more than `width - len(prefix)` characters.
///
/// Breaks happen only at whitespace; runs of whitespace collapse to a single
/// space. Every continuation line starts with `prefix`. A word longer than
/// the available width is kept whole and overflows its line. Lengths are
/// counted in characters, not bytes.
pub fn word_wrap(text: &str, width: usize, prefix: &str) -> String {
    let limit = width.saturating_sub(prefix.chars().count());
    let mut output = String::with_capacity(text.len() + text.len() / width.max(1) * 2);
    let mut column = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if column > 0 {
            if column + 1 + len > limit {
                output.push('\n');
                output.push_str(prefix);
                column = 0;
            } else {
                output.push(' ');
                column += 1;
            }
        }
        output.push_str(word);
        column += len;
    }

    output
}
