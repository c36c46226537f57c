//! Line-oriented list parsing with noise filtering.

/// Marker left behind when the backend echoes the prompt template instead of
/// expanding it (e.g. `[ACTUAL RECOMMENDATION 3]`).
const PLACEHOLDER_MARKER: &str = "[ACTUAL";

/// How lines of a list block are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// Keep every non-noise line as-is.
    Plain,
    /// Keep only `<digits>.` lines and strip that prefix.
    Numbered,
    /// Keep only lines that start with an ASCII letter.
    LetterLed,
}

/// Turn a text block into an ordered list of items.
///
/// Lines are trimmed; blank lines, unexpanded template placeholders, and
/// repeats of `drop_header` are discarded. `style` selects the remaining
/// filter. Empty input yields an empty Vec — substituting a placeholder
/// list is the assembler's job, not this parser's.
pub fn parse_list(block: &str, style: ListStyle, drop_header: Option<&str>) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.contains(PLACEHOLDER_MARKER))
        .filter(|line| drop_header.map_or(true, |header| !line.starts_with(header)))
        .filter_map(|line| match style {
            ListStyle::Plain => Some(line.to_string()),
            ListStyle::Numbered => strip_number_prefix(line),
            ListStyle::LetterLed => line
                .starts_with(|c: char| c.is_ascii_alphabetic())
                .then(|| line.to_string()),
        })
        .collect()
}

/// `"2. Hydrate"` -> `Some("Hydrate")`; non-numbered lines -> `None`.
fn strip_number_prefix(line: &str) -> Option<String> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    Some(rest.trim_start().to_string())
}
