//! Anchor-based section extraction.
//!
//! The prompt templates instruct the backend to emit fixed textual labels
//! ("DIAGNOSIS:", "Treatment Considerations", ...). These are a best-effort
//! contract, not a grammar, so extraction is permissive: a missing label
//! yields an empty string, never an error.

/// Return the slice of `text` between the first occurrence of `start_label`
/// and the first subsequent occurrence of `end_label`, trimmed.
///
/// - `start_label` absent: returns the empty string.
/// - `end_label` `None` or not found at/after the start position: the slice
///   runs to the end of the text. An `end_label` occurrence *before*
///   `start_label` is ignored because the search only begins at the start
///   position.
pub fn extract_section(text: &str, start_label: &str, end_label: Option<&str>) -> String {
    let Some(idx) = text.find(start_label) else {
        return String::new();
    };
    let start = idx + start_label.len();
    let end = end_label
        .and_then(|label| text[start..].find(label).map(|i| start + i))
        .unwrap_or(text.len());
    text[start..end].trim().to_string()
}

/// Split `text` into sections using an ordered list of anchor labels.
///
/// Each label's section ends where the next label begins; the final label's
/// section runs to the end of the text. A label with no match maps to an
/// empty string — callers must tolerate empty sections.
pub fn section_map<'a>(text: &str, labels: &[&'a str]) -> Vec<(&'a str, String)> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let end = labels.get(i + 1).copied();
            (*label, extract_section(text, label, end))
        })
        .collect()
}
