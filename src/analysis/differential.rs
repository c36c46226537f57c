//! Differential-diagnosis entry splitting.
//!
//! The backend is asked for a ranked, numbered list of candidate conditions
//! with ICD-10 codes, but what comes back varies wildly. Three heuristics are
//! tried in order, each only when the previous found nothing:
//!
//! 1. Code-anchored split — numbered lines carrying a parenthesised
//!    diagnostic code are the most reliable boundaries.
//! 2. Numbered-list split — any `<digits>.` line starts an entry.
//! 3. Manual accumulation — group prose lines under whatever numbered line
//!    came last, skipping the section's own header.
//!
//! An empty or header-only section yields an empty Vec, never an error.

use std::sync::LazyLock;

use regex::Regex;

use super::types::DiagnosisEntry;

/// A numbered entry whose first line carries a parenthesised ICD-10-shaped
/// code, e.g. `2. Pulmonary embolism (I26.9)` or `(ICD-10: J11.1)`.
static CODE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\s[^\n]*?\(\s*(?:ICD[- ]?10(?:[- ]?CM)?\s*:?\s*)?[A-Z]\d{1,3}(?:\.\d{1,3})?\s*\)")
        .unwrap()
});

/// Start of any numbered list item.
static NUMBERED_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s").unwrap());

/// Split a differential-diagnosis section into individual entries.
///
/// `header` is the section's own label (e.g. `"Differential Diagnosis"`);
/// tier 3 skips any line containing it. Entries are trimmed and returned in
/// source order — likelihood order as emitted by the backend is preserved.
pub fn parse_differential_diagnosis(section: &str, header: &str) -> Vec<DiagnosisEntry> {
    let entries = split_at_anchors(section, &CODE_ANCHOR, header);
    if !entries.is_empty() {
        return entries;
    }

    let entries = split_at_anchors(section, &NUMBERED_ANCHOR, header);
    if !entries.is_empty() {
        return entries;
    }

    accumulate_lines(section, header)
}

/// Tiers 1 and 2: every match start becomes a boundary; entry *i* runs from
/// boundary *i* to boundary *i+1* (or the end of the section). An entry that
/// is just the section's own numbered header is dropped.
fn split_at_anchors(section: &str, anchor: &Regex, header: &str) -> Vec<DiagnosisEntry> {
    let starts: Vec<usize> = anchor.find_iter(section).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(section.len());
            let text = section[start..end].trim();
            let first_line = text.lines().next().unwrap_or("");
            (!text.is_empty() && !first_line.contains(header))
                .then(|| DiagnosisEntry(text.to_string()))
        })
        .collect()
}

/// Tier 3: walk the lines, starting a new entry at each `<digits>.` line and
/// appending everything else to the entry being accumulated.
fn accumulate_lines(section: &str, header: &str) -> Vec<DiagnosisEntry> {
    let mut entries = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, entries: &mut Vec<DiagnosisEntry>| {
        let text = current.trim();
        if !text.is_empty() {
            entries.push(DiagnosisEntry(text.to_string()));
        }
        current.clear();
    };

    for line in section.lines() {
        let line = line.trim();
        if line.is_empty() || line.contains(header) {
            continue;
        }
        if starts_numbered(line) {
            flush(&mut current, &mut entries);
            current.push_str(line);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    flush(&mut current, &mut entries);

    entries
}

fn starts_numbered(line: &str) -> bool {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && line[digits..].starts_with('.')
}
