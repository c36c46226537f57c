//! Citation-line parsing for the literature references section.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use super::types::Reference;

/// Authors fallback when no author pattern matches a citation line.
pub const AUTHORS_PENDING: &str = "Author information pending";

/// First plausible publication year in the line (1900–2099).
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Leading run of name-like characters terminated by an opening parenthesis,
/// a 4-digit year, or `et al`. Best effort — the capture becomes the sole
/// authors element.
static AUTHORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z\s,\.]+)(?:\(|\d{4}|et al)").unwrap());

/// Parse a references block into structured citations, one per non-blank
/// line, in input order.
///
/// A line with no recognisable year gets the current calendar year. The
/// title keeps the full citation line verbatim; extracted year and authors
/// are not stripped from it.
pub fn parse_references(block: &str) -> Vec<Reference> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_citation_line)
        .collect()
}

fn parse_citation_line(line: &str) -> Reference {
    let year = YEAR
        .find(line)
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or_else(|| chrono::Utc::now().year());

    let authors = AUTHORS
        .captures(line)
        .and_then(|cap| cap.get(1))
        .map(|m| vec![m.as_str().trim().to_string()])
        .unwrap_or_else(|| vec![AUTHORS_PENDING.to_string()]);

    Reference {
        title: line.to_string(),
        authors,
        year,
        url: format!(
            "https://pubmed.ncbi.nlm.nih.gov/?term={}",
            urlencoding::encode(line)
        ),
    }
}
