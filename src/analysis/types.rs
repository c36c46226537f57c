use serde::Serialize;

/// Which response format the backend was prompted for.
///
/// The three formats evolved independently in the original service, so their
/// anchor labels and extraction heuristics differ deliberately. `Quick` looks
/// for the *last* occurrence of its anchors; the other two use the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Two-field format: `Possible Diagnosis:` / `Recommendations:`.
    Quick,
    /// Clinical format: `DIAGNOSIS:` / `RECOMMENDATIONS:` / `SEVERITY:` /
    /// `URGENT CARE NEEDED IF:`.
    Clinical,
    /// Numbered-section clinical report with differential diagnosis and
    /// literature references.
    Technical,
}

/// One differential-diagnosis candidate.
///
/// By convention the block starts with a rank number, a condition name and an
/// optional parenthesised diagnostic code. No sub-fields are extracted;
/// consumers treat the block as opaque text with the code embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiagnosisEntry(pub String);

impl DiagnosisEntry {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A structured citation extracted from the references section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    /// The full trimmed citation line. Duplicates the extracted year and
    /// authors verbatim — nothing is stripped out of the title.
    pub title: String,
    /// Best effort. A single placeholder element when no author pattern
    /// matched.
    pub authors: Vec<String>,
    pub year: i32,
    /// PubMed search URL built from the percent-encoded citation line.
    pub url: String,
}

/// The assembled analysis handed back to the HTTP layer.
///
/// Constructed fresh per request and never mutated afterwards. Optional
/// fields are omitted from the JSON when absent; field names follow the
/// original wire contract (`urgentCare`, `technicalAnalysis`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnalysis {
    pub diagnosis: String,
    /// Never empty: the assembler substitutes a single placeholder element
    /// when no recommendations were extracted.
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgent_care: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<&'static str>,
}
