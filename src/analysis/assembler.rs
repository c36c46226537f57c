//! Response assembly — one configurable pipeline over the three response
//! formats the service has prompted for over time.
//!
//! The anchor strings here are part of the external contract: they must
//! exactly match the labels requested by the corresponding prompt template
//! in `inference::prompt`, or extraction silently degrades to placeholders.

use std::sync::LazyLock;

use regex::Regex;

use super::differential::parse_differential_diagnosis;
use super::list::{parse_list, ListStyle};
use super::references::parse_references;
use super::section::{extract_section, section_map};
use super::types::{AnalysisMode, StructuredAnalysis};

pub const UNKNOWN_DIAGNOSIS: &str = "Unable to determine diagnosis";
pub const NO_RECOMMENDATIONS: &str = "No specific recommendations available";
const UNKNOWN_SEVERITY: &str = "Unable to assess severity";
const URGENT_CARE_FALLBACK: &str = "Seek medical attention if symptoms worsen";

pub const DISCLAIMER: &str = "This is an AI-generated analysis and should not replace \
professional medical advice. Always consult with a healthcare provider for proper \
diagnosis and treatment.";

const QUICK_DIAGNOSIS_LABEL: &str = "Possible Diagnosis:";
const QUICK_RECOMMENDATIONS_LABEL: &str = "Recommendations:";

const CLINICAL_LABELS: [&str; 4] = [
    "DIAGNOSIS:",
    "RECOMMENDATIONS:",
    "SEVERITY:",
    "URGENT CARE NEEDED IF:",
];

const TECHNICAL_HEADERS: [&str; 5] = [
    "Clinical Assessment",
    "Differential Diagnosis",
    "Recommended Diagnostic Approach",
    "Treatment Considerations",
    "Medical Literature References",
];

/// A numbered line introducing one of the known top-level report sections.
static TECHNICAL_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*\d+\.\s*(?:Clinical Assessment|Differential Diagnosis|Recommended Diagnostic Approach|Treatment Considerations|Medical Literature References)",
    )
    .unwrap()
});

/// Decompose one raw backend response into a `StructuredAnalysis`.
///
/// Never fails: every missing-anchor case degrades to the placeholders
/// defined above. Pure — same input and mode always produce the same output
/// (modulo the current-year default in the reference parser).
pub fn assemble(raw: &str, mode: AnalysisMode) -> StructuredAnalysis {
    match mode {
        AnalysisMode::Quick => assemble_quick(raw),
        AnalysisMode::Clinical => assemble_clinical(raw),
        AnalysisMode::Technical => assemble_technical(raw),
    }
}

/// Quick mode anchors on the *last* occurrence of each label: the backend
/// often echoes the prompt template before answering, and the final
/// occurrence is the actual answer.
fn assemble_quick(raw: &str) -> StructuredAnalysis {
    let diagnosis_idx = raw.rfind(QUICK_DIAGNOSIS_LABEL);
    let recommendations_idx = raw.rfind(QUICK_RECOMMENDATIONS_LABEL);

    let diagnosis = match diagnosis_idx {
        Some(idx) => {
            let start = idx + QUICK_DIAGNOSIS_LABEL.len();
            let end = recommendations_idx.filter(|&r| r >= start).unwrap_or(raw.len());
            raw[start..end].trim().to_string()
        }
        None => UNKNOWN_DIAGNOSIS.to_string(),
    };

    let recommendations = match recommendations_idx {
        Some(idx) => parse_list(
            &raw[idx + QUICK_RECOMMENDATIONS_LABEL.len()..],
            ListStyle::Plain,
            Some(QUICK_DIAGNOSIS_LABEL),
        ),
        None => Vec::new(),
    };

    StructuredAnalysis {
        diagnosis: non_empty_or(diagnosis, UNKNOWN_DIAGNOSIS),
        recommendations: or_placeholder(recommendations),
        severity: None,
        urgent_care: None,
        technical_analysis: None,
        references: None,
        disclaimer: None,
    }
}

fn assemble_clinical(raw: &str) -> StructuredAnalysis {
    let sections: Vec<String> = section_map(raw, &CLINICAL_LABELS)
        .into_iter()
        .map(|(_, body)| body)
        .collect();
    let [diagnosis, recommendations, severity, urgent_care] =
        <[String; 4]>::try_from(sections).expect("one section per clinical label");

    StructuredAnalysis {
        diagnosis: non_empty_or(diagnosis, UNKNOWN_DIAGNOSIS),
        recommendations: or_placeholder(parse_list(&recommendations, ListStyle::Numbered, None)),
        severity: Some(non_empty_or(severity, UNKNOWN_SEVERITY)),
        urgent_care: Some(non_empty_or(urgent_care, URGENT_CARE_FALLBACK)),
        technical_analysis: None,
        references: None,
        disclaimer: Some(DISCLAIMER),
    }
}

fn assemble_technical(raw: &str) -> StructuredAnalysis {
    let chunks = split_at_header_lines(raw);
    let differential_header = TECHNICAL_HEADERS[1];

    let assessment = chunk_body(&chunks, TECHNICAL_HEADERS[0]);
    let differential_block = chunk_body(&chunks, differential_header);
    let approach = chunk_body(&chunks, TECHNICAL_HEADERS[2]);
    let treatment = chunk_body(&chunks, TECHNICAL_HEADERS[3]);
    let references_block = chunk_body(&chunks, TECHNICAL_HEADERS[4]);

    let entries = parse_differential_diagnosis(&differential_block, differential_header);
    let differential_text = if entries.is_empty() {
        differential_block
    } else {
        entries
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    StructuredAnalysis {
        diagnosis: non_empty_or(assessment, UNKNOWN_DIAGNOSIS),
        recommendations: or_placeholder(parse_list(&treatment, ListStyle::LetterLed, None)),
        severity: None,
        urgent_care: None,
        technical_analysis: Some(format!(
            "Differential Diagnosis:\n{differential_text}\n\nDiagnostic Approach:\n{approach}"
        )),
        references: Some(parse_references(&references_block)),
        disclaimer: None,
    }
}

/// Split the whole response into chunks at the numbered top-level headers.
/// Text before the first header becomes its own (usually ignored) chunk.
fn split_at_header_lines(text: &str) -> Vec<String> {
    let mut starts: Vec<usize> = TECHNICAL_HEADER_LINE
        .find_iter(text)
        .map(|m| m.start())
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            text[start..end].to_string()
        })
        .collect()
}

/// Locate the chunk containing `header` by substring containment (not by
/// position) and return its body after the header label.
fn chunk_body(chunks: &[String], header: &str) -> String {
    match chunks.iter().find(|chunk| chunk.contains(header)) {
        Some(chunk) => {
            let body = extract_section(chunk, header, None);
            body.trim_start_matches(':').trim_start().to_string()
        }
        None => String::new(),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

/// The assembler, not the list parser, owns the empty-list substitution.
fn or_placeholder(items: Vec<String>) -> Vec<String> {
    if items.is_empty() {
        vec![NO_RECOMMENDATIONS.to_string()]
    } else {
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_mode_extracts_final_answer() {
        let raw = "...Possible Diagnosis:\nLikely a common cold. However, this is not a substitute...\n\nRecommendations:\nRest well.\nDrink fluids.\n[ACTUAL RECOMMENDATION 3]\n";
        let analysis = assemble(raw, AnalysisMode::Quick);
        assert_eq!(
            analysis.diagnosis,
            "Likely a common cold. However, this is not a substitute..."
        );
        assert_eq!(analysis.recommendations, vec!["Rest well.", "Drink fluids."]);
        assert!(analysis.severity.is_none());
        assert!(analysis.references.is_none());
    }

    #[test]
    fn quick_mode_prefers_last_template_occurrence() {
        // The backend echoed the prompt template before answering.
        let raw = "\
Possible Diagnosis:
Based on the symptoms provided, it appears to be [ACTUAL CONDITION].

Recommendations:
[ACTUAL RECOMMENDATION 1]

Possible Diagnosis:
Tension headache, likely stress-related.

Recommendations:
Reduce screen time.
Stay hydrated.";
        let analysis = assemble(raw, AnalysisMode::Quick);
        assert_eq!(analysis.diagnosis, "Tension headache, likely stress-related.");
        assert_eq!(
            analysis.recommendations,
            vec!["Reduce screen time.", "Stay hydrated."]
        );
    }

    #[test]
    fn quick_mode_empty_input_degrades_to_placeholders() {
        let analysis = assemble("", AnalysisMode::Quick);
        assert_eq!(analysis.diagnosis, UNKNOWN_DIAGNOSIS);
        assert_eq!(analysis.recommendations, vec![NO_RECOMMENDATIONS]);
    }

    #[test]
    fn clinical_mode_extracts_all_four_sections() {
        let raw = "DIAGNOSIS:\nFlu-like illness\n\nRECOMMENDATIONS:\n1. Rest\n2. Hydrate\n\nSEVERITY:\nMild\n\nURGENT CARE NEEDED IF:\nHigh fever persists";
        let analysis = assemble(raw, AnalysisMode::Clinical);
        assert_eq!(analysis.diagnosis, "Flu-like illness");
        assert_eq!(analysis.recommendations, vec!["Rest", "Hydrate"]);
        assert_eq!(analysis.severity.as_deref(), Some("Mild"));
        assert_eq!(analysis.urgent_care.as_deref(), Some("High fever persists"));
        assert!(analysis.disclaimer.is_some());
    }

    #[test]
    fn clinical_mode_non_numbered_recommendation_lines_dropped() {
        let raw = "DIAGNOSIS:\nX\n\nRECOMMENDATIONS:\nGeneral advice first.\n1. Rest\nSEVERITY:\nMild";
        let analysis = assemble(raw, AnalysisMode::Clinical);
        assert_eq!(analysis.recommendations, vec!["Rest"]);
    }

    #[test]
    fn clinical_mode_empty_input_degrades_to_placeholders() {
        let analysis = assemble("", AnalysisMode::Clinical);
        assert_eq!(analysis.diagnosis, UNKNOWN_DIAGNOSIS);
        assert_eq!(analysis.recommendations, vec![NO_RECOMMENDATIONS]);
        assert_eq!(analysis.severity.as_deref(), Some(UNKNOWN_SEVERITY));
        assert_eq!(analysis.urgent_care.as_deref(), Some(URGENT_CARE_FALLBACK));
    }

    fn technical_fixture() -> &'static str {
        "\
1. Clinical Assessment:
The combination of fever, productive cough and pleuritic chest pain suggests a lower respiratory tract infection.

2. Differential Diagnosis (in order of likelihood):
1. Community-acquired pneumonia (J18.9)
   Key features: fever, focal crackles on auscultation.
2. Acute bronchitis (J20.9)
   Usually viral and self-limiting.
3. Pulmonary embolism (I26.9)
   Consider if pleuritic pain with tachycardia.

3. Recommended Diagnostic Approach:
- CBC with differential
- Chest X-ray, PA and lateral views

4. Treatment Considerations:
Empirical amoxicillin 500mg three times daily
- supportive care only if viral
Paracetamol for fever and pain

5. Medical Literature References:
Metlay JP, et al. Diagnosis and Treatment of Adults with Community-acquired Pneumonia. 2019.
IDSA/ATS practice guidelines"
    }

    #[test]
    fn technical_mode_full_report() {
        let analysis = assemble(technical_fixture(), AnalysisMode::Technical);

        assert!(analysis.diagnosis.starts_with("The combination of fever"));

        // Letter-led filter drops the "- supportive care" bullet.
        assert_eq!(
            analysis.recommendations,
            vec![
                "Empirical amoxicillin 500mg three times daily",
                "Paracetamol for fever and pain",
            ]
        );

        let technical = analysis.technical_analysis.unwrap();
        assert!(technical.starts_with("Differential Diagnosis:"));
        assert!(technical.contains("Community-acquired pneumonia (J18.9)"));
        assert!(technical.contains("Pulmonary embolism (I26.9)"));
        assert!(technical.contains("Diagnostic Approach:"));
        assert!(technical.contains("Chest X-ray"));

        let references = analysis.references.unwrap();
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].year, 2019);
        assert!(references[0].title.starts_with("Metlay JP"));
    }

    #[test]
    fn technical_mode_chunks_located_by_containment_not_position() {
        // Sections out of order relative to the canonical template.
        let raw = "\
4. Treatment Considerations:
Oseltamivir within 48 hours of onset

1. Clinical Assessment:
Classic influenza presentation.";
        let analysis = assemble(raw, AnalysisMode::Technical);
        assert_eq!(analysis.diagnosis, "Classic influenza presentation.");
        assert_eq!(
            analysis.recommendations,
            vec!["Oseltamivir within 48 hours of onset"]
        );
    }

    #[test]
    fn technical_mode_empty_input_degrades_to_placeholders() {
        let analysis = assemble("", AnalysisMode::Technical);
        assert_eq!(analysis.diagnosis, UNKNOWN_DIAGNOSIS);
        assert_eq!(analysis.recommendations, vec![NO_RECOMMENDATIONS]);
        assert_eq!(analysis.references.as_deref(), Some(&[][..]));
    }

    #[test]
    fn recommendations_never_empty_in_any_mode() {
        for mode in [AnalysisMode::Quick, AnalysisMode::Clinical, AnalysisMode::Technical] {
            let analysis = assemble("no anchors anywhere in this text", mode);
            assert!(!analysis.recommendations.is_empty(), "{mode:?}");
        }
    }
}
