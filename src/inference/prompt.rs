//! Prompt templates per analysis mode.
//!
//! The anchor labels each template asks the model to emit are the same
//! literal strings the assembler searches for. Changing a label here without
//! updating `analysis::assembler` silently degrades extraction to
//! placeholders.

use crate::analysis::AnalysisMode;

use super::client::GenerationParams;

pub const QUICK_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
pub const CLINICAL_MODEL: &str = "microsoft/BioGPT";
pub const TECHNICAL_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Everything needed for one generation call.
pub struct PromptSpec {
    pub model: &'static str,
    pub prompt: String,
    pub params: GenerationParams,
}

/// Build the model, prompt and sampling parameters for one analyze request.
pub fn request_for(mode: AnalysisMode, symptoms_text: &str) -> PromptSpec {
    match mode {
        AnalysisMode::Quick => PromptSpec {
            model: QUICK_MODEL,
            prompt: quick_prompt(symptoms_text),
            params: GenerationParams {
                max_new_tokens: 500,
                temperature: 0.7,
                top_p: Some(0.9),
                do_sample: false,
            },
        },
        AnalysisMode::Clinical => PromptSpec {
            model: CLINICAL_MODEL,
            prompt: clinical_prompt(symptoms_text),
            params: GenerationParams {
                max_new_tokens: 500,
                temperature: 0.7,
                top_p: Some(0.9),
                do_sample: true,
            },
        },
        AnalysisMode::Technical => PromptSpec {
            model: TECHNICAL_MODEL,
            prompt: technical_prompt(symptoms_text),
            params: GenerationParams {
                max_new_tokens: 800,
                temperature: 0.7,
                top_p: Some(0.9),
                do_sample: false,
            },
        },
    }
}

/// Prompt for the per-document pass of a technical analysis. The document
/// text arrives already extracted — upload and OCR mechanics live elsewhere.
pub fn document_prompt(name: &str, text: &str) -> PromptSpec {
    PromptSpec {
        model: TECHNICAL_MODEL,
        prompt: format!(
            "You are a medical professional reviewing a patient document named \"{name}\". \
Summarize the clinically relevant findings in this document and note anything that \
should influence diagnosis or treatment. Use precise medical terminology.\n\n\
Document content:\n{text}"
        ),
        params: GenerationParams {
            max_new_tokens: 500,
            temperature: 0.7,
            top_p: Some(0.9),
            do_sample: false,
        },
    }
}

fn quick_prompt(symptoms_text: &str) -> String {
    format!(
        "You are a medical AI assistant. Analyze these symptoms: {symptoms_text}.

    Provide a clear and concise response with:
    1. A possible diagnosis (be specific but mention that this is not a substitute for professional medical advice)
    2. A list of 5 specific recommendations

    IMPORTANT: Do not use any placeholders like [specific condition] or [Specific recommendation X].
    Provide actual medical analysis and real recommendations based on the symptoms provided.

    Format your response exactly like this:
    Possible Diagnosis:
    Based on the symptoms provided, it appears to be [ACTUAL CONDITION]. However, this is not a substitute for professional medical advice.

    Recommendations:
    [ACTUAL RECOMMENDATION 1]
    [ACTUAL RECOMMENDATION 2]
    [ACTUAL RECOMMENDATION 3]
    [ACTUAL RECOMMENDATION 4]
    [ACTUAL RECOMMENDATION 5]"
    )
}

fn clinical_prompt(symptoms_text: &str) -> String {
    format!(
        "As a medical AI assistant, analyze these symptoms: {symptoms_text}.

    Provide a structured clinical analysis with:
    1. Possible diagnoses based on current medical literature
    2. Evidence-based recommendations
    3. Severity assessment
    4. When to seek immediate medical attention

    Format the response as:

    DIAGNOSIS:
    [Clinical assessment based on symptoms]

    RECOMMENDATIONS:
    1. [Evidence-based recommendation]
    2. [Evidence-based recommendation]
    3. [Evidence-based recommendation]
    4. [Evidence-based recommendation]
    5. [Evidence-based recommendation]

    SEVERITY:
    [Assessment of condition severity]

    URGENT CARE NEEDED IF:
    [Specific conditions that require immediate medical attention]"
    )
}

fn technical_prompt(symptoms_text: &str) -> String {
    format!(
        "You are a medical professional providing a detailed clinical analysis. Based on the reported symptoms: {symptoms_text}, provide a comprehensive medical assessment.

Clinical Analysis Structure:

1. Clinical Assessment:
- Detailed analysis of presenting symptoms
- Potential underlying pathophysiology
- Relevant clinical patterns and associations
- Severity assessment criteria

2. Differential Diagnosis (in order of likelihood):
- List top 3-5 potential diagnoses with ICD-10 codes
- Key distinguishing features for each
- Supporting and contradicting factors
- Critical diagnostic considerations

3. Recommended Diagnostic Approach:
- Initial laboratory studies (specific tests with clinical rationale)
- Imaging studies (modalities and specific views/protocols)
- Additional diagnostic considerations
- Priority/urgency level for each test

4. Treatment Considerations:
- First-line therapeutic options
- Evidence-based treatment protocols
- Specific medication recommendations (including dosing)
- Monitoring parameters
- Potential complications to watch for

5. Medical Literature References:
- Current clinical guidelines
- Relevant research papers
- Evidence level for recommendations

Use precise medical terminology and include specific values, ranges, and criteria where applicable."
    )
}
