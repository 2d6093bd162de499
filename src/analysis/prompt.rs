//! Prompt construction for the model provider.

use super::{AnalysisRequest, MAX_DISEASES, MAX_TREATMENTS_PER_CATEGORY, TRENDING_COUNT};

/// System/user message pair sent to the model provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const JSON_ONLY: &str = "Respond with a single JSON object and nothing else. \
Do not add explanations, prose, or markdown code fences.";

/// Build the prompt for a validated request.
pub fn build_prompt(request: &AnalysisRequest) -> Prompt {
    match request {
        AnalysisRequest::Diseases { symptoms } => Prompt {
            system: format!(
                "You are a medical information assistant. {} The object must match this schema \
                 exactly: {{\"diseases\":[\"<condition name>\", ...]}}. \
                 Include at most {} conditions, most likely first, names only.",
                JSON_ONLY, MAX_DISEASES
            ),
            user: if symptoms.is_empty() {
                "No specific symptoms were reported. List the most common diseases or \
                 conditions people ask about."
                    .to_string()
            } else {
                format!(
                    "Analyze these symptoms: {}. List the most likely diseases or conditions \
                     that could cause them.",
                    symptoms.join(", ")
                )
            },
        },
        AnalysisRequest::Treatments { disease } => Prompt {
            system: format!(
                "You are a medical information assistant. {} The object must match this schema \
                 exactly: {{\"treatments\":{{\"otc\":[\"...\"],\"prescription\":[\"...\"],\"home\":[\"...\"]}}}}. \
                 Include at most {} entries per category.",
                JSON_ONLY, MAX_TREATMENTS_PER_CATEGORY
            ),
            user: format!(
                "Provide treatment options for \"{}\": over-the-counter medications, \
                 prescription medications, and home remedies.",
                disease
            ),
        },
        AnalysisRequest::Trending => Prompt {
            system: format!(
                "You are a medical information assistant. {} The object must match this schema \
                 exactly: {{\"trending\":[\"<symptom>\", ...]}} with exactly {} entries.",
                JSON_ONLY, TRENDING_COUNT
            ),
            user: format!(
                "List the {} symptoms people are most commonly searching for right now.",
                TRENDING_COUNT
            ),
        },
    }
}
