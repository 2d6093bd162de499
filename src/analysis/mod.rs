//! # Analysis data model
//!
//! Request and result types for the `/api/analyze` pipeline, plus the
//! validator, prompt builder, and response parser that operate on them.
//!
//! A raw JSON body becomes a typed [`AnalysisRequest`] in [`validate`], is
//! turned into a [`prompt::Prompt`] for the model provider, and the model's
//! text reply is coerced back into an [`AnalysisResult`] by [`parser`].
//!
//! ## Result shapes
//!
//! ```json
//! { "diseases": ["Influenza", "Common cold"] }
//! { "treatments": { "otc": ["..."], "prescription": ["..."], "home": ["..."] } }
//! { "trending": ["Fever", "Cough", "Headache"] }
//! ```

pub mod error;
pub mod parser;
pub mod prompt;
pub mod validate;

pub use error::AnalyzeError;
pub use parser::{parse_response, ParseError, ParseOutcome};
pub use prompt::{build_prompt, Prompt};
pub use validate::{validate_request, ValidationError};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of conditions returned for a `diseases` analysis.
pub const MAX_DISEASES: usize = 10;

/// Maximum number of entries in each treatment category.
pub const MAX_TREATMENTS_PER_CATEGORY: usize = 8;

/// Exact number of entries in a `trending` result.
pub const TRENDING_COUNT: usize = 3;

/// Returned when the model gives no usable trending list.
pub const FALLBACK_TRENDING: [&str; TRENDING_COUNT] = ["Fever", "Cough", "Headache"];

/// The three analysis operations the endpoint supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Possible conditions for a list of symptoms
    #[default]
    Diseases,
    /// Treatment options for one condition
    Treatments,
    /// Currently popular symptoms
    Trending,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Diseases => "diseases",
            AnalysisKind::Treatments => "treatments",
            AnalysisKind::Trending => "trending",
        }
    }

    /// Parse the wire value of the `type` field.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "diseases" => Some(AnalysisKind::Diseases),
            "treatments" => Some(AnalysisKind::Treatments),
            "trending" => Some(AnalysisKind::Trending),
            _ => None,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated analysis request.
///
/// Only produced by [`validate_request`], so every instance already satisfies
/// the payload limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Diseases { symptoms: Vec<String> },
    Treatments { disease: String },
    Trending,
}

impl AnalysisRequest {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisRequest::Diseases { .. } => AnalysisKind::Diseases,
            AnalysisRequest::Treatments { .. } => AnalysisKind::Treatments,
            AnalysisRequest::Trending => AnalysisKind::Trending,
        }
    }
}

/// Possible conditions for a symptom list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiseaseResult {
    pub diseases: Vec<String>,
}

/// Treatment options grouped by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Treatments {
    pub otc: Vec<String>,
    pub prescription: Vec<String>,
    pub home: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TreatmentResult {
    pub treatments: Treatments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingResult {
    pub trending: Vec<String>,
}

impl TrendingResult {
    pub fn fallback() -> Self {
        Self {
            trending: FALLBACK_TRENDING.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Successful response body of `/api/analyze`.
///
/// Serialized untagged so each variant produces exactly its own top-level key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Diseases(DiseaseResult),
    Treatments(TreatmentResult),
    Trending(TrendingResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Diseases(_) => AnalysisKind::Diseases,
            AnalysisResult::Treatments(_) => AnalysisKind::Treatments,
            AnalysisResult::Trending(_) => AnalysisKind::Trending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(AnalysisKind::from_wire("diseases"), Some(AnalysisKind::Diseases));
        assert_eq!(AnalysisKind::from_wire("treatments"), Some(AnalysisKind::Treatments));
        assert_eq!(AnalysisKind::from_wire("trending"), Some(AnalysisKind::Trending));
        assert_eq!(AnalysisKind::from_wire("Diseases"), None);
        assert_eq!(AnalysisKind::default(), AnalysisKind::Diseases);
    }

    #[test]
    fn test_disease_result_serialize() {
        let result = AnalysisResult::Diseases(DiseaseResult {
            diseases: vec!["Flu".to_string()],
        });
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"diseases": ["Flu"]}));
    }

    #[test]
    fn test_treatment_result_serialize() {
        let result = AnalysisResult::Treatments(TreatmentResult {
            treatments: Treatments {
                otc: vec!["Ibuprofen".to_string()],
                prescription: vec![],
                home: vec!["Rest".to_string()],
            },
        });
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"treatments": {"otc": ["Ibuprofen"], "prescription": [], "home": ["Rest"]}})
        );
    }

    #[test]
    fn test_trending_fallback() {
        let fallback = TrendingResult::fallback();
        assert_eq!(fallback.trending, vec!["Fever", "Cough", "Headache"]);
    }

    #[test]
    fn test_request_kind() {
        let request = AnalysisRequest::Treatments {
            disease: "Flu".to_string(),
        };
        assert_eq!(request.kind(), AnalysisKind::Treatments);
        assert_eq!(AnalysisRequest::Trending.kind().to_string(), "trending");
    }
}
