//! Request validation.
//!
//! Runs against the raw JSON body so that type mismatches (a number where a
//! symptom list belongs, an unknown `type`) surface as descriptive 400s
//! instead of generic deserialization failures. Pure: no cache or network
//! access happens before this succeeds.

use super::{AnalysisKind, AnalysisRequest};
use serde_json::Value;
use thiserror::Error;

/// Maximum number of symptoms in one request.
pub const MAX_SYMPTOMS: usize = 25;

/// Maximum combined character count of all symptoms.
pub const MAX_SYMPTOM_CHARS: usize = 500;

/// Maximum character count of a disease name (after trimming).
pub const MAX_DISEASE_CHARS: usize = 100;

/// Reasons a request body is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Invalid analysis type '{0}'. Expected one of: diseases, treatments, trending")]
    InvalidType(String),

    #[error("Field '{0}' is required for type '{1}'")]
    MissingField(&'static str, AnalysisKind),

    #[error("Field '{0}' is not accepted for type '{1}'")]
    UnexpectedField(&'static str, AnalysisKind),

    #[error("Field 'symptoms' must be an array of strings")]
    SymptomsNotArray,

    #[error("symptoms[{0}] must be a non-empty string")]
    InvalidSymptom(usize),

    #[error("Too many symptoms: {0} (maximum {max})", max = MAX_SYMPTOMS)]
    TooManySymptoms(usize),

    #[error("Symptoms too long: {0} characters combined (maximum {max})", max = MAX_SYMPTOM_CHARS)]
    SymptomsTooLong(usize),

    #[error("Field 'disease' must be a non-empty string")]
    InvalidDisease,

    #[error("Disease name too long: {0} characters (maximum {max})", max = MAX_DISEASE_CHARS)]
    DiseaseTooLong(usize),
}

/// Validate a raw `/api/analyze` body and convert it into a typed request.
///
/// `type` defaults to `"diseases"`. A `null` field is treated as absent, and a
/// diseases request without `symptoms` carries an empty list.
pub fn validate_request(body: &Value) -> Result<AnalysisRequest, ValidationError> {
    let object = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let kind = match object.get("type") {
        None | Some(Value::Null) => AnalysisKind::default(),
        Some(Value::String(s)) => {
            AnalysisKind::from_wire(s).ok_or_else(|| ValidationError::InvalidType(s.clone()))?
        }
        Some(other) => return Err(ValidationError::InvalidType(other.to_string())),
    };

    let symptoms = present(object.get("symptoms"));
    let disease = present(object.get("disease"));

    match kind {
        AnalysisKind::Diseases => {
            if disease.is_some() {
                return Err(ValidationError::UnexpectedField("disease", kind));
            }
            let symptoms = match symptoms {
                Some(value) => validate_symptoms(value)?,
                None => Vec::new(),
            };
            Ok(AnalysisRequest::Diseases { symptoms })
        }
        AnalysisKind::Treatments => {
            if symptoms.is_some() {
                return Err(ValidationError::UnexpectedField("symptoms", kind));
            }
            let disease = disease.ok_or(ValidationError::MissingField("disease", kind))?;
            Ok(AnalysisRequest::Treatments {
                disease: validate_disease(disease)?,
            })
        }
        AnalysisKind::Trending => {
            if symptoms.is_some() {
                return Err(ValidationError::UnexpectedField("symptoms", kind));
            }
            if disease.is_some() {
                return Err(ValidationError::UnexpectedField("disease", kind));
            }
            Ok(AnalysisRequest::Trending)
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn validate_symptoms(value: &Value) -> Result<Vec<String>, ValidationError> {
    let items = value.as_array().ok_or(ValidationError::SymptomsNotArray)?;

    if items.len() > MAX_SYMPTOMS {
        return Err(ValidationError::TooManySymptoms(items.len()));
    }

    let mut total_chars = 0;
    let mut symptoms = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let text = item.as_str().ok_or(ValidationError::InvalidSymptom(i))?;
        total_chars += text.chars().count();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidSymptom(i));
        }
        symptoms.push(trimmed.to_string());
    }

    if total_chars > MAX_SYMPTOM_CHARS {
        return Err(ValidationError::SymptomsTooLong(total_chars));
    }

    Ok(symptoms)
}

fn validate_disease(value: &Value) -> Result<String, ValidationError> {
    let trimmed = value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::InvalidDisease)?;

    let chars = trimmed.chars().count();
    if chars > MAX_DISEASE_CHARS {
        return Err(ValidationError::DiseaseTooLong(chars));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_type_defaults_to_diseases() {
        let request = validate_request(&json!({"symptoms": ["Fever", "Cough"]})).unwrap();
        assert_eq!(
            request,
            AnalysisRequest::Diseases {
                symptoms: vec!["Fever".to_string(), "Cough".to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = validate_request(&json!({"type": "prognosis"})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidType("prognosis".to_string()));
        assert!(err.to_string().contains("prognosis"));
    }

    #[test]
    fn test_non_string_type_rejected() {
        let err = validate_request(&json!({"type": 7, "symptoms": ["Fever"]})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType(_)));
    }

    #[test]
    fn test_body_must_be_object() {
        assert_eq!(
            validate_request(&json!(["Fever"])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn test_symptoms_optional_for_diseases() {
        let empty = AnalysisRequest::Diseases { symptoms: vec![] };
        assert_eq!(validate_request(&json!({"type": "diseases"})).unwrap(), empty);
        assert_eq!(validate_request(&json!({"symptoms": []})).unwrap(), empty);
        assert_eq!(validate_request(&json!({"symptoms": null})).unwrap(), empty);
    }

    #[test]
    fn test_symptoms_must_be_strings() {
        let err = validate_request(&json!({"symptoms": "Fever"})).unwrap_err();
        assert_eq!(err, ValidationError::SymptomsNotArray);

        let err = validate_request(&json!({"symptoms": ["Fever", 3]})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidSymptom(1));

        let err = validate_request(&json!({"symptoms": ["Fever", "   "]})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidSymptom(1));
    }

    #[test]
    fn test_symptom_count_boundary() {
        let ok: Vec<String> = (0..25).map(|i| format!("s{}", i)).collect();
        assert!(validate_request(&json!({"symptoms": ok})).is_ok());

        let too_many: Vec<String> = (0..26).map(|i| format!("s{}", i)).collect();
        assert_eq!(
            validate_request(&json!({"symptoms": too_many})).unwrap_err(),
            ValidationError::TooManySymptoms(26)
        );
    }

    #[test]
    fn test_symptom_length_boundary() {
        let ok = vec!["a".repeat(250), "b".repeat(250)];
        assert!(validate_request(&json!({"symptoms": ok})).is_ok());

        let too_long = vec!["a".repeat(250), "b".repeat(251)];
        assert_eq!(
            validate_request(&json!({"symptoms": too_long})).unwrap_err(),
            ValidationError::SymptomsTooLong(501)
        );
    }

    #[test]
    fn test_symptoms_are_trimmed() {
        let request = validate_request(&json!({"symptoms": ["  Sore Throat "]})).unwrap();
        assert_eq!(
            request,
            AnalysisRequest::Diseases {
                symptoms: vec!["Sore Throat".to_string()]
            }
        );
    }

    #[test]
    fn test_treatments_require_disease() {
        let err = validate_request(&json!({"type": "treatments"})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField("disease", AnalysisKind::Treatments)
        );

        let err = validate_request(&json!({"type": "treatments", "disease": "  "})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDisease);

        let err = validate_request(&json!({"type": "treatments", "disease": 12})).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDisease);
    }

    #[test]
    fn test_disease_length_boundary() {
        let ok = "x".repeat(100);
        assert_eq!(
            validate_request(&json!({"type": "treatments", "disease": ok})).unwrap(),
            AnalysisRequest::Treatments {
                disease: "x".repeat(100)
            }
        );

        let too_long = "x".repeat(101);
        assert_eq!(
            validate_request(&json!({"type": "treatments", "disease": too_long})).unwrap_err(),
            ValidationError::DiseaseTooLong(101)
        );
    }

    #[test]
    fn test_invalid_combinations_rejected() {
        let err = validate_request(&json!({"type": "treatments", "disease": "Flu", "symptoms": ["Fever"]}))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedField("symptoms", AnalysisKind::Treatments)
        );

        let err =
            validate_request(&json!({"symptoms": ["Fever"], "disease": "Flu"})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedField("disease", AnalysisKind::Diseases)
        );

        let err = validate_request(&json!({"type": "trending", "disease": "Flu"})).unwrap_err();
        assert!(matches!(err, ValidationError::UnexpectedField("disease", _)));
    }

    #[test]
    fn test_null_fields_are_absent() {
        let request =
            validate_request(&json!({"type": "trending", "symptoms": null, "disease": null}))
                .unwrap();
        assert_eq!(request, AnalysisRequest::Trending);
    }

    proptest! {
        #[test]
        fn prop_symptoms_within_limits_accepted(
            symptoms in prop::collection::vec("[a-z]{1,20}", 0..=MAX_SYMPTOMS)
        ) {
            let total: usize = symptoms.iter().map(|s| s.chars().count()).sum();
            prop_assume!(total <= MAX_SYMPTOM_CHARS);
            let body = json!({ "symptoms": symptoms });
            let accepted = validate_request(&body).is_ok();
            prop_assert!(accepted);
        }

        #[test]
        fn prop_oversized_symptom_text_rejected(extra in 1usize..200) {
            let symptoms = vec!["a".repeat(MAX_SYMPTOM_CHARS + extra - 1), "b".to_string()];
            prop_assert_eq!(
                validate_request(&json!({"symptoms": symptoms})).unwrap_err(),
                ValidationError::SymptomsTooLong(MAX_SYMPTOM_CHARS + extra)
            );
        }
    }
}
