//! Model response parsing.
//!
//! The model is asked for strict JSON, but replies are not always well-formed:
//! some wrap the object in markdown fences or prose, others ignore the format
//! entirely and answer with bullet lists. Parsing therefore runs a chain of
//! strategies, each returning a [`ParseOutcome`]:
//!
//! 1. **Strict JSON** - the whole reply is a JSON object
//! 2. **Extracted JSON** - the first embedded `{...}` object carrying the
//!    expected key, found by decoding at each `{` and ignoring what follows
//! 3. **Line-oriented** - `-`/`•` bullet lines, sectioned by headers for treatments
//!
//! The chain stops at the first `Structured` or `Failed` outcome; an
//! `Unstructured` outcome hands the text to the next strategy.

use super::{
    AnalysisKind, AnalysisResult, DiseaseResult, TreatmentResult, Treatments, TrendingResult,
    MAX_DISEASES, MAX_TREATMENTS_PER_CATEGORY, TRENDING_COUNT,
};
use regex::Regex;
use serde_json::{Deserializer, Map, Value};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#*]*(over-the-counter|prescription|home)")
        .expect("section header pattern is valid")
});

/// Result of one parsing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The text was understood and normalized.
    Structured(T),
    /// The strategy does not apply; the raw text is passed on.
    Unstructured(String),
    /// The text matched the expected format but carries an unusable value.
    Failed(String),
}

/// The reply could not be coerced into the expected result shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Model returned empty content")]
    Empty,

    #[error("Malformed {strategy} response: {reason}")]
    Malformed {
        strategy: &'static str,
        reason: String,
    },

    #[error("No parsing strategy recognized the model response")]
    Unrecognized,
}

trait ParseStrategy: Sync {
    fn name(&self) -> &'static str;
    fn parse(&self, kind: AnalysisKind, text: &str) -> ParseOutcome<AnalysisResult>;
}

struct StrictJson;
struct ExtractedJson;
struct LineOriented;

static STRATEGIES: [&dyn ParseStrategy; 3] = [&StrictJson, &ExtractedJson, &LineOriented];

/// Parse the model's reply into the result shape for `kind`.
///
/// Result arrays are always capped; categories that yield nothing become
/// empty arrays rather than errors.
pub fn parse_response(kind: AnalysisKind, text: &str) -> Result<AnalysisResult, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    for strategy in STRATEGIES.iter() {
        match strategy.parse(kind, text) {
            ParseOutcome::Structured(result) => {
                debug!(strategy = strategy.name(), kind = %kind, "Parsed model response");
                return Ok(result);
            }
            ParseOutcome::Failed(reason) => {
                return Err(ParseError::Malformed {
                    strategy: strategy.name(),
                    reason,
                });
            }
            ParseOutcome::Unstructured(_) => continue,
        }
    }

    Err(ParseError::Unrecognized)
}

impl ParseStrategy for StrictJson {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, kind: AnalysisKind, text: &str) -> ParseOutcome<AnalysisResult> {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => from_json(kind, &value, text),
            Err(_) => ParseOutcome::Unstructured(text.to_string()),
        }
    }
}

impl ParseStrategy for ExtractedJson {
    fn name(&self) -> &'static str {
        "embedded json"
    }

    fn parse(&self, kind: AnalysisKind, text: &str) -> ParseOutcome<AnalysisResult> {
        for value in embedded_objects(text) {
            match from_json(kind, &value, text) {
                ParseOutcome::Unstructured(_) => continue,
                outcome => return outcome,
            }
        }
        ParseOutcome::Unstructured(text.to_string())
    }
}

impl ParseStrategy for LineOriented {
    fn name(&self) -> &'static str {
        "text"
    }

    fn parse(&self, kind: AnalysisKind, text: &str) -> ParseOutcome<AnalysisResult> {
        let result = match kind {
            AnalysisKind::Diseases => AnalysisResult::Diseases(DiseaseResult {
                diseases: bullet_items(text, MAX_DISEASES),
            }),
            AnalysisKind::Treatments => AnalysisResult::Treatments(TreatmentResult {
                treatments: sectioned_treatments(text),
            }),
            AnalysisKind::Trending => {
                AnalysisResult::Trending(normalize_trending(bullet_items(text, usize::MAX)))
            }
        };
        ParseOutcome::Structured(result)
    }
}

/// JSON objects that start at a `{` in `text`, in order of their start offset.
///
/// Each candidate is decoded as a single value with trailing text ignored, so
/// braces in prose after the object do not affect it.
fn embedded_objects(text: &str) -> impl Iterator<Item = Value> + '_ {
    text.match_indices('{').filter_map(move |(start, _)| {
        Deserializer::from_str(&text[start..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
            .filter(Value::is_object)
    })
}

fn from_json(kind: AnalysisKind, value: &Value, raw: &str) -> ParseOutcome<AnalysisResult> {
    let Some(object) = value.as_object() else {
        return ParseOutcome::Unstructured(raw.to_string());
    };

    let field = object.get(kind.as_str()).filter(|v| !v.is_null());
    let Some(field) = field else {
        return ParseOutcome::Unstructured(raw.to_string());
    };

    match kind {
        AnalysisKind::Diseases => match field.as_array() {
            Some(items) => ParseOutcome::Structured(AnalysisResult::Diseases(DiseaseResult {
                diseases: string_items(items, MAX_DISEASES),
            })),
            None => ParseOutcome::Failed("'diseases' is not an array".to_string()),
        },
        AnalysisKind::Treatments => match field.as_object() {
            Some(categories) => match json_treatments(categories) {
                Ok(treatments) => {
                    ParseOutcome::Structured(AnalysisResult::Treatments(TreatmentResult {
                        treatments,
                    }))
                }
                Err(reason) => ParseOutcome::Failed(reason),
            },
            None => ParseOutcome::Failed("'treatments' is not an object".to_string()),
        },
        AnalysisKind::Trending => match field.as_array() {
            Some(items) => ParseOutcome::Structured(AnalysisResult::Trending(normalize_trending(
                string_items(items, usize::MAX),
            ))),
            None => ParseOutcome::Failed("'trending' is not an array".to_string()),
        },
    }
}

fn json_treatments(categories: &Map<String, Value>) -> Result<Treatments, String> {
    let category = |name: &str| -> Result<Vec<String>, String> {
        match categories.get(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(string_items(items, MAX_TREATMENTS_PER_CATEGORY)),
            Some(_) => Err(format!("'treatments.{}' is not an array", name)),
        }
    };

    Ok(Treatments {
        otc: category("otc")?,
        prescription: category("prescription")?,
        home: category("home")?,
    })
}

fn string_items(items: &[Value], cap: usize) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Keep lines starting with `-` or `•`, marker stripped.
fn bullet_items(text: &str, cap: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('-').or_else(|| line.strip_prefix('•')))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Split free text at "Over-the-counter" / "Prescription" / "Home" headers and
/// collect the bullets under each.
fn sectioned_treatments(text: &str) -> Treatments {
    let headers: Vec<(usize, String)> = SECTION_HEADER
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let name = caps.get(1)?.as_str().to_lowercase();
            Some((start, name))
        })
        .collect();

    let mut treatments = Treatments::default();
    for (i, (start, name)) in headers.iter().enumerate() {
        let end = headers.get(i + 1).map_or(text.len(), |(next, _)| *next);
        let items = bullet_items(&text[*start..end], MAX_TREATMENTS_PER_CATEGORY);

        let target = match name.as_str() {
            "over-the-counter" => &mut treatments.otc,
            "prescription" => &mut treatments.prescription,
            _ => &mut treatments.home,
        };
        target.extend(items);
        target.truncate(MAX_TREATMENTS_PER_CATEGORY);
    }

    treatments
}

fn normalize_trending(mut items: Vec<String>) -> TrendingResult {
    if items.len() < TRENDING_COUNT {
        return TrendingResult::fallback();
    }
    items.truncate(TRENDING_COUNT);
    TrendingResult { trending: items }
}
