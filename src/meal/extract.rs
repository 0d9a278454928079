//! Pulls the structured plan out of a freeform model reply.
//!
//! Models reliably wrap valid JSON in prose and markdown fences, so the
//! extraction is a first-`{` / last-`}` slice of the cleaned text followed by
//! a strict parse and a shape check. Known limit: a string value containing
//! an unbalanced brace can defeat the slice.

use crate::error::GenerationError;
use crate::meal::dto::MealPlanDocument;

pub fn extract_plan(reply: &str) -> Result<MealPlanDocument, GenerationError> {
    let cleaned = reply.trim().replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let (start, end) = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start <= end => (start, end),
        _ => {
            return Err(GenerationError::NoStructuredOutput {
                raw: cleaned.to_string(),
            })
        }
    };
    let slice = &cleaned[start..=end];

    // Strict parse first; a syntactically broken reply is unusable and never
    // repaired field-by-field.
    let value: serde_json::Value =
        serde_json::from_str(slice).map_err(|cause| GenerationError::MalformedOutput {
            raw: slice.to_string(),
            cause,
        })?;

    serde_json::from_value(value).map_err(|cause| GenerationError::SchemaMismatch { cause })
}
