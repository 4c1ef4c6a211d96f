use serde::Serialize;
use serde_json::Value;

use crate::error::CatalogueError;

/// One place where a document disagrees with its schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer into the document, `root` for the document itself
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message, self.path)
    }
}

/// Validate a catalogue document against a JSON Schema.
/// Returns every violation; an empty list means the document is valid.
/// Fails only when the schema itself does not compile.
pub fn validate_against_schema(
    schema: &Value,
    data: &Value,
) -> Result<Vec<SchemaViolation>, CatalogueError> {
    let compiled = jsonschema::validator_for(schema).map_err(|e| CatalogueError::Schema {
        reason: e.to_string(),
    })?;

    let violations = compiled
        .iter_errors(data)
        .map(|error| {
            let path = error.instance_path.to_string();
            SchemaViolation {
                path: if path.is_empty() {
                    "root".to_string()
                } else {
                    path
                },
                message: error.to_string(),
            }
        })
        .collect();

    Ok(violations)
}
