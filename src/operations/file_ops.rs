use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use catex_core::{validate_against_schema, LoadOutcome, SchemaViolation};

use crate::state::AppState;

/// File operations orchestration
/// Loads the catalogue and runs schema diagnostics against it
pub struct FileOperations<'a> {
    state: &'a mut AppState,
}

impl<'a> FileOperations<'a> {
    pub fn new(state: &'a mut AppState) -> Self {
        Self { state }
    }

    /// Load (or reload) the catalogue from the configured candidates.
    /// The query state is kept so a reload stays on the same view.
    pub fn load(&mut self) -> LoadOutcome {
        let state = &mut *self.state;
        let outcome = state.explorer.load_from(&state.source);

        if outcome == LoadOutcome::Applied {
            if let Some(catalogue) = state.explorer.catalogue() {
                for dataset in &catalogue.datasets {
                    tracing::info!(
                        dataset = dataset.tag(),
                        records = dataset.records.len(),
                        "dataset ready"
                    );
                }
            }
            state.commit();
        }
        outcome
    }

    /// Validate the loaded catalogue document against a JSON Schema file.
    /// Violations are diagnostics only; an error means the schema itself is unusable.
    pub fn check_schema(&self, schema_path: &Path) -> Result<Vec<SchemaViolation>> {
        let Some(catalogue) = self.state.explorer.catalogue() else {
            return Ok(Vec::new());
        };

        let contents = fs::read_to_string(schema_path)
            .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
        let schema: serde_json::Value = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

        let violations = validate_against_schema(&schema, &catalogue.document)?;
        for violation in &violations {
            tracing::warn!(path = %violation.path, "{}", violation.message);
        }
        tracing::info!(
            schema = %schema_path.display(),
            violations = violations.len(),
            "schema check finished"
        );
        Ok(violations)
    }
}
