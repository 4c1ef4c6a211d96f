use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CatalogueError;

/// Somewhere catalogue documents can be fetched from
pub trait CatalogueSource {
    /// Fetch and parse the JSON document at `location`
    fn fetch(&self, location: &str) -> Result<Value, CatalogueError>;
}

/// Reads catalogue documents from the filesystem.
/// Relative locations resolve against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl CatalogueSource for FileSource {
    fn fetch(&self, location: &str) -> Result<Value, CatalogueError> {
        let contents =
            fs::read_to_string(self.resolve(location)).map_err(|source| CatalogueError::Read {
                location: location.to_string(),
                source,
            })?;
        parse_document(location, &contents)
    }
}

/// Documents held in memory, keyed by location.
/// Locations can also be set to answer with a status code.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Result<String, u16>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, location: &str, body: impl Into<String>) -> Self {
        self.entries.insert(location.to_string(), Ok(body.into()));
        self
    }

    pub fn with_status(mut self, location: &str, status: u16) -> Self {
        self.entries.insert(location.to_string(), Err(status));
        self
    }
}

impl CatalogueSource for MemorySource {
    fn fetch(&self, location: &str) -> Result<Value, CatalogueError> {
        match self.entries.get(location) {
            Some(Ok(body)) => parse_document(location, body),
            Some(Err(status)) => Err(CatalogueError::Status {
                location: location.to_string(),
                status: *status,
            }),
            None => Err(CatalogueError::Status {
                location: location.to_string(),
                status: 404,
            }),
        }
    }
}

fn parse_document(location: &str, contents: &str) -> Result<Value, CatalogueError> {
    serde_json::from_str(contents).map_err(|source| CatalogueError::Parse {
        location: location.to_string(),
        source,
    })
}

/// Try each location in order; the first one that loads wins.
/// Returns the winning location with its document, or the last error.
pub fn fetch_with_fallback<S, L>(
    source: &S,
    locations: &[L],
) -> Result<(String, Value), CatalogueError>
where
    S: CatalogueSource + ?Sized,
    L: AsRef<str>,
{
    let mut last_error = None;

    for location in locations {
        let location = location.as_ref();
        match source.fetch(location) {
            Ok(document) => {
                tracing::info!(location, "loaded catalogue");
                return Ok((location.to_string(), document));
            }
            Err(error) => {
                tracing::warn!(location, %error, "catalogue candidate failed");
                last_error = Some(error);
            }
        }
    }

    Err(last_error.unwrap_or(CatalogueError::NoCandidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_first_successful_candidate_wins() {
        let source = MemorySource::new()
            .with_status("a.json", 500)
            .with_document("b.json", r#"{"metadata": {}}"#)
            .with_document("c.json", r#"{"other": 1}"#);
        let (location, document) =
            fetch_with_fallback(&source, &["a.json", "b.json", "c.json"]).unwrap();
        assert_eq!(location, "b.json");
        assert!(document.get("metadata").is_some());
    }

    #[test]
    fn test_last_error_is_reported() {
        let source = MemorySource::new()
            .with_status("a.json", 500)
            .with_document("b.json", "{not json");
        let err = fetch_with_fallback(&source, &["a.json", "b.json"]).unwrap_err();
        assert!(matches!(err, CatalogueError::Parse { .. }));
        assert_eq!(err.location(), Some("b.json"));
    }

    #[test]
    fn test_no_candidates() {
        let empty: [&str; 0] = [];
        let err = fetch_with_fallback(&MemorySource::new(), &empty).unwrap_err();
        assert!(matches!(err, CatalogueError::NoCandidates));
    }

    #[test]
    fn test_file_source_resolves_against_root() {
        let dir = std::env::temp_dir().join(format!("catex-io-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let mut file = fs::File::create(dir.join("catalogue.json")).unwrap();
        file.write_all(br#"{"reporting_items": []}"#).unwrap();

        let source = FileSource::with_root(&dir);
        assert!(source.fetch("catalogue.json").is_ok());
        let missing = source.fetch("missing.json").unwrap_err();
        assert!(matches!(missing, CatalogueError::Read { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }
}
