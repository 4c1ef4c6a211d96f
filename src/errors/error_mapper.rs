use std::io::ErrorKind;

use catex_core::CatalogueError;

/// Map catalogue and config errors to user-friendly messages
/// Returns (title, message, details)
pub fn map_load_error(error: &CatalogueError) -> (String, String, String) {
    match error {
        CatalogueError::Read { location, source } if source.kind() == ErrorKind::NotFound => (
            "Catalogue Not Found".to_string(),
            "The catalogue file could not be found.".to_string(),
            format!(
                "Last location tried: {location}\n\nPass --data <FILE> or set data_paths in the config file."
            ),
        ),
        CatalogueError::Read { location, source }
            if source.kind() == ErrorKind::PermissionDenied =>
        {
            (
                "Permission Denied".to_string(),
                "Permission denied.".to_string(),
                format!("You don't have permission to read:\n{location}"),
            )
        }
        CatalogueError::Read { location, source } => (
            "Error Loading Catalogue".to_string(),
            "Failed to read the catalogue.".to_string(),
            format!("{location}: {source}"),
        ),
        CatalogueError::Parse { location, source } => (
            "Invalid Catalogue".to_string(),
            "The catalogue is not valid JSON.".to_string(),
            format!(
                "{location}, line {} column {}: {source}",
                source.line(),
                source.column()
            ),
        ),
        CatalogueError::Status { location, status } => (
            "Catalogue Unavailable".to_string(),
            format!("The catalogue request failed with HTTP {status}."),
            format!("Last location tried: {location}"),
        ),
        CatalogueError::NoCandidates => (
            "No Catalogue Configured".to_string(),
            "There is no catalogue location to load from.".to_string(),
            "Pass --data <FILE> or set data_paths in the config file.".to_string(),
        ),
        CatalogueError::Config { path, reason } => (
            "Invalid Configuration".to_string(),
            "The explorer configuration could not be used.".to_string(),
            format!("{}: {reason}", path.display()),
        ),
        CatalogueError::Schema { reason } => (
            "Invalid Schema".to_string(),
            "The JSON Schema could not be compiled.".to_string(),
            reason.clone(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_missing_file() {
        let error = CatalogueError::Read {
            location: "data/catalogue.json".to_string(),
            source: io::Error::new(ErrorKind::NotFound, "gone"),
        };
        let (title, _, details) = map_load_error(&error);
        assert_eq!(title, "Catalogue Not Found");
        assert!(details.contains("data/catalogue.json"));
    }

    #[test]
    fn test_parse_error_has_position() {
        let source = serde_json::from_str::<serde_json::Value>("{\n  oops").unwrap_err();
        let error = CatalogueError::Parse {
            location: "c.json".to_string(),
            source,
        };
        let (title, message, details) = map_load_error(&error);
        assert_eq!(title, "Invalid Catalogue");
        assert_eq!(message, "The catalogue is not valid JSON.");
        assert!(details.starts_with("c.json, line 2 column"));
    }

    #[test]
    fn test_status_and_config() {
        let (_, message, _) = map_load_error(&CatalogueError::Status {
            location: "x".to_string(),
            status: 503,
        });
        assert!(message.contains("503"));

        let (title, _, details) = map_load_error(&CatalogueError::Config {
            path: PathBuf::from("catex.json"),
            reason: "duplicate dataset tag 'reporting'".to_string(),
        });
        assert_eq!(title, "Invalid Configuration");
        assert_eq!(details, "catex.json: duplicate dataset tag 'reporting'");
    }
}
