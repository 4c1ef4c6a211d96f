use catex_core::{Facet, SortDirection, Tab, Toggle};

/// Validation error with field and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Pager movement requested by `page`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Next,
    Prev,
    To(usize),
}

pub fn parse_page_move(arg: &str) -> Result<PageMove, ValidationError> {
    match arg.trim() {
        "next" | "n" | "+" => Ok(PageMove::Next),
        "prev" | "p" | "-" => Ok(PageMove::Prev),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|page| *page > 0)
            .map(PageMove::To)
            .ok_or_else(|| ValidationError::new("page", "expected next, prev or a page number")),
    }
}

/// Page size must be one of the configured choices
pub fn parse_page_size(arg: &str, allowed: &[usize]) -> Result<usize, ValidationError> {
    let choices = || {
        allowed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|size| allowed.contains(size))
        .ok_or_else(|| ValidationError::new("size", format!("choose one of {}", choices())))
}

pub fn parse_direction(arg: &str) -> Result<SortDirection, ValidationError> {
    SortDirection::parse(arg.trim())
        .ok_or_else(|| ValidationError::new("dir", "expected asc or desc"))
}

pub fn parse_toggle(arg: &str) -> Result<Toggle, ValidationError> {
    Toggle::parse(arg).ok_or_else(|| {
        let names: Vec<_> = Toggle::ALL.iter().map(|t| t.label()).collect();
        ValidationError::new("only", format!("expected one of {}", names.join(", ")))
    })
}

/// `on`/`off` switch; a missing argument means `on`
pub fn parse_switch(arg: Option<&str>) -> Result<bool, ValidationError> {
    match arg.map(str::trim) {
        None | Some("on") | Some("1") | Some("yes") => Ok(true),
        Some("off") | Some("0") | Some("no") => Ok(false),
        Some(_) => Err(ValidationError::new("switch", "expected on or off")),
    }
}

pub fn parse_min_flow(arg: &str) -> Result<u64, ValidationError> {
    arg.trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::new("min-flow", "expected a whole number"))
}

/// Parse `NAME=VALUE` against the facets the active dataset offers
pub fn parse_facet_arg(arg: &str, facets: &[Facet]) -> Result<(String, String), ValidationError> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| ValidationError::new("facet", "expected NAME=VALUE"))?;
    let key = parse_facet_name(name, facets)?;

    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new("facet", "value cannot be empty"));
    }
    Ok((key, value.to_string()))
}

/// Resolve a facet by key or label, case-insensitively
pub fn parse_facet_name(name: &str, facets: &[Facet]) -> Result<String, ValidationError> {
    let name = name.trim();
    facets
        .iter()
        .find(|f| f.key.eq_ignore_ascii_case(name) || f.label.eq_ignore_ascii_case(name))
        .map(|f| f.key.clone())
        .ok_or_else(|| {
            let keys: Vec<_> = facets.iter().map(|f| f.key.as_str()).collect();
            if keys.is_empty() {
                ValidationError::new("facet", "this tab has no facets")
            } else {
                ValidationError::new(
                    "facet",
                    format!("unknown facet '{name}', expected one of {}", keys.join(", ")),
                )
            }
        })
}

/// Resolve a tab name or its 1-based position
pub fn parse_tab(arg: &str, tabs: &[Tab]) -> Result<Tab, ValidationError> {
    let arg = arg.trim();
    if let Ok(position) = arg.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|i| tabs.get(i))
            .cloned()
            .ok_or_else(|| ValidationError::new("tab", format!("no tab number {position}")));
    }
    let tab = Tab::parse(arg);
    if tabs.contains(&tab) {
        Ok(tab)
    } else {
        let names: Vec<_> = tabs.iter().map(Tab::as_str).collect();
        Err(ValidationError::new(
            "tab",
            format!("unknown tab '{arg}', expected one of {}", names.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catex_core::Field;

    fn facets() -> Vec<Facet> {
        vec![
            Facet::new("cluster", "Cluster", Field::Cluster),
            Facet::new("data_provider", "Provider", Field::Raw("data_provider".to_string())),
        ]
    }

    #[test]
    fn test_page_move() {
        assert_eq!(parse_page_move("next"), Ok(PageMove::Next));
        assert_eq!(parse_page_move("prev"), Ok(PageMove::Prev));
        assert_eq!(parse_page_move("3"), Ok(PageMove::To(3)));
        assert!(parse_page_move("0").is_err());
        assert!(parse_page_move("soon").is_err());
    }

    #[test]
    fn test_page_size_must_be_offered() {
        assert_eq!(parse_page_size("50", &[25, 50, 100]), Ok(50));
        let err = parse_page_size("30", &[25, 50, 100]).unwrap_err();
        assert_eq!(err.to_string(), "size: choose one of 25, 50, 100");
    }

    #[test]
    fn test_facet_arg_resolves_label() {
        assert_eq!(
            parse_facet_arg("provider=NESO", &facets()),
            Ok(("data_provider".to_string(), "NESO".to_string()))
        );
        assert!(parse_facet_arg("provider", &facets()).is_err());
        assert!(parse_facet_arg("provider= ", &facets()).is_err());
        assert!(parse_facet_arg("colour=red", &facets()).is_err());
    }

    #[test]
    fn test_no_facets_message() {
        let err = parse_facet_name("cluster", &[]).unwrap_err();
        assert_eq!(err.message, "this tab has no facets");
    }

    #[test]
    fn test_switch_and_toggle() {
        assert_eq!(parse_switch(None), Ok(true));
        assert_eq!(parse_switch(Some("off")), Ok(false));
        assert!(parse_switch(Some("maybe")).is_err());
        assert_eq!(parse_toggle("valid-set"), Ok(Toggle::ValidSet));
        assert!(parse_toggle("cheap").is_err());
    }

    #[test]
    fn test_tab_by_name_or_position() {
        let tabs = vec![
            Tab::Overview,
            Tab::Dataset("reporting".to_string()),
            Tab::About,
        ];
        assert_eq!(parse_tab("2", &tabs), Ok(Tab::Dataset("reporting".to_string())));
        assert_eq!(parse_tab("about", &tabs), Ok(Tab::About));
        assert!(parse_tab("4", &tabs).is_err());
        assert!(parse_tab("calculated", &tabs).is_err());
    }
}
