use serde_json::{Map, Value};

/// Name of the nested classification sub-object some catalogue variants carry
pub const CLASSIFICATION_KEY: &str = "smart_classification";

/// Stringify a JSON value the way it reads in a table cell.
/// Null becomes empty, scalars print plainly, arrays and objects as compact JSON.
pub fn stable_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Permissive boolean coercion: `true`, `"true"`, `1` and `"1"` are true,
/// everything else is false.
pub fn boolish(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => boolish_text(s),
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

/// Boolean coercion for text (URL parameters)
pub fn boolish_text(text: &str) -> bool {
    text == "true" || text == "1"
}

/// Loose truthiness: non-empty strings, non-zero numbers, `true`,
/// and any array or object count as present.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a JSON value to a non-negative integer, 0 when unparsable.
pub fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .unwrap_or_else(|| n.as_f64().map_or(0, float_to_count)),
        Value::String(s) => parse_count(s),
        _ => 0,
    }
}

/// Parse text as a non-negative integer, 0 when unparsable.
pub fn parse_count(text: &str) -> u64 {
    text.trim().parse::<f64>().map_or(0, float_to_count)
}

fn float_to_count(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

/// Resolve a key or dotted path (`smart_classification.data_provider`) in a record.
/// An exact key match wins over path traversal.
pub fn lookup<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = record.get(path) {
        return Some(value);
    }

    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

/// First candidate whose value is present and not null
pub fn first_present<'a>(record: &'a Map<String, Value>, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| lookup(record, path))
        .find(|value| !value.is_null())
}

/// First candidate whose value is truthy, stringified; empty when none matches.
pub fn first_truthy_text(record: &Map<String, Value>, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| lookup(record, path))
        .find(|value| truthy(value))
        .map(stable_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_boolish_accepts_only_true_spellings() {
        for value in [json!(true), json!("true"), json!(1), json!("1"), json!(1.0)] {
            assert!(boolish(&value), "{value} should be true");
        }
        for value in [
            json!(false),
            json!("false"),
            json!(0),
            json!("0"),
            json!(null),
            json!("TRUE"),
            json!(2),
            json!([]),
        ] {
            assert!(!boolish(&value), "{value} should be false");
        }
    }

    #[test]
    fn test_coerce_count_never_negative() {
        assert_eq!(coerce_count(&json!(7)), 7);
        assert_eq!(coerce_count(&json!("12")), 12);
        assert_eq!(coerce_count(&json!(" 3.9 ")), 3);
        assert_eq!(coerce_count(&json!(-4)), 0);
        assert_eq!(coerce_count(&json!("abc")), 0);
        assert_eq!(coerce_count(&json!("NaN")), 0);
        assert_eq!(coerce_count(&json!(null)), 0);
        assert_eq!(coerce_count(&json!({"n": 1})), 0);
    }

    #[test]
    fn test_stable_string() {
        assert_eq!(stable_string(&json!(null)), "");
        assert_eq!(stable_string(&json!("x")), "x");
        assert_eq!(stable_string(&json!(42)), "42");
        assert_eq!(stable_string(&json!(false)), "false");
        assert_eq!(stable_string(&json!(["a", 1])), r#"["a",1]"#);
    }

    #[test]
    fn test_lookup_nested_path() {
        let rec = record(json!({
            "smart_classification": {"data_provider": "NETSO"},
            "a.b": "literal"
        }));
        assert_eq!(
            lookup(&rec, "smart_classification.data_provider"),
            Some(&json!("NETSO"))
        );
        assert_eq!(lookup(&rec, "a.b"), Some(&json!("literal")));
        assert_eq!(lookup(&rec, "smart_classification.missing"), None);
    }

    #[test]
    fn test_first_present_skips_null_only() {
        let rec = record(json!({"a": null, "b": "", "c": "x"}));
        assert_eq!(first_present(&rec, &["a", "b", "c"]), Some(&json!("")));
    }

    #[test]
    fn test_first_truthy_text_skips_empty() {
        let rec = record(json!({"a": "", "b": 0, "c": "x"}));
        assert_eq!(first_truthy_text(&rec, &["a", "b", "c"]), "x");
        assert_eq!(first_truthy_text(&rec, &["missing"]), "");
    }
}
