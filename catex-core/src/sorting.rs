use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Field, FieldValue, NormalizedRecord};
use crate::state::{SortDirection, SortSpec};

/// Sort records in place by the sort key and direction.
/// The sort is stable: records with equal keys keep their input order.
pub fn sort_records(records: &mut Vec<&NormalizedRecord>, sort: &SortSpec) {
    let field = Field::parse(&sort.key);

    let mut keyed: Vec<(SortKey, &NormalizedRecord)> = records
        .iter()
        .map(|record| (SortKey::new(&record.field(&field)), *record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = a.compare(b);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    *records = keyed.into_iter().map(|(_, record)| record).collect();
}

/// Precomputed comparison key for one field value
#[derive(Debug, Clone)]
struct SortKey {
    number: Option<f64>,
    text: String,
}

impl SortKey {
    fn new(value: &FieldValue) -> Self {
        match value {
            FieldValue::Number(n) => Self {
                number: Some(*n),
                text: normalize_for_sorting(&n.to_string()),
            },
            FieldValue::Text(s) => Self {
                number: None,
                text: normalize_for_sorting(s),
            },
        }
    }

    /// Numeric when both sides are numbers, natural text order otherwise
    fn compare(&self, other: &Self) -> Ordering {
        match (self.number, other.number) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => compare_natural(&self.text, &other.text),
        }
    }
}

/// Compare two field values the way the result table orders them
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    SortKey::new(a).compare(&SortKey::new(b))
}

/// Locale-style comparison ignoring case and accents.
/// With `numeric`, digit runs compare by value so "item9" sorts before "item10".
pub fn collate(a: &str, b: &str, numeric: bool) -> Ordering {
    let a_key = normalize_for_sorting(a);
    let b_key = normalize_for_sorting(b);
    if numeric {
        compare_natural(&a_key, &b_key)
    } else {
        a_key.cmp(&b_key)
    }
}

/// Normalize a string for comparison
/// - Unicode NFD decomposition with combining marks removed
/// - Lowercase
/// - Leading/trailing whitespace removed and internal runs collapsed
pub fn normalize_for_sorting(s: &str) -> String {
    let folded: String = s
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (idx, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(chunk(&s[start..idx], prev));
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(chunk(&s[start..], prev));
    }
    out
}

fn chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

fn compare_natural(a: &str, b: &str) -> Ordering {
    let a_chunks = chunks(a);
    let b_chunks = chunks(b);

    for (x, y) in a_chunks.iter().zip(b_chunks.iter()) {
        let ordering = match (x, y) {
            (Chunk::Digits(x), Chunk::Digits(y)) => compare_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            // digits sort ahead of letters
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a_chunks.len().cmp(&b_chunks.len())
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
