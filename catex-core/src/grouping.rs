use serde::Serialize;

use crate::models::{Field, NormalizedRecord};
use crate::value::first_truthy_text;

/// Group records by a field, keeping groups in first-seen order.
/// Records with an empty value go to an empty-named group.
pub fn group_by_field<'a, I>(records: I, field: &Field) -> Vec<(String, Vec<&'a NormalizedRecord>)>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let mut groups: Vec<(String, Vec<&'a NormalizedRecord>)> = Vec::new();

    for record in records {
        let key = record.field_text(field);
        match groups.iter_mut().find(|(name, _)| *name == key) {
            Some((_, members)) => members.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    groups
}

/// One requirement card
#[derive(Debug, Clone, Serialize)]
pub struct RequirementEntry<'a> {
    pub title: String,
    /// Section reference, empty when the record has none
    pub reference: String,
    pub record: &'a NormalizedRecord,
}

/// A requirement category with its matching entries
#[derive(Debug, Clone, Serialize)]
pub struct RequirementGroup<'a> {
    pub category: String,
    /// Category with underscores shown as spaces
    pub label: String,
    /// Records in the category before filtering
    pub total: usize,
    pub entries: Vec<RequirementEntry<'a>>,
}

/// Group requirement records by category in catalogue order.
/// `all` decides which categories exist and their totals; `matching` decides
/// which entries are shown.
pub fn group_requirements<'a>(
    all: &'a [NormalizedRecord],
    matching: &[&'a NormalizedRecord],
) -> Vec<RequirementGroup<'a>> {
    group_by_field(all, &Field::Category)
        .into_iter()
        .map(|(category, members)| {
            let entries = matching
                .iter()
                .copied()
                .filter(|record| record.category == category)
                .enumerate()
                .map(|(idx, record)| RequirementEntry {
                    title: requirement_title(record, idx),
                    reference: first_truthy_text(&record.raw, &["bsc_section_reference", "section"]),
                    record,
                })
                .collect();

            RequirementGroup {
                label: category.replace('_', " "),
                total: members.len(),
                category,
                entries,
            }
        })
        .collect()
}

fn requirement_title(record: &NormalizedRecord, idx: usize) -> String {
    let title = first_truthy_text(&record.raw, &["title", "requirement"]);
    if title.is_empty() {
        format!("Requirement {}", idx + 1)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Adapter;
    use crate::normalize::normalize;
    use serde_json::json;

    fn requirements() -> Vec<NormalizedRecord> {
        let payload = json!({
            "functional_requirements": {
                "data_validation": [
                    {"title": "Check ranges", "bsc_section_reference": "S-1"},
                    {"requirement": "Reject late data", "section": "S-2"},
                    {"notes": "untitled"}
                ],
                "publishing": [{"title": "Publish daily"}]
            }
        });
        normalize(&Adapter::Requirements, &payload)
    }

    #[test]
    fn test_groups_keep_catalogue_order_and_totals() {
        let all = requirements();
        let matching: Vec<_> = all.iter().collect();
        let groups = group_requirements(&all, &matching);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "data_validation");
        assert_eq!(groups[0].label, "data validation");
        assert_eq!(groups[0].total, 3);
        assert_eq!(groups[1].category, "publishing");
    }

    #[test]
    fn test_entry_title_and_reference_fallbacks() {
        let all = requirements();
        let matching: Vec<_> = all.iter().collect();
        let groups = group_requirements(&all, &matching);
        let entries = &groups[0].entries;

        assert_eq!(entries[0].title, "Check ranges");
        assert_eq!(entries[0].reference, "S-1");
        assert_eq!(entries[1].title, "Reject late data");
        assert_eq!(entries[1].reference, "S-2");
        assert_eq!(entries[2].title, "Requirement 3");
        assert_eq!(entries[2].reference, "");
    }

    #[test]
    fn test_filtered_groups_keep_totals() {
        let all = requirements();
        let matching: Vec<_> = all.iter().filter(|r| r.haystack.contains("publish")).collect();
        let groups = group_requirements(&all, &matching);

        assert_eq!(groups.len(), 2);
        assert!(groups[0].entries.is_empty());
        assert_eq!(groups[0].total, 3);
        assert_eq!(groups[1].entries.len(), 1);
    }

    #[test]
    fn test_group_by_field_first_seen_order() {
        let all = requirements();
        let groups = group_by_field(&all, &Field::Cluster);
        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, all.len());
    }
}
