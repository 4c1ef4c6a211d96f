use catex_core::*;
use serde_json::json;

fn catalogue_json() -> String {
    json!({
        "metadata": {
            "document_title": "BMRS Data Catalogue",
            "version": "3.0",
            "status": "LIVE",
            "effective_from_date": "2025-02-01T00:00:00Z",
            "statistics": {"total_data_items": 6, "total_reporting_items": 4}
        },
        "reporting_items": [
            {
                "bmrs_code": "B1610",
                "data_description": "Actual generation output per unit",
                "table": "B16",
                "smart_classification": {
                    "semantic_type": "measurement",
                    "data_provider": "NESO",
                    "is_computable": "true",
                    "data_flow_count": 3
                }
            },
            {
                "bmrs_code": "B0620",
                "data_description": "Day-ahead total load forecast",
                "table": "B06",
                "smart_classification": {"semantic_type": "temporal", "data_provider": "NESO"}
            },
            {
                "bmrs_code": "B1770",
                "data_description": "Imbalance prices",
                "table": "B17",
                "smart_classification": {"semantic_type": "financial", "is_computable": 1}
            },
            {
                "bmrs_code": "B0010",
                "data_description": "Party identifier",
                "table": "B00",
                "smart_classification": {"semantic_type": "identifier"}
            }
        ],
        "calculated_data_items": [
            {"calculation_code": "C10", "item_name": "System buy price"},
            {"calculation_code": "C9", "item_name": "Settlement period"}
        ],
        "functional_requirements": {
            "validation": [{"title": "Reject negative volumes"}]
        }
    })
    .to_string()
}

fn explorer() -> Explorer {
    let source = MemorySource::new()
        .with_status("data/bmrs_data_catalogue.json", 404)
        .with_document("./docs/data/bmrs_data_catalogue.json", catalogue_json());
    let mut explorer = Explorer::new(ExplorerConfig::default());
    assert_eq!(explorer.load_from(&source), LoadOutcome::Applied);
    explorer
}

#[test]
fn loads_from_the_second_candidate() {
    let explorer = explorer();
    let catalogue = explorer.catalogue().unwrap();
    assert_eq!(catalogue.location, "./docs/data/bmrs_data_catalogue.json");
    assert_eq!(catalogue.record_count(), 7);
    assert_eq!(
        catalogue.meta.summary_line(),
        "BMRS Data Catalogue · v3.0 · LIVE · effective 2025-02-01T00:00:00Z · 6 items"
    );
}

#[test]
fn overview_reports_statistics_and_charts() {
    let explorer = explorer();
    let View::Overview { overview, .. } = explorer.view() else {
        panic!("expected the overview");
    };
    assert_eq!(overview.status.level, StatusLevel::Good);
    assert_eq!(overview.kpis[0].value, "4");
    assert!(overview
        .details
        .iter()
        .any(|(label, value)| label == "Effective from" && value == "2025-02-01"));
    assert!(overview.charts.iter().any(|c| c.title == "Reporting items by provider"));
}

#[test]
fn deep_link_filters_sorts_and_selects() {
    let mut explorer = explorer();
    explorer.navigate("#/reporting?data_provider=NESO&sort=__flow&dir=desc&sel=B0620");

    let View::Dataset(view) = explorer.view() else {
        panic!("expected the reporting table");
    };
    let ids: Vec<_> = view.result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["B1610", "B0620"]);
    assert_eq!(view.result.kpis.computable, 1);
    assert_eq!(view.selected.map(|r| r.name.as_str()), Some("Day-ahead total load forecast"));

    let provider = view.facets.iter().find(|f| f.key == "data_provider").unwrap();
    assert_eq!(provider.counts[0], FacetCount { value: "NESO".to_string(), count: 2 });
    assert_eq!(provider.selected, ["NESO"]);
}

#[test]
fn ui_mutations_round_trip_through_the_fragment() {
    let mut explorer = explorer();
    explorer.switch_tab(Tab::Dataset("reporting".to_string()));

    let state = explorer.state_mut();
    state.set_search("b1");
    state.toggle_facet_value("cluster", "Measurement");
    state.toggle_facet_value("cluster", "Financial");
    state.toggle_sort("_table");
    state.set_toggle(Toggle::Computable, true);
    state.set_page_size(50);
    state.select(Some("B1770"));

    let fragment = explorer.fragment();
    assert_eq!(
        fragment,
        "#/reporting?q=b1&sort=_table&ps=50&sel=B1770&onlyComputable=1&cluster=Financial,Measurement"
    );

    let before = explorer.state().clone();
    explorer.navigate(&fragment);
    assert_eq!(explorer.state(), &before);

    let View::Dataset(view) = explorer.view() else {
        panic!("expected the reporting table");
    };
    let ids: Vec<_> = view.result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["B1610", "B1770"]);
}

#[test]
fn calculated_codes_sort_naturally() {
    let mut explorer = explorer();
    explorer.navigate("#/calculated");
    let View::Dataset(view) = explorer.view() else {
        panic!("expected the calculated table");
    };
    let ids: Vec<_> = view.result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["C9", "C10"]);
}

#[test]
fn hand_edited_links_degrade_quietly() {
    let mut explorer = explorer();
    explorer.navigate("#/reporting?page=banana&ps=0&sort=&nope=1&table=B99");
    let state = explorer.state();
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, 25);
    assert_eq!(state.sort.key, "bmrs_code");

    let View::Dataset(view) = explorer.view() else {
        panic!("expected the reporting table");
    };
    assert_eq!(view.result.total, 0);
    assert_eq!(view.result.pages, 1);
}

#[test]
fn failed_load_reports_the_last_candidate() {
    let source = MemorySource::new()
        .with_document("data/bmrs_data_catalogue.json", "{broken")
        .with_status("./docs/data/bmrs_data_catalogue.json", 503);
    let mut explorer = Explorer::new(ExplorerConfig::default());
    assert_eq!(explorer.load_from(&source), LoadOutcome::Failed);
    let View::Failed { error } = explorer.view() else {
        panic!("expected the error panel");
    };
    assert!(matches!(error, CatalogueError::Status { status: 503, .. }));
}
