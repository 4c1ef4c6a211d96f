mod errors;
mod handlers;
mod logging;
mod operations;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use catex_core::{load_config, ExplorerConfig, FileSource, LoadOutcome, UrlGrammar};

use crate::errors::map_load_error;
use crate::logging::{init_logging, LogConfig};
use crate::operations::{
    parse_direction, parse_facet_arg, parse_page_size, FileOperations, ValidationError,
};
use crate::state::AppState;
use crate::ui::{page_report, set_status, show_error, update_ui_from_state, StatusLevel};

/// Data Catalogue Explorer - Search, filter and page through a JSON data catalogue
///
/// Examples:
///   # Overview of the catalogue found at the default locations
///   catex
///
///   # Open a shared link
///   catex --fragment '#/reporting?q=price&data_provider=NESO&sort=__flow&dir=desc'
///
///   # Filter from flags (OR within a facet, AND between facets)
///   catex --fragment '#/reporting' --facet table=B16 --facet table=B17 --search price
///
///   # Browse interactively from a specific file
///   catex --data ./docs/data/bmrs_data_catalogue.json --interactive
///
///   # Current page as JSON for scripting
///   catex --fragment '#/calculated?q=price' --json
///
///   # Check the document against a JSON Schema
///   catex --schema catalogue.schema.json
#[derive(Parser, Debug)]
#[command(name = "catex")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Filtering Logic:\n  \
    - Search matches the query text as a case-insensitive substring of any searchable field\n  \
    - Multiple values of the SAME facet are combined with OR\n  \
    - Different facets, thresholds and toggles are combined with AND\n\n\
Fragments:\n  \
    - tabbed: #/<tab>?q=..&sort=..&dir=..&page=..&ps=..&sel=..&<facet>=a,b\n  \
    - flat:   #q=..&sortKey=..&sortDir=..&page=..&pageSize=..&selected=..\n  \
    - Unknown or malformed parameters fall back to defaults\n\n\
Logging:\n  \
    - -v info, -vv debug, -vvv trace; RUST_LOG overrides")]
struct Cli {
    /// Explorer configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalogue location to try, in order (can be specified multiple times)
    #[arg(short, long = "data", value_name = "FILE")]
    data: Vec<String>,

    /// Directory that relative catalogue locations resolve against
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// URL fragment grammar
    #[arg(long, value_enum)]
    grammar: Option<Grammar>,

    /// Start from this URL fragment (e.g. "#/reporting?q=price")
    #[arg(short, long, value_name = "FRAGMENT")]
    fragment: Option<String>,

    /// Search text, applied after the fragment
    #[arg(short = 'q', long, value_name = "TEXT")]
    search: Option<String>,

    /// Facet filter (format: name=value, can be specified multiple times)
    #[arg(long = "facet", value_name = "NAME=VALUE")]
    facets: Vec<String>,

    /// Sort by a field (e.g. "bmrs_code", "__flow", "smart_classification.data_provider")
    #[arg(short, long = "sort", value_name = "FIELD")]
    sort_by: Option<String>,

    /// Sort direction
    #[arg(long, value_name = "asc|desc")]
    dir: Option<String>,

    /// Page to show
    #[arg(short, long, value_name = "N")]
    page: Option<usize>,

    /// Rows per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Show this record's details
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Print the current page as JSON instead of the table
    #[arg(long, conflicts_with = "interactive")]
    json: bool,

    /// Read commands from stdin after the first render
    #[arg(short, long)]
    interactive: bool,

    /// Validate the loaded catalogue against a JSON Schema file
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Grammar {
    Tabbed,
    Flat,
}

impl From<Grammar> for UrlGrammar {
    fn from(grammar: Grammar) -> Self {
        match grammar {
            Grammar::Tabbed => UrlGrammar::Tabbed,
            Grammar::Flat => UrlGrammar::Flat,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_ansi(io::stderr().is_terminal()));

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            set_status(&format!("{err:#}"), StatusLevel::Error);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = match build_config(cli) {
        Ok(config) => config,
        Err(err) => {
            let (title, message, details) = map_load_error(&err);
            show_error(&title, &message, &details);
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(?config, "configuration ready");

    let source = cli
        .root
        .as_ref()
        .map(FileSource::with_root)
        .unwrap_or_default();
    let mut app = AppState::new(config, source);

    let outcome = FileOperations::new(&mut app).load();
    if let Some(schema) = &cli.schema {
        if let Err(err) = report_schema(&mut app, schema) {
            set_status(&format!("Schema check skipped: {err:#}"), StatusLevel::Warning);
        }
    }

    if let Some(fragment) = &cli.fragment {
        app.navigate(fragment);
    }
    apply_overrides(cli, &mut app)?;

    if cli.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        handlers::run_interactive(&mut app, stdin.lock(), &mut stdout)
            .context("interactive session failed")?;
        return Ok(ExitCode::SUCCESS);
    }

    if cli.json && outcome != LoadOutcome::Failed {
        match page_report(&app) {
            Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            None => set_status("--json needs a dataset tab in the fragment", StatusLevel::Warning),
        }
    } else {
        update_ui_from_state(&app);
    }
    Ok(if outcome == LoadOutcome::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Config file (or defaults) with command-line overrides applied
fn build_config(cli: &Cli) -> Result<ExplorerConfig, catex_core::CatalogueError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ExplorerConfig::default(),
    };
    if !cli.data.is_empty() {
        config.data_paths = cli.data.clone();
    }
    if let Some(grammar) = cli.grammar {
        config.grammar = grammar.into();
    }
    Ok(config)
}

fn report_schema(app: &mut AppState, schema: &std::path::Path) -> Result<()> {
    let violations = FileOperations::new(app).check_schema(schema)?;
    if violations.is_empty() {
        if app.explorer.catalogue().is_some() {
            set_status("Catalogue matches the schema", StatusLevel::Success);
        }
        return Ok(());
    }

    set_status(
        &format!("{} schema violation(s):", violations.len()),
        StatusLevel::Warning,
    );
    for (i, violation) in violations.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, violation);
    }
    Ok(())
}

/// Flags that refine the state decoded from `--fragment`
fn apply_overrides(cli: &Cli, app: &mut AppState) -> Result<(), ValidationError> {
    let facets: Vec<(String, String)> = cli
        .facets
        .iter()
        .map(|arg| parse_facet_arg(arg, &app.explorer.active_facets()))
        .collect::<Result<_, _>>()?;
    let direction = cli.dir.as_deref().map(parse_direction).transpose()?;
    let page_size = cli
        .page_size
        .map(|size| parse_page_size(&size.to_string(), &app.explorer.config().page_sizes))
        .transpose()?;

    app.update(|s| {
        if let Some(text) = &cli.search {
            s.set_search(text);
        }
        for (key, value) in &facets {
            if !s.is_facet_selected(key, value) {
                s.toggle_facet_value(key, value);
            }
        }
        if let Some(key) = &cli.sort_by {
            s.set_sort(key);
        }
        if let Some(direction) = direction {
            s.set_direction(direction);
        }
        if let Some(size) = page_size {
            s.set_page_size(size);
        }
        if let Some(id) = &cli.select {
            s.select(Some(id.as_str()));
        }
        if let Some(page) = cli.page {
            s.set_page(page);
        }
    });
    Ok(())
}
