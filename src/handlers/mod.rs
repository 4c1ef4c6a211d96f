//! Interactive command loop.
//!
//! Each line is parsed into a `Command` and dispatched to a handler. Handlers
//! mutate the app state and answer with a `Reply` telling the loop whether
//! to redraw the view or print text.

pub mod file_handlers;
pub mod filter_handlers;
pub mod item_handlers;
pub mod ui_handlers;

use std::io::{self, BufRead, Write};

use crate::operations::ValidationError;
use crate::state::AppState;
use crate::ui::{format_status, render, StatusLevel};

pub use file_handlers::handle_reload;
pub use filter_handlers::{
    handle_clear, handle_facet, handle_min_flow, handle_only, handle_search, handle_unfacet,
};
pub use item_handlers::{handle_json, handle_select};
pub use ui_handlers::{
    handle_back, handle_dir, handle_forward, handle_link, handle_page, handle_size, handle_sort,
    handle_tab,
};

pub const HELP: &str = "\
Commands:
  search <text>            search (no text clears)
  facet <name>=<value>     check or uncheck a facet value
  unfacet <name> [value]   drop a facet value, or the whole facet
  clear                    clear search, facets, thresholds and selection
  min-flow <n>             only records with at least n data flows
  only <toggle> [on|off]   computable, ontology or valid-set
  sort <field>             sort by a field; repeat to flip direction
  dir asc|desc             set the sort direction
  page next|prev|<n>       move between pages
  size <n>                 rows per page
  select [id|row]          show a record's details (no argument clears)
  json                     print the selected record as JSON
  tab <name|n>             open a tab
  back / forward           move through the history
  link                     print the shareable link
  reload                   load the catalogue again
  help                     show this help
  quit                     leave";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Facet(String),
    Unfacet { name: String, value: Option<String> },
    Clear,
    MinFlow(String),
    Only { toggle: String, switch: Option<String> },
    Sort(String),
    Dir(String),
    Page(String),
    Size(String),
    Select(Option<String>),
    Json,
    Tab(String),
    Back,
    Forward,
    Link,
    Reload,
    Help,
    Quit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Redraw the view, then show a status line
    Render(String, StatusLevel),
    /// Print text without redrawing
    Print(String),
    Quit,
}

pub type HandlerResult = Result<Reply, ValidationError>;

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, ValidationError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let arg = || (!rest.is_empty()).then(|| rest.to_string());
    let required = |usage: &str| {
        arg().ok_or_else(|| ValidationError::new(name, format!("usage: {name} {usage}")))
    };
    let mut words = rest.split_whitespace().map(str::to_string);

    let command = match name.to_ascii_lowercase().as_str() {
        "search" | "s" | "/" => Command::Search(rest.to_string()),
        "facet" | "f" => Command::Facet(required("<name>=<value>")?),
        "unfacet" | "uf" => Command::Unfacet {
            name: words
                .next()
                .ok_or_else(|| ValidationError::new(name, "usage: unfacet <name> [value]"))?,
            value: words.next(),
        },
        "clear" => Command::Clear,
        "min-flow" | "minflow" => Command::MinFlow(required("<n>")?),
        "only" => Command::Only {
            toggle: words
                .next()
                .ok_or_else(|| ValidationError::new(name, "usage: only <toggle> [on|off]"))?,
            switch: words.next(),
        },
        "sort" => Command::Sort(required("<field>")?),
        "dir" => Command::Dir(required("asc|desc")?),
        "page" | "p" => Command::Page(required("next|prev|<n>")?),
        "next" | "n" => Command::Page("next".to_string()),
        "prev" => Command::Page("prev".to_string()),
        "size" => Command::Size(required("<n>")?),
        "select" | "sel" => Command::Select(arg()),
        "json" => Command::Json,
        "tab" | "t" => Command::Tab(required("<name|n>")?),
        "back" | "b" => Command::Back,
        "forward" | "fwd" => Command::Forward,
        "link" => Command::Link,
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(ValidationError::new(
                "command",
                format!("unknown command '{other}', try help"),
            ))
        }
    };
    Ok(Some(command))
}

pub fn dispatch(state: &mut AppState, command: Command) -> HandlerResult {
    tracing::debug!(?command, "dispatching");
    match command {
        Command::Search(text) => handle_search(state, &text),
        Command::Facet(arg) => handle_facet(state, &arg),
        Command::Unfacet { name, value } => handle_unfacet(state, &name, value.as_deref()),
        Command::Clear => handle_clear(state),
        Command::MinFlow(arg) => handle_min_flow(state, &arg),
        Command::Only { toggle, switch } => handle_only(state, &toggle, switch.as_deref()),
        Command::Sort(key) => handle_sort(state, &key),
        Command::Dir(arg) => handle_dir(state, &arg),
        Command::Page(arg) => handle_page(state, &arg),
        Command::Size(arg) => handle_size(state, &arg),
        Command::Select(arg) => handle_select(state, arg.as_deref()),
        Command::Json => handle_json(state),
        Command::Tab(arg) => handle_tab(state, &arg),
        Command::Back => handle_back(state),
        Command::Forward => handle_forward(state),
        Command::Link => handle_link(state),
        Command::Reload => handle_reload(state),
        Command::Help => Ok(Reply::Print(HELP.to_string())),
        Command::Quit => Ok(Reply::Quit),
    }
}

/// Read commands until `quit` or end of input, drawing to `out`
pub fn run_interactive<R, W>(state: &mut AppState, input: R, out: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{}", render(state))?;
    writeln!(out, "{}", format_status("Type help for commands", StatusLevel::Info))?;
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        let reply = match parse_command(&line) {
            Ok(Some(command)) => dispatch(state, command),
            Ok(None) => {
                prompt(out)?;
                continue;
            }
            Err(e) => Err(e),
        };

        match reply {
            Ok(Reply::Render(status, level)) => {
                write!(out, "{}", render(state))?;
                writeln!(out, "{}", format_status(&status, level))?;
            }
            Ok(Reply::Print(text)) => writeln!(out, "{text}")?,
            Ok(Reply::Quit) => return Ok(()),
            Err(e) => writeln!(out, "{}", format_status(&e.to_string(), StatusLevel::Error))?,
        }
        prompt(out)?;
    }
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}
