use colored::Colorize;

/// Semantic level of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Format a one-line status message with its level
pub fn format_status(text: &str, level: StatusLevel) -> String {
    let marker = match level {
        StatusLevel::Info => "•".blue(),
        StatusLevel::Success => "✓".green(),
        StatusLevel::Warning => "!".yellow(),
        StatusLevel::Error => "✗".red(),
    };
    format!("{marker} {text}")
}

/// Print a status message to stderr
pub fn set_status(text: &str, level: StatusLevel) {
    eprintln!("{}", format_status(text, level));
}

/// Format the error panel shown in place of the catalogue
pub fn format_error(title: &str, message: &str, details: &str) -> String {
    let mut panel = format!("{}\n{}\n", title.red().bold(), message);
    if !details.is_empty() {
        panel.push('\n');
        for line in details.lines() {
            panel.push_str(&format!("  {}\n", line.dimmed()));
        }
    }
    panel
}

/// Print the error panel to stderr
pub fn show_error(title: &str, message: &str, details: &str) {
    eprint!("{}", format_error(title, message, details));
}
