//! Terminal presentation of a search session.
//!
//! Renders the request state (spinner while pending, error banner on
//! failure, results table on success) and the credential badge.

use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::lifecycle::{RequestState, SearchState};
use crate::models::{Credential, MaterialRecord, QueryMode};

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table on a TTY, JSON otherwise
    Auto,
    Table,
    Json,
    Plain,
}

impl OutputFormat {
    /// Resolve `Auto` against the current stdout
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Search => "🔍",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg.red()),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Search => eprintln!("{} {}", icon.yellow(), msg),
    }
}

/// Credential badge, "Connected" or "Not Connected"
pub fn credential_badge(credential: &Credential) -> String {
    let label = credential.status_label();
    if credential.is_set() {
        format!("{}", label.green().bold())
    } else {
        format!("{}", label.dimmed())
    }
}

/// Header line above the results
pub fn found_message(count: usize) -> String {
    let noun = if count == 1 { "material" } else { "materials" };
    format!("Found {} {} matching your search", count, noun)
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// List the query modes with their input examples
pub fn print_modes() {
    print_section("Search modes");
    for mode in QueryMode::ALL {
        println!(
            "  {:<12} {:<18} {}",
            mode.id().cyan(),
            mode.label(),
            mode.placeholder().dimmed()
        );
    }
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width <= 3 {
        return "...".to_string();
    }

    let total_width: usize = text
        .chars()
        .map(|c| unicode_width::UnicodeWidthChar::width(c).unwrap_or(1))
        .sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let mut current_width = 0;
    let truncated: String = text
        .chars()
        .take_while(|c| {
            current_width += unicode_width::UnicodeWidthChar::width(*c).unwrap_or(1);
            current_width <= max_width - 3
        })
        .collect();
    format!("{}...", truncated)
}

/// Build the results table
pub fn results_table(results: &[MaterialRecord]) -> comfy_table::Table {
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec![
        "Material ID",
        "Formula",
        "Space Group",
        "Energy (eV/atom)",
        "Band Gap (eV)",
    ]);

    for material in results {
        table.add_row(vec![
            Cell::new(&material.id),
            Cell::new(truncate_with_ellipsis(&material.formula, 30)).add_attribute(Attribute::Bold),
            Cell::new(&material.space_group),
            Cell::new(material.energy_per_atom),
            Cell::new(material.band_gap),
        ]);
    }
    table
}

/// Plain-text rendering, one material per line
pub fn results_plain(results: &[MaterialRecord]) -> String {
    results
        .iter()
        .map(|m| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                m.id, m.formula, m.space_group, m.energy_per_atom, m.band_gap
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a result set in the requested format
pub fn print_results(results: &[MaterialRecord], format: OutputFormat) -> serde_json::Result<()> {
    match format.resolve() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(results)?),
        OutputFormat::Plain => {
            if !results.is_empty() {
                println!("{}", results_plain(results));
            }
        }
        _ => {
            println!("{}", found_message(results.len()).bold());
            if !results.is_empty() {
                println!("{}", results_table(results));
            }
        }
    }
    Ok(())
}

/// Print whatever the current state calls for
pub fn render_state(state: &SearchState, format: OutputFormat) -> serde_json::Result<()> {
    if let Some(message) = state.error_message() {
        print_status(Status::Error, &message);
    }

    match &state.request {
        RequestState::Idle | RequestState::Failed { .. } => {}
        RequestState::Pending { stale, .. } => {
            print_status(Status::Search, "Searching...");
            if let Some(results) = stale {
                print_results(results, format)?;
            }
        }
        RequestState::Success { results } => print_results(results, format)?,
    }
    Ok(())
}

/// Loading spinner shown while a request is pending.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for non-interactive output.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Spinner that only draws for interactive table output.
    pub fn for_output(msg: &str, format: OutputFormat) -> Self {
        if format.resolve() == OutputFormat::Table && is_terminal() {
            Self::new(msg)
        } else {
            Self::hidden()
        }
    }

    /// Whether the spinner draws anything.
    pub fn is_hidden(&self) -> bool {
        self.pb.is_hidden()
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silicon() -> MaterialRecord {
        MaterialRecord {
            id: "mp-149".to_string(),
            formula: "Si".to_string(),
            space_group: "Fd-3m".to_string(),
            energy_per_atom: -5.425,
            band_gap: 1.155,
        }
    }

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_found_message() {
        assert_eq!(found_message(2), "Found 2 materials matching your search");
        assert_eq!(found_message(1), "Found 1 material matching your search");
        assert_eq!(found_message(0), "Found 0 materials matching your search");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("GaAs", 10), "GaAs");
        assert_eq!(truncate_with_ellipsis("LiFePO4LiFePO4", 8), "LiFeP...");
        assert_eq!(truncate_with_ellipsis("", 10), "");
        assert_eq!(truncate_with_ellipsis("Si", 3), "...");
    }

    #[test]
    fn test_results_table_contains_values() {
        let rendered = results_table(&[silicon()]).to_string();
        assert!(rendered.contains("Material ID"));
        assert!(rendered.contains("mp-149"));
        assert!(rendered.contains("Fd-3m"));
        assert!(rendered.contains("-5.425"));
        assert!(rendered.contains("1.155"));
    }

    #[test]
    fn test_results_plain() {
        assert_eq!(results_plain(&[silicon()]), "mp-149\tSi\tFd-3m\t-5.425\t1.155");
        assert_eq!(results_plain(&[]), "");
    }

    #[test]
    fn test_explicit_format_is_kept() {
        assert_eq!(OutputFormat::Json.resolve(), OutputFormat::Json);
        assert_eq!(OutputFormat::Plain.resolve(), OutputFormat::Plain);
        assert_ne!(OutputFormat::Auto.resolve(), OutputFormat::Auto);
    }

    #[test]
    fn test_spinner_hidden_for_machine_output() {
        assert!(Spinner::for_output("Searching...", OutputFormat::Json).is_hidden());
        assert!(Spinner::for_output("Searching...", OutputFormat::Plain).is_hidden());
        assert!(Spinner::hidden().is_hidden());
    }

    #[test]
    fn test_credential_badge_text() {
        assert!(credential_badge(&Credential::new("abc")).contains("Connected"));
        assert!(credential_badge(&Credential::empty()).contains("Not Connected"));
    }
}
