//! Output formatting for tslens results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::Serialize;
use std::path::Path;

use crate::analysis::{AnalysisReport, Construct, MatchRecord, Statistics};

// =============================================================================
// JSON Format
// =============================================================================

/// Serialize any result as pretty-printed JSON.
pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write a result to stdout as JSON.
pub fn write_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Path shown to the user: relative to the root when possible.
pub fn display_path<'a>(root: &Path, path: &'a str) -> std::borrow::Cow<'a, str> {
    match Path::new(path).strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().into_owned().into(),
        Err(_) => path.into(),
    }
}

/// Write a match report in human-readable format.
pub fn write_pretty_report(root: &Path, title: &str, report: &AnalysisReport) {
    println!();
    print!("  ");
    print!("{}", "tslens".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Root:   ".dimmed());
    println!("{}", root.display());
    print!("  {}", "Search: ".dimmed());
    println!("{}", title);
    println!();

    if report.is_empty() {
        println!("  {}", "No matches".yellow());
        println!();
        return;
    }

    for (path, records) in report.iter() {
        println!(
            "  {} {}",
            display_path(root, path).blue().bold(),
            format!("({})", records.len()).dimmed()
        );
        for record in records {
            write_record(record);
        }
        println!();
    }

    let total = report.total_matches();
    let plural = if total != 1 { "es" } else { "" };
    println!(
        "  {} match{} in {} file{}",
        total.to_string().green().bold(),
        plural,
        report.len(),
        if report.len() != 1 { "s" } else { "" }
    );
    println!();
}

fn write_record(record: &MatchRecord) {
    print!("    {:<10}", format!("{}:{}", record.line, record.column).dimmed());

    if let Some(capture) = &record.capture {
        print!("{} ", format!("@{}", capture).magenta());
    }
    if let Some(name) = &record.name {
        print!("{} ", name.bold());
    }

    println!("{}", first_line(&record.text));

    if let Some(arg) = &record.first_arg {
        println!("              {} {}", "first arg:".dimmed(), arg);
    }
    for (name, texts) in &record.captures {
        for text in texts {
            println!("              {} {}", format!("@{}", name).magenta(), first_line(text));
        }
    }
}

/// First line of a possibly multi-line snippet, marked when truncated.
fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    if lines.next().is_some() {
        format!("{} …", first)
    } else {
        first.to_string()
    }
}

/// Write statistics in human-readable format.
pub fn write_pretty_stats(root: &Path, stats: &Statistics, show_files: bool) {
    println!();
    print!("  ");
    print!("{}", "tslens".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Root: ".dimmed());
    println!("{}", root.display());
    println!();

    println!("  {}", "Files:".bold());
    println!("    {:<20} {:>8}", "total files", stats.total_files);
    println!("    {:<20} {:>8}", "total lines", stats.total_lines);
    println!("    {:<20} {:>8.1}", "avg lines per file", stats.avg_lines_per_file);
    println!();

    println!("  {}", "Constructs:".bold());
    for construct in Construct::ALL {
        println!(
            "    {:<20} {:>8}",
            construct.as_str(),
            stats.constructs.get(construct)
        );
    }
    println!();

    if show_files && !stats.file_sizes.is_empty() {
        println!("  {}", "Lines per file:".bold());
        let mut sizes: Vec<(&String, &usize)> = stats.file_sizes.iter().collect();
        sizes.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (path, lines) in sizes {
            println!("    {:>8}  {}", lines, display_path(root, path).blue());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_report() {
        let report = AnalysisReport::new();
        assert_eq!(render_json(&report).unwrap(), "{}");
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/work/app");
        assert_eq!(display_path(root, "/work/app/src/a.ts"), "src/a.ts");
        assert_eq!(display_path(root, "/elsewhere/b.ts"), "/elsewhere/b.ts");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("class A {\n}"), "class A { …");
        assert_eq!(first_line("foo(1)"), "foo(1)");
    }
}
