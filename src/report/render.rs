use crate::report::Report;
use std::fmt::Write as _;
use std::path::Path;

/// Renders a report for the terminal
///
/// # Example
///
/// ```
/// use prospector::report::{render_text, Report, Source};
///
/// let report = Report {
///     summary: "Acme sells anvils.".to_string(),
///     key_points: vec!["Founded 1949".to_string()],
///     recommendations: vec![],
///     sources: vec![Source {
///         url: "https://acme.example/".to_string(),
///         method: "crawl".to_string(),
///         relevance: "Company site".to_string(),
///     }],
/// };
/// let text = render_text(&report);
/// assert!(text.contains("- https://acme.example/ (crawl)"));
/// ```
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nReport:");
    let _ = writeln!(out, "=======");
    let _ = writeln!(out, "\nSummary:\n{}", report.summary);

    let _ = writeln!(out, "\nKey Points:");
    for point in &report.key_points {
        let _ = writeln!(out, "- {}", point);
    }

    let _ = writeln!(out, "\nRecommendations:");
    for rec in &report.recommendations {
        let _ = writeln!(out, "- {}", rec);
    }

    let _ = writeln!(out, "\nSources:");
    for source in &report.sources {
        let _ = writeln!(out, "- {} ({})", source.url, source.method);
    }

    out
}

/// Renders a report as a markdown document
///
/// # Arguments
///
/// * `report` - The report to render
/// * `target_url` - The site the report is about
/// * `generated_at` - Timestamp shown in the header
pub fn render_markdown(
    report: &Report,
    target_url: &str,
    generated_at: chrono::DateTime<chrono::Utc>,
) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Research Report: {}\n", target_url);
    let _ = writeln!(
        md,
        "**Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let _ = writeln!(md, "## Summary\n");
    let _ = writeln!(md, "{}\n", report.summary);

    let _ = writeln!(md, "## Key Points\n");
    for point in &report.key_points {
        let _ = writeln!(md, "- {}", point);
    }
    md.push('\n');

    let _ = writeln!(md, "## Recommendations\n");
    for rec in &report.recommendations {
        let _ = writeln!(md, "- {}", rec);
    }
    md.push('\n');

    let _ = writeln!(md, "## Sources\n");
    let _ = writeln!(md, "| URL | Method | Relevance |");
    let _ = writeln!(md, "|-----|--------|-----------|");
    for source in &report.sources {
        let _ = writeln!(
            md,
            "| {} | {} | {} |",
            escape_cell(&source.url),
            escape_cell(&source.method),
            escape_cell(&source.relevance)
        );
    }

    md
}

/// Writes the markdown rendering of a report to a file
pub fn write_markdown(report: &Report, target_url: &str, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render_markdown(report, target_url, chrono::Utc::now()))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
