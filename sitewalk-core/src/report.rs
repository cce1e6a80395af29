// Rendering of crawl results for the terminal or a file

use crate::crawl::CrawlSummary;
use colored::*;
use serde::{Deserialize, Serialize};
use sitewalk_scanner::CrawlResult;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" | "jsonl" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Render one result. Text output ends with a newline; JSON output is a single line.
pub fn render_result(result: &CrawlResult, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(result)),
        ReportFormat::Json => {
            let mut line = serde_json::to_string(result)?;
            line.push('\n');
            Ok(line)
        }
    }
}

fn render_text(result: &CrawlResult) -> String {
    let mut out = String::new();

    if let Some(ref error) = result.error {
        let line = format!("Error crawling {}: {}", result.url, error);
        let _ = writeln!(out, "{}", line.yellow());
    }

    if result.is_start_page() {
        let _ = writeln!(out, "\nStarted at {}:", result.url);
    } else {
        let _ = writeln!(out, "\nURLs for {}:", result.url);
    }

    if result.found_urls.is_empty() {
        out.push_str("  (no links found)\n");
    } else {
        for url in &result.found_urls {
            let _ = writeln!(out, "  - {}", url);
        }
    }

    out
}

pub fn render_summary(summary: &CrawlSummary) -> String {
    let status = if summary.errors == 0 {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };

    format!(
        "\n{} Crawl complete: {} page(s) visited, {} with errors, {} link(s) found in {:.2}s",
        status,
        summary.pages,
        summary.errors,
        summary.links_found,
        summary.elapsed.as_secs_f64()
    )
}
