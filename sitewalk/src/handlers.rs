use anyhow::{Context, Result};
use clap::ArgMatches;
use sitewalk_core::crawl::{CrawlOptions, CrawlSummary, execute_crawl};
use sitewalk_core::report::{ReportFormat, render_result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::Level;

/// Map `-q` / `-v` onto a log level. Logs always go to stderr.
pub fn log_level_from_matches(matches: &ArgMatches) -> Level {
    if matches.get_flag("quiet") {
        return Level::ERROR;
    }

    match matches.get_count("verbose") {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

pub fn init_tracing(matches: &ArgMatches) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level_from_matches(matches))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn crawl_options_from_matches(matches: &ArgMatches) -> CrawlOptions {
    let url = matches
        .get_one::<String>("BASE_URL")
        .cloned()
        .unwrap_or_default();
    let mut options = CrawlOptions::new(url);

    if let Some(&max_concurrency) = matches.get_one::<usize>("max-concurrency") {
        options.max_concurrency = max_concurrency;
    }
    if let Some(&max_pages_depth) = matches.get_one::<usize>("max-pages-depth") {
        options.max_pages_depth = max_pages_depth;
    }
    if let Some(&timeout_secs) = matches.get_one::<u64>("timeout") {
        options.timeout_secs = timeout_secs;
    }

    options.user_agent = matches.get_one::<String>("user-agent").cloned();
    options.show_progress_bars = !matches.get_flag("quiet");
    options
}

pub fn report_format_from_matches(matches: &ArgMatches) -> ReportFormat {
    matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or_default()
}

/// Opens the destination for crawl results: the given file, or stdout.
pub fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Runs a crawl as described by the command line, writing each result as it arrives.
pub async fn handle_crawl(matches: &ArgMatches) -> Result<CrawlSummary> {
    let options = crawl_options_from_matches(matches);
    let format = report_format_from_matches(matches);

    // Reject bad settings before touching the output file
    let config = options.to_config().map_err(|e| {
        let is_config_error = e.is_config_error();
        let error = anyhow::Error::new(e);
        if is_config_error {
            error.context("Configuration error")
        } else {
            error
        }
    })?;

    let output_path = matches.get_one::<PathBuf>("output");
    if output_path.is_some() {
        colored::control::set_override(false);
    }
    let mut output = open_output(output_path)?;

    let summary = execute_crawl(config, options.show_progress_bars, |result| {
        let rendered = render_result(result, format)?;
        output.write_all(rendered.as_bytes())?;
        output.flush()
    })
    .await?;

    Ok(summary)
}
