use anyhow::anyhow;
use colored::Colorize;
use sitewalk::commands::command_argument_builder;
use sitewalk::handlers::{handle_crawl, init_tracing};
use sitewalk_core::report::render_summary;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    init_tracing(&matches);

    let outcome = tokio::select! {
        result = handle_crawl(&matches) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(anyhow!("Crawling interrupted by user")),
    };

    match outcome {
        Ok(summary) => {
            if !quiet {
                eprintln!("{}", render_summary(&summary));
            }
        }
        Err(e) => {
            eprintln!("\n{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
