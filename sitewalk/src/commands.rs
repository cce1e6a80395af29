use clap::{ArgAction, arg};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitewalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitewalk")
        .about("Crawls a website and lists the same-origin pages linked from each page")
        .styles(CLAP_STYLING)
        .arg(arg!(<BASE_URL> "The http(s) URL to start crawling from"))
        .arg(
            arg!(--"max-concurrency" <N>)
                .required(false)
                .help("Maximum number of pages fetched at once (1-100)")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"max-pages-depth" <N>)
                .required(false)
                .help("How many link hops to follow from the start page (0-100)")
                .value_parser(clap::value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds (1-120)")
                .value_parser(clap::value_parser!(u64))
                .default_value("30"),
        )
        .arg(
            arg!(--"user-agent" <UA>)
                .required(false)
                .help("User-Agent header sent with every request"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Output format for crawl results")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Write results to a file instead of stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(arg!(-q --"quiet" "Suppress progress, summary and log output").required(false))
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(ArgAction::Count)
                .conflicts_with("quiet"),
        )
}
