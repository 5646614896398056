//! yamlweave CLI entry point.
//!
//! Parses arguments, runs the selected command, and maps failures to a
//! nonzero exit code with the error chain printed to stderr. All the actual
//! behavior lives in the library; see [`yamlweave::cli`].

use clap::Parser;
use colored::Colorize;
use yamlweave::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(err) = cli.execute().await {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
