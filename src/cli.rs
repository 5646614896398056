//! Command-line interface for yamlweave.
//!
//! The binary is a thin wrapper over the library: a [`LocalSource`] rooted
//! at `--root`, a [`TagRegistry`] built from the `--ref-tags` flags, and
//! three subcommands that read a document and print the outcome.
//!
//! # Commands
//!
//! - `resolve` reads a document, resolves every deferred reference against
//!   the root, and prints the fully spliced text.
//! - `render` reads a document and prints it re-rendered without resolving,
//!   a quick round-trip check.
//! - `split` prints a document's front matter and body sections.
//!
//! Document text goes to stdout untouched, so output can be redirected back
//! into a file; diagnostics and logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::document::{read_document, split_document};
use crate::registry::TagRegistry;
use crate::resolve::resolve_all;
use crate::source::{ContentSource, LocalSource};

/// Top-level CLI definition.
///
/// Global flags configure the content source and registry shared by every
/// subcommand; the subcommand itself only carries the document path.
#[derive(Parser)]
#[command(
    name = "yamlweave",
    about = "Resolve, render, and split YAML-backed documents",
    version,
    long_about = "yamlweave reads documents whose YAML fields may defer to other documents \
                  through tags like `!ref /other.yaml?some.path`, resolves those references \
                  against a directory tree, and prints the result."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Directory documents are read from.
    ///
    /// Reference paths inside documents are resolved relative to this root,
    /// never above it.
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    root: PathBuf,

    /// Extra tag name treated as a deferred reference, besides `!ref`.
    ///
    /// Repeatable: `--ref-tags import --ref-tags include`.
    #[arg(long = "ref-tags", global = true, value_name = "TAG")]
    ref_tags: Vec<String>,

    /// Enable debug logging to stderr.
    ///
    /// Equivalent to `RUST_LOG=debug`; without it the `RUST_LOG` variable is
    /// honored, defaulting to warnings only.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Resolve a document's deferred references and print the result.
    Resolve(ResolveCommand),

    /// Re-render a document without resolving, as a round-trip check.
    Render(RenderCommand),

    /// Print a document's front matter and body sections.
    Split(SplitCommand),
}

impl Cli {
    /// Executes the parsed command line.
    ///
    /// Installs the log subscriber, builds the source and registry shared by
    /// all subcommands, and dispatches.
    pub async fn execute(self) -> Result<()> {
        let Self {
            command,
            root,
            ref_tags,
            verbose,
        } = self;
        init_logging(verbose);

        let source = Arc::new(LocalSource::new(root));
        let mut builder = TagRegistry::builder().source(source.clone());
        for tag in ref_tags {
            builder = builder.reference_tag(tag);
        }
        let registry = builder.build()?;

        match command {
            Commands::Resolve(cmd) => cmd.execute(source.as_ref(), &registry).await,
            Commands::Render(cmd) => cmd.execute(source.as_ref(), &registry).await,
            Commands::Split(cmd) => cmd.execute(source.as_ref()).await,
        }
    }
}

/// Installs the global `tracing` subscriber, writing to stderr.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Arguments for `yamlweave resolve`.
#[derive(Args)]
pub struct ResolveCommand {
    /// Document path relative to the root.
    #[arg(value_name = "FILE")]
    file: String,
}

impl ResolveCommand {
    /// Reads the document, resolves its fields, and prints the spliced text.
    pub async fn execute(self, source: &dyn ContentSource, registry: &TagRegistry) -> Result<()> {
        let mut document = read_document(source, &self.file, registry)
            .await
            .with_context(|| format!("failed to read {}", self.file))?;
        document.fields = resolve_all(std::mem::take(&mut document.fields), registry)
            .await
            .with_context(|| format!("failed to resolve {}", self.file))?;

        print!("{}", document.to_text(registry)?);
        Ok(())
    }
}

/// Arguments for `yamlweave render`.
#[derive(Args)]
pub struct RenderCommand {
    /// Document path relative to the root.
    #[arg(value_name = "FILE")]
    file: String,
}

impl RenderCommand {
    /// Reads the document and prints it re-rendered, references untouched.
    pub async fn execute(self, source: &dyn ContentSource, registry: &TagRegistry) -> Result<()> {
        let document = read_document(source, &self.file, registry)
            .await
            .with_context(|| format!("failed to read {}", self.file))?;

        print!("{}", document.to_text(registry)?);
        Ok(())
    }
}

/// Arguments for `yamlweave split`.
#[derive(Args)]
pub struct SplitCommand {
    /// Document path relative to the root.
    #[arg(value_name = "FILE")]
    file: String,
}

impl SplitCommand {
    /// Prints the document's textual halves under labeled headings.
    pub async fn execute(self, source: &dyn ContentSource) -> Result<()> {
        let raw = source
            .read(&self.file)
            .await
            .with_context(|| format!("failed to read {}", self.file))?;
        let parts = split_document(&self.file, raw);

        println!("{}", "front matter:".cyan().bold());
        match &parts.front_matter {
            Some(front_matter) => println!("{front_matter}"),
            None => println!("{}", "(none)".dimmed()),
        }
        println!();
        println!("{}", "body:".cyan().bold());
        match &parts.body {
            Some(body) => println!("{body}"),
            None => println!("{}", "(none)".dimmed()),
        }
        Ok(())
    }
}
