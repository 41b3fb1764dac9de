//! pseudoc CLI - Python / Java to IB / IGCSE pseudocode
//!
//! Author: Tane Channel Technology

use anyhow::{Context, Result};
use clap::Parser;
use pseudoc::{Config, Dialect, IndentStyle, SourceLanguage};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

/// pseudoc - Python / Java to exam-board pseudocode
#[derive(Parser, Debug)]
#[command(name = "psc")]
#[command(author = "Tane Channel Technology")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Transpile Python or Java code to IB / IGCSE pseudocode", long_about = None)]
struct Cli {
    /// Input source file (.py or .java)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Source language (default: from the file extension)
    #[arg(long, value_name = "python|java")]
    lang: Option<SourceLanguage>,

    /// Target dialect
    #[arg(long, value_name = "ib|igcse")]
    dialect: Option<Dialect>,

    /// Fixed indent width per block (0 keeps the source indentation)
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Do not emit the DECLARE header
    #[arg(long)]
    no_declarations: bool,

    /// Check only (report unmatched lines, write nothing)
    #[arg(short, long)]
    check: bool,

    /// Show debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit JSON diagnostics to stderr
    #[arg(long)]
    diag_json: bool,

    /// Config file (default: ./pseudoc.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("failed to load {}", path.display())),
        None => Ok(Config::load_default()?.unwrap_or_default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = load_config(cli.config.as_deref())?;
    let language = cli
        .lang
        .or(config.language)
        .or_else(|| SourceLanguage::from_path(&cli.input))
        .with_context(|| {
            format!(
                "cannot tell the source language of {}; pass --lang python|java",
                cli.input.display()
            )
        })?;
    let dialect = cli.dialect.unwrap_or(config.dialect);
    let config = Config { dialect, ..config };

    let mut options = config.options(language)?;
    if let Some(width) = cli.indent {
        options.indent = Some(if width == 0 {
            IndentStyle::Preserve
        } else {
            IndentStyle::Width(width)
        });
    }
    if cli.no_declarations {
        options.declarations = false;
    }
    debug!(input = %cli.input.display(), %language, %dialect, "converting");

    let source = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let conversion = pseudoc::emitter::transpile(&source, language, dialect, &options, Some(&cli.input));

    if !conversion.diagnostics.is_empty() {
        eprint!("{}", conversion.diagnostics.to_text());
    }
    if cli.diag_json {
        eprintln!("{}", conversion.diagnostics.to_json());
    }

    if cli.check {
        info!(
            unmatched = conversion.diagnostics.len(),
            unsupported = conversion.diagnostics.has_errors(),
            blocks = conversion.opened,
            "check finished"
        );
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let mut text = conversion.text;
            text.push('\n');
            std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            println!("✅ Transpiled to: {path:?}");
        }
        None => println!("{}", conversion.text),
    }

    Ok(())
}
