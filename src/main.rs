//! mdtint - highlight markdown in the terminal

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdtint::config::Config;
use mdtint::error::Result;
use mdtint::render::{self, RenderOptions};
use mdtint::Highlighter;

/// Highlight a markdown document for the terminal
#[derive(Parser, Debug)]
#[command(name = "mdtint", version, about)]
struct Args {
    /// Markdown file to highlight (reads stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Theme name (see --list-themes)
    #[arg(short, long)]
    theme: Option<String>,

    /// Base font size in points
    #[arg(long)]
    font_size: Option<u16>,

    /// Prefix lines with line numbers
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Disable colors
    #[arg(long)]
    no_color: bool,

    /// Print the span list instead of rendering
    #[arg(long)]
    spans: bool,

    /// List available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Config file to use instead of ~/.mdtint.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("MDTINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if let Some(size) = args.font_size {
        config.font_size = size;
    }
    config.line_numbers |= args.line_numbers;
    config.color &= !args.no_color;
    let config = config.clamped();

    let registry = config.theme_registry()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.list_themes {
        for name in registry.names() {
            writeln!(out, "{}", name)?;
        }
        return Ok(());
    }

    if !registry.contains(&config.theme) {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
    }

    let text = read_input(args.file.as_deref())?;
    let mut highlighter = Highlighter::new(config.highlight_config(&registry));

    if args.spans {
        for span in highlighter.highlight(&text) {
            writeln!(
                out,
                "{:>6}..{:<6} {:<16} {:?}",
                span.start,
                span.end,
                span.construct.name(),
                span.style
            )?;
        }
        return Ok(());
    }

    let runs = highlighter.highlight_runs(&text);
    render::write_ansi(&mut out, &text, &runs, &RenderOptions::from(&config))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
