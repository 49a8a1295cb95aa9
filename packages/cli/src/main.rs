#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use ctfboard_cli::{OptionOverrides, load_render_options, standalone_page};
use ctfboard_markdown::{MarkdownRenderer, clipboard_script, parse_document};
use ctfboard_syntax::CodeHighlighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rendered HTML fragment
    Html,
    /// Parsed document tree
    Json,
}

#[derive(Parser)]
#[command(name = "ctfboard-render")]
#[command(about = "Render ctfboard problem descriptions to sanitized HTML", long_about = None)]
struct Cli {
    /// Markdown file to render. Reads stdin when omitted.
    input: Option<PathBuf>,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,

    /// Emit a full page with stylesheet and copy script
    #[arg(long)]
    standalone: bool,

    #[arg(long, default_value = "ctfboard")]
    title: String,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    theme: Option<String>,

    #[arg(long)]
    no_sanitize: bool,

    #[arg(long)]
    no_highlight: bool,

    #[arg(long)]
    new_tab: bool,

    /// Print the available highlight themes and exit
    #[arg(long)]
    list_themes: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list_themes {
        for name in CodeHighlighter::shared().theme_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let options = load_render_options(cli.config.as_deref())?;
    let options = OptionOverrides {
        no_sanitize: cli.no_sanitize,
        no_highlight: cli.no_highlight,
        links_open_in_new_tab: cli.new_tab,
        theme: cli.theme,
    }
    .apply(options);
    log::debug!("Render options: {options:?}");

    let source = read_input(cli.input.as_deref())?;
    let renderer = MarkdownRenderer::new(options);

    let output = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&parse_document(&source))?,
        OutputFormat::Html if cli.standalone => standalone_page(
            &cli.title,
            &renderer.render(&source),
            &renderer.stylesheet()?,
            clipboard_script(),
        ),
        OutputFormat::Html => renderer.render(&source),
    };

    write_output(cli.output.as_deref(), &output)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("Failed to read stdin"),
    }
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            if !output.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
