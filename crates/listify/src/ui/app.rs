//! Command-line entry point.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use futures::executor::block_on;

use crate::app::convert::{NO_ITEMS_MESSAGE, UiSurface, convert_selection};
use crate::app::host::DocumentHost;
use crate::app::render::{RenderFormat, RenderOptions, Renderer};
use crate::domain::model::{LineRange, StatusMessage};
use crate::domain::parser;
use crate::infra::clipboard::Clipboard;
use crate::infra::config::Config;
use crate::infra::document::TextDocument;
use crate::ui::status::ConsoleStatus;

#[derive(Parser)]
#[command(name = "listify")]
#[command(author, version, about = "Turn selected text into a clean bulleted list", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file used in place of the workspace `.listify/config.toml`
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the items found in a selection
    Parse {
        #[command(flatten)]
        source: SourceArgs,

        /// Print items as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Replace a selection in a text document with a bulleted list
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        /// Lines to treat as the selection (1-based, inclusive); defaults to all
        #[arg(long, value_name = "START-END")]
        lines: Option<LineRange>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<RenderFormat>,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Copy the output to the clipboard
        #[arg(long)]
        copy: bool,

        /// Built-in template name or path to a template file
        #[arg(long)]
        template: Option<String>,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Where the selection text comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Input file; `-` or nothing reads stdin
    pub input: Option<PathBuf>,

    /// Read the selection from the system clipboard
    #[arg(long, conflicts_with = "input")]
    pub clipboard: bool,
}

impl SourceArgs {
    fn read(&self) -> Result<String> {
        if self.clipboard {
            return Clipboard::new()
                .paste()
                .context("failed to read selection from clipboard");
        }
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => fs::read_to_string(path)
                .with_context(|| format!("failed to read input file: {}", path.display())),
            _ => io::read_to_string(io::stdin()).context("failed to read selection from stdin"),
        }
    }
}

/// Parse arguments, set up logging and configuration, and run the command.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    crate::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!(?config, "configuration loaded");

    UiApp::new(config)?.run(cli.command)
}

/// Executes commands against a loaded configuration.
pub struct UiApp {
    config: Config,
    renderer: Renderer,
}

impl UiApp {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            renderer: Renderer::new()?,
        })
    }

    pub fn run(&mut self, command: Commands) -> Result<ExitCode> {
        match command {
            Commands::Parse { source, json } => self.parse(&source, json),
            Commands::Convert {
                source,
                lines,
                format,
                output,
                copy,
                template,
            } => {
                let mut options = RenderOptions::from_config(&self.config);
                if let Some(format) = format {
                    options.format = format;
                }
                if template.is_some() {
                    options.template = template;
                }
                options.output_path = output;
                options.copy_to_clipboard |= copy;
                self.convert(&source, lines, &options)
            }
            Commands::Config => {
                print!("{}", self.config.to_toml()?);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Completions { shell } => {
                clap_complete::generate(shell, &mut Cli::command(), "listify", &mut io::stdout());
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn parse(&self, source: &SourceArgs, json: bool) -> Result<ExitCode> {
        let text = source.read()?;
        let mut document = TextDocument::from_text(&text);
        let selection = block_on(document.selection_text())?;
        let items = parser::parse(&selection);

        if items.is_empty() {
            let mut status = ConsoleStatus::stderr(self.config.status.show_info);
            status.report(StatusMessage::error(NO_ITEMS_MESSAGE));
            return Ok(ExitCode::FAILURE);
        }

        let mut stdout = io::stdout().lock();
        if json {
            let rendered =
                serde_json::to_string_pretty(&items).context("failed to serialize items")?;
            writeln!(stdout, "{rendered}")?;
        } else {
            for item in &items {
                writeln!(stdout, "{item}")?;
            }
        }
        Ok(ExitCode::SUCCESS)
    }

    fn convert(
        &self,
        source: &SourceArgs,
        lines: Option<LineRange>,
        options: &RenderOptions,
    ) -> Result<ExitCode> {
        let text = source.read()?;
        let mut document = TextDocument::from_text(&text);
        if let Some(range) = lines {
            document.select_lines(range);
        }

        let mut status = ConsoleStatus::stderr(self.config.status.show_info);
        if block_on(convert_selection(&mut document, &mut status)).is_err() {
            return Ok(ExitCode::FAILURE);
        }

        let result = self.renderer.emit(&document.blocks(), options)?;
        if result.output_path.is_none() {
            print!("{}", result.rendered);
        }
        if result.copied_to_clipboard {
            tracing::info!("copied output to clipboard");
        }
        Ok(ExitCode::SUCCESS)
    }
}
