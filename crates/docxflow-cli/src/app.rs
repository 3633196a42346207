//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use docxflow_ooxml::{parse_events, replay, EmitterConfig, RenderSession};

#[derive(Parser)]
#[command(name = "docxflow")]
#[command(author, version, about = "Rich-text events in, WordprocessingML out", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON event script and emit the body fragment
    Render {
        /// JSON file holding an array of events
        input: PathBuf,

        /// Output file for the fragment (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emitter configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the allocated w:num definitions here
        #[arg(long)]
        numbering: Option<PathBuf>,

        /// Write hyperlink and image relationships here
        #[arg(long)]
        rels: Option<PathBuf>,

        /// Directory receiving embedded media files
        #[arg(long)]
        media_dir: Option<PathBuf>,

        /// Never fetch remote images
        #[arg(long)]
        offline: bool,
    },
}

/// Options of the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub numbering: Option<PathBuf>,
    pub rels: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub offline: bool,
}

/// What a render produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    /// Size of the fragment in bytes
    pub fragment_bytes: usize,
    pub numbering_definitions: usize,
    pub hyperlinks: usize,
    pub media_files: usize,
    /// Images skipped with a warning
    pub skipped_images: usize,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            config,
            numbering,
            rels,
            media_dir,
            offline,
        } => {
            render_command(&RenderOptions {
                input,
                output,
                config,
                numbering,
                rels,
                media_dir,
                offline,
            })?;
        }
    }

    Ok(())
}

/// Execute the render command
pub fn render_command(options: &RenderOptions) -> Result<RenderSummary> {
    let input = options.input.as_path();
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let mut config = load_config(options.config.as_deref())?;
    if options.offline {
        config.fetch_remote_images = false;
    }
    let mut session = RenderSession::new(config).context("Failed to create render session")?;

    info!("Reading events: {}", input.display());
    let script = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let events = parse_events(&script)
        .with_context(|| format!("Failed to parse events: {}", input.display()))?;
    info!("{} events parsed", events.len());

    let mut emitter = session.emitter();
    replay(&mut emitter, events).context("Event stream is not well nested")?;
    emitter.end_document().context("Failed to close open blocks")?;
    let fragment = emitter.finish().context("Failed to finish fragment")?;

    match &options.output {
        Some(path) => {
            info!("Writing fragment: {}", path.display());
            fs::write(path, &fragment.markup)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(fragment.markup.as_bytes())
                .context("Failed to write fragment to stdout")?;
            stdout.flush()?;
        }
    }

    if let Some(path) = &options.numbering {
        fs::write(path, session.numbering_xml())
            .with_context(|| format!("Failed to write numbering: {}", path.display()))?;
    }
    if let Some(path) = &options.rels {
        fs::write(path, session.relationships_xml())
            .with_context(|| format!("Failed to write relationships: {}", path.display()))?;
    }
    if let Some(dir) = &options.media_dir {
        write_media(&session, dir)?;
    }

    let summary = RenderSummary {
        fragment_bytes: fragment.markup.len(),
        numbering_definitions: session.numbering().len(),
        hyperlinks: session.hyperlinks().len(),
        media_files: session.images().media().len(),
        skipped_images: fragment.warnings.len(),
    };
    info!(
        bytes = summary.fragment_bytes,
        lists = summary.numbering_definitions,
        hyperlinks = summary.hyperlinks,
        media = summary.media_files,
        skipped = summary.skipped_images,
        "Render complete"
    );

    Ok(summary)
}

fn load_config(config_path: Option<&Path>) -> Result<EmitterConfig> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            info!("Loading config: {}", path.display());
            EmitterConfig::from_file(path)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        }
        None => Ok(EmitterConfig::default()),
    }
}

fn write_media(session: &RenderSession, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create media directory: {}", dir.display()))?;
    for part in session.images().media() {
        let path = dir.join(part.filename());
        fs::write(&path, &part.data)
            .with_context(|| format!("Failed to write media file: {}", path.display()))?;
    }
    Ok(())
}
