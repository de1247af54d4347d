//! dad-notes - Main Entry Point
//!
//! Builds a document from Markdown and images, then exports it as Markdown
//! or standalone HTML to a directory, a save dialog, the clipboard or stdout.

use chrono::Utc;
use clap::{Parser, ValueEnum};
use dad_notes::assets::{FileSource, IngestError};
use dad_notes::config::{load_config, load_config_from, save_config_silent, save_config_to, Settings};
use dad_notes::error::{Error, Result, ResultExt};
use dad_notes::export::{to_markdown, ClipboardSink, Delivery, DeliverySink, DirectorySink, ExportFormat};
use dad_notes::files::{DialogImagePicker, ImagePicker, SaveDialogSink};
use dad_notes::markdown::parse_blocks;
use dad_notes::session::Session;
use dad_notes::surface::MemorySurface;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "dad-notes";

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about = "Rich-text notes with Markdown and HTML export")]
struct Cli {
    /// Markdown file to start from instead of the default content
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Image to embed at the end of the document (repeatable)
    #[arg(long = "image", value_name = "FILE")]
    images: Vec<PathBuf>,

    /// Choose an image to embed with the native file dialog
    #[arg(long)]
    pick_image: bool,

    /// Export format (defaults to the last one used)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Directory to write exports into
    #[arg(long, value_name = "DIR", conflicts_with_all = ["save_dialog", "clipboard"])]
    out: Option<PathBuf>,

    /// Ask where to save each export
    #[arg(long, conflicts_with = "clipboard")]
    save_dialog: bool,

    /// Copy the export to the clipboard
    #[arg(long)]
    clipboard: bool,

    /// Configuration file to use instead of the platform default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the export to stdout
    #[arg(long)]
    print: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Markdown,
    Html,
    Both,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Markdown => vec![ExportFormat::Markdown],
            FormatArg::Html => vec![ExportFormat::Html],
            FormatArg::Both => ExportFormat::all().to_vec(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("Starting {}", APP_NAME);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => load_config_from(path)
            .unwrap_or_warn_default(Settings::default(), "Failed to load configuration"),
        None => load_config(),
    };

    let mut session: Session<MemorySurface> = Session::new(settings);
    session.attach_surface(MemorySurface::ready());
    session.sync();

    if let Some(path) = &cli.input {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::FileRead {
                path: path.clone(),
                source,
            })?;
        let blocks = parse_blocks(&text, &session.limits());
        info!("Loaded {} blocks from {}", blocks.len(), path.display());
        if let Some(surface) = session.adapter_mut().surface_mut() {
            surface.edit(|content| *content = blocks);
        }
        session.sync();
    }

    let mut failures = 0;

    // Images
    let mut images = cli.images.clone();
    if cli.pick_image {
        match DialogImagePicker::default().pick_image() {
            Some(path) => images.push(path),
            None => info!("No image picked"),
        }
    }
    if let Some(surface) = session.adapter_mut().surface_mut() {
        surface.set_cursor(usize::MAX);
    }
    for path in &images {
        if let Err(e) = add_image_file(&mut session, path).await {
            let message = session.take_toast().unwrap_or_else(|| e.to_string());
            eprintln!("{}: {}", path.display(), message);
            failures += 1;
        }
    }

    // Export
    let mut formats = match cli.format {
        Some(arg) => arg.formats(),
        None => vec![session.settings().last_export_format],
    };
    if cli.clipboard && formats.contains(&ExportFormat::Html) {
        // One clipboard entry carries HTML with Markdown as the plain fallback
        formats = vec![ExportFormat::Html];
    }

    if cli.print {
        for format in &formats {
            println!("{}", session.export(*format, Utc::now()).contents);
        }
    }

    if let Some(mut sink) = destination(&cli, &session) {
        let open_after_export = session.settings().open_after_export;
        for format in &formats {
            match session.deliver(*format, &mut *sink) {
                Ok(Delivery::Saved(path)) => {
                    println!("Saved {}", path.display());
                    if open_after_export {
                        if let Err(e) = open::that(&path) {
                            warn!("Failed to open {}: {}", path.display(), e);
                        }
                    }
                }
                Ok(Delivery::Copied) => println!("Copied {} to clipboard", format.label()),
                Ok(Delivery::Cancelled) => println!("{} export cancelled", format.label()),
                Ok(Delivery::Captured) => {}
                Err(e) => {
                    let message = session.take_toast().unwrap_or_else(|| e.to_string());
                    eprintln!("error: {}", message);
                    failures += 1;
                }
            }
        }
    }

    remember_format(&cli, session.settings(), &formats);

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn add_image_file(session: &mut Session<MemorySurface>, path: &Path) -> Result<()> {
    let source = FileSource::open(path)
        .await
        .map_err(|e| Error::Ingest(IngestError::ReadFailed(e)))?;
    let alt = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match session.add_image(&source, &alt).await? {
        Some(index) => info!("Embedded {} at block {}", path.display(), index),
        None => warn!("Editor not ready, {} was not embedded", path.display()),
    }
    Ok(())
}

/// The sink selected on the command line. `--print` alone exports nowhere
/// else; with no destination flags exports go to the configured directory.
fn destination(cli: &Cli, session: &Session<MemorySurface>) -> Option<Box<dyn DeliverySink>> {
    let settings = session.settings();
    let sink: Box<dyn DeliverySink> = if cli.clipboard {
        Box::new(ClipboardSink::with_fallback(to_markdown(&session.snapshot())))
    } else if cli.save_dialog {
        Box::new(SaveDialogSink::new(settings.export_directory.clone()))
    } else if let Some(dir) = &cli.out {
        Box::new(DirectorySink::new(dir))
    } else if cli.print {
        return None;
    } else {
        let dir = settings
            .export_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        Box::new(DirectorySink::new(dir))
    };
    Some(sink)
}

/// Persist an explicitly requested single format as the new default.
fn remember_format(cli: &Cli, settings: &Settings, formats: &[ExportFormat]) {
    let [format] = formats else {
        return;
    };
    let explicit = matches!(cli.format, Some(FormatArg::Markdown | FormatArg::Html));
    if !explicit || *format == settings.last_export_format {
        return;
    }

    let mut updated = settings.clone();
    updated.last_export_format = *format;
    match &cli.config {
        Some(path) => {
            if let Err(e) = save_config_to(path, &updated) {
                warn!("Failed to save configuration: {}", e);
            }
        }
        None => {
            save_config_silent(&updated);
        }
    }
}
