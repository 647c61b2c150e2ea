//! vizblock CLI - content block rendering and export tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use vizblock::export::dedupe_file_names;
use vizblock::{
    detect_format_from_path, parse_file, ContentDescriptor, ContentRenderer, ExportFormat,
    ExportJob, ExportOptions, ExportPipeline, JsonFormat, PageOrientation, RenderOptions,
};

#[derive(Parser)]
#[command(name = "vizblock")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render content blocks and export them to PDF, PNG, and CSV", long_about = None)]
struct Cli {
    /// Logical width of rendered blocks in pixels
    #[arg(long, global = true, env = "VIZBLOCK_WIDTH")]
    width: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render descriptors and print their text or JSON view
    Render {
        /// Descriptor JSON file (single, array, or named map)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the scene as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Export every descriptor that offers the format
    Export {
        /// Descriptor JSON file (single, array, or named map)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Export format
        #[arg(short, long, value_enum)]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "VIZBLOCK_OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Raster scale
        #[arg(long, default_value = "2.0")]
        scale: f32,

        /// Portrait PDF pages
        #[arg(long)]
        portrait: bool,

        /// Omit PDF metadata
        #[arg(long)]
        no_metadata: bool,
    },

    /// Show descriptor information
    Info {
        /// Descriptor JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Identify an exported artifact
    Inspect {
        /// PNG, PDF or CSV file
        #[arg(value_name = "ARTIFACT")]
        artifact: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Single-page PDF
    Pdf,
    /// PNG image
    Png,
    /// PNG image
    Image,
    /// Table rows as CSV
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Png | FormatArg::Image => ExportFormat::Image,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut render_options = RenderOptions::new();
    if let Some(width) = cli.width {
        render_options = render_options.with_width(width);
    }

    let result = match cli.command {
        Commands::Render {
            input,
            json,
            compact,
        } => cmd_render(&input, &render_options, json, compact),
        Commands::Export {
            input,
            format,
            output,
            scale,
            portrait,
            no_metadata,
        } => {
            let orientation = if portrait {
                PageOrientation::Portrait
            } else {
                PageOrientation::Landscape
            };
            let export_options = ExportOptions::new()
                .with_scale(scale)
                .with_orientation(orientation)
                .with_metadata(!no_metadata);
            cmd_export(
                &input,
                format.into(),
                output.as_deref(),
                render_options,
                export_options,
            )
        }
        Commands::Info { input } => cmd_info(&input),
        Commands::Inspect { artifact } => cmd_inspect(&artifact),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Descriptors from a file, with untitled named entries titled by name.
fn load(input: &Path) -> Result<Vec<ContentDescriptor>, Box<dyn std::error::Error>> {
    let entries = parse_file(input)?;
    Ok(entries
        .into_iter()
        .map(|(name, descriptor)| match name {
            Some(name) if descriptor.title().is_none() => descriptor.with_title(name),
            _ => descriptor,
        })
        .collect())
}

fn cmd_render(
    input: &Path,
    options: &RenderOptions,
    json: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let descriptors = load(input)?;
    let renderer = ContentRenderer::new(options.clone());

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    for (i, descriptor) in descriptors.iter().enumerate() {
        let scene = renderer.render(descriptor).scene();
        if i > 0 {
            println!();
        }
        if json {
            println!("{}", vizblock::render::to_json(&scene, format)?);
        } else {
            println!("{}", vizblock::render::to_text(&scene));
        }
    }

    Ok(())
}

fn cmd_export(
    input: &Path,
    format: ExportFormat,
    output: Option<&Path>,
    render_options: RenderOptions,
    export_options: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let descriptors = load(input)?;
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let renderer = ContentRenderer::new(render_options.clone());
    let pipeline = ExportPipeline::to_directory(&output_dir)
        .with_render_options(render_options.clone())
        .with_options(export_options);

    let pb = ProgressBar::new(descriptors.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut jobs = Vec::new();
    let mut skipped = 0;
    for descriptor in &descriptors {
        let content = renderer.render(descriptor);
        if !content.affordances().allows(format) {
            log::debug!("{} does not offer {} export", descriptor.tag_name(), format);
            skipped += 1;
            continue;
        }
        match ExportJob::from_content(format, &content, &render_options) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                log::warn!("Could not prepare {}: {}", descriptor.tag_name(), e);
                skipped += 1;
            }
        }
    }
    pb.inc(skipped as u64);

    // Blocks sharing a title would overwrite each other.
    dedupe_file_names(&mut jobs);

    let mut saved = Vec::new();
    for job in &jobs {
        let name = job.file_name();
        pb.set_message(name.clone());
        match pipeline.run(job) {
            Ok(path) => saved.push(path),
            Err(e) => {
                log::warn!("Export of {} failed: {}", name, e);
                pb.println(format!("{} {}: {}", "Failed".red(), name, e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in saved.iter().enumerate() {
        let branch = if i + 1 == saved.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }
    if skipped > 0 {
        println!(
            "{} {} block(s) do not offer {} export",
            "Skipped".yellow(),
            skipped,
            format
        );
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let descriptors = load(input)?;
    let renderer = ContentRenderer::default();

    println!("{}", "Descriptor Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Blocks".bold(), descriptors.len());

    for descriptor in &descriptors {
        println!();
        let tag = match descriptor.tag() {
            Some(tag) => tag.to_string(),
            None => format!("{} (fallback)", descriptor.tag_name()),
        };
        println!("{}: {}", "Type".bold(), tag);
        if let Some(title) = descriptor.title() {
            println!("{}: {}", "Title".bold(), title);
        }
        println!("{}: {}", "Items".bold(), descriptor.item_count());

        let menu = renderer.render(descriptor).affordances().menu();
        let labels: Vec<&str> = menu.iter().map(|item| item.label).collect();
        let exports = if labels.is_empty() {
            "none".dimmed().to_string()
        } else {
            labels.join(", ")
        };
        println!("{}: {}", "Exports".bold(), exports);
    }

    Ok(())
}

fn cmd_inspect(artifact: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let format = detect_format_from_path(artifact)?;
    println!("{}: {}", "File".bold(), artifact.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Export".bold(), format.export_format().mime_type());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "vizblock".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Content block rendering and export tool");
    println!();
    println!("License: MIT");
}
