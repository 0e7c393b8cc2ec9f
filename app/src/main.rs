//! Command-line entry point.
//!
//! `generate` composites source images into annotated document regions;
//! `crop` extracts an annotated region as its own image.

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use image_processor::{BlendMode, Placement};
use page_annotation::RegionSelector;
use tracing_subscriber::EnvFilter;

use docblend_lib::config::environment_help;
use docblend_lib::{AppConfig, DatasetRequest, OnError, crop_command, generate_dataset, read_list};

#[derive(Debug, Parser)]
#[command(name = "docblend", version, about = "Synthesize labeled document images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Composite source images into annotated regions of random documents.
    Generate(GenerateArgs),
    /// Crop the TextRegion tagged with an entity out of its page image.
    Crop(CropArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// File listing PAGE-XML documents, one per line.
    #[arg(long)]
    xml_list: PathBuf,
    /// File listing source images, one per line.
    #[arg(long)]
    img_list: PathBuf,
    /// left, right, top, bottom, centre, left_right or top_bottom.
    #[arg(long)]
    placement: Placement,
    /// Number of images to generate.
    #[arg(long)]
    number: usize,
    /// Output directory.
    #[arg(long)]
    outdir: PathBuf,
    /// Target region, e.g. `entity=signature` (overrides DOCBLEND_SELECTOR).
    #[arg(long)]
    selector: Option<RegionSelector>,
    /// Random seed (overrides DOCBLEND_SEED).
    #[arg(long)]
    seed: Option<u64>,
    /// Blend mode (overrides DOCBLEND_BLEND_MODE).
    #[arg(long)]
    mode: Option<BlendMode>,
    /// abort or skip on a failing document (overrides DOCBLEND_ON_ERROR).
    #[arg(long)]
    on_error: Option<OnError>,
    /// Outline target regions and placements in the output images.
    #[arg(long)]
    debug_draw: bool,
}

#[derive(Debug, Args)]
struct CropArgs {
    /// PAGE-XML file or inline XML.
    #[arg(long)]
    xml: String,
    /// Property value of the region to crop.
    #[arg(long)]
    entity: String,
    /// Where to write the crop.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Page image to use instead of the one named in the document.
    #[arg(long)]
    image: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG from it reaches the filter.
    docblend_lib::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = Cli::command()
        .after_long_help(environment_help())
        .get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Crop(args) => {
            crop_command(&args.xml, &args.entity, args.out.as_deref(), args.image.as_deref())?;
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load();
    if let Some(selector) = args.selector {
        config.selector = selector;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(mode) = args.mode {
        config.blend_mode = mode;
    }
    if let Some(on_error) = args.on_error {
        config.on_error = on_error;
    }
    config.debug_draw |= args.debug_draw;
    tracing::debug!(?config, "Loaded configuration");

    let request = DatasetRequest {
        documents: read_list(&args.xml_list)?,
        sources: read_list(&args.img_list)?,
        placement: args.placement,
        count: args.number,
        outdir: args.outdir,
    };

    let report = generate_dataset(&request, &config)?;
    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped,
        "Done"
    );
    Ok(())
}
