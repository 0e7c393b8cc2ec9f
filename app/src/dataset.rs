//! Batch generation of synthetic training images.
//!
//! Each iteration picks a random annotated page, composites randomly chosen
//! source images (signatures, sketches) into its target region and writes
//! the result as `<placement>-<index>.png`. A `manifest.json` next to the
//! images records the rectangles that received content.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use image::RgbImage;
use image_processor::debug::{draw_polygon, draw_rect};
use image_processor::{Color, CompositeOptions, Placement, ProcessError, Rect, composite_directive};
use page_annotation::{PageDocument, RegionSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, OnError};

/// Name of the label file written next to the generated images.
pub const MANIFEST_FILE: &str = "manifest.json";

const PLACEMENT_COLOR: Color = Color { b: 0, g: 0, r: 255 };
const POLYGON_COLOR: Color = Color { b: 255, g: 0, r: 0 };

/// One batch of work.
#[derive(Debug, Clone)]
pub struct DatasetRequest {
    /// PAGE-XML files to draw pages from.
    pub documents: Vec<PathBuf>,
    /// Candidate source images.
    pub sources: Vec<PathBuf>,
    pub placement: Placement,
    pub count: usize,
    pub outdir: PathBuf,
}

/// Label record for one generated image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub file: String,
    pub document: PathBuf,
    pub placement: String,
    pub regions: Vec<Rect>,
}

/// Outcome of a batch.
#[derive(Debug, Default)]
pub struct DatasetReport {
    pub written: Vec<PathBuf>,
    pub skipped: usize,
    pub manifest: Vec<ManifestEntry>,
}

/// Read a list file: one path per line, blank lines ignored.
pub fn read_list(path: impl AsRef<Path>) -> anyhow::Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Output file name for item `index`, e.g. `left_right-00042.png`.
pub fn output_name(placement: Placement, index: usize) -> String {
    format!("{placement}-{index:05}.png")
}

/// Generate `request.count` composited pages.
///
/// The random generator is seeded once from `config.seed`, so equal inputs
/// and seed give identical outputs. Failures of a single page follow
/// `config.on_error`; failing to write an output is always fatal.
pub fn generate_dataset(
    request: &DatasetRequest,
    config: &AppConfig,
) -> anyhow::Result<DatasetReport> {
    if request.documents.is_empty() {
        bail!("No documents given");
    }
    if request.sources.is_empty() {
        bail!("No source images given");
    }

    std::fs::create_dir_all(&request.outdir).with_context(|| {
        format!("Failed to create output directory {}", request.outdir.display())
    })?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let opts = config.composite_options();
    let mut report = DatasetReport::default();
    let manifest_path = request.outdir.join(MANIFEST_FILE);

    info!(
        count = request.count,
        documents = request.documents.len(),
        sources = request.sources.len(),
        placement = %request.placement,
        seed = config.seed,
        "Generating dataset"
    );

    for index in 0..request.count {
        let Some(document) = request.documents.choose(&mut rng) else {
            break;
        };
        let file = output_name(request.placement, index);

        let (page, regions) =
            match synthesize_page(document, request, config, &opts, &mut rng) {
                Ok(result) => result,
                Err(e) => match config.on_error {
                    OnError::Abort => {
                        // Label what was written so far; a stale manifest must not survive.
                        if let Err(me) = write_manifest(&manifest_path, &report.manifest) {
                            warn!("Could not write partial manifest: {me:#}");
                        }
                        return Err(e.context(format!("Failed on {}", document.display())));
                    }
                    OnError::Skip => {
                        warn!(document = %document.display(), "Skipping document: {e:#}");
                        report.skipped += 1;
                        continue;
                    }
                },
            };

        let out_path = request.outdir.join(&file);
        page.save(&out_path)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        info!(file = %file, document = %document.display(), "Wrote sample");

        report.manifest.push(ManifestEntry {
            file,
            document: document.clone(),
            placement: request.placement.to_string(),
            regions,
        });
        report.written.push(out_path);
    }

    write_manifest(&manifest_path, &report.manifest)?;
    info!(
        written = report.written.len(),
        skipped = report.skipped,
        "Dataset complete"
    );
    Ok(report)
}

/// Composite one page. The first source is drawn before the document is
/// opened, further sources as each sub-region is filled.
fn synthesize_page(
    document: &Path,
    request: &DatasetRequest,
    config: &AppConfig,
    opts: &CompositeOptions,
    rng: &mut StdRng,
) -> anyhow::Result<(RgbImage, Vec<Rect>)> {
    let first = load_random_source(&request.sources, rng)?;

    let doc = PageDocument::open(document)?;
    let region = doc.region_rect(&config.selector)?;
    let mut page = doc.load_image()?;
    debug!(?region, width = page.width(), height = page.height(), "Loaded page");

    let mut pending = Some(first);
    let mut supplier = |rng: &mut StdRng| match pending.take() {
        Some(src) => Ok(src),
        None => load_random_source(&request.sources, rng),
    };
    let regions = composite_directive(
        &mut page,
        region,
        request.placement,
        &mut supplier,
        opts,
        rng,
    )?;

    if config.debug_draw {
        for rect in &regions {
            draw_rect(&mut page, *rect, PLACEMENT_COLOR);
        }
        draw_rect(&mut page, region, Color::GREEN);
        // Annotated outline over its bounding box.
        draw_polygon(&mut page, &doc.select(&config.selector)?.points, POLYGON_COLOR);
    }

    Ok((page, regions))
}

fn load_random_source(sources: &[PathBuf], rng: &mut StdRng) -> Result<RgbImage, ProcessError> {
    let path = sources
        .choose(rng)
        .ok_or_else(|| ProcessError::ResourceUnavailable("empty source list".into()))?;
    debug!(path = %path.display(), "Loading source image");
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| ProcessError::ResourceUnavailable(format!("{}: {e}", path.display())))
}

fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create manifest {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), entries)
        .with_context(|| format!("Failed to write manifest {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;
