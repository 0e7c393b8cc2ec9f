//! Extract annotated regions as standalone images.

use std::path::Path;

use anyhow::Context;
use image::RgbImage;
use page_annotation::{PageDocument, RegionSelector, crop_region};
use tracing::info;

/// Crop the `TextRegion` tagged with `entity` from `xml` (a file path or
/// inline PAGE-XML).
///
/// `image` replaces the page image named in the document. The crop is
/// written to `out` when given, and returned either way.
pub fn crop_command(
    xml: &str,
    entity: &str,
    out: Option<&Path>,
    image: Option<&str>,
) -> anyhow::Result<RgbImage> {
    let mut doc = PageDocument::load(xml).context("Failed to read PAGE-XML")?;
    if let Some(image) = image {
        doc.set_image_filename(image);
    }

    let cropped = crop_region(&doc, &RegionSelector::text_region(entity))
        .with_context(|| format!("Failed to crop region '{entity}'"))?;

    if let Some(out) = out {
        cropped
            .save(out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!(
            entity,
            out = %out.display(),
            width = cropped.width(),
            height = cropped.height(),
            "Wrote crop"
        );
    }
    Ok(cropped)
}
