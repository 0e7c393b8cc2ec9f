//! Cropping annotated regions out of their page image.

use image::{RgbImage, imageops};
use image_processor::Rect;
use tracing::debug;

use crate::document::PageDocument;
use crate::selector::RegionSelector;
use crate::{AnnotationError, RegionSource};

/// Crop the bounding box of the first region matching `selector` from the
/// document's page image.
///
/// The box is clamped to the image; a region entirely outside it is an error.
pub fn crop_region(
    doc: &PageDocument,
    selector: &RegionSelector,
) -> Result<RgbImage, AnnotationError> {
    let rect = doc.region_rect(selector)?;
    let page = doc.load_image()?;
    crop_rect(&page, rect)
}

/// Crop `rect` out of `page`, clamped to the page bounds.
pub fn crop_rect(page: &RgbImage, rect: Rect) -> Result<RgbImage, AnnotationError> {
    let bounds = Rect::of_image(page.width(), page.height());
    let clamped = Rect::new(
        rect.left.clamp(bounds.left, bounds.right),
        rect.top.clamp(bounds.top, bounds.bottom),
        rect.right.clamp(bounds.left, bounds.right),
        rect.bottom.clamp(bounds.top, bounds.bottom),
    );
    let dim = clamped.dim();
    if !dim.is_positive() {
        return Err(AnnotationError::EmptyCrop(rect));
    }

    debug!(?rect, ?clamped, "Cropping region");
    Ok(imageops::crop_imm(
        page,
        clamped.left as u32,
        clamped.top as u32,
        dim.width as u32,
        dim.height as u32,
    )
    .to_image())
}
