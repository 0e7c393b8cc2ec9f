//! PAGE-XML annotation lookup for document images.
//!
//! Finds annotated regions (signature zones, sketches) by their `Property`
//! tags, reduces their polygons to bounding quads, resolves the page image
//! they belong to, and crops them out.

pub mod crop;
pub mod document;
pub mod selector;

use std::path::PathBuf;

use image_processor::Rect;

pub use crop::{crop_rect, crop_region};
pub use document::{PageDocument, Region, points_bbox};
pub use selector::RegionSelector;

/// Errors raised while reading annotations or the images they point to.
#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("no region matches {0}")]
    NoMatch(String),

    #[error("page has no imageFilename")]
    MissingImageFilename,

    #[error("malformed points: {0}")]
    MalformedPoints(String),

    #[error("invalid region selector: {0}")]
    InvalidSelector(String),

    #[error("region {0:?} does not overlap the page image")]
    EmptyCrop(Rect),
}

/// Where dataset generation gets its target regions and page images from.
pub trait RegionSource {
    /// Bounding rectangle of the first region matching `selector`.
    fn region_rect(&self, selector: &RegionSelector) -> Result<Rect, AnnotationError>;

    /// Path of the raster image the annotations refer to.
    fn image_path(&self) -> Result<PathBuf, AnnotationError>;
}
