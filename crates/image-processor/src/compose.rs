//! Region composition: place, resize, blend and write back source patches.

use std::fmt;
use std::str::FromStr;

use image::{RgbImage, imageops};
use rand::Rng;
use tracing::debug;

use crate::ProcessError;
use crate::blend::{BlendMode, blend, resize_bicubic};
use crate::geometry::Rect;
use crate::sampler::{SampleRange, compute_random_rect};

/// Default random scale applied on top of the fit scale.
pub const DEFAULT_SCALE_RANGE: SampleRange = SampleRange::new(0.7, 1.0);

/// Which part(s) of a destination region receive content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    Left,
    Right,
    Top,
    Bottom,
    Centre,
    /// Left half and right half, each with its own source image.
    LeftRight,
    /// Top half and bottom half, each with its own source image.
    TopBottom,
}

impl Placement {
    pub const ALL: [Placement; 7] = [
        Placement::Left,
        Placement::Right,
        Placement::Top,
        Placement::Bottom,
        Placement::Centre,
        Placement::LeftRight,
        Placement::TopBottom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Placement::Left => "left",
            Placement::Right => "right",
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Centre => "centre",
            Placement::LeftRight => "left_right",
            Placement::TopBottom => "top_bottom",
        }
    }

    /// Sub-rectangles of `region` in the order they are filled.
    pub fn split(self, region: Rect) -> Vec<Rect> {
        match self {
            Placement::Left => vec![region.left_half()],
            Placement::Right => vec![region.right_half()],
            Placement::Top => vec![region.top_half()],
            Placement::Bottom => vec![region.bottom_half()],
            Placement::Centre => vec![region],
            Placement::LeftRight => vec![region.left_half(), region.right_half()],
            Placement::TopBottom => vec![region.top_half(), region.bottom_half()],
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Placement::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ProcessError::InvalidPlacement(s.to_string()))
    }
}

/// Tunables for a single composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    pub scale_range: SampleRange,
    pub x_range: SampleRange,
    pub y_range: SampleRange,
    pub mode: BlendMode,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            scale_range: DEFAULT_SCALE_RANGE,
            x_range: SampleRange::UNIT,
            y_range: SampleRange::UNIT,
            mode: BlendMode::Multiply,
        }
    }
}

/// Produces source patches on demand, one per filled sub-region.
pub trait SourceSupplier<R: Rng + ?Sized> {
    fn next_source(&mut self, rng: &mut R) -> Result<RgbImage, ProcessError>;
}

impl<R, F> SourceSupplier<R> for F
where
    R: Rng + ?Sized,
    F: FnMut(&mut R) -> Result<RgbImage, ProcessError>,
{
    fn next_source(&mut self, rng: &mut R) -> Result<RgbImage, ProcessError> {
        self(rng)
    }
}

/// Composite `src` into `dest` somewhere inside `region`.
///
/// Samples a placement, resizes `src` to it with bicubic filtering, blends it
/// with the covered destination pixels and writes the result back.
/// **`dest` is modified in place.** Returns the rectangle that was written.
pub fn composite_region<R: Rng + ?Sized>(
    dest: &mut RgbImage,
    region: Rect,
    src: &RgbImage,
    opts: &CompositeOptions,
    rng: &mut R,
) -> Result<Rect, ProcessError> {
    let src_rect = Rect::of_image(src.width(), src.height());
    let rect = compute_random_rect(
        region,
        src_rect,
        opts.scale_range,
        opts.x_range,
        opts.y_range,
        rng,
    )?;

    let bounds = Rect::of_image(dest.width(), dest.height());
    if !rect.is_within(&bounds) {
        return Err(ProcessError::OutOfBounds {
            rect,
            width: dest.width(),
            height: dest.height(),
        });
    }

    let dim = rect.dim();
    if !dim.is_positive() {
        return Err(ProcessError::DegenerateRegion {
            what: "placement",
            width: dim.width,
            height: dim.height,
        });
    }

    // Non-negative after the bounds check above.
    let (x, y) = (rect.left as u32, rect.top as u32);
    let (w, h) = (dim.width as u32, dim.height as u32);

    let patch = resize_bicubic(src, w, h);
    let under = imageops::crop_imm(&*dest, x, y, w, h).to_image();
    let blended = blend(&under, &patch, opts.mode)?;
    imageops::replace(dest, &blended, i64::from(x), i64::from(y));

    debug!(?region, ?rect, mode = %opts.mode, "Composited region");
    Ok(rect)
}

/// Fill the sub-region(s) of `region` selected by `placement`.
///
/// Each sub-region draws its own source from `supplier`, before its placement
/// is sampled. **`dest` is modified in place.** Returns the written
/// rectangles in fill order.
pub fn composite_directive<R, S>(
    dest: &mut RgbImage,
    region: Rect,
    placement: Placement,
    supplier: &mut S,
    opts: &CompositeOptions,
    rng: &mut R,
) -> Result<Vec<Rect>, ProcessError>
where
    R: Rng + ?Sized,
    S: SourceSupplier<R> + ?Sized,
{
    let targets = placement.split(region);
    debug!(%placement, ?region, parts = targets.len(), "Compositing directive");

    let mut written = Vec::with_capacity(targets.len());
    for target in targets {
        let src = supplier.next_source(rng)?;
        written.push(composite_region(dest, target, &src, opts, rng)?);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
