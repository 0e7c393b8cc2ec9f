//! Randomized placement of content inside a container rectangle.
//!
//! All random draws happen at a resolution of 1/1000: an integer `k` is drawn
//! uniformly from `[lo * 1000, hi * 1000)` and the sample is `k / 1000`.

use rand::Rng;
use tracing::debug;

use crate::ProcessError;
use crate::geometry::Rect;
use crate::scale::compute_fit_scale;

/// Number of discrete steps per unit in a [`SampleRange`].
const RESOLUTION: f64 = 1000.0;

/// Half-open sampling interval `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    pub lo: f64,
    pub hi: f64,
}

impl SampleRange {
    /// The whole unit interval `[0, 1)`.
    pub const UNIT: SampleRange = SampleRange { lo: 0.0, hi: 1.0 };

    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Check that the range is finite, non-negative and ordered.
    ///
    /// `unit` additionally requires `hi <= 1`, which position ranges need to
    /// keep the placement inside the container.
    pub fn validate(&self, unit: bool) -> Result<(), ProcessError> {
        let ok = self.lo.is_finite()
            && self.hi.is_finite()
            && self.lo >= 0.0
            && self.lo <= self.hi
            && (!unit || self.hi <= 1.0);
        if ok {
            Ok(())
        } else {
            Err(ProcessError::InvalidRange {
                lo: self.lo,
                hi: self.hi,
            })
        }
    }

    /// Draw one sample. An empty range (`lo == hi` after quantization)
    /// returns `lo` without touching the generator.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let lo = (self.lo * RESOLUTION).round() as i64;
        let hi = (self.hi * RESOLUTION).round() as i64;
        if lo >= hi {
            return lo as f64 / RESOLUTION;
        }
        rng.gen_range(lo..hi) as f64 / RESOLUTION
    }
}

impl Default for SampleRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Pick a random sub-rectangle of `container` that `content` will be resized into.
///
/// The content is first fit-scaled to the container, then multiplied by a
/// random factor from `scale_range`. The leftover slack on each axis is
/// distributed by a random fraction from `x_range` / `y_range`. Draw order is
/// scale, x, y.
///
/// With `scale_range` inside `(0, 1]` and position ranges inside `[0, 1]` the
/// result always lies within `container`.
pub fn compute_random_rect<R: Rng + ?Sized>(
    container: Rect,
    content: Rect,
    scale_range: SampleRange,
    x_range: SampleRange,
    y_range: SampleRange,
    rng: &mut R,
) -> Result<Rect, ProcessError> {
    scale_range.validate(false)?;
    x_range.validate(true)?;
    y_range.validate(true)?;

    let content_dim = content.dim();
    let container_dim = container.dim();
    let fit = compute_fit_scale(container_dim, content_dim)?;

    let factor = scale_range.sample(rng);
    let width = (f64::from(content_dim.width) * fit * factor) as i32;
    let height = (f64::from(content_dim.height) * fit * factor) as i32;

    let fx = x_range.sample(rng);
    let fy = y_range.sample(rng);
    let x = fx * f64::from(container_dim.width - width);
    let y = fy * f64::from(container_dim.height - height);

    let left = container.left + x.floor() as i32;
    let top = container.top + y.floor() as i32;
    let rect = Rect::new(left, top, left + width, top + height);

    debug!(fit, factor, fx, fy, ?rect, "Sampled placement");
    Ok(rect)
}
