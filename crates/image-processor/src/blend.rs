//! Pixel blending of two equally sized RGB patches.
//!
//! Provides multiply (ink on paper), 50/50 alpha averaging, and
//! luminance-mask compositing, plus the bicubic resize applied to a source
//! patch before it is blended.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::ProcessError;

/// Numeric rule combining a destination patch with a source patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `dest * src / 255`: darker wins, white is transparent.
    #[default]
    Multiply,
    /// `0.5 * dest + 0.5 * src`, rounded.
    Alpha,
    /// Source luminance as a mask: dark source pixels replace the
    /// destination, light ones let it show through.
    Mask,
}

impl BlendMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            BlendMode::Multiply => "multiply",
            BlendMode::Alpha => "alpha",
            BlendMode::Mask => "mask",
        }
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlendMode {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiply" => Ok(BlendMode::Multiply),
            "alpha" => Ok(BlendMode::Alpha),
            "mask" => Ok(BlendMode::Mask),
            other => Err(ProcessError::InvalidBlendMode(other.to_string())),
        }
    }
}

/// Blend `src` into `dest` using `mode`. Both patches must have the same size.
pub fn blend(dest: &RgbImage, src: &RgbImage, mode: BlendMode) -> Result<RgbImage, ProcessError> {
    if dest.dimensions() != src.dimensions() {
        return Err(ProcessError::SizeMismatch {
            dest: dest.dimensions(),
            src: src.dimensions(),
        });
    }

    let (width, height) = dest.dimensions();
    debug!(width, height, %mode, "Blending patch");

    let mut output = RgbImage::new(width, height);
    for (x, y, out) in output.enumerate_pixels_mut() {
        let d = dest.get_pixel(x, y);
        let s = src.get_pixel(x, y);
        *out = match mode {
            BlendMode::Multiply => multiply_pixel(d, s),
            BlendMode::Alpha => alpha_pixel(d, s),
            BlendMode::Mask => mask_pixel(d, s),
        };
    }

    Ok(output)
}

/// Resize `src` to exactly `width` x `height` with bicubic (Catmull-Rom) filtering.
pub fn resize_bicubic(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    if src.dimensions() == (width, height) {
        return src.clone();
    }
    debug!(
        orig_w = src.width(),
        orig_h = src.height(),
        width,
        height,
        "Resizing source patch"
    );
    imageops::resize(src, width, height, FilterType::CatmullRom)
}

/// Luminance with the ITU-R BT.601 weights, rounded to 8 bits.
pub fn luma(p: &Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    let y = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

fn multiply_pixel(d: &Rgb<u8>, s: &Rgb<u8>) -> Rgb<u8> {
    // (d/255) * (s/255) * 255, truncated. Computed as d*s/255 so that a
    // white source is an exact identity.
    Rgb(std::array::from_fn(|c| {
        (f64::from(d[c]) * f64::from(s[c]) / 255.0) as u8
    }))
}

fn alpha_pixel(d: &Rgb<u8>, s: &Rgb<u8>) -> Rgb<u8> {
    Rgb(std::array::from_fn(|c| {
        (0.5 * f64::from(d[c]) + 0.5 * f64::from(s[c])).round() as u8
    }))
}

fn mask_pixel(d: &Rgb<u8>, s: &Rgb<u8>) -> Rgb<u8> {
    let m = f64::from(luma(s)) / 255.0;
    Rgb(std::array::from_fn(|c| {
        let v = m * f64::from(d[c]) + (1.0 - m) * f64::from(s[c]);
        v.round().clamp(0.0, 255.0) as u8
    }))
}
