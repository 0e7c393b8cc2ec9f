//! Geometric placement and compositing engine for synthetic document images.
//!
//! Derives target rectangles from annotated regions, samples a randomized
//! placement inside them, and blends a resized source patch (a signature,
//! a sketch) into the destination page.

pub mod blend;
pub mod compose;
pub mod debug;
pub mod geometry;
pub mod sampler;
pub mod scale;

// Re-exports for convenience
pub use blend::{BlendMode, blend, resize_bicubic};
pub use compose::{CompositeOptions, Placement, SourceSupplier, composite_directive, composite_region};
pub use geometry::{Color, Dim, Point, Rect};
pub use sampler::{SampleRange, compute_random_rect};
pub use scale::compute_fit_scale;

/// Errors raised by the placement and compositing engine.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProcessError {
    #[error("unknown placement '{0}' (expected left, right, top, bottom, centre, left_right or top_bottom)")]
    InvalidPlacement(String),

    #[error("unknown blend mode '{0}' (expected multiply, alpha or mask)")]
    InvalidBlendMode(String),

    #[error("degenerate {what}: {width}x{height}")]
    DegenerateRegion {
        what: &'static str,
        width: i32,
        height: i32,
    },

    #[error("rectangle {rect:?} lies outside the {width}x{height} image")]
    OutOfBounds { rect: Rect, width: u32, height: u32 },

    #[error("invalid sample range [{lo}, {hi})")]
    InvalidRange { lo: f64, hi: f64 },

    #[error("patch sizes differ: {dest:?} vs {src:?}")]
    SizeMismatch { dest: (u32, u32), src: (u32, u32) },

    #[error("source image unavailable: {0}")]
    ResourceUnavailable(String),
}
