//! Debug overlays for checking annotated regions by eye.

use image::RgbImage;
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use tracing::debug;

use crate::geometry::{Color, Point, Rect};

/// Outline `rect` on `img`. Both corners are inclusive.
///
/// Inverted rectangles are skipped.
pub fn draw_rect(img: &mut RgbImage, rect: Rect, color: Color) {
    let dim = rect.dim();
    if dim.width < 0 || dim.height < 0 {
        debug!(?rect, "Skipping inverted rectangle");
        return;
    }
    let outline = imageproc::rect::Rect::at(rect.left, rect.top)
        .of_size(dim.width as u32 + 1, dim.height as u32 + 1);
    draw_hollow_rect_mut(img, outline, color.to_rgb());
}

/// Draw a closed polyline through `points`.
pub fn draw_polygon(img: &mut RgbImage, points: &[Point], color: Color) {
    if points.is_empty() {
        return;
    }
    let rgb = color.to_rgb();
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        draw_line_segment_mut(
            img,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            rgb,
        );
    }
}
