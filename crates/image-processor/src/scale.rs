//! Uniform "fit" scale between a container and its content.

use tracing::debug;

use crate::ProcessError;
use crate::geometry::Dim;

/// Largest uniform scale at which `content` still fits inside `container`.
///
/// Computes `container / content` per axis and takes the minimum. Both
/// dimensions must be strictly positive, otherwise the ratio is undefined
/// and [`ProcessError::DegenerateRegion`] is returned.
pub fn compute_fit_scale(container: Dim, content: Dim) -> Result<f64, ProcessError> {
    if !container.is_positive() {
        return Err(ProcessError::DegenerateRegion {
            what: "container",
            width: container.width,
            height: container.height,
        });
    }
    if !content.is_positive() {
        return Err(ProcessError::DegenerateRegion {
            what: "content",
            width: content.width,
            height: content.height,
        });
    }

    let sx = f64::from(container.width) / f64::from(content.width);
    let sy = f64::from(container.height) / f64::from(content.height);
    let fit = sx.min(sy);

    debug!(sx, sy, fit, "Computed fit scale");
    Ok(fit)
}
