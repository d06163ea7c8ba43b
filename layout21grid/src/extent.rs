//!
//! # Size Calculator
//!
//! Bounding extents of grid levels, computed from their child's extent.
//!

// Local imports
use crate::error::{GridError, GridResult};
use crate::geom::Extent;
use crate::level::LevelDescriptor;

/// Compute the extent of a grid of `desc.columns` by `desc.rows` children, each `child_width` by `child_height`.
///
/// Along each axis: `count` repeats of the child extent, with `count - 1` gaps of `spacing` between them,
/// and no trailing gap after the last.
///
/// Fails with [GridError::InvalidConfiguration] for negative or non-finite child dimensions.
pub fn compute_extent(
    desc: &LevelDescriptor,
    child_width: f64,
    child_height: f64,
) -> GridResult<(f64, f64)> {
    check_child(child_width, child_height)?;
    let width = axis_extent(desc.columns(), desc.spacing(), child_width);
    let height = axis_extent(desc.rows(), desc.spacing(), child_height);
    Ok((width, height))
}

/// [Extent]-typed wrapper around [compute_extent]
pub fn grid_extent(desc: &LevelDescriptor, child: &Extent) -> GridResult<Extent> {
    let (width, height) = compute_extent(desc, child.width, child.height)?;
    Ok(Extent::new(width, height))
}

/// Validate a child extent
pub(crate) fn check_child(child_width: f64, child_height: f64) -> GridResult<()> {
    for (name, val) in [("width", child_width), ("height", child_height)] {
        if !val.is_finite() || val < 0.0 {
            return GridError::fail(format!(
                "child {} must be finite and non-negative, got {}",
                name, val
            ));
        }
    }
    Ok(())
}

/// Extent along a single axis
fn axis_extent(count: usize, spacing: f64, child: f64) -> f64 {
    // `count >= 1` is a [LevelDescriptor] invariant
    (count - 1) as f64 * spacing + count as f64 * child
}
