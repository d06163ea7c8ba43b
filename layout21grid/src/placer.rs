//!
//! # Grid Placer
//!
//! Materializes one level's uniform array of child references into a [LayoutStore].
//!

// Crates.io
use log::debug;

// Local imports
use crate::error::GridResult;
use crate::extent::check_child;
use crate::geom::Point;
use crate::level::LevelDescriptor;
use crate::store::LayoutStore;

/// Origins of each instance in the grid of `desc`, for a child of size `child_width` by `child_height`.
///
/// Instance (`row`, `col`) sits at `(col * (child_width + spacing), row * (child_height + spacing))`,
/// so instance (0, 0) is anchored at the origin.
/// Yields exactly `desc.total_elements()` points, row-major: rows outer, columns inner.
pub fn grid_origins(
    desc: &LevelDescriptor,
    child_width: f64,
    child_height: f64,
) -> impl Iterator<Item = Point> {
    let pitch_x = child_width + desc.spacing();
    let pitch_y = child_height + desc.spacing();
    let columns = desc.columns();
    (0..desc.rows()).flat_map(move |row| {
        (0..columns).map(move |col| Point::new(col as f64 * pitch_x, row as f64 * pitch_y))
    })
}

/// Place `desc.total_elements()` references to `child` into `target`, one per grid position.
///
/// Child dimensions are validated before anything is placed,
/// failing with [crate::GridError::InvalidConfiguration].
/// Store failures are returned unmodified, as [crate::GridError::Store].
///
/// Returns the number of placements made.
pub fn place_grid<S: LayoutStore>(
    desc: &LevelDescriptor,
    child: S::Handle,
    target: S::Handle,
    child_width: f64,
    child_height: f64,
    store: &mut S,
) -> GridResult<usize> {
    check_child(child_width, child_height)?;
    let mut count = 0;
    for origin in grid_origins(desc, child_width, child_height) {
        store.add_array_reference(target, child, origin)?;
        count += 1;
    }
    debug!(
        "Placed {} x {} grid of {:?} into {:?}",
        desc.rows(),
        desc.columns(),
        child,
        target
    );
    Ok(count)
}
