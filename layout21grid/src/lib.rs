//!
//! # Layout21 Nested Grid Generator
//!
//! Generates a four-level hierarchy of uniformly-arrayed cells:
//!
//! * `element`: a single square
//! * `sub_container`: a grid of `element`s
//! * `container`: a grid of `sub_container`s
//! * `top`: a grid of `container`s
//!
//! Each grid level is described by a [LevelDescriptor] (rows, columns, spacing).
//! Levels are built leaves-first, as each level's instance pitch depends on its child's [Extent]:
//!
//! ```text
//! width  = (columns - 1) * spacing + columns * child_width
//! height = (rows - 1)    * spacing + rows    * child_height
//! ```
//!
//! All layout storage goes through the [LayoutStore] trait.
//! The in-memory [Library] implements it, exporting GDSII (via [gds21]) and SVG previews.
//!
//! ## Usage
//!
//! ```
//! use layout21grid::{HierarchyBuilder, Level};
//! let builder = HierarchyBuilder::from_overrides(None).unwrap();
//! let mut lib = builder.library();
//! let hier = builder.build(&mut lib).unwrap();
//! assert_eq!(hier.top().extent.as_tuple(), (180.0, 180.0));
//! assert_eq!(lib.flat_count(hier.top().cell).unwrap(), 64);
//! ```
//!
//! Or run the whole pipeline, writing files, with [generate].
//!

pub mod bbox;
pub mod config;
pub mod error;
pub mod extent;
pub mod gds;
pub mod geom;
pub mod hierarchy;
pub mod level;
pub mod placer;
pub mod ser;
pub mod store;
pub mod svg;

pub use bbox::{BoundBox, BoundBoxTrait};
pub use config::{ConfigOverride, ElementOverride, GridConfig, LevelOverride, LibraryOverride};
pub use error::{GridError, GridResult, StoreError, StoreResult};
pub use extent::{compute_extent, grid_extent};
pub use geom::{Extent, Layer, Point, Rect, Shape};
pub use hierarchy::{export, generate, BuiltLevel, Hierarchy, HierarchyBuilder};
pub use level::{Level, LevelDescriptor};
pub use placer::{grid_origins, place_grid};
pub use ser::SerializationFormat;
pub use store::{Cell, CellKey, LayoutStore, Library, LibraryStats, Reference, Units};
pub use svg::SvgOptions;

#[cfg(test)]
mod tests;
