//!
//! # Hierarchy Levels and their Grid Descriptors
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::error::{GridError, GridResult};

/// # Hierarchy Level
///
/// One tier of the generated hierarchy, ordered leaves-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Element,
    SubContainer,
    Container,
    Top,
}
impl Level {
    /// All levels, in build order
    pub const ALL: [Level; 4] = [
        Level::Element,
        Level::SubContainer,
        Level::Container,
        Level::Top,
    ];
    /// The grid levels, i.e. everything but the leaf [Level::Element], in build order
    pub const GRIDS: [Level; 3] = [Level::SubContainer, Level::Container, Level::Top];

    /// Level name, used both as its configuration key and as its cell name
    pub fn name(&self) -> &'static str {
        match self {
            Level::Element => "element",
            Level::SubContainer => "sub_container",
            Level::Container => "container",
            Level::Top => "top",
        }
    }
    /// Position in build order
    pub fn index(&self) -> usize {
        *self as usize
    }
    /// The level this one arrays, if any
    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Element => None,
            Level::SubContainer => Some(Level::Element),
            Level::Container => Some(Level::SubContainer),
            Level::Top => Some(Level::Container),
        }
    }
}
impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

///
/// # Level Descriptor
///
/// Immutable grid parameters for one level:
/// `rows` by `columns` instances of its child, separated by `spacing` along each axis.
///
/// Construction via [LevelDescriptor::new] enforces `rows >= 1`, `columns >= 1`,
/// and a finite, non-negative `spacing`.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelDescriptor {
    rows: usize,
    columns: usize,
    spacing: f64,
}
impl LevelDescriptor {
    /// Create a new [LevelDescriptor], validating its invariants
    pub fn new(rows: usize, columns: usize, spacing: f64) -> GridResult<Self> {
        if rows < 1 {
            return GridError::fail(format!("rows must be at least 1, got {}", rows));
        }
        if columns < 1 {
            return GridError::fail(format!("columns must be at least 1, got {}", columns));
        }
        if !spacing.is_finite() || spacing < 0.0 {
            return GridError::fail(format!(
                "spacing must be finite and non-negative, got {}",
                spacing
            ));
        }
        Ok(Self {
            rows,
            columns,
            spacing,
        })
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }
    pub fn spacing(&self) -> f64 {
        self.spacing
    }
    /// Number of instances in the grid
    pub fn total_elements(&self) -> usize {
        self.rows * self.columns
    }
}
