//!
//! # Geometry Module
//!
//! Points, extents, layers and shapes, all in the layout's single abstract length unit.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::bbox::{BoundBox, BoundBoxTrait};

/// # Point in two-dimensional layout-space
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Create a new point shifted by `p.x` in the x-dimension and by `p.y` in the y-dimension
    pub fn shift(&self, p: &Point) -> Point {
        Point {
            x: p.x + self.x,
            y: p.y + self.y,
        }
    }
}
impl From<(f64, f64)> for Point {
    fn from(xy: (f64, f64)) -> Self {
        Self::new(xy.0, xy.1)
    }
}

/// # Extent
///
/// The (width, height) bounding size of a level's tiled output.
/// Always derived, either from the element size or from a level's grid and its child's extent.
///
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}
impl Extent {
    /// Create a new [Extent]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
    /// Create a square [Extent] of side `size`
    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }
    /// Convert to a (width, height) tuple
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// # Layer
///
/// GDSII-style (layer, datatype) number pair.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Layer {
    pub layer: i16,
    pub datatype: i16,
}
impl Layer {
    pub fn new(layer: i16, datatype: i16) -> Self {
        Self { layer, datatype }
    }
}

/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
///
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Create a new [Rect] from two opposite corners
    pub fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
}

/// # Shape
///
/// Geometry placed directly into a cell, on a [Layer].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    pub layer: Layer,
    pub rect: Rect,
}
impl Shape {
    /// Create a rectangle [Shape] on `layer`
    pub fn rect(layer: Layer, p0: Point, p1: Point) -> Self {
        Self {
            layer,
            rect: Rect::new(p0, p1),
        }
    }
    /// Square of side `size`, anchored at the origin, on `layer`
    pub fn square(layer: Layer, size: f64) -> Self {
        Self::rect(layer, Point::new(0.0, 0.0), Point::new(size, size))
    }
}
impl BoundBoxTrait for Shape {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_points(&self.rect.p0, &self.rect.p1)
    }
}
