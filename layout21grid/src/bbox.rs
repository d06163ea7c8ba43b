//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Extent, Point};

/// # Rectangular Bounding Box
///
/// Points `p0` and `p1` represent opposite corners of a bounding rectangle.
/// `p0` is always closest to negative-infinity, in both x and y,
/// and `p1` is always closest to positive-infinity.
///
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create a new [BoundBox] from two points, in either order
    pub fn from_points(p0: &Point, p1: &Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(f64::INFINITY, f64::INFINITY),
            p1: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Get the box's size as an [Extent]
    pub fn size(&self) -> Extent {
        if self.is_empty() {
            return Extent::default();
        }
        Extent::new(self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
    /// Create a new [BoundBox] shifted by `p`
    pub fn shift(&self, p: &Point) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            p0: self.p0.shift(p),
            p1: self.p1.shift(p),
        }
    }
}

///
/// # Bounding Box Trait
///
/// Implementations for [BoundBox]es and [crate::Shape]s enable unions of mixed geometry.
///
pub trait BoundBoxTrait {
    /// Compute a rectangular bounding box around the implementing type.
    fn bbox(&self) -> BoundBox;
    /// Compute the union with rectangular bounding box `bbox`.
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        let this = self.bbox();
        if this.is_empty() {
            return *bbox;
        }
        if bbox.is_empty() {
            return this;
        }
        BoundBox {
            p0: Point::new(this.p0.x.min(bbox.p0.x), this.p0.y.min(bbox.p0.y)),
            p1: Point::new(this.p1.x.max(bbox.p1.x), this.p1.y.max(bbox.p1.y)),
        }
    }
}
impl BoundBoxTrait for BoundBox {
    fn bbox(&self) -> BoundBox {
        *self
    }
}
