//!
//! # GDSII Export Module
//!

// Std-Lib
use std::convert::TryFrom;

// Local imports
use crate::error::{StoreError, StoreResult};
use crate::geom::{Point, Shape};
use crate::store::{Cell, Library, Reference};

/// # Gds21 Converter
/// Converts a [Library] to a GDSII library ([gds21::GdsLibrary]).
/// Cells become structs, in creation order;
/// rectangles become closed boundaries and references become struct-references.
#[derive(Debug)]
pub struct GdsConverter<'lib> {
    lib: &'lib Library,
    /// Database units per layout unit
    scale: f64,
}
impl<'lib> GdsConverter<'lib> {
    pub fn convert(lib: &'lib Library) -> StoreResult<gds21::GdsLibrary> {
        let units = &lib.units;
        if !(units.unit > 0.0 && units.precision > 0.0) {
            return Err(StoreError::Export(format!("Invalid units {:?}", units)));
        }
        Self {
            lib,
            scale: units.unit / units.precision,
        }
        .convert_all()
    }
    fn convert_all(self) -> StoreResult<gds21::GdsLibrary> {
        let mut gds = gds21::GdsLibrary::new(&self.lib.name);
        gds.dates = gds21::GdsDateTimes::at(self.lib.timestamp);
        gds.units = gds21::GdsUnits::new(
            self.lib.units.precision / self.lib.units.unit,
            self.lib.units.precision,
        );
        gds.structs = self
            .lib
            .cells()
            .map(|(_, c)| self.convert_cell(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(gds)
    }
    /// Convert a [Cell] to a [gds21::GdsStruct] cell-definition
    fn convert_cell(&self, cell: &Cell) -> StoreResult<gds21::GdsStruct> {
        let mut elems = Vec::with_capacity(cell.shapes.len() + cell.refs.len());
        for shape in cell.shapes.iter() {
            elems.push(self.convert_shape(shape)?.into());
        }
        for r in cell.refs.iter() {
            elems.push(self.convert_ref(r)?.into());
        }
        let mut s = gds21::GdsStruct::new(&cell.name);
        s.dates = gds21::GdsDateTimes::at(self.lib.timestamp);
        s.elems = elems;
        Ok(s)
    }
    /// Convert a [Shape] to a closed five-point [gds21::GdsBoundary]
    fn convert_shape(&self, shape: &Shape) -> StoreResult<gds21::GdsBoundary> {
        Ok(gds21::GdsBoundary::rect(
            shape.layer.layer,
            shape.layer.datatype,
            self.convert_point(&shape.rect.p0)?,
            self.convert_point(&shape.rect.p1)?,
        ))
    }
    /// Convert a [Reference] to a GDS instance, AKA [gds21::GdsStructRef]
    fn convert_ref(&self, r: &Reference) -> StoreResult<gds21::GdsStructRef> {
        Ok(gds21::GdsStructRef {
            name: self.lib.cell(r.cell)?.name.clone(),
            xy: self.convert_point(&r.loc)?,
        })
    }
    /// Convert a layout-unit [Point] to integer database units
    fn convert_point(&self, p: &Point) -> StoreResult<gds21::GdsPoint> {
        Ok(gds21::GdsPoint::new(self.to_db(p.x)?, self.to_db(p.y)?))
    }
    fn to_db(&self, val: f64) -> StoreResult<i32> {
        let db = (val * self.scale).round();
        if !db.is_finite() || db < i32::MIN as f64 || db > i32::MAX as f64 {
            return Err(StoreError::Export(format!(
                "Coordinate {} exceeds the GDSII 32-bit range",
                val
            )));
        }
        // Range-checked above
        i32::try_from(db as i64).map_err(|e| StoreError::Export(e.to_string()))
    }
}
