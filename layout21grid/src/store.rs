//!
//! # Layout Store
//!
//! The [LayoutStore] trait is the generator's sole interface to layout storage:
//! create named cells, add shapes, add positioned references, and export.
//!
//! [Library] is the in-memory implementation, exporting GDSII and SVG previews.
//!

// Std-Lib
use std::collections::{HashMap, HashSet};
use std::path::Path;

// Crates.io
use chrono::NaiveDateTime;
use log::info;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

// Local imports
use crate::bbox::{BoundBox, BoundBoxTrait};
use crate::error::{StoreError, StoreResult};
use crate::geom::{Point, Shape};
use crate::gds::GdsConverter;
use crate::svg::{SvgOptions, SvgRenderer};

///
/// # Layout Store Trait
///
/// Cells are identified by the `Handle`s returned from [LayoutStore::new_cell].
/// Implementers own all cell storage; callers only ever hold handles.
///
pub trait LayoutStore {
    /// Cell handle type
    type Handle: Copy + std::fmt::Debug;

    /// Create a new, empty cell named `name`.
    /// Fails with [StoreError::DuplicateName] if the name is taken.
    fn new_cell(&mut self, name: &str) -> StoreResult<Self::Handle>;
    /// Add `shape` to `cell`
    fn add_shape(&mut self, cell: Self::Handle, shape: Shape) -> StoreResult<()>;
    /// Add a reference to `child` into `parent`, with its origin at `origin`.
    /// Fails with [StoreError::UnknownHandle] for invalid handles,
    /// and [StoreError::Cycle] if `parent` would (transitively) contain itself.
    fn add_array_reference(
        &mut self,
        parent: Self::Handle,
        child: Self::Handle,
        origin: Point,
    ) -> StoreResult<()>;
    /// Export the whole hierarchy to a layout file at `path`
    fn export_layout(&self, path: &Path) -> StoreResult<()>;
    /// Render `cell` to a preview image at `path`
    fn render_preview(&self, cell: Self::Handle, path: &Path) -> StoreResult<()>;
}

// Create key-types for each internal type stored in [SlotMap]s
new_key_type! {
    /// Keys for [Cell] entries
    pub struct CellKey;
}

/// # Cell Reference
/// A placement of another [Cell], by key, with its origin at `loc`
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub cell: CellKey,
    pub loc: Point,
}

/// # Layout Cell
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Cell Name
    pub name: String,
    /// Shapes
    pub shapes: Vec<Shape>,
    /// References to other cells
    pub refs: Vec<Reference>,
}
impl Cell {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// # Distance Units
///
/// `unit` is the size of the layout's length unit, and
/// `precision` the size of a database (integer-coordinate) unit, both in metres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Units {
    pub unit: f64,
    pub precision: f64,
}
impl Default for Units {
    /// Micron layout units, nanometre database units
    fn default() -> Self {
        Self {
            unit: 1e-6,
            precision: 1e-9,
        }
    }
}

/// # Library Statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub cells: usize,
    pub shapes: usize,
    pub references: usize,
}

///
/// # Layout Library
///
/// In-memory [LayoutStore]. Cells live in a [SlotMap], in creation order,
/// indexed by name.
///
#[derive(Debug, Clone)]
pub struct Library {
    /// Library Name
    pub name: String,
    /// Distance Units
    pub units: Units,
    /// Modification & access time written to GDSII.
    /// Fixed by default, so that identical libraries export identical bytes.
    pub timestamp: NaiveDateTime,
    /// SVG preview settings
    pub svg: SvgOptions,
    cells: SlotMap<CellKey, Cell>,
    names: HashMap<String, CellKey>,
}
impl Library {
    /// Create a new and empty [Library]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Units::default(),
            timestamp: NaiveDateTime::default(),
            svg: SvgOptions::default(),
            cells: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }
    /// Builder-style setter for `units`
    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }
    /// Get a reference to the [Cell] at `key`
    pub fn cell(&self, key: CellKey) -> StoreResult<&Cell> {
        self.cells
            .get(key)
            .ok_or_else(|| StoreError::UnknownHandle(format!("{:?}", key)))
    }
    fn cell_mut(&mut self, key: CellKey) -> StoreResult<&mut Cell> {
        self.cells
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownHandle(format!("{:?}", key)))
    }
    /// Get the key of the cell named `name`, if present
    pub fn key(&self, name: &str) -> Option<CellKey> {
        self.names.get(name).copied()
    }
    /// Iterate over all (key, cell) pairs, in creation order
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &Cell)> {
        self.cells.iter()
    }
    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    /// Boolean indication of an empty library
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    /// Boolean indication of whether `ancestor` contains `target`, directly or through any depth of references.
    /// A cell is considered to contain itself.
    pub fn contains(&self, ancestor: CellKey, target: CellKey) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![ancestor];
        while let Some(key) = stack.pop() {
            if key == target {
                return true;
            }
            if !seen.insert(key) {
                continue;
            }
            if let Some(cell) = self.cells.get(key) {
                stack.extend(cell.refs.iter().map(|r| r.cell));
            }
        }
        false
    }
    /// Keys of `top` and every cell it depends upon, ordered children-first.
    pub fn dep_order(&self, top: CellKey) -> StoreResult<Vec<CellKey>> {
        fn visit(
            lib: &Library,
            key: CellKey,
            seen: &mut HashSet<CellKey>,
            order: &mut Vec<CellKey>,
        ) -> StoreResult<()> {
            if !seen.insert(key) {
                return Ok(());
            }
            for r in lib.cell(key)?.refs.iter() {
                visit(lib, r.cell, seen, order)?;
            }
            order.push(key);
            Ok(())
        }
        let mut order = Vec::new();
        visit(self, top, &mut HashSet::new(), &mut order)?;
        Ok(order)
    }
    /// Bounding box of cell `key`: the union of its shapes and its translated references' boxes.
    /// Empty cells produce an empty [BoundBox].
    pub fn bbox(&self, key: CellKey) -> StoreResult<BoundBox> {
        let mut boxes: HashMap<CellKey, BoundBox> = HashMap::new();
        for k in self.dep_order(key)? {
            let cell = self.cell(k)?;
            let mut bbox = BoundBox::empty();
            for shape in cell.shapes.iter() {
                bbox = shape.union(&bbox);
            }
            for r in cell.refs.iter() {
                let child = boxes[&r.cell].shift(&r.loc);
                bbox = child.union(&bbox);
            }
            boxes.insert(k, bbox);
        }
        Ok(boxes[&key])
    }
    /// Number of shapes in cell `key` once its hierarchy is fully flattened
    pub fn flat_count(&self, key: CellKey) -> StoreResult<usize> {
        let mut counts: HashMap<CellKey, usize> = HashMap::new();
        for k in self.dep_order(key)? {
            let cell = self.cell(k)?;
            let nested: usize = cell.refs.iter().map(|r| counts[&r.cell]).sum();
            counts.insert(k, cell.shapes.len() + nested);
        }
        Ok(counts[&key])
    }
    /// Collect the library's aggregate statistics
    pub fn stats(&self) -> LibraryStats {
        let mut stats = LibraryStats {
            cells: self.cells.len(),
            ..Default::default()
        };
        for cell in self.cells.values() {
            stats.shapes += cell.shapes.len();
            stats.references += cell.refs.len();
        }
        stats
    }
    /// Convert to a [gds21::GdsLibrary]
    pub fn to_gds(&self) -> StoreResult<gds21::GdsLibrary> {
        GdsConverter::convert(self)
    }
    /// Render cell `key` to an SVG string
    pub fn to_svg(&self, key: CellKey) -> StoreResult<String> {
        SvgRenderer::render(self, key, &self.svg)
    }
}
impl LayoutStore for Library {
    type Handle = CellKey;

    fn new_cell(&mut self, name: &str) -> StoreResult<CellKey> {
        if self.names.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        let key = self.cells.insert(Cell::new(name));
        self.names.insert(name.to_string(), key);
        Ok(key)
    }
    fn add_shape(&mut self, cell: CellKey, shape: Shape) -> StoreResult<()> {
        self.cell_mut(cell)?.shapes.push(shape);
        Ok(())
    }
    fn add_array_reference(
        &mut self,
        parent: CellKey,
        child: CellKey,
        origin: Point,
    ) -> StoreResult<()> {
        let parent_name = self.cell(parent)?.name.clone();
        let child_name = self.cell(child)?.name.clone();
        if self.contains(child, parent) {
            return Err(StoreError::Cycle(parent_name, child_name));
        }
        self.cell_mut(parent)?.refs.push(Reference {
            cell: child,
            loc: origin,
        });
        Ok(())
    }
    fn export_layout(&self, path: &Path) -> StoreResult<()> {
        let gds = self.to_gds()?;
        gds.save(path)?;
        info!("Wrote {} cells to {:?}", gds.structs.len(), path);
        Ok(())
    }
    fn render_preview(&self, cell: CellKey, path: &Path) -> StoreResult<()> {
        let svg = self.to_svg(cell)?;
        std::fs::write(path, svg)?;
        info!("Wrote preview of `{}` to {:?}", self.cell(cell)?.name, path);
        Ok(())
    }
}
