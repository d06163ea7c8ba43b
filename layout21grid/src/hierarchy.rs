//!
//! # Hierarchy Builder
//!
//! Builds the four levels, leaves first:
//! the `element` square, then `sub_container`, `container` and `top` grids,
//! each arraying the level below it. A level's extent is only known once its child's is,
//! so each step threads the previous level's cell and extent into the next.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use log::info;

// Local imports
use crate::config::{ConfigOverride, GridConfig};
use crate::error::{GridError, GridResult};
use crate::extent::grid_extent;
use crate::geom::{Extent, Layer, Shape};
use crate::level::Level;
use crate::placer::place_grid;
use crate::store::{CellKey, LayoutStore, Library};

/// # Built Level
/// Record of one constructed level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltLevel<H> {
    pub level: Level,
    /// Handle of the level's cell
    pub cell: H,
    /// Computed extent
    pub extent: Extent,
    /// Number of child references placed; zero for the element
    pub placements: usize,
}

/// # Built Hierarchy
/// One [BuiltLevel] per [Level], in build order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy<H> {
    levels: Vec<BuiltLevel<H>>,
}
impl<H> Hierarchy<H> {
    /// Get the record for `level`
    pub fn level(&self, level: Level) -> &BuiltLevel<H> {
        &self.levels[level.index()]
    }
    /// Get the top-level record
    pub fn top(&self) -> &BuiltLevel<H> {
        self.level(Level::Top)
    }
    /// Iterate over all levels, in build order
    pub fn levels(&self) -> impl Iterator<Item = &BuiltLevel<H>> {
        self.levels.iter()
    }
}

///
/// # Hierarchy Builder
///
/// Holds a resolved [GridConfig], and builds it into any [LayoutStore].
///
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    config: GridConfig,
}
impl HierarchyBuilder {
    /// Create a new [HierarchyBuilder] for `config`
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }
    /// Create a new [HierarchyBuilder] for the defaults, merged with optional overrides `ov`
    pub fn from_overrides(ov: Option<&ConfigOverride>) -> GridResult<Self> {
        Ok(Self::new(GridConfig::resolve(ov)?))
    }
    pub fn config(&self) -> &GridConfig {
        &self.config
    }
    /// Create an empty [Library] named and scaled per our configuration
    pub fn library(&self) -> Library {
        let mut lib = Library::new(&self.config.library.name).with_units(self.config.library.units);
        lib.svg = self.config.preview.clone();
        lib
    }
    /// Build all levels into `store`
    pub fn build<S: LayoutStore>(&self, store: &mut S) -> GridResult<Hierarchy<S::Handle>> {
        // The element: a single square, its extent an input rather than computed
        let size = self.config.element.size();
        let element = store.new_cell(Level::Element.name())?;
        store.add_shape(element, Shape::square(Layer::default(), size))?;
        let mut levels = vec![BuiltLevel {
            level: Level::Element,
            cell: element,
            extent: Extent::square(size),
            placements: 0,
        }];
        info!("Created `{}`, {} x {}", Level::Element, size, size);

        // And each grid level, arraying the one before it
        for level in Level::GRIDS {
            let desc = self
                .config
                .descriptor(level)
                .ok_or_else(|| GridError::config(format!("No descriptor for `{}`", level)))?;
            let child = *levels
                .last()
                .ok_or_else(|| GridError::config(format!("No child level for `{}`", level)))?;
            let cell = store.new_cell(level.name())?;
            let (cw, ch) = child.extent.as_tuple();
            let placements = place_grid(desc, child.cell, cell, cw, ch, &mut *store)?;
            let extent = grid_extent(desc, &child.extent)?;
            info!(
                "Created `{}`: {} x {} of `{}`, extent {} x {}",
                level,
                desc.rows(),
                desc.columns(),
                child.level,
                extent.width,
                extent.height
            );
            levels.push(BuiltLevel {
                level,
                cell,
                extent,
                placements,
            });
        }
        Ok(Hierarchy { levels })
    }
}

/// Export `store`'s layout to `gds`, and a preview of `hier`'s top cell to `svg`
pub fn export<S: LayoutStore>(
    store: &S,
    hier: &Hierarchy<S::Handle>,
    gds: impl AsRef<Path>,
    svg: impl AsRef<Path>,
) -> GridResult<()> {
    store.export_layout(gds.as_ref())?;
    store.render_preview(hier.top().cell, svg.as_ref())?;
    Ok(())
}

/// Run the whole pipeline: resolve the configuration, build it into a fresh [Library], and export.
/// Writes GDSII to `gds` and an SVG preview of the top cell to `svg`.
pub fn generate(
    ov: Option<&ConfigOverride>,
    gds: impl AsRef<Path>,
    svg: impl AsRef<Path>,
) -> GridResult<(Library, Hierarchy<CellKey>)> {
    let builder = HierarchyBuilder::from_overrides(ov)?;
    let mut lib = builder.library();
    let hier = builder.build(&mut lib)?;
    export(&lib, &hier, gds, svg)?;
    Ok((lib, hier))
}
