//!
//! # Generator Configuration
//!
//! [GridConfig] is the fully-resolved, validated configuration of a build.
//! Callers customize it through a [ConfigOverride], which is merged per-field
//! over the built-in defaults. Neither is ever mutated in place;
//! [GridConfig::merge] produces a new value.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::error::{GridError, GridResult};
use crate::level::{Level, LevelDescriptor};
use crate::ser::SerializationFormat;
use crate::store::Units;
use crate::svg::SvgOptions;

/// # Element Configuration
/// The leaf level is a single square of side `size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementConfig {
    size: f64,
}
impl ElementConfig {
    /// Create a new [ElementConfig]. `size` must be finite and non-negative.
    pub fn new(size: f64) -> GridResult<Self> {
        if !size.is_finite() || size < 0.0 {
            return GridError::fail(format!(
                "element size must be finite and non-negative, got {}",
                size
            ));
        }
        Ok(Self { size })
    }
    pub fn size(&self) -> f64 {
        self.size
    }
}

/// # Library Configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryConfig {
    pub name: String,
    pub units: Units,
}
impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "library".into(),
            units: Units::default(),
        }
    }
}

///
/// # Resolved Generator Configuration
///
/// Defaults:
///
/// | level           | rows | columns | spacing |
/// |-----------------|------|---------|---------|
/// | `sub_container` | 2    | 2       | 10      |
/// | `container`     | 2    | 2       | 25      |
/// | `top`           | 2    | 2       | 50      |
///
/// with a five-unit `element`.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridConfig {
    pub library: LibraryConfig,
    pub element: ElementConfig,
    pub sub_container: LevelDescriptor,
    pub container: LevelDescriptor,
    pub top: LevelDescriptor,
    pub preview: SvgOptions,
}
impl GridConfig {
    /// Built-in default configuration, created fresh on each call
    pub fn defaults() -> GridResult<Self> {
        Ok(Self {
            library: LibraryConfig::default(),
            element: ElementConfig::new(5.0)?,
            sub_container: LevelDescriptor::new(2, 2, 10.0)?,
            container: LevelDescriptor::new(2, 2, 25.0)?,
            top: LevelDescriptor::new(2, 2, 50.0)?,
            preview: SvgOptions::default(),
        })
    }
    /// Resolve the configuration for optional overrides `ov`
    pub fn resolve(ov: Option<&ConfigOverride>) -> GridResult<Self> {
        let defaults = Self::defaults()?;
        match ov {
            Some(ov) => defaults.merge(ov),
            None => Ok(defaults),
        }
    }
    /// Grid descriptor for `level`. [Level::Element] has none.
    pub fn descriptor(&self, level: Level) -> Option<&LevelDescriptor> {
        match level {
            Level::Element => None,
            Level::SubContainer => Some(&self.sub_container),
            Level::Container => Some(&self.container),
            Level::Top => Some(&self.top),
        }
    }
    /// Merge `ov` over `self`, field by field, producing a new and validated [GridConfig]
    pub fn merge(&self, ov: &ConfigOverride) -> GridResult<Self> {
        let library = match &ov.library {
            Some(lib) => lib.merge(&self.library)?,
            None => self.library.clone(),
        };
        let element = match ov.element.as_ref().and_then(|e| e.size) {
            Some(size) => ElementConfig::new(size)?,
            None => self.element,
        };
        let merge_level = |level: Level, ov: &Option<LevelOverride>, base: &LevelDescriptor| match ov {
            Some(lo) => lo.merge(base).map_err(|e| match e {
                GridError::InvalidConfiguration(msg) => {
                    GridError::config(format!("level `{}`: {}", level, msg))
                }
                other => other,
            }),
            None => Ok(*base),
        };
        Ok(Self {
            library,
            element,
            sub_container: merge_level(Level::SubContainer, &ov.sub_container, &self.sub_container)?,
            container: merge_level(Level::Container, &ov.container, &self.container)?,
            top: merge_level(Level::Top, &ov.top, &self.top)?,
            preview: ov.preview.clone().unwrap_or_else(|| self.preview.clone()),
        })
    }
}

///
/// # Configuration Overrides
///
/// Keyed by level name. Every field is optional, at every depth;
/// anything absent falls back to the configuration being merged onto.
///
/// In YAML:
///
/// ```yaml
/// element:
///   size: 5
/// sub_container:
///   rows: 3
///   cols: 3
///   spacing: 10
/// top:
///   spacing: 200
/// ```
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_container: Option<LevelOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<LevelOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<LevelOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<SvgOptions>,
}
impl ConfigOverride {
    /// Load from file `fname`, in the format implied by its extension
    pub fn open(fname: impl AsRef<Path>) -> GridResult<Self> {
        let fmt = SerializationFormat::from_path(&fname)?;
        Ok(fmt.open(fname)?)
    }
    /// Parse from string `s` in format `fmt`
    pub fn parse(fmt: SerializationFormat, s: &str) -> GridResult<Self> {
        Ok(fmt.from_str(s)?)
    }
    /// Builder-style setter for the element size
    pub fn with_element_size(mut self, size: f64) -> Self {
        self.element = Some(ElementOverride { size: Some(size) });
        self
    }
    /// Builder-style setter for grid-level `level`. Setting [Level::Element] is a no-op.
    pub fn with_level(mut self, level: Level, ov: LevelOverride) -> Self {
        match level {
            Level::Element => (),
            Level::SubContainer => self.sub_container = Some(ov),
            Level::Container => self.container = Some(ov),
            Level::Top => self.top = Some(ov),
        }
        self
    }
}

/// # Element Override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementOverride {
    pub size: Option<f64>,
}

/// # Grid-Level Override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelOverride {
    pub rows: Option<usize>,
    #[serde(alias = "cols")]
    pub columns: Option<usize>,
    pub spacing: Option<f64>,
}
impl LevelOverride {
    /// Create a complete override, setting every field
    pub fn new(rows: usize, columns: usize, spacing: f64) -> Self {
        Self {
            rows: Some(rows),
            columns: Some(columns),
            spacing: Some(spacing),
        }
    }
    fn merge(&self, base: &LevelDescriptor) -> GridResult<LevelDescriptor> {
        LevelDescriptor::new(
            self.rows.unwrap_or(base.rows()),
            self.columns.unwrap_or(base.columns()),
            self.spacing.unwrap_or(base.spacing()),
        )
    }
}

/// # Library Override
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryOverride {
    pub name: Option<String>,
    /// Layout unit, in metres
    pub unit: Option<f64>,
    /// Database unit, in metres
    pub precision: Option<f64>,
}
impl LibraryOverride {
    fn merge(&self, base: &LibraryConfig) -> GridResult<LibraryConfig> {
        let units = Units {
            unit: self.unit.unwrap_or(base.units.unit),
            precision: self.precision.unwrap_or(base.units.precision),
        };
        for (name, val) in [("unit", units.unit), ("precision", units.precision)] {
            if !val.is_finite() || val <= 0.0 {
                return GridError::fail(format!("library {} must be positive, got {}", name, val));
            }
        }
        Ok(LibraryConfig {
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            units,
        })
    }
}
