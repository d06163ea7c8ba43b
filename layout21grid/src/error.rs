//!
//! # Grid Result and Error Types
//!

// Local Imports
use crate::ser;

/// # [GridError] Result Type
pub type GridResult<T> = Result<T, GridError>;

/// # [StoreError] Result Type
pub type StoreResult<T> = Result<T, StoreError>;

///
/// # Grid Generation Error Enumeration
///
pub enum GridError {
    /// A [LevelDescriptor](crate::LevelDescriptor), element size, or child extent violating its invariants
    InvalidConfiguration(String),
    /// Failure reported by the layout store, passed through unmodified
    Store(StoreError),
    /// Boxed External Errors, e.g. reading or parsing configuration files
    Boxed(Box<dyn std::error::Error + Send + Sync>),
}
impl GridError {
    /// Create a [GridError::InvalidConfiguration] from anything String-convertible
    pub fn config(s: impl Into<String>) -> Self {
        Self::InvalidConfiguration(s.into())
    }
    /// Create an error-variant [Result] of [GridError::InvalidConfiguration]
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::config(s))
    }
}
impl std::fmt::Debug for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GridError::InvalidConfiguration(msg) => write!(f, "Invalid Configuration: {}", msg),
            GridError::Store(err) => write!(f, "Layout Store Error: {}", err),
            GridError::Boxed(err) => write!(f, "{:?}", err),
        }
    }
}
impl std::fmt::Display for GridError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}
impl From<StoreError> for GridError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
impl From<ser::Error> for GridError {
    fn from(e: ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}

///
/// # Layout Store Error Enumeration
///
pub enum StoreError {
    /// A cell of this name already exists
    DuplicateName(String),
    /// Cell handle not present in the store
    UnknownHandle(String),
    /// Reference would create a containment cycle; holds the (parent, child) cell names
    Cycle(String, String),
    /// File writing failure
    Io(std::io::Error),
    /// Content the export format cannot represent
    Export(String),
}
impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StoreError::DuplicateName(name) => write!(f, "Duplicate cell name `{}`", name),
            StoreError::UnknownHandle(h) => write!(f, "Unknown cell handle {}", h),
            StoreError::Cycle(parent, child) => write!(
                f,
                "Referencing `{}` from `{}` would create a cycle",
                child, parent
            ),
            StoreError::Io(err) => write!(f, "IO Error: {}", err),
            StoreError::Export(msg) => write!(f, "Export Error: {}", msg),
        }
    }
}
impl std::fmt::Display for StoreError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<std::fmt::Error> for StoreError {
    fn from(e: std::fmt::Error) -> Self {
        Self::Export(e.to_string())
    }
}
impl From<gds21::GdsError> for StoreError {
    /// IO failures stay [StoreError::Io]; everything else is an [StoreError::Export] failure.
    fn from(e: gds21::GdsError) -> Self {
        match e {
            gds21::GdsError::Boxed(b) => match b.downcast::<std::io::Error>() {
                Ok(io) => Self::Io(*io),
                Err(other) => Self::Export(other.to_string()),
            },
            other => Self::Export(other.to_string()),
        }
    }
}
