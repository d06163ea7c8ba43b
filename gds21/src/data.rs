//!
//! # Gds21 Data Model
//!

// Std-Lib
use std::error::Error;
use std::path::Path;

// Local Imports
use super::*;

///
/// # Gds Record Types
///
/// The subset of GDSII record-types which Gds21 writes,
/// each assigned its GDSII record-type number.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdsRecordType {
    Header = 0x00,
    BgnLib = 0x01,
    LibName = 0x02,
    Units = 0x03,
    EndLib = 0x04,
    BgnStruct = 0x05,
    StructName = 0x06, // STRNAME
    EndStruct = 0x07,
    Boundary = 0x08,
    StructRef = 0x0A,
    Layer = 0x0D,
    DataType = 0x0E,
    Xy = 0x10,
    EndElement = 0x11,
    StructRefName = 0x12, // SNAME
}

/// # Gds DataType Enumeration
/// In order as decoded from 16-bit integers in binary data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdsDataType {
    NoData = 0,
    BitArray = 1,
    I16 = 2,
    I32 = 3,
    F32 = 4,
    F64 = 5,
    Str = 6,
}

///
/// # Gds Record Enumeration
///
/// Each record in relatively "raw" form, with its content in GDSII's native data-types.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GdsRecord {
    Header { version: i16 },
    BgnLib { dates: Vec<i16> },
    LibName(String),
    Units(f64, f64),
    EndLib,
    BgnStruct { dates: Vec<i16> },
    StructName(String),    // STRNAME
    StructRefName(String), // SNAME
    EndStruct,
    Boundary,
    StructRef,
    Layer(i16),
    DataType(i16),
    Xy(Vec<i32>),
    EndElement,
}

/// # Gds Floating Point
/// ## GDSII's Home-Grown Floating-Point Format
///
/// GDSII predates IEEE754, and carries its own eight-byte format:
/// a sign bit, a seven-bit excess-64 base-16 exponent, and a 56-bit mantissa.
///
/// [GdsFloat64] is not a data-store, but a namespace for converting to and from `f64`.
///
pub struct GdsFloat64;
impl GdsFloat64 {
    /// Decode GDSII's eight-byte representation, stored as a `u64`, to `f64`
    pub fn decode(val: u64) -> f64 {
        let neg = (val & 0x8000_0000_0000_0000) != 0;
        let exp: i32 = ((val & 0x7F00_0000_0000_0000) >> 56) as i32 - 64;
        let mantissa = (val & 0x00FF_FFFF_FFFF_FFFF) as f64 / 2f64.powi(56);
        let mag = mantissa * 16f64.powi(exp);
        if neg {
            -mag
        } else {
            mag
        }
    }
    /// Encode `f64` to GDSII's eight bytes, stored as `u64`.
    pub fn encode(mut val: f64) -> u64 {
        if val == 0.0 {
            return 0;
        }
        let mut top: u8 = 0;
        if val < 0.0 {
            top = 0x80;
            val = -val;
        }
        // Base-16 exponent, chosen such that the mantissa lands in [1/16, 1)
        let fexp: f64 = 0.25 * val.log2();
        let mut exponent = fexp.ceil() as i32;
        if fexp == fexp.ceil() {
            exponent += 1;
        }
        let mantissa: u64 = (val * 16_f64.powi(14 - exponent)).round() as u64;
        top += (64 + exponent) as u8;
        (top as u64).wrapping_shl(56) | (mantissa & 0x00FF_FFFF_FFFF_FFFF)
    }
}

/// # Gds Spatial Point
/// Coordinate in (x,y) layout-space, in database units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GdsPoint {
    pub x: i32,
    pub y: i32,
}
impl GdsPoint {
    /// Create a new [GdsPoint]
    pub fn new(x: i32, y: i32) -> Self {
        GdsPoint { x, y }
    }
    /// Flatten to the (x,y) pair-sequence of an XY record
    pub fn flatten(&self) -> [i32; 2] {
        [self.x, self.y]
    }
    /// Flatten a slice of [GdsPoint]s, in order
    pub fn flatten_vec(pts: &[GdsPoint]) -> Vec<i32> {
        pts.iter().flat_map(|p| p.flatten()).collect()
    }
}

/// # Gds Distance Units
///
/// A pair of values: the size of a database unit in user-units,
/// and the size of a database unit in metres.
/// E.g. `(1e-3, 1e-9)` for a nanometre database unit and micron user unit.
///
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GdsUnits(pub f64, pub f64);
impl GdsUnits {
    /// Create a new [GdsUnits]
    pub fn new(num1: f64, num2: f64) -> Self {
        Self(num1, num2)
    }
    /// Get the database-unit size, in user-units
    pub fn db_unit(&self) -> f64 {
        self.0
    }
    /// Get the user-unit size, in metres
    pub fn user_unit(&self) -> f64 {
        self.1 / self.0
    }
}
impl Default for GdsUnits {
    /// Default units: 1nm database-unit, 1µm user-unit
    fn default() -> Self {
        Self(1e-3, 1e-9)
    }
}

/// # Gds Modification & Access Dates & Times
///
/// Defaults to the Unix epoch, so that otherwise-identical libraries encode to identical bytes.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GdsDateTimes {
    /// Last Modification Date & Time
    pub modified: NaiveDateTime,
    /// Last Access Date & Time
    pub accessed: NaiveDateTime,
}
impl GdsDateTimes {
    /// Create a [GdsDateTimes] with both modification and access set to `dt`
    pub fn at(dt: NaiveDateTime) -> Self {
        Self {
            modified: dt,
            accessed: dt,
        }
    }
    /// Encode in GDSII's twelve-i16 format
    pub fn encode(&self) -> Vec<i16> {
        let mut rv = Vec::with_capacity(12);
        for dt in [&self.modified, &self.accessed] {
            rv.extend([
                dt.year() as i16,
                dt.month() as i16,
                dt.day() as i16,
                dt.hour() as i16,
                dt.minute() as i16,
                dt.second() as i16,
            ]);
        }
        rv
    }
}
impl Default for GdsDateTimes {
    fn default() -> Self {
        Self::at(NaiveDateTime::default())
    }
}

///
/// # Gds Boundary Element
///
/// A closed polygon. GDSII repeats the first point at the end of `xy` to close it,
/// so an N-sided polygon holds N+1 points.
///
/// Spec BNF:
/// ```text
/// BOUNDARY [ELFLAGS] [PLEX] LAYER DATATYPE XY [<property>]* ENDEL
/// ```
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GdsBoundary {
    pub layer: i16,
    pub datatype: i16,
    pub xy: Vec<GdsPoint>,
}
impl GdsBoundary {
    /// Create an axis-aligned rectangle with corners `p0` and `p1`
    pub fn rect(layer: i16, datatype: i16, p0: GdsPoint, p1: GdsPoint) -> Self {
        Self {
            layer,
            datatype,
            xy: vec![
                GdsPoint::new(p0.x, p0.y),
                GdsPoint::new(p1.x, p0.y),
                GdsPoint::new(p1.x, p1.y),
                GdsPoint::new(p0.x, p1.y),
                GdsPoint::new(p0.x, p0.y),
            ],
        }
    }
}

///
/// # Gds Struct Reference (Cell Instance)
///
/// Spec BNF:
/// ```text
/// SREF [ELFLAGS] [PLEX] SNAME [<strans>] XY [<property>]* ENDEL
/// ```
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GdsStructRef {
    /// Struct (Cell) Name
    pub name: String,
    /// Location
    pub xy: GdsPoint,
}

///
/// # Gds Element Enumeration
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GdsElement {
    GdsBoundary(GdsBoundary),
    GdsStructRef(GdsStructRef),
}
impl From<GdsBoundary> for GdsElement {
    fn from(e: GdsBoundary) -> Self {
        Self::GdsBoundary(e)
    }
}
impl From<GdsStructRef> for GdsElement {
    fn from(e: GdsStructRef) -> Self {
        Self::GdsStructRef(e)
    }
}

///
/// # Gds Struct (Cell) Definition
///
/// GDSII's primary hierarchical layout-definition object,
/// which most other layout systems would call a "cell" or "module".
///
/// Spec BNF:
/// ```text
/// BGNSTR STRNAME [STRCLASS] {<element>}* ENDSTR
/// ```
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GdsStruct {
    /// Struct Name
    pub name: String,
    /// Creation/ Modification-Date Info
    pub dates: GdsDateTimes,
    /// Elements List
    pub elems: Vec<GdsElement>,
}
impl GdsStruct {
    /// Create a new and empty [GdsStruct]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

///
/// # Gds Library
///
/// The Library is GDSII's primary idiom for a suite of layout-cells.
/// A Library generally corresponds one-to-one with a `.gds` file.
///
/// Spec BNF:
/// ```text
/// HEADER BGNLIB [LIBDIRSIZE] [SRFNAME] [LIBSECUR] LIBNAME [REFLIBS] [FONTS] [ATTRTABLE] [GENERATIONS] [<FormatType>]
/// UNITS {<structure>}* ENDLIB
/// ```
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GdsLibrary {
    /// Library Name
    pub name: String,
    /// Gds Spec Version
    pub version: i16,
    /// Modification Date(s)
    pub dates: GdsDateTimes,
    /// Spatial Units
    pub units: GdsUnits,
    /// Struct Definitions
    pub structs: Vec<GdsStruct>,
}
impl GdsLibrary {
    /// Create a new and empty [GdsLibrary]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 600,
            dates: GdsDateTimes::default(),
            units: GdsUnits::default(),
            structs: Vec::new(),
        }
    }
    /// Save to file `fname`
    pub fn save(&self, fname: impl AsRef<Path>) -> GdsResult<()> {
        let mut wr = GdsWriter::open(fname)?;
        wr.write_lib(self)
    }
    /// Write to [Write]-able `file`
    pub fn write(&self, file: impl Write) -> GdsResult<()> {
        let mut wr = GdsWriter::new(file);
        wr.write_lib(self)
    }
    /// Collect and return the library's aggregate statistics
    pub fn stats(&self) -> GdsStats {
        let mut stats = GdsStats {
            libraries: 1,
            structs: self.structs.len(),
            ..Default::default()
        };
        for strukt in self.structs.iter() {
            for elem in strukt.elems.iter() {
                match elem {
                    GdsElement::GdsBoundary(_) => stats.boundaries += 1,
                    GdsElement::GdsStructRef(_) => stats.struct_refs += 1,
                }
            }
        }
        stats
    }
}

/// # Gds Library Statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GdsStats {
    pub libraries: usize,
    pub structs: usize,
    pub boundaries: usize,
    pub struct_refs: usize,
}

/// # GdsResult Type-Alias
pub type GdsResult<T> = Result<T, GdsError>;

/// # Gds Error Enumeration
#[derive(Debug)]
pub enum GdsError {
    /// Invalid record length
    RecordLen(usize),
    /// Element content GDSII cannot represent
    Invalid(String),
    /// Boxed (External) Errors
    Boxed(Box<dyn Error + Send + Sync>),
}
impl std::fmt::Display for GdsError {
    /// Display a [GdsError].
    /// This functionally delegates to the (derived) [std::fmt::Debug] implementation.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
impl Error for GdsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}
impl From<std::io::Error> for GdsError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<String> for GdsError {
    fn from(e: String) -> Self {
        GdsError::Invalid(e)
    }
}
impl From<&str> for GdsError {
    fn from(e: &str) -> Self {
        GdsError::Invalid(e.to_string())
    }
}
