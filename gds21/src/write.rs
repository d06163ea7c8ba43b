//!
//! # Gds21 Byte-Encoding and Writing
//!

// Std-Lib
use std::convert::TryFrom;
use std::path::Path;

// Local imports
use super::*;

/// Gds Writing Helper
pub struct GdsWriter<'wr> {
    /// Write Destination
    dest: Box<dyn Write + 'wr>,
}
impl<'wr> GdsWriter<'wr> {
    /// Create new [GdsWriter] with destination file `fname`
    pub fn open(fname: impl AsRef<Path>) -> GdsResult<Self> {
        let file = BufWriter::new(File::create(fname)?);
        Ok(Self::new(file))
    }
    /// Create a new [GdsWriter] to destination `dest`
    pub fn new(dest: impl Write + 'wr) -> Self {
        Self {
            dest: Box::new(dest),
        }
    }
    /// Write a [GdsLibrary] to the destination
    /// Fields are written in the Gds-recommended order
    pub fn write_lib(&mut self, lib: &GdsLibrary) -> GdsResult<()> {
        self.write_records(&[
            &GdsRecord::Header {
                version: lib.version,
            },
            &GdsRecord::BgnLib {
                dates: lib.dates.encode(),
            },
            &GdsRecord::LibName(lib.name.clone()),
            &GdsRecord::Units(lib.units.0, lib.units.1),
        ])?;
        for strukt in lib.structs.iter() {
            self.write_struct(strukt)?;
        }
        self.write_record(&GdsRecord::EndLib)?;
        self.dest.flush()?;
        Ok(())
    }
    /// Write [GdsStruct] `strukt` to the destination
    pub fn write_struct(&mut self, strukt: &GdsStruct) -> GdsResult<()> {
        self.write_records(&[
            &GdsRecord::BgnStruct {
                dates: strukt.dates.encode(),
            },
            &GdsRecord::StructName(strukt.name.clone()),
        ])?;
        for elem in strukt.elems.iter() {
            for record in elem.to_records()?.iter() {
                self.write_record(record)?;
            }
        }
        self.write_record(&GdsRecord::EndStruct)?;
        Ok(())
    }
    /// Helper to write a sequence of [GdsRecord] references
    fn write_records(&mut self, records: &[&GdsRecord]) -> GdsResult<()> {
        for r in records {
            self.write_record(r)?;
        }
        Ok(())
    }
    /// Encode into bytes and write onto `dest`
    pub fn write_record(&mut self, record: &GdsRecord) -> GdsResult<()> {
        // GDSII strings are padded to even lengths
        let gds_strlen = |s: &str| -> usize { s.len() + s.len() % 2 };
        use GdsDataType::{NoData, Str, F64, I16, I32};
        let (rtype, dtype, len) = match record {
            GdsRecord::Header { .. } => (GdsRecordType::Header, I16, 2),
            GdsRecord::BgnLib { .. } => (GdsRecordType::BgnLib, I16, 24),
            GdsRecord::LibName(s) => (GdsRecordType::LibName, Str, gds_strlen(s)),
            GdsRecord::Units(_, _) => (GdsRecordType::Units, F64, 16),
            GdsRecord::EndLib => (GdsRecordType::EndLib, NoData, 0),
            GdsRecord::BgnStruct { .. } => (GdsRecordType::BgnStruct, I16, 24),
            GdsRecord::StructName(s) => (GdsRecordType::StructName, Str, gds_strlen(s)),
            GdsRecord::StructRefName(s) => (GdsRecordType::StructRefName, Str, gds_strlen(s)),
            GdsRecord::EndStruct => (GdsRecordType::EndStruct, NoData, 0),
            GdsRecord::Boundary => (GdsRecordType::Boundary, NoData, 0),
            GdsRecord::StructRef => (GdsRecordType::StructRef, NoData, 0),
            GdsRecord::Layer(_) => (GdsRecordType::Layer, I16, 2),
            GdsRecord::DataType(_) => (GdsRecordType::DataType, I16, 2),
            GdsRecord::Xy(d) => (GdsRecordType::Xy, I32, 4 * d.len()),
            GdsRecord::EndElement => (GdsRecordType::EndElement, NoData, 0),
        };
        // Header: total length (including these four bytes), record-type, data-type
        match u16::try_from(len + 4) {
            Ok(val) => self.dest.write_u16::<BigEndian>(val)?,
            Err(_) => return Err(GdsError::RecordLen(len)),
        };
        self.dest.write_u8(rtype as u8)?;
        self.dest.write_u8(dtype as u8)?;

        match record {
            GdsRecord::EndLib
            | GdsRecord::EndStruct
            | GdsRecord::Boundary
            | GdsRecord::StructRef
            | GdsRecord::EndElement => (),

            GdsRecord::Header { version: d } | GdsRecord::Layer(d) | GdsRecord::DataType(d) => {
                self.dest.write_i16::<BigEndian>(*d)?
            }
            GdsRecord::Units(d0, d1) => {
                self.dest.write_u64::<BigEndian>(GdsFloat64::encode(*d0))?;
                self.dest.write_u64::<BigEndian>(GdsFloat64::encode(*d1))?;
            }
            GdsRecord::BgnLib { dates: d } | GdsRecord::BgnStruct { dates: d } => {
                for val in d.iter() {
                    self.dest.write_i16::<BigEndian>(*val)?;
                }
            }
            GdsRecord::Xy(d) => {
                for val in d.iter() {
                    self.dest.write_i32::<BigEndian>(*val)?;
                }
            }
            GdsRecord::LibName(s) | GdsRecord::StructName(s) | GdsRecord::StructRefName(s) => {
                self.dest.write_all(s.as_bytes())?;
                if s.len() % 2 != 0 {
                    self.dest.write_u8(0x00)?;
                }
            }
        };
        Ok(())
    }
}

/// # Record Conversion
/// Flatten a tree-element into its sequence of [GdsRecord]s.
pub trait ToRecords {
    fn to_records(&self) -> GdsResult<Vec<GdsRecord>>;
}
impl ToRecords for GdsElement {
    fn to_records(&self) -> GdsResult<Vec<GdsRecord>> {
        match self {
            GdsElement::GdsBoundary(e) => e.to_records(),
            GdsElement::GdsStructRef(e) => e.to_records(),
        }
    }
}
impl ToRecords for GdsBoundary {
    /// Convert to a Vector of [GdsRecord], ordered as dictated by the GDSII spec BNF.
    /// Fails for fewer than four points, i.e. anything short of a closed triangle.
    fn to_records(&self) -> GdsResult<Vec<GdsRecord>> {
        if self.xy.len() < 4 {
            return Err(GdsError::Invalid(format!(
                "Boundary with {} points; at least 4 required",
                self.xy.len()
            )));
        }
        Ok(vec![
            GdsRecord::Boundary,
            GdsRecord::Layer(self.layer),
            GdsRecord::DataType(self.datatype),
            GdsRecord::Xy(GdsPoint::flatten_vec(&self.xy)),
            GdsRecord::EndElement,
        ])
    }
}
impl ToRecords for GdsStructRef {
    /// Convert to a Vector of [GdsRecord], ordered as dictated by the GDSII spec BNF.
    fn to_records(&self) -> GdsResult<Vec<GdsRecord>> {
        Ok(vec![
            GdsRecord::StructRef,
            GdsRecord::StructRefName(self.name.clone()),
            GdsRecord::Xy(self.xy.flatten().to_vec()),
            GdsRecord::EndElement,
        ])
    }
}
