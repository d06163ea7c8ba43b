//!
//! # Gds21 Integrated Circuit Layout Writer
//!
//! GDSII is the IC industry's de facto standard for storing and sharing layout data.
//! Gds21 is the GDSII output layer for the larger [Layout21](https://github.com/dan-fritchman/Layout21) workspace:
//! it holds layout data on GDSII's terms, using GDSII's idioms and naming conventions,
//! and streams it to the binary on-disk format.
//!
//! Layout data is represented in three forms:
//!
//! * A short tree with three layers:
//!   * The root is a [GdsLibrary], a set of cells ([GdsStruct]s) plus a small amount of metadata.
//!     On-disk each [GdsLibrary] is paired one-to-one with a `.gds` file.
//!   * Each [GdsStruct] defines one layout cell ("struct" in GDSII terms).
//!   * Cells consist of [GdsElement]s: polygons ([GdsBoundary]) and instances of other cells ([GdsStructRef]).
//! * For storage, the tree is flattened to a series of [GdsRecord]s,
//!   indicating the beginning, end, and content of each tree-node.
//! * Records are encoded to bytes by the [GdsWriter], in the order the GDSII spec prescribes.
//!
//! ## Usage
//!
//! Creating a [GdsLibrary] with a single rectangle-holding cell, and encoding it to bytes:
//!
//! ```
//! use gds21::{GdsBoundary, GdsLibrary, GdsPoint, GdsStruct};
//! let mut lib = GdsLibrary::new("mylib");
//! let mut cell = GdsStruct::new("mycell");
//! cell.elems.push(GdsBoundary::rect(0, 0, GdsPoint::new(0, 0), GdsPoint::new(10, 10)).into());
//! lib.structs.push(cell);
//! let mut bytes = Vec::new();
//! lib.write(&mut bytes).unwrap();
//! ```
//!
//! Saving a [GdsLibrary] to disk:
//!
//! ```skip
//! lib.save("mylib.gds")?;
//! ```
//!

// Std-Lib
use std::fs::File;
use std::io::{BufWriter, Write};

// Crates.io
use byteorder::{BigEndian, WriteBytesExt};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

mod data;
pub use data::*;

mod write;
pub use write::*;
