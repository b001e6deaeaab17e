//! Metadata-driven XML export.
//!
//! Records opt in to export through declarative markers registered with
//! [`impl_reflect!`](crate::impl_reflect): [`Marker::XmlAble`] on the type and
//! [`Marker::XmlField`] on each slot to emit. The writer turns a
//! heterogeneous, ordered list of records into one document:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Professor>
//!   <lastName type="String">X</lastName>
//!   <age type="int">40</age>
//! </Professor>
//! <notXMLable />
//! ```
//!
//! Field values are inserted verbatim unless [`ExportConfig::escape_text`] is
//! set.
//!
//! # Examples
//!
//! ```
//! use xmlable_batch::core::reflect::{Marker, Reflect, XmlField};
//! use xmlable_batch::impl_reflect;
//! use xmlable_batch::item::xml::serialize_to_writer;
//!
//! struct Professor {
//!     last_name: String,
//!     age: u32,
//! }
//!
//! impl_reflect! {
//!     Professor [Marker::XmlAble] {
//!         last_name: [Marker::XmlField(XmlField::new("String").name("lastName"))],
//!         age: [Marker::XmlField(XmlField::new("int"))],
//!     }
//! }
//!
//! let professor = Professor { last_name: "X".to_string(), age: 40 };
//! let output = serialize_to_writer(&[&professor], Vec::new()).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
//!      <Professor>\n  <lastName type=\"String\">X</lastName>\n  <age type=\"int\">40</age>\n</Professor>\n"
//! );
//! ```
//!
//! [`Marker::XmlAble`]: crate::core::reflect::Marker::XmlAble
//! [`Marker::XmlField`]: crate::core::reflect::Marker::XmlField

pub mod xml_export_config;
pub mod xml_export_writer;

use std::{io::Write, path::Path};

use log::info;

use crate::{core::reflect::Reflect, error::BatchError};

pub use xml_export_config::{DEFAULT_PLACEHOLDER_TAG, ExportConfig, NullValuePolicy};
pub use xml_export_writer::XmlExportWriter;
pub use xml_export_writer::XmlExportWriterBuilder;

/// Exports `records` to a new file at `path`, with default options.
///
/// The file is created (or truncated) and closed when the call returns,
/// whether it succeeded or not. On failure, whatever was already written
/// stays in the file.
pub fn serialize<P: AsRef<Path>>(records: &[&dyn Reflect], path: P) -> Result<(), BatchError> {
    let writer = XmlExportWriterBuilder::new().from_path(path.as_ref())?;
    writer.export(records.iter().copied())?;
    info!(
        "Exported {} records to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Exports `records` to `sink`, with default options, and hands the sink back.
pub fn serialize_to_writer<W: Write>(records: &[&dyn Reflect], sink: W) -> Result<W, BatchError> {
    let writer = XmlExportWriterBuilder::new().from_writer(sink)?;
    writer.export(records.iter().copied())?;
    writer.into_inner()
}
