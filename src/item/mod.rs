/// This module provides an in-memory item reader.
pub mod memory;

#[cfg(feature = "xml")]
/// This module provides the metadata-driven XML export writer.
pub mod xml;
