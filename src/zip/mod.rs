//! ZIP archive format parsing.
//!
//! This module provides the binary-format layer for reading ZIP archives,
//! supporting both standard ZIP format and ZIP64 extensions for large
//! archives.
//!
//! ## Architecture
//!
//! The module is organized into two components:
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//!
//! The higher-level [`Archive`](crate::archive::Archive) type sits on top of
//! this module and adds the name index, manifest access, and nested-archive
//! derivation.
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and data for each entry
//! 2. Central Directory with metadata for all entries
//! 3. End of Central Directory (EOCD) record at the end
//!
//! This implementation reads the EOCD first (from the end of the file),
//! then the Central Directory, which allows listing entries without reading
//! the whole archive. The same walk works inside a byte-range window, which
//! is how embedded archives are parsed in place without extraction.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod parser;
mod structures;

pub use parser::ZipParser;
pub use structures::*;
