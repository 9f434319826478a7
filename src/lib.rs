//! # ziplaunch
//!
//! Run a single self-contained ZIP archive — application code plus every
//! dependency archive bundled inside it — directly, with no extraction to
//! disk and no external classpath setup.
//!
//! The launch core parses the archive's binary index, derives nested
//! archives (`APP-INF/classes/` as a relativized subtree, each stored
//! `APP-INF/lib/*` entry re-parsed in place over its own byte range), builds
//! a deterministic ordered classpath, reads the entrypoint name from the
//! embedded manifest, and constructs an immutable resolution context that
//! loads code and resources from those nested archives on demand.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use ziplaunch::{
//!     ExecutableArchivePolicy, ExecutionEngine, FixedLocator, Launcher, ResolvedEntrypoint,
//! };
//!
//! struct PrintEngine;
//!
//! #[async_trait::async_trait]
//! impl ExecutionEngine for PrintEngine {
//!     async fn run(&self, entrypoint: &ResolvedEntrypoint, args: &[String]) -> anyhow::Result<i32> {
//!         println!("would run {} with {:?}", entrypoint.name, args);
//!         Ok(0)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let launcher = Launcher::new(ExecutableArchivePolicy);
//!     let locator = FixedLocator(PathBuf::from("app.zip"));
//!     let status = launcher.launch(&locator, &PrintEngine, Vec::new()).await?;
//!     std::process::exit(status);
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod launch;
pub mod manifest;
pub mod resolve;
pub mod zip;

pub use archive::{Archive, NestedEntryMode};
pub use cli::Cli;
pub use error::{ArchiveError, LaunchError};
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, RangeReader, ReadAt};
pub use launch::{
    CurrentExeLocator, ENTRYPOINT_ATTRIBUTE, EntrySelectionPolicy, ExecutableArchivePolicy,
    ExecutionEngine, FixedLocator, Launcher, ResolvedEntrypoint, SelfLocate,
};
pub use manifest::{MANIFEST_NAME, Manifest};
pub use resolve::ResolutionContext;
pub use zip::{CompressionMethod, Entry, ZipParser};
