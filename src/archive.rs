//! Archives and nested-archive derivation.
//!
//! An [`Archive`] is the ordered view over one ZIP index: entries in physical
//! index order, a name lookup table, and optional manifest access. The same
//! type serves three shapes of archive:
//!
//! - the **root archive**, holding the open backing reader for the whole
//!   process lifetime;
//! - a **directory view**, a subtree of the parent's entries with names
//!   relativized (used for the bundled classes root);
//! - a **file view**, an embedded stored entry re-parsed in place through a
//!   [`RangeReader`] window — no bytes are copied or extracted.
//!
//! Views share the parent's reader through an `Arc`, so a nested archive
//! keeps its root's storage open and can never observe it closed.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ArchiveError;
use crate::io::{MemoryReader, RangeReader, ReadAt};
use crate::manifest::{MANIFEST_NAME, Manifest};
use crate::zip::{CompressionMethod, Entry, ZipParser};

/// What to do with a nested entry that is compressed rather than stored.
///
/// Stored entries are opened in place over the parent's bytes. A compressed
/// entry cannot be, because deflate streams are not randomly addressable:
/// either reject it, or give up strict zero-copy and inflate it into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedEntryMode {
    /// Fail with [`ArchiveError::NestedUnsupported`], naming the entry.
    #[default]
    Reject,
    /// Inflate the entry into an in-memory buffer and parse that.
    Materialize,
}

/// An ordered, read-only view over a ZIP index.
pub struct Archive {
    parser: ZipParser,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    location: String,
}

impl std::fmt::Debug for Archive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("location", &self.location)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Archive {
    /// Open an archive by parsing the reader's central directory.
    ///
    /// `location` is a human-readable description of where the bytes come
    /// from (a path, URL, or `parent!/entry` chain); it appears in every
    /// error raised from this archive.
    pub async fn open(
        reader: Arc<dyn ReadAt>,
        location: impl Into<String>,
    ) -> Result<Self, ArchiveError> {
        let location = location.into();
        let parser = ZipParser::new(reader);
        let entries = parser
            .list_entries()
            .await
            .map_err(|e| ArchiveError::read(&location, format!("{e:#}")))?;
        Self::from_parts(parser, entries, location)
    }

    fn from_parts(
        parser: ZipParser,
        entries: Vec<Entry>,
        location: String,
    ) -> Result<Self, ArchiveError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(ArchiveError::read(
                    &location,
                    format!("duplicate entry name {:?}", entry.name),
                ));
            }
        }
        Ok(Self {
            parser,
            entries,
            index,
            location,
        })
    }

    /// Where this archive's bytes come from, for diagnostics.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// All entries in physical index order.
    ///
    /// The slice never changes after parsing, so repeated iteration yields
    /// identical results. Order is semantically significant: the classpath
    /// inherits it, and first match wins on name collisions.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Look up an entry by exact name.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Read and decode an entry's data.
    pub async fn read(&self, entry: &Entry) -> Result<Vec<u8>, ArchiveError> {
        self.parser
            .read_entry(entry)
            .await
            .map_err(|e| ArchiveError::read(&self.location, format!("{e:#}")))
    }

    /// Parse the reserved manifest entry, if present.
    ///
    /// The manifest may be deflated even when application entries are stored;
    /// it is decoded before parsing either way.
    pub async fn manifest(&self) -> Result<Option<Manifest>, ArchiveError> {
        let Some(entry) = self.entry(MANIFEST_NAME) else {
            return Ok(None);
        };
        let data = self.read(entry).await?;
        Manifest::parse(&data)
            .map(Some)
            .map_err(|e| ArchiveError::ManifestParse {
                location: self.location.clone(),
                detail: format!("{e:#}"),
            })
    }

    /// Derive nested archives for every entry accepted by `filter`.
    ///
    /// Results preserve the relative order of [`entries`](Self::entries).
    /// The filter itself must be pure; it sees metadata only and no I/O
    /// happens until an accepted entry is actually opened. Directory entries
    /// become relativized subtree views; file entries are re-parsed in place,
    /// which requires them to be stored (see [`NestedEntryMode`]).
    pub async fn nested_archives(
        &self,
        mode: NestedEntryMode,
        filter: impl Fn(&Entry) -> bool,
    ) -> Result<Vec<Arc<Archive>>, ArchiveError> {
        let mut archives = Vec::new();
        for entry in &self.entries {
            if !filter(entry) {
                continue;
            }
            let nested = if entry.is_directory {
                self.nested_directory(entry)?
            } else {
                self.nested_file(entry, mode).await?
            };
            archives.push(Arc::new(nested));
        }
        Ok(archives)
    }

    /// A view over the subtree rooted at a directory entry.
    ///
    /// Contained entry names are relativized by stripping the directory
    /// prefix; data offsets still point into the shared backing storage, so
    /// reads need no translation.
    fn nested_directory(&self, dir: &Entry) -> Result<Archive, ArchiveError> {
        let prefix = &dir.name;
        let entries: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.name.len() > prefix.len() && e.name.starts_with(prefix.as_str()))
            .map(|e| {
                let mut nested = e.clone();
                nested.name = e.name[prefix.len()..].to_string();
                nested
            })
            .collect();
        Archive::from_parts(
            self.parser.clone(),
            entries,
            format!("{}!/{}", self.location, prefix),
        )
    }

    /// An embedded file entry opened as an independent archive, in place.
    async fn nested_file(
        &self,
        entry: &Entry,
        mode: NestedEntryMode,
    ) -> Result<Archive, ArchiveError> {
        let location = format!("{}!/{}", self.location, entry.name);
        let reader: Arc<dyn ReadAt> = match entry.method {
            CompressionMethod::Stored => {
                let data_offset = self
                    .parser
                    .data_offset(entry)
                    .await
                    .map_err(|e| ArchiveError::read(&self.location, format!("{e:#}")))?;
                let range =
                    RangeReader::new(self.parser.reader().clone(), data_offset, entry.compressed_size)
                        .map_err(|e| ArchiveError::read(&location, format!("{e:#}")))?;
                Arc::new(range)
            }
            _ if mode == NestedEntryMode::Materialize => {
                log::debug!("materializing compressed nested entry {location}");
                Arc::new(MemoryReader::new(self.read(entry).await?))
            }
            _ => {
                return Err(ArchiveError::NestedUnsupported {
                    location: self.location.clone(),
                    entry: entry.name.clone(),
                });
            }
        };
        Archive::open(reader, location).await
    }
}
