//! Classpath entry selection.

use std::sync::Arc;

use crate::archive::Archive;
use crate::zip::Entry;

/// Directory entry holding the application's own classes.
pub const CLASSES_ROOT: &str = "APP-INF/classes/";

/// Namespace prefix under which dependency archives are bundled.
pub const LIB_PREFIX: &str = "APP-INF/lib/";

/// Decides which entries of the root archive become classpath archives.
///
/// `classify` must be pure: it sees entry metadata only and must not perform
/// I/O, since it runs once per entry during index iteration. `post_process`
/// runs after filtering and may add or remove archives before the classpath
/// is finalized.
pub trait EntrySelectionPolicy: Send + Sync {
    /// Keep this entry on the classpath?
    fn classify(&self, entry: &Entry) -> bool;

    /// Adjust the filtered archive list before the classpath is finalized.
    fn post_process(&self, archives: &mut Vec<Arc<Archive>>) {
        let _ = archives;
    }
}

/// The standard executable-archive layout: one classes root plus every
/// bundled library archive, in the order the index stores them.
///
/// The resulting classpath is `[classes root, lib entries...]` exactly as
/// encountered while iterating the root index. That order was fixed when the
/// archive was assembled and is never re-sorted, because name collisions
/// resolve to the first match.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutableArchivePolicy;

impl EntrySelectionPolicy for ExecutableArchivePolicy {
    fn classify(&self, entry: &Entry) -> bool {
        if entry.is_directory {
            entry.name == CLASSES_ROOT
        } else {
            entry.name.starts_with(LIB_PREFIX)
        }
    }
}
