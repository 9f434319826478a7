//! Ordered resource resolution over a classpath.
//!
//! A [`ResolutionContext`] is built once from the selected classpath archives
//! and never mutated afterwards: lookups scan the archives in list order and
//! the first archive containing the requested name wins. Because the context
//! is immutable and every read underneath it is positioned, concurrent
//! lookups from any number of threads are safe without locking.
//!
//! The context searches only its own classpath archives. Bootstrap code
//! resolves through its ordinary crate linkage, so application archives can
//! neither shadow nor collide with launcher internals.

use std::sync::{Arc, RwLock};

use crate::archive::Archive;
use crate::error::ArchiveError;

static AMBIENT: RwLock<Option<Arc<ResolutionContext>>> = RwLock::new(None);

/// Read-only resolver over an ordered list of archives.
pub struct ResolutionContext {
    archives: Vec<Arc<Archive>>,
}

impl ResolutionContext {
    pub fn new(archives: Vec<Arc<Archive>>) -> Self {
        Self { archives }
    }

    /// The classpath archives, in search order.
    pub fn archives(&self) -> &[Arc<Archive>] {
        &self.archives
    }

    /// Find the first archive containing `name`, in classpath order.
    pub fn find(&self, name: &str) -> Option<&Arc<Archive>> {
        self.archives.iter().find(|a| a.entry(name).is_some())
    }

    /// Load the bytes of the first entry named `name`, or `None` if no
    /// classpath archive contains it.
    pub async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        for archive in &self.archives {
            if let Some(entry) = archive.entry(name) {
                return archive.read(entry).await.map(Some);
            }
        }
        Ok(None)
    }

    /// Map a dotted entrypoint name to the resource path it loads from:
    /// `com.example.Main` becomes `com/example/Main.class`.
    pub fn class_resource(name: &str) -> String {
        format!("{}.class", name.replace('.', "/"))
    }

    /// Publish this context as the process-ambient resolution context,
    /// replacing any previous one. Code that runs after the switch (static
    /// initialization, service discovery) resolves against the application
    /// classpath rather than the bootstrap's own.
    pub fn install(self: &Arc<Self>) {
        // The stored value is a plain Arc swap, so a poisoned lock holds
        // nothing inconsistent; recover the guard and continue.
        let mut ambient = AMBIENT.write().unwrap_or_else(|p| p.into_inner());
        *ambient = Some(self.clone());
    }

    /// The currently installed ambient context, if any.
    pub fn ambient() -> Option<Arc<ResolutionContext>> {
        AMBIENT
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}
