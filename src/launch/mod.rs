//! Launch orchestration.
//!
//! The launch sequence is strictly ordered and one-directional:
//!
//! 1. locate the backing archive and parse its index;
//! 2. filter entries through the selection policy into nested archives;
//! 3. read the entrypoint name from the manifest;
//! 4. build the resolution context and verify the entrypoint resolves;
//! 5. install the context as ambient and hand off to the execution engine.
//!
//! A failure at any step aborts the whole launch; no later step runs and
//! nothing observable has happened (nothing was extracted or mutated). Each
//! step is public so inspection tooling and tests can drive them separately.

mod policy;
mod self_locate;

pub use policy::{CLASSES_ROOT, EntrySelectionPolicy, ExecutableArchivePolicy, LIB_PREFIX};
pub use self_locate::{CurrentExeLocator, FixedLocator, SelfLocate};

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::archive::{Archive, NestedEntryMode};
use crate::error::{ArchiveError, LaunchError};
use crate::io::LocalFileReader;
use crate::resolve::ResolutionContext;

/// Manifest attribute naming the entrypoint.
pub const ENTRYPOINT_ATTRIBUTE: &str = "EntrypointName";

/// An entrypoint located on the classpath, ready to be executed.
pub struct ResolvedEntrypoint {
    /// Dotted entrypoint name as stored in the manifest.
    pub name: String,
    /// Resource path the name resolved through.
    pub resource: String,
    /// The context the entrypoint (and everything it loads) resolves against.
    pub context: Arc<ResolutionContext>,
}

/// The execution engine that actually runs the entrypoint's code.
///
/// The launch core ends at handing over a [`ResolvedEntrypoint`]; embedders
/// supply the engine. Its exit status becomes the process exit status.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn run(&self, entrypoint: &ResolvedEntrypoint, args: &[String]) -> Result<i32>;
}

/// Orchestrates the launch of a self-contained archive.
pub struct Launcher<P> {
    policy: P,
    nested_mode: NestedEntryMode,
}

impl<P: EntrySelectionPolicy> Launcher<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            nested_mode: NestedEntryMode::default(),
        }
    }

    /// Choose how compressed nested entries are handled (default: reject).
    pub fn nested_mode(mut self, mode: NestedEntryMode) -> Self {
        self.nested_mode = mode;
        self
    }

    /// Locate and open the root archive.
    ///
    /// The returned archive owns the open backing file; it must stay alive
    /// for as long as anything may load from the classpath.
    pub async fn resolve_archive(
        &self,
        locator: &dyn SelfLocate,
    ) -> Result<Arc<Archive>, LaunchError> {
        let path = locator.locate()?;
        let location = path.display().to_string();
        let reader = LocalFileReader::new(&path)
            .map_err(|e| ArchiveError::read(&location, format!("{e:#}")))?;
        let archive = Archive::open(Arc::new(reader), location).await?;
        Ok(Arc::new(archive))
    }

    /// Build the ordered classpath: policy-filtered nested archives, then the
    /// policy's post-processing hook.
    pub async fn classpath_archives(
        &self,
        archive: &Archive,
    ) -> Result<Vec<Arc<Archive>>, LaunchError> {
        let mut archives = archive
            .nested_archives(self.nested_mode, |e| self.policy.classify(e))
            .await?;
        self.policy.post_process(&mut archives);
        Ok(archives)
    }

    /// Read the entrypoint name from the manifest.
    pub async fn entrypoint_name(&self, archive: &Archive) -> Result<String, LaunchError> {
        let manifest = archive.manifest().await?;
        manifest
            .as_ref()
            .and_then(|m| m.get(ENTRYPOINT_ATTRIBUTE))
            .map(str::to_owned)
            .ok_or_else(|| LaunchError::Configuration {
                location: archive.location().to_string(),
                attribute: ENTRYPOINT_ATTRIBUTE.to_string(),
            })
    }

    /// Build the resolution context and verify the entrypoint is on it.
    pub fn resolve_entrypoint(
        &self,
        name: &str,
        archives: Vec<Arc<Archive>>,
    ) -> Result<ResolvedEntrypoint, LaunchError> {
        let resource = ResolutionContext::class_resource(name);
        let context = Arc::new(ResolutionContext::new(archives));
        if context.find(&resource).is_none() {
            return Err(LaunchError::EntrypointResolution {
                name: name.to_string(),
                resource,
            });
        }
        Ok(ResolvedEntrypoint {
            name: name.to_string(),
            resource,
            context,
        })
    }

    /// Run the full launch sequence against an already-opened root archive.
    pub async fn launch_archive(
        &self,
        archive: Arc<Archive>,
        engine: &dyn ExecutionEngine,
        args: Vec<String>,
    ) -> Result<i32> {
        let archives = self.classpath_archives(&archive).await?;
        log::debug!(
            "classpath of {}: [{}]",
            archive.location(),
            archives
                .iter()
                .map(|a| a.location())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let name = self.entrypoint_name(&archive).await?;
        let entrypoint = self.resolve_entrypoint(&name, archives)?;
        log::info!(
            "launching {} via {} from {}",
            entrypoint.name,
            entrypoint.resource,
            archive.location()
        );

        // From here on, ambient resolution goes through the application
        // classpath rather than the bootstrap.
        entrypoint.context.install();
        engine.run(&entrypoint, &args).await
    }

    /// Locate the running archive and launch it.
    pub async fn launch(
        &self,
        locator: &dyn SelfLocate,
        engine: &dyn ExecutionEngine,
        args: Vec<String>,
    ) -> Result<i32> {
        let archive = self.resolve_archive(locator).await?;
        self.launch_archive(archive, engine, args).await
    }
}
