//! Launch sequence tests: classpath determinism, entrypoint resolution,
//! error taxonomy, and the end-to-end handoff to an execution engine.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{ZipBuilder, dependency_jar};
use ziplaunch::{
    Archive, ArchiveError, EntrySelectionPolicy, ExecutableArchivePolicy, ExecutionEngine,
    FixedLocator, LaunchError, Launcher, MemoryReader, NestedEntryMode, ResolutionContext,
    ResolvedEntrypoint,
};

/// Records what the launcher hands over, then reports a fixed exit status.
struct RecordingEngine {
    status: i32,
    seen: Mutex<Option<(String, String, Vec<String>)>>,
}

impl RecordingEngine {
    fn new(status: i32) -> Self {
        Self {
            status,
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ExecutionEngine for RecordingEngine {
    async fn run(&self, entrypoint: &ResolvedEntrypoint, args: &[String]) -> anyhow::Result<i32> {
        *self.seen.lock().unwrap() = Some((
            entrypoint.name.clone(),
            entrypoint.resource.clone(),
            args.to_vec(),
        ));
        Ok(self.status)
    }
}

fn app_bytes(manifest: &str) -> Vec<u8> {
    ZipBuilder::new()
        .deflated("META-INF/MANIFEST.MF", manifest.as_bytes())
        .dir("APP-INF/classes/")
        .stored("APP-INF/lib/dep.jar", &dependency_jar("Main"))
        .build()
}

async fn open_bytes(bytes: Vec<u8>) -> Arc<Archive> {
    Arc::new(
        Archive::open(Arc::new(MemoryReader::new(bytes)), "app.zip")
            .await
            .expect("valid synthetic archive"),
    )
}

#[tokio::test]
async fn classpath_order_matches_index_order_repeatedly() {
    let archive = open_bytes(
        ZipBuilder::new()
            .dir("APP-INF/classes/")
            .stored("APP-INF/lib/a.jar", &dependency_jar("A"))
            .stored("APP-INF/lib/b.jar", &dependency_jar("B"))
            .build(),
    )
    .await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    for _ in 0..3 {
        let classpath = launcher.classpath_archives(&archive).await.unwrap();
        let locations: Vec<_> = classpath.iter().map(|a| a.location()).collect();
        assert_eq!(
            locations,
            vec![
                "app.zip!/APP-INF/classes/",
                "app.zip!/APP-INF/lib/a.jar",
                "app.zip!/APP-INF/lib/b.jar",
            ]
        );
    }
}

#[tokio::test]
async fn missing_entrypoint_attribute_is_a_configuration_error() {
    let archive = open_bytes(app_bytes("Manifest-Version: 1.0\n")).await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    match launcher.entrypoint_name(&archive).await {
        Err(LaunchError::Configuration { attribute, .. }) => {
            assert_eq!(attribute, "EntrypointName");
        }
        other => panic!("expected configuration error, got {other:?}"),
    }

    // The full launch aborts with the same error before anything runs.
    let engine = RecordingEngine::new(0);
    let err = launcher
        .launch_archive(archive, &engine, Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::Configuration { .. })
    ));
    assert!(engine.seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn unresolvable_entrypoint_is_a_resolution_error() {
    let archive = open_bytes(app_bytes("EntrypointName: com.example.Missing\n")).await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    let err = launcher
        .launch_archive(archive, &RecordingEngine::new(0), Vec::new())
        .await
        .unwrap_err();
    match err.downcast_ref::<LaunchError>() {
        Some(LaunchError::EntrypointResolution { name, resource }) => {
            assert_eq!(name, "com.example.Missing");
            assert_eq!(resource, "com/example/Missing.class");
        }
        other => panic!("expected resolution error, got {other:?}"),
    }
}

#[tokio::test]
async fn compressed_nested_entry_aborts_launch_naming_the_entry() {
    let archive = open_bytes(
        ZipBuilder::new()
            .deflated("META-INF/MANIFEST.MF", b"EntrypointName: Main\n")
            .dir("APP-INF/classes/")
            .deflated("APP-INF/lib/dep.jar", &dependency_jar("Main"))
            .build(),
    )
    .await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    let err = launcher
        .launch_archive(archive, &RecordingEngine::new(0), Vec::new())
        .await
        .unwrap_err();
    match err.downcast_ref::<LaunchError>() {
        Some(LaunchError::Archive(ArchiveError::NestedUnsupported { entry, .. })) => {
            assert_eq!(entry, "APP-INF/lib/dep.jar");
        }
        other => panic!("expected nested-unsupported error, got {other:?}"),
    }
}

#[tokio::test]
async fn materialize_mode_launches_compressed_nested_entries() {
    let archive = open_bytes(
        ZipBuilder::new()
            .deflated("META-INF/MANIFEST.MF", b"EntrypointName: Main\n")
            .dir("APP-INF/classes/")
            .deflated("APP-INF/lib/dep.jar", &dependency_jar("Main"))
            .build(),
    )
    .await;
    let launcher =
        Launcher::new(ExecutableArchivePolicy).nested_mode(NestedEntryMode::Materialize);

    let status = launcher
        .launch_archive(archive, &RecordingEngine::new(0), Vec::new())
        .await
        .unwrap();
    assert_eq!(status, 0);
}

#[tokio::test]
async fn end_to_end_launch_resolves_and_hands_off() {
    let archive = open_bytes(app_bytes("EntrypointName: Main\n")).await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    // Classpath is [classes root, dep.jar]; the entrypoint lives in dep.jar.
    let classpath = launcher.classpath_archives(&archive).await.unwrap();
    assert_eq!(classpath.len(), 2);
    let context = ResolutionContext::new(classpath);
    let winner = context.find("Main.class").expect("entrypoint resolvable");
    assert_eq!(winner.location(), "app.zip!/APP-INF/lib/dep.jar");
    assert_eq!(
        context.load("Main.class").await.unwrap().as_deref(),
        Some(b"bytecode of Main".as_slice())
    );

    let engine = RecordingEngine::new(7);
    let args = vec!["--port".to_string(), "8080".to_string()];
    let status = launcher
        .launch_archive(archive, &engine, args.clone())
        .await
        .unwrap();

    // The engine's exit status propagates, the forwarded arguments arrive
    // untouched, and the ambient context was switched before the handoff.
    assert_eq!(status, 7);
    let seen = engine.seen.lock().unwrap().clone().expect("engine ran");
    assert_eq!(seen, ("Main".to_string(), "Main.class".to_string(), args));
    assert!(ResolutionContext::ambient().is_some());
}

#[tokio::test]
async fn first_match_wins_on_name_collisions() {
    let archive = open_bytes(
        ZipBuilder::new()
            .stored("APP-INF/lib/a.jar", &dependency_jar("Shared"))
            .stored("APP-INF/lib/b.jar", &dependency_jar("Shared"))
            .build(),
    )
    .await;
    let launcher = Launcher::new(ExecutableArchivePolicy);

    let context = ResolutionContext::new(launcher.classpath_archives(&archive).await.unwrap());
    let winner = context.find("Shared.class").expect("symbol resolvable");
    assert_eq!(winner.location(), "app.zip!/APP-INF/lib/a.jar");
}

#[tokio::test]
async fn post_process_hook_can_remove_archives() {
    struct ClassesOnly;

    impl EntrySelectionPolicy for ClassesOnly {
        fn classify(&self, entry: &ziplaunch::Entry) -> bool {
            ExecutableArchivePolicy.classify(entry)
        }

        fn post_process(&self, archives: &mut Vec<Arc<Archive>>) {
            archives.retain(|a| a.location().ends_with("/APP-INF/classes/"));
        }
    }

    let archive = open_bytes(
        ZipBuilder::new()
            .dir("APP-INF/classes/")
            .stored("APP-INF/lib/a.jar", &dependency_jar("A"))
            .build(),
    )
    .await;

    let classpath = Launcher::new(ClassesOnly)
        .classpath_archives(&archive)
        .await
        .unwrap();
    assert_eq!(classpath.len(), 1);
    assert!(classpath[0].location().ends_with("/APP-INF/classes/"));
}

#[tokio::test]
async fn launches_from_a_located_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.zip");
    std::fs::write(&path, app_bytes("EntrypointName: Main\n")).unwrap();

    let launcher = Launcher::new(ExecutableArchivePolicy);
    let engine = RecordingEngine::new(0);
    let status = launcher
        .launch(&FixedLocator(path), &engine, vec!["x".to_string()])
        .await
        .unwrap();

    assert_eq!(status, 0);
    let seen = engine.seen.lock().unwrap().clone().expect("engine ran");
    assert_eq!(seen.0, "Main");
    assert_eq!(seen.2, vec!["x".to_string()]);
}

#[tokio::test]
async fn self_location_failure_aborts_the_launch() {
    struct BrokenLocator;
    impl ziplaunch::SelfLocate for BrokenLocator {
        fn locate(&self) -> Result<std::path::PathBuf, LaunchError> {
            Err(LaunchError::SelfLocation {
                detail: "no process image".to_string(),
            })
        }
    }

    let launcher = Launcher::new(ExecutableArchivePolicy);
    let err = launcher
        .launch(&BrokenLocator, &RecordingEngine::new(0), Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LaunchError>(),
        Some(LaunchError::SelfLocation { .. })
    ));
}
