//! Main entry point for the ziplaunch CLI.
//!
//! This binary either launches a self-contained archive (the default) or
//! inspects one: entry listing, manifest attributes, classpath order, and
//! resource resolution. Archives may be local files or HTTP URLs; remote
//! archives are read with Range requests so inspection touches only the
//! index bytes.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ziplaunch::{
    Archive, Cli, CurrentExeLocator, ExecutableArchivePolicy, ExecutionEngine, FixedLocator,
    HttpRangeReader, Launcher, LocalFileReader, ReadAt, ResolutionContext, ResolvedEntrypoint,
    SelfLocate,
};

/// Exit code for any bootstrap failure, as opposed to the entrypoint's own
/// exit status.
const BOOTSTRAP_FAILURE: i32 = 1;

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ziplaunch: {err:#}");
            BOOTSTRAP_FAILURE
        }
    };
    std::process::exit(code);
}

async fn run(cli: &Cli) -> Result<i32> {
    if cli.is_inspection() {
        inspect(cli).await?;
        return Ok(0);
    }
    launch(cli).await
}

/// Launch the archive named on the command line, or the running executable
/// itself when no archive is given.
async fn launch(cli: &Cli) -> Result<i32> {
    let launcher = Launcher::new(ExecutableArchivePolicy).nested_mode(cli.nested_mode());
    let engine = ReportEngine {
        quiet: cli.is_quiet(),
    };
    let args = cli.args.clone();

    if cli.is_http_url() {
        // Remote archives cannot be self-located, but they can be opened and
        // launched over Range requests like any other backing source.
        let url = cli.file.clone().unwrap_or_default();
        let reader = Arc::new(HttpRangeReader::new(url.clone()).await?);
        let archive = Archive::open(reader, url).await?;
        return launcher.launch_archive(Arc::new(archive), &engine, args).await;
    }

    match &cli.file {
        Some(file) => {
            let locator = FixedLocator(PathBuf::from(file));
            launcher.launch(&locator, &engine, args).await
        }
        None => launcher.launch(&CurrentExeLocator, &engine, args).await,
    }
}

/// Open the archive for an inspection mode and dispatch on the mode flags.
async fn inspect(cli: &Cli) -> Result<()> {
    if cli.is_http_url() {
        let url = cli.file.clone().unwrap_or_default();
        let reader = HttpRangeReader::new(url.clone()).await?;
        let transferred_before = reader.transferred_bytes();
        let reader = Arc::new(reader);

        let archive = Archive::open(reader.clone() as Arc<dyn ReadAt>, url).await?;
        dispatch_inspection(cli, &archive).await?;

        // Display network transfer statistics for HTTP sources
        if !cli.is_quiet() {
            let transferred = reader.transferred_bytes() - transferred_before;
            eprintln!("\nTotal bytes transferred: {}", format_size(transferred));
        }
        return Ok(());
    }

    let path = match &cli.file {
        Some(file) => PathBuf::from(file),
        None => CurrentExeLocator.locate()?,
    };
    let reader = Arc::new(LocalFileReader::new(Path::new(&path))?);
    let archive = Archive::open(reader, path.display().to_string()).await?;
    dispatch_inspection(cli, &archive).await
}

async fn dispatch_inspection(cli: &Cli, archive: &Archive) -> Result<()> {
    if cli.list || cli.verbose {
        list_entries(archive, cli.verbose);
    }
    if cli.manifest {
        print_manifest(archive).await?;
    }
    if cli.classpath || cli.resolve.is_some() {
        let launcher = Launcher::new(ExecutableArchivePolicy).nested_mode(cli.nested_mode());
        let archives = launcher.classpath_archives(archive).await?;
        if cli.classpath {
            for entry in &archives {
                println!("{}", entry.location());
            }
        }
        if let Some(name) = &cli.resolve {
            resolve_name(name, ResolutionContext::new(archives));
        }
    }
    Ok(())
}

/// List entries in the archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just entry names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio, and timestamps
fn list_entries(archive: &Archive, verbose: bool) {
    if verbose {
        // Print table header for verbose output
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    // Track totals for summary line
    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in archive.entries() {
        if verbose {
            // Parse DOS timestamp into human-readable format
            let (year, month, day) = entry.mod_date();
            let (hour, minute, _second) = entry.mod_time();

            // Calculate compression ratio as percentage saved
            let ratio = if entry.uncompressed_size > 0 {
                format!(
                    "{:>4}%",
                    100 - (entry.compressed_size * 100 / entry.uncompressed_size)
                )
            } else {
                "  0%".to_string()
            };

            println!(
                "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
                entry.uncompressed_size,
                entry.compressed_size,
                ratio,
                year,
                month,
                day,
                hour,
                minute,
                entry.name
            );

            // Accumulate totals (excluding directories)
            if !entry.is_directory {
                total_uncompressed += entry.uncompressed_size;
                total_compressed += entry.compressed_size;
                file_count += 1;
            }
        } else {
            // Simple format: just the entry name
            println!("{}", entry.name);
        }
    }

    // Print summary line in verbose mode
    if verbose {
        println!("{}", "-".repeat(70));
        let total_ratio = if total_uncompressed > 0 {
            format!(
                "{:>4}%",
                100 - (total_compressed * 100 / total_uncompressed)
            )
        } else {
            "  0%".to_string()
        };
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed, total_compressed, total_ratio, "", file_count
        );
    }
}

async fn print_manifest(archive: &Archive) -> Result<()> {
    match archive.manifest().await? {
        Some(manifest) => {
            for (name, value) in manifest.attributes() {
                println!("{name}: {value}");
            }
        }
        None => eprintln!("{}: no manifest entry", archive.location()),
    }
    Ok(())
}

/// Resolve a name against the classpath and report the winning archive.
///
/// The name is tried literally first; a dotted name with no `/` is also
/// tried as a class resource path.
fn resolve_name(name: &str, context: ResolutionContext) {
    if let Some(archive) = context.find(name) {
        println!("{name} -> {}", archive.location());
        return;
    }
    if !name.contains('/') {
        let resource = ResolutionContext::class_resource(name);
        if let Some(archive) = context.find(&resource) {
            println!("{resource} -> {}", archive.location());
            return;
        }
    }
    println!("{name}: not found on the classpath");
}

/// Stand-in execution engine.
///
/// The launch core's job ends at a resolved entrypoint and an installed
/// resolution context; embedders supply the engine that runs the code. This
/// one reports what was resolved and exits cleanly.
struct ReportEngine {
    quiet: bool,
}

#[async_trait]
impl ExecutionEngine for ReportEngine {
    async fn run(&self, entrypoint: &ResolvedEntrypoint, args: &[String]) -> Result<i32> {
        if !self.quiet {
            let classpath = entrypoint
                .context
                .archives()
                .iter()
                .map(|a| a.location().to_string())
                .collect::<Vec<_>>()
                .join("\n  ");
            println!(
                "resolved entrypoint {} ({}) with args {:?}\nclasspath:\n  {}",
                entrypoint.name, entrypoint.resource, args, classpath
            );
        }
        Ok(0)
    }
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
