use clap::Parser;

use crate::archive::NestedEntryMode;

#[derive(Parser, Debug)]
#[command(name = "ziplaunch")]
#[command(version)]
#[command(about = "Run self-contained ZIP application archives in place", long_about = None)]
#[command(after_help = "Examples:\n  \
  ziplaunch app.zip -- --port 8080     launch app.zip, forwarding the remaining arguments\n  \
  ziplaunch -l app.zip                 list the archive's entries\n  \
  ziplaunch --classpath app.zip        show the classpath that would be used\n  \
  ziplaunch --manifest https://example.com/app.zip   read a remote archive's manifest")]
pub struct Cli {
    /// Archive path or HTTP URL; omitted means launch the running executable itself
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Arguments forwarded to the entrypoint
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// List entries (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List entries verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Print manifest attributes
    #[arg(long)]
    pub manifest: bool,

    /// Print the classpath in resolution order
    #[arg(long)]
    pub classpath: bool,

    /// Resolve a resource name and print the winning archive
    #[arg(long, value_name = "NAME")]
    pub resolve: Option<String>,

    /// Buffer compressed nested entries in memory instead of rejecting them
    #[arg(long)]
    pub materialize_nested: bool,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file
            .as_deref()
            .is_some_and(|f| f.starts_with("http://") || f.starts_with("https://"))
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    /// True for any mode that inspects the archive instead of launching it.
    pub fn is_inspection(&self) -> bool {
        self.list || self.verbose || self.manifest || self.classpath || self.resolve.is_some()
    }

    pub fn nested_mode(&self) -> NestedEntryMode {
        if self.materialize_nested {
            NestedEntryMode::Materialize
        } else {
            NestedEntryMode::Reject
        }
    }
}
