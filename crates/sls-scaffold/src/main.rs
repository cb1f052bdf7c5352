//! sls-scaffold - Project scaffolding for Serverless Framework services

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use scaffold_core::tui::GenerateArgs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SLS_SCAFFOLD_LOG";

#[derive(Parser, Debug)]
#[command(name = "sls-scaffold")]
#[command(about = "CLI for scaffolding Serverless Framework projects")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a project from a project file
    Generate(CliGenerateArgs),
    /// Show each function with a summary of its triggers
    Preview(FileArgs),
    /// Check a project file without writing anything
    Validate(FileArgs),
    /// Write a starter project file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct CliGenerateArgs {
    /// Project file (YAML or JSON)
    pub file: PathBuf,

    /// Archive to write (defaults to <project name>.zip)
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write the file tree into a directory instead of an archive
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Fail if the archive would be larger than this many bytes
    #[arg(long = "max-archive-bytes")]
    pub max_archive_bytes: Option<u64>,

    /// Fail if more than this many files would be generated
    #[arg(long = "max-files")]
    pub max_files: Option<u64>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliGenerateArgs> for GenerateArgs {
    fn from(args: CliGenerateArgs) -> Self {
        GenerateArgs {
            project_file: args.file,
            output: args.output,
            out_dir: args.out_dir,
            max_archive_bytes: args.max_archive_bytes,
            max_files: args.max_files,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct FileArgs {
    /// Project file (YAML or JSON)
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Where to write the project file
    #[arg(default_value = "scaffold.yml")]
    pub file: PathBuf,

    /// Project name
    #[arg(short, long, default_value = "hello-world")]
    pub name: String,

    /// Overwrite an existing file without asking
    #[arg(short, long)]
    pub yes: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();

    match args.command {
        Some(Command::Generate(generate_args)) => {
            let result = scaffold_core::run(generate_args.into()).await;

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Some(Command::Preview(file_args)) => scaffold_core::tui::preview(&file_args.file),
        Some(Command::Validate(file_args)) => scaffold_core::tui::validate(&file_args.file),
        Some(Command::Init(init_args)) => {
            scaffold_core::tui::init(&init_args.file, &init_args.name, init_args.yes)
        }
        None => {
            // No subcommand provided, show usage
            Args::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
