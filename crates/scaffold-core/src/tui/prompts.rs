//! Charm-style CLI flow using cliclack

use super::output;
use crate::config::{self, FileFormat, LoadedProject, ProjectFile};
use crate::generator::{self, GenerationLimits};
use crate::triggers;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Arguments for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Project file describing the functions and extensions
    pub project_file: PathBuf,

    /// Archive to write (defaults to `<project name>.zip`)
    pub output: Option<PathBuf>,

    /// Write the file tree into this directory instead of an archive
    pub out_dir: Option<PathBuf>,

    /// Archive size budget in bytes
    pub max_archive_bytes: Option<u64>,

    /// File count budget
    pub max_files: Option<u64>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Where the generated project was written
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Archive(PathBuf),
    Directory(PathBuf),
}

/// Generate a project from a project file
pub async fn run(args: GenerateArgs) -> Result<()> {
    cliclack::intro("Serverless Scaffold")?;

    // Step 1: Load the project file
    let project = load(&args.project_file)?;
    let config = project.config;

    // Step 2: Resolve budgets (flags override environment)
    let mut limits = GenerationLimits::from_env()?;
    if args.max_archive_bytes.is_some() {
        limits.max_archive_bytes = args.max_archive_bytes;
    }
    if args.max_files.is_some() {
        limits.max_files = args.max_files;
    }

    // Step 3: Show what will be generated
    for function in &config.functions {
        cliclack::log::info(format!(
            "{}  {}",
            function.name,
            triggers::summarize_function(function).dimmed()
        ))?;
    }

    // Step 4: Generate and write
    let destination = match &args.out_dir {
        Some(dir) => {
            confirm_directory(dir, args.yes)?;

            let spinner = cliclack::spinner();
            spinner.start("Generating scaffold...");
            let files = match generator::generate_files_with_limits(&config, &limits) {
                Ok(files) => files,
                Err(e) => {
                    spinner.stop("Generation failed");
                    return Err(e.into());
                }
            };
            let written = output::write_files(&files, dir).await?;
            spinner.stop(format!(
                "Created {} files in {}",
                written.len(),
                dir.display()
            ));
            Destination::Directory(dir.clone())
        }
        None => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{}.zip", config.name)));
            confirm_overwrite(&path, args.yes)?;

            let spinner = cliclack::spinner();
            spinner.start("Generating scaffold...");
            let bytes = match generator::generate_with_limits(&config, &limits) {
                Ok(bytes) => bytes,
                Err(e) => {
                    spinner.stop("Generation failed");
                    return Err(e.into());
                }
            };
            output::write_archive(&bytes, &path).await?;
            spinner.stop(format!(
                "Wrote {} ({} bytes)",
                path.display(),
                bytes.len()
            ));
            Destination::Archive(path)
        }
    };

    // Step 5: Show next steps
    print_next_steps(&config.name, &destination)?;

    Ok(())
}

/// Print every function with its trigger summary
pub fn preview(project_file: &Path) -> Result<()> {
    let project = load_quiet(project_file)?;
    let config = project.config;

    println!("{}", config.name.cyan().bold());
    if config.functions.is_empty() {
        println!("  {}", "No functions".dimmed());
    }
    for function in &config.functions {
        println!(
            "  {} {}  {}",
            "->".blue(),
            function.name,
            triggers::summarize_function(function).dimmed()
        );
    }
    if !config.extensions.is_empty() {
        println!();
        for extension in &config.extensions {
            println!("  {} {}", "+".green(), extension.display_name());
        }
    }

    Ok(())
}

/// Run the whole pipeline without writing anything
pub fn validate(project_file: &Path) -> Result<()> {
    let project = load_quiet(project_file)?;
    let files = generator::generate_files(&project.config)?;
    println!(
        "{} {} ({} files)",
        "Valid".green().bold(),
        project_file.display(),
        files.len()
    );
    Ok(())
}

/// Write a starter project file
pub fn init(path: &Path, name: &str, yes: bool) -> Result<()> {
    confirm_overwrite(path, yes)?;
    let format = FileFormat::from_path(path);
    let content = ProjectFile::starter(name).render(format)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Created".green().bold(), path.display());
    Ok(())
}

fn load(project_file: &Path) -> Result<LoadedProject> {
    let spinner = cliclack::spinner();
    spinner.start("Loading project file...");

    match config::load_project(project_file) {
        Ok(project) => {
            spinner.stop(format!("Project: {}", project.config.name));
            if let Some(warning) = &project.version_warning {
                cliclack::log::warning(format!(
                    "Version warning: {}",
                    warning.lines().next().unwrap_or(warning)
                ))?;
            }
            Ok(project)
        }
        Err(e) => {
            spinner.stop("Failed to load project file");
            Err(e).with_context(|| format!("Failed to load {}", project_file.display()))
        }
    }
}

fn load_quiet(project_file: &Path) -> Result<LoadedProject> {
    let project = config::load_project(project_file)
        .with_context(|| format!("Failed to load {}", project_file.display()))?;
    if let Some(warning) = &project.version_warning {
        eprintln!("{} {}", "Warning:".yellow(), warning);
    }
    Ok(project)
}

fn confirm_overwrite(path: &Path, yes: bool) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    cliclack::log::warning(format!("{} already exists", path.display()))?;

    // Auto-confirm with --yes flag
    let confirm = if yes {
        true
    } else {
        cliclack::confirm("Overwrite it?")
            .initial_value(false)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Generation cancelled.");
    }
    Ok(())
}

fn confirm_directory(dir: &Path, yes: bool) -> Result<()> {
    let count = match output::existing_entries(dir) {
        Some(count) if count > 0 => count,
        _ => return Ok(()),
    };

    cliclack::log::warning(format!("Directory has {} existing items", count))?;

    let confirm = if yes {
        true
    } else {
        cliclack::confirm("Continue anyway?")
            .initial_value(true)
            .interact()?
    };

    if !confirm {
        anyhow::bail!("Generation cancelled.");
    }
    Ok(())
}

fn print_next_steps(name: &str, destination: &Destination) -> Result<()> {
    println!();
    println!("  Next steps");
    println!();

    for (i, step) in next_steps(name, destination).iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}

fn next_steps(name: &str, destination: &Destination) -> Vec<String> {
    let mut steps = Vec::new();
    match destination {
        Destination::Directory(dir) => steps.push(format!("cd {}", dir.display())),
        Destination::Archive(path) => {
            steps.push(format!("unzip {} -d {}", path.display(), name));
            steps.push(format!("cd {}", name));
        }
    }
    steps.push("npm install".to_string());
    steps.push("npx serverless deploy".to_string());
    steps
}
