use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::*;
use skaff_core::config;
use skaff_core::logger;
use skaff_core::project::ProjectTarget;
use skaff_core::{ScaffoldOptions, Scaffolder, SkaffError};

/// Skaff - bootstrap a new project from a template repository
#[derive(Parser)]
#[command(name = "skaff")]
#[command(about = "Bootstrap a new project from a template repository")]
#[command(version)]
struct Cli {
    /// Path of the new project; the last path segment becomes the project name
    path: Option<String>,

    /// Name of the project (and residing directory)
    #[arg(short, long)]
    name: Option<String>,

    /// Verbose output; use multiple times for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Force everything (and say yes to everything)
    #[arg(short, long)]
    force: bool,

    /// Say yes to everything
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::set_verbosity(cli.verbose);

    match run(cli).await {
        Ok(target) => {
            print_epilogue(&target.path);
            ExitCode::SUCCESS
        }
        Err(error) => {
            // A decline is a normal early exit, not an error condition.
            match error.downcast_ref::<SkaffError>() {
                Some(SkaffError::Declined(message)) => logger::warn(message),
                _ => logger::error(error.to_string()),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ProjectTarget> {
    let raw = cli.name.or(cli.path).ok_or_else(|| {
        anyhow::anyhow!(
            "no project name/path provided at the command line; try \"skaff x/y/z\""
        )
    })?;

    let cwd = std::env::current_dir()?;
    let target = ProjectTarget::resolve(&cwd, &raw)?;
    let config = config::load_config(&cwd)?;

    let options = ScaffoldOptions {
        force: cli.force,
        assume_yes: cli.yes,
    };

    Scaffolder::new(config, target.clone(), options).run().await?;
    Ok(target)
}

fn print_epilogue(project: &Path) {
    println!();
    println!("{}", "Success.".green().bold());
    println!("{}", "You still need to add a remote with \"git remote add ...\"".bold());
    if let Ok(cwd) = std::env::current_dir() {
        println!("{} {}", "pwd:".blue().bold(), cwd.display().to_string().blue());
    }
    println!(
        "{} {}",
        "Go to your project:".blue().bold(),
        format!("cd {}", project.display()).blue()
    );
    println!();
}
