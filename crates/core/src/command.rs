//! Subprocess execution
//!
//! Commands are always invoked as a program plus an argument array. Project
//! names and paths never pass through a shell, so no escaping is needed.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::logger;
use crate::types::{SkaffError, SkaffResult};

/// Run a command in `cwd`, inheriting stderr, and fail on a non-zero exit.
pub async fn run(program: &str, args: &[String], cwd: &Path) -> SkaffResult<()> {
    let rendered = render(program, args);
    logger::debug(format!("running `{}` in {}", rendered, cwd.display()));

    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| SkaffError::Command(format!("failed to start `{}`: {}", rendered, e)))?;

    if !status.success() {
        return Err(SkaffError::Command(format!(
            "`{}` exited with code {}",
            rendered,
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}

fn render(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
