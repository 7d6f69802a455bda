//! Cloned-tree operations
//!
//! In-process equivalents of the usual post-clone shell one-liners: rewriting
//! placeholder tokens across the tree and marking helper scripts executable.
//! Both walk breadth-first and skip version-control and dependency
//! directories.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::SkaffResult;

const EXCLUDE_GLOBS: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

fn exclude_set() -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in EXCLUDE_GLOBS {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_default()
}

/// Rewrite every occurrence of `from` to `to` in text files under `root`.
/// Returns the number of files rewritten.
pub fn replace_in_tree(root: &Path, from: &str, to: &str) -> SkaffResult<usize> {
    if from.is_empty() {
        return Ok(0);
    }

    let excludes = exclude_set();
    let mut rewritten = 0;
    let mut queue = VecDeque::new();
    queue.push_back(root.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        for entry in fs::read_dir(&current_dir)? {
            let path = entry?.path();
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if excludes.is_match(relative) {
                continue;
            }

            if path.is_dir() {
                queue.push_back(path);
            } else if path.is_file() {
                let bytes = fs::read(&path)?;
                // Placeholders only live in text files.
                let Ok(content) = String::from_utf8(bytes) else {
                    continue;
                };
                if content.contains(from) {
                    fs::write(&path, content.replace(from, to))?;
                    rewritten += 1;
                }
            }
        }
    }

    Ok(rewritten)
}

/// Mark every `*.sh` under `dir` user-executable. A missing directory is a
/// no-op, as is the whole operation on non-unix targets.
pub fn mark_scripts_executable(dir: &Path) -> SkaffResult<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let mut marked = 0;
    let mut queue = VecDeque::new();
    queue.push_back(dir.to_path_buf());

    while let Some(current_dir) = queue.pop_front() {
        for entry in fs::read_dir(&current_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                queue.push_back(path);
            } else if path.extension().is_some_and(|ext| ext == "sh") {
                set_user_executable(&path)?;
                marked += 1;
            }
        }
    }

    Ok(marked)
}

#[cfg(unix)]
fn set_user_executable(path: &Path) -> SkaffResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_user_executable(_path: &Path) -> SkaffResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_tokens_in_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{\"name\": \"tmpl\"}").unwrap();
        fs::write(nested.join("index.ts"), "import tmpl from 'tmpl';").unwrap();
        fs::write(nested.join("unrelated.ts"), "nothing here").unwrap();

        let rewritten = replace_in_tree(dir.path(), "tmpl", "my-lib").unwrap();

        assert_eq!(rewritten, 2);
        let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(package, "{\"name\": \"my-lib\"}");
        let index = fs::read_to_string(nested.join("index.ts")).unwrap();
        assert_eq!(index, "import my-lib from 'my-lib';");
    }

    #[test]
    fn leaves_git_internals_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let git = dir.path().join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("config"), "url = tmpl").unwrap();

        let rewritten = replace_in_tree(dir.path(), "tmpl", "my-lib").unwrap();

        assert_eq!(rewritten, 0);
        let config = fs::read_to_string(git.join("config")).unwrap();
        assert_eq!(config, "url = tmpl");
    }

    #[test]
    fn tolerates_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, b't', b'm', b'p', b'l']).unwrap();

        let rewritten = replace_in_tree(dir.path(), "tmpl", "my-lib").unwrap();
        assert_eq!(rewritten, 0);
    }

    #[test]
    fn empty_token_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "content").unwrap();
        assert_eq!(replace_in_tree(dir.path(), "", "x").unwrap(), 0);
    }

    #[test]
    fn missing_scripts_dir_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            mark_scripts_executable(&dir.path().join("scripts")).unwrap(),
            0
        );
    }

    #[cfg(unix)]
    #[test]
    fn marks_only_shell_scripts() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let scripts = dir.path().join("scripts");
        let nested = scripts.join("ci");
        fs::create_dir_all(&nested).unwrap();
        fs::write(scripts.join("build.sh"), "#!/bin/sh\n").unwrap();
        fs::write(nested.join("deploy.sh"), "#!/bin/sh\n").unwrap();
        fs::write(scripts.join("notes.txt"), "plain").unwrap();

        let marked = mark_scripts_executable(&scripts).unwrap();
        assert_eq!(marked, 2);

        let mode = fs::metadata(scripts.join("build.sh")).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0);
        let plain_mode = fs::metadata(scripts.join("notes.txt")).unwrap().permissions().mode();
        assert_eq!(plain_mode & 0o100, 0);
    }
}
