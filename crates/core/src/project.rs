//! Target project resolution and name validation

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{SkaffError, SkaffResult};

// Hyphen, underscore and period are OK too.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[.A-Za-z0-9_-]+$").expect("name pattern is a valid regex"));

/// Where the new project will be created.
///
/// `path` is the absolute project directory, `parent` its containing
/// directory, and `name` the final path segment (the project name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    pub path: PathBuf,
    pub parent: PathBuf,
    pub name: String,
}

impl ProjectTarget {
    /// Resolve a raw command-line path argument against a base directory.
    pub fn resolve(base: &Path, raw: &str) -> SkaffResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SkaffError::Name(
                "no project name/path provided at the command line".to_string(),
            ));
        }

        let path = if Path::new(raw).is_absolute() {
            PathBuf::from(raw)
        } else {
            base.join(raw)
        };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                SkaffError::Name(format!("cannot derive a project name from '{}'", raw))
            })?;

        validate_name(&name)?;

        let parent = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| SkaffError::Name(format!("'{}' has no parent directory", raw)))?;

        Ok(Self { path, parent, name })
    }
}

/// Project names must be alphanumeric (hyphen, underscore and period are OK
/// too), matching `^[.a-z0-9_-]+$` case-insensitively.
pub fn validate_name(name: &str) -> SkaffResult<()> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(SkaffError::Name(format!(
            "'{}' must be alphanumeric (hyphen, underscore and period are OK too)",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_punctuated_names() {
        assert!(validate_name("my-proj_1.0").is_ok());
        assert!(validate_name("MyProj").is_ok());
        assert!(validate_name(".hidden").is_ok());
    }

    #[test]
    fn rejects_spaces_and_specials() {
        assert!(validate_name("My Proj!").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("").is_err());
    }

    #[test]
    fn resolves_relative_path_against_base() {
        let target = ProjectTarget::resolve(Path::new("/work"), "libs/my-lib").unwrap();
        assert_eq!(target.path, PathBuf::from("/work/libs/my-lib"));
        assert_eq!(target.parent, PathBuf::from("/work/libs"));
        assert_eq!(target.name, "my-lib");
    }

    #[test]
    fn keeps_absolute_path() {
        let target = ProjectTarget::resolve(Path::new("/work"), "/opt/proj").unwrap();
        assert_eq!(target.path, PathBuf::from("/opt/proj"));
        assert_eq!(target.parent, PathBuf::from("/opt"));
        assert_eq!(target.name, "proj");
    }

    #[test]
    fn rejects_empty_argument() {
        assert!(matches!(
            ProjectTarget::resolve(Path::new("/work"), "  "),
            Err(SkaffError::Name(_))
        ));
    }

    #[test]
    fn rejects_invalid_final_segment() {
        assert!(ProjectTarget::resolve(Path::new("/work"), "ok/bad name").is_err());
    }
}
