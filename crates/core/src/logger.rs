//! Leveled terminal logging
//!
//! Plain prefixed lines: info goes to stdout, warn/error to stderr. The
//! verbosity level set from the CLI gates debug output. No structured
//! retention of any kind.

use std::sync::atomic::{AtomicU8, Ordering};

use colored::*;

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide verbosity level (the `-v` flag count).
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

/// Current verbosity level.
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

pub fn info(message: impl AsRef<str>) {
    println!("{} {}", "skaff:".cyan().bold(), message.as_ref());
}

pub fn warn(message: impl AsRef<str>) {
    eprintln!("{} {}", "skaff warning:".yellow().bold(), message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{} {}", "skaff error:".magenta().bold(), message.as_ref());
}

/// Only printed when at least one `-v` was passed.
pub fn debug(message: impl AsRef<str>) {
    if verbosity() > 0 {
        eprintln!("{} {}", "skaff debug:".bright_black(), message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_round_trips() {
        set_verbosity(2);
        assert_eq!(verbosity(), 2);
        set_verbosity(0);
        assert_eq!(verbosity(), 0);
    }
}
