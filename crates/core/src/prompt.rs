//! Interactive confirmation
//!
//! One question, one line from stdin, one boolean. Callers are responsible
//! for skipping the prompt when a force/yes flag is set.

use std::io::Write;

use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::types::SkaffResult;

const AFFIRMATIVES: &[&str] = &["y", "yes", "yep"];

/// Present a question and read one line; anything but an affirmative answer
/// is a decline.
pub async fn ask(question: &str) -> SkaffResult<bool> {
    print!("{} ", question.bright_blue().bold());
    std::io::stdout().flush()?;

    let mut answer = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    reader.read_line(&mut answer).await?;

    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    let trimmed = answer.trim();
    AFFIRMATIVES
        .iter()
        .any(|accepted| trimmed.eq_ignore_ascii_case(accepted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmatives_in_any_case() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("  Yep \n"));
    }

    #[test]
    fn everything_else_declines() {
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yessir"));
    }
}
