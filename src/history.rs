//! Recent shell history, as written by the shell integration.
//!
//! The file is line-oriented: each line is a command, optionally prefixed by
//! a numeric history index (`  42  git status`). It is only ever read here.
//! A missing or unreadable file yields an empty history.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::constants::{APP_NAME, HISTORY_EXCLUDED_WORD};

/// The last `count` usable commands from the history file at `path`.
///
/// Commands mentioning this tool or the word "test" (any case) are skipped.
pub fn recent_commands(path: &Path, count: usize) -> Vec<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no history file");
            return Vec::new();
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read history file");
            return Vec::new();
        }
    };

    let commands: Vec<String> = contents
        .lines()
        .filter_map(parse_line)
        .filter(|cmd| is_relevant(cmd))
        .map(String::from)
        .collect();

    let skip = commands.len().saturating_sub(count);
    commands.into_iter().skip(skip).collect()
}

/// Strip an optional leading history index. Blank lines give `None`.
fn parse_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let command = match line.split_once(char::is_whitespace) {
        // bash marks edited entries with a trailing '*'
        Some((index, rest)) if is_history_index(index) => rest.trim_start(),
        _ if is_history_index(line) => "",
        _ => line,
    };

    (!command.is_empty()).then_some(command)
}

fn is_history_index(word: &str) -> bool {
    let digits = word.strip_suffix('*').unwrap_or(word);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn is_relevant(command: &str) -> bool {
    let lower = command.to_lowercase();
    !lower.contains(APP_NAME) && !lower.contains(HISTORY_EXCLUDED_WORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn history_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(recent_commands(&dir.path().join("absent"), 10).is_empty());
    }

    #[test]
    fn test_unreadable_file_is_empty() {
        // a directory cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        assert!(recent_commands(dir.path(), 10).is_empty());
    }

    #[test]
    fn test_indices_are_stripped() {
        let file = history_file("  1  ls -la\n  2  cd /var/log\n  3* grep err syslog\n");
        assert_eq!(
            recent_commands(file.path(), 10),
            vec!["ls -la", "cd /var/log", "grep err syslog"]
        );
    }

    #[test]
    fn test_lines_without_index_are_kept_whole() {
        let file = history_file("ls -la\nmake\n");
        assert_eq!(recent_commands(file.path(), 10), vec!["ls -la", "make"]);
    }

    #[test]
    fn test_blank_and_index_only_lines_are_skipped() {
        let file = history_file("\n   \n 7\n 8  pwd\n");
        assert_eq!(recent_commands(file.path(), 10), vec!["pwd"]);
    }

    #[test]
    fn test_own_and_test_commands_are_excluded() {
        let file = history_file(
            " 1  superman -t 5\n 2  cargo TEST\n 3  SuperMan ls\n 4  ./run_tests.sh\n 5  uptime\n",
        );
        assert_eq!(recent_commands(file.path(), 10), vec!["uptime"]);
    }

    #[test]
    fn test_only_the_last_entries_are_returned() {
        let file = history_file(" 1  a\n 2  b\n 3  c\n 4  d\n");
        assert_eq!(recent_commands(file.path(), 2), vec!["c", "d"]);
        assert!(recent_commands(file.path(), 0).is_empty());
        assert_eq!(recent_commands(file.path(), 100).len(), 4);
    }
}
