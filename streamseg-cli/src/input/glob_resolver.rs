//! Input resolution: glob patterns and stdin

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Where a stream of text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input, selected with `-`
    Stdin,
    /// A regular file
    File(PathBuf),
}

impl InputSource {
    /// Open the source for reading
    pub fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin())),
            InputSource::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                Ok(Box::new(file))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve `-` and file patterns to input sources
///
/// Files are sorted and deduplicated; stdin, if requested, comes first.
pub fn resolve_inputs(patterns: &[String]) -> Result<Vec<InputSource>> {
    let mut stdin = false;
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern == "-" {
            if stdin {
                return Err(CliError::DuplicateStdin.into());
            }
            stdin = true;
            continue;
        }

        let paths = glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
        for entry in paths {
            let path = entry.with_context(|| format!("Error resolving pattern: {pattern}"))?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    if !stdin && files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();

    let mut sources = Vec::with_capacity(files.len() + 1);
    if stdin {
        sources.push(InputSource::Stdin);
    }
    sources.extend(files.into_iter().map(InputSource::File));
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_sorted_unique_files() {
        let dir = TempDir::new().unwrap();
        for name in ["b.txt", "a.txt", "c.md"] {
            fs::write(dir.path().join(name), "text").unwrap();
        }
        let pattern = dir.path().join("*.txt").display().to_string();
        let exact = dir.path().join("a.txt").display().to_string();

        let sources = resolve_inputs(&[pattern, exact]).unwrap();
        assert_eq!(
            sources,
            vec![
                InputSource::File(dir.path().join("a.txt")),
                InputSource::File(dir.path().join("b.txt")),
            ]
        );
    }

    #[test]
    fn test_stdin_marker() {
        let sources = resolve_inputs(&["-".to_string()]).unwrap();
        assert_eq!(sources, vec![InputSource::Stdin]);
        assert_eq!(sources[0].to_string(), "<stdin>");

        let err = resolve_inputs(&["-".to_string(), "-".to_string()]).unwrap_err();
        assert!(err.to_string().contains("only be read once"));
    }

    #[test]
    fn test_no_matches() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.none").display().to_string();
        let err = resolve_inputs(&[pattern]).unwrap_err();
        assert!(err.to_string().contains("No files found"));
    }

    #[test]
    fn test_open_missing_file() {
        let source = InputSource::File(PathBuf::from("/nonexistent/input.txt"));
        let err = source.open().err().unwrap();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
