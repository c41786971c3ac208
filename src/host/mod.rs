//! File system hosts
//!
//! Documents never touch the disk directly; everything goes through a
//! [`FileSystemHost`]. The real host wraps `std::fs`, and the in-memory
//! host backs tests and embedding scenarios with a plain map.
//!
//! Glob matching is implemented over the `regex` crate: each pattern is
//! translated once into an anchored regex, with `**` crossing directory
//! separators and `*`/`?` stopping at them.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;

/// Errors surfaced by file system hosts
#[derive(Debug)]
pub enum HostError {
    /// An underlying I/O operation failed
    Io { path: PathBuf, source: io::Error },
    /// A glob pattern could not be compiled
    InvalidPattern { pattern: String },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Io { path, source } => {
                write!(f, "i/o error on {}: {}", path.display(), source)
            }
            HostError::InvalidPattern { pattern } => {
                write!(f, "invalid glob pattern: {}", pattern)
            }
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Io { source, .. } => Some(source),
            HostError::InvalidPattern { .. } => None,
        }
    }
}

/// Boundary between documents and the outside world
pub trait FileSystemHost {
    fn read_file(&self, path: &Path) -> Result<String, HostError>;
    fn write_file(&mut self, path: &Path, text: &str) -> Result<(), HostError>;
    fn file_exists(&self, path: &Path) -> bool;
    fn directory_exists(&self, path: &Path) -> bool;
    fn current_directory(&self) -> PathBuf;
    /// Paths of existing files matching any of the glob patterns, sorted.
    fn glob(&self, patterns: &[String]) -> Result<Vec<PathBuf>, HostError>;
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, HostError> {
    patterns
        .iter()
        .map(|pattern| {
            glob_pattern_to_regex(pattern).ok_or_else(|| HostError::InvalidPattern {
                pattern: pattern.clone(),
            })
        })
        .collect()
}

/// Translate one glob pattern into an anchored regex.
///
/// `**/` matches any run of directory components (including none), `*`
/// matches within a component, `?` matches one character within a
/// component. Everything else is literal.
fn glob_pattern_to_regex(pattern: &str) -> Option<Regex> {
    let mut regex = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        regex.push_str("(?:[^/]*/)*");
                    } else {
                        regex.push_str(".*");
                    }
                } else {
                    regex.push_str("[^/]*");
                }
            }
            '?' => regex.push_str("[^/]"),
            ch => regex.push_str(&regex::escape(&ch.to_string())),
        }
    }
    regex.push('$');
    Regex::new(&regex).ok()
}

fn matches_any(patterns: &[Regex], path: &Path) -> bool {
    let text = path.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|pattern| pattern.is_match(&text))
}

/// Host backed by `std::fs`
pub struct RealFileSystemHost;

impl RealFileSystemHost {
    fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), HostError> {
        let entries = fs::read_dir(dir).map_err(|source| HostError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| HostError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                Self::collect_files(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }
}

impl FileSystemHost for RealFileSystemHost {
    fn read_file(&self, path: &Path) -> Result<String, HostError> {
        fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&mut self, path: &Path, text: &str) -> Result<(), HostError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| HostError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, text).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn current_directory(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }

    fn glob(&self, patterns: &[String]) -> Result<Vec<PathBuf>, HostError> {
        let compiled = compile_patterns(patterns)?;
        let root = self.current_directory();
        let mut files = Vec::new();
        Self::collect_files(&root, &mut files)?;
        // patterns are relative to the current directory, walked paths are
        // absolute; match against the relative form
        let mut matched: Vec<PathBuf> = files
            .into_iter()
            .filter(|path| {
                let relative = path.strip_prefix(&root).unwrap_or(path);
                matches_any(&compiled, relative)
            })
            .collect();
        matched.sort();
        Ok(matched)
    }
}

/// Host holding all files in memory
///
/// Paths are used as given; callers pick one convention (relative or
/// absolute) and stick with it.
pub struct InMemoryFileSystemHost {
    files: BTreeMap<PathBuf, String>,
    current_directory: PathBuf,
}

impl InMemoryFileSystemHost {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            current_directory: PathBuf::from("/"),
        }
    }

    pub fn with_current_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_directory = dir.into();
        self
    }
}

impl Default for InMemoryFileSystemHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemHost for InMemoryFileSystemHost {
    fn read_file(&self, path: &Path) -> Result<String, HostError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
            })
    }

    fn write_file(&mut self, path: &Path, text: &str) -> Result<(), HostError> {
        self.files.insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.files
            .keys()
            .any(|file| file.ancestors().skip(1).any(|dir| dir == path))
    }

    fn current_directory(&self) -> PathBuf {
        self.current_directory.clone()
    }

    fn glob(&self, patterns: &[String]) -> Result<Vec<PathBuf>, HostError> {
        let compiled = compile_patterns(patterns)?;
        Ok(self
            .files
            .keys()
            .filter(|path| matches_any(&compiled, path))
            .cloned()
            .collect())
    }
}
