use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use indexmap::IndexSet;
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Options for a single removal call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOptions {
    /// Allow matches outside `cwd` (and `cwd` itself)
    pub force: bool,

    /// Directory relative patterns are resolved against; the removal boundary
    pub cwd: Utf8PathBuf,

    /// Report what would be removed without touching the filesystem
    pub dry_run: bool,

    /// Let wildcards match names starting with `.`
    pub dot: bool,

    /// Patterns whose matches are never removed
    pub ignore: Vec<String>,
}

impl RemoveOptions {
    pub fn new(cwd: impl Into<Utf8PathBuf>) -> Self {
        Self {
            force: false,
            cwd: cwd.into(),
            dry_run: false,
            dot: true,
            ignore: Vec::new(),
        }
    }
}

/// Errors that can occur while removing paths
#[derive(Error, Debug)]
pub enum RemoveError {
    #[error("Cannot delete {path}: it is outside the working directory {cwd}")]
    OutsideRoot { path: Utf8PathBuf, cwd: Utf8PathBuf },

    #[error("Cannot delete the working directory itself: {0}")]
    WorkingDirectory(Utf8PathBuf),

    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Failed to remove {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Removal task failed: {0}")]
    Task(String),
}

impl RemoveError {
    /// True when the call was refused because a match left the working directory.
    pub fn is_outside_root(&self) -> bool {
        matches!(self, RemoveError::OutsideRoot { .. })
    }
}

/// Deletes files by glob pattern.
///
/// Returns the absolute paths that were removed, or that would have been
/// removed when `options.dry_run` is set. Implementations must fail with
/// [`RemoveError::OutsideRoot`] when a match escapes `options.cwd` and
/// `options.force` is off.
#[cfg_attr(test, mockall::automock)]
pub trait PathRemover {
    fn remove(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError>;
}

impl<R: PathRemover + ?Sized> PathRemover for Box<R> {
    fn remove(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        (**self).remove(patterns, options)
    }
}

/// Filesystem [`PathRemover`] backed by the `glob` crate.
///
/// Pattern rules:
/// - relative patterns resolve against `cwd`; `./` prefixes are ignored
/// - a leading `!` turns a pattern into an exclusion, like an `ignore` entry
/// - a matched directory that still holds an ignored entry is left in place
/// - everything else is removed deepest-first
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobRemover;

impl GlobRemover {
    pub fn new() -> Self {
        Self
    }

    /// Expand `patterns` into the set of paths a removal would touch.
    ///
    /// Performs the root-boundary checks but never modifies the filesystem.
    pub fn resolve(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        let cwd = normalize(&options.cwd);
        let match_options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: !options.dot,
        };

        let (exclusions, inclusions): (Vec<&String>, Vec<&String>) =
            patterns.iter().partition(|p| p.starts_with('!'));

        let ignores = options
            .ignore
            .iter()
            .map(String::as_str)
            .chain(exclusions.iter().map(|p| &p[1..]))
            .map(|p| {
                Pattern::new(&absolute_pattern(&cwd, p)).map_err(|source| RemoveError::Pattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut matches = IndexSet::new();

        for pattern in inclusions {
            let entries = glob::glob_with(&absolute_pattern(&cwd, pattern), match_options)
                .map_err(|source| RemoveError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;

            for entry in entries {
                let path = entry.map_err(|e| RemoveError::Io {
                    path: lossy(e.path()),
                    source: io::Error::from(e),
                })?;
                let path = normalize(&Utf8PathBuf::from_path_buf(path).map_err(RemoveError::NonUtf8Path)?);

                if !options.force {
                    if path == cwd {
                        return Err(RemoveError::WorkingDirectory(path));
                    }
                    if !path.starts_with(&cwd) {
                        return Err(RemoveError::OutsideRoot {
                            path,
                            cwd: cwd.clone(),
                        });
                    }
                }

                if is_ignored(path.as_std_path(), &ignores, match_options) {
                    tracing::debug!("Keeping ignored path: {}", path);
                    continue;
                }

                if holds_ignored_entry(&path, &ignores, match_options) {
                    tracing::debug!("Keeping directory with protected contents: {}", path);
                    continue;
                }

                matches.insert(path);
            }
        }

        Ok(matches.into_iter().collect())
    }
}

impl PathRemover for GlobRemover {
    fn remove(
        &self,
        patterns: &[String],
        options: &RemoveOptions,
    ) -> Result<Vec<Utf8PathBuf>, RemoveError> {
        let mut targets = self.resolve(patterns, options)?;

        if !options.dry_run {
            let mut ordered = targets.clone();
            ordered.sort_by_key(|path| Reverse(path.components().count()));

            for path in &ordered {
                remove_path(path)?;
            }
        }

        targets.sort();
        Ok(targets)
    }
}

/// Remove a file, symlink, or directory tree. Already-missing paths are fine.
fn remove_path(path: &Utf8Path) -> Result<(), RemoveError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(RemoveError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let result = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            tracing::debug!("Removed {}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RemoveError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn is_ignored(path: &Path, ignores: &[Pattern], match_options: MatchOptions) -> bool {
    ignores
        .iter()
        .any(|pattern| pattern.matches_path_with(path, match_options))
}

fn holds_ignored_entry(path: &Utf8Path, ignores: &[Pattern], match_options: MatchOptions) -> bool {
    if ignores.is_empty() {
        return false;
    }

    let is_dir = fs::symlink_metadata(path)
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return false;
    }

    WalkDir::new(path)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|entry| is_ignored(entry.path(), ignores, match_options))
}

/// Anchor a pattern at `cwd` unless it is already absolute.
fn absolute_pattern(cwd: &Utf8Path, pattern: &str) -> String {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    if Utf8Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    Utf8Path::new(&Pattern::escape(cwd.as_str()))
        .join(pattern)
        .into_string()
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut normalized = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                if normalized.file_name().is_some() {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_str()),
        }
    }
    normalized
}

fn lossy(path: &Path) -> Utf8PathBuf {
    Utf8PathBuf::from(path.to_string_lossy().into_owned())
}
