//! Documentation file discovery by filesystem walking.
//!
//! The Scanner only identifies candidate files. Nothing is read at this stage;
//! [`FileProcessor`](crate::FileProcessor) loads and rewrites each file later.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default documentation file extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md"];

/// Error returned by [`Scanner::scan`].
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The documentation root does not exist or is not a directory.
    #[error("Directory {} not found", .0.display())]
    SourceDirNotFound(PathBuf),
}

/// Discovers documentation files under a root directory.
///
/// Hidden entries (names starting with `.`) are skipped. Symlinked
/// directories are followed, but each real directory is walked at most once,
/// so link cycles terminate. Entries are visited in file-name order inside each
/// directory, so the result is stable across runs.
#[derive(Debug, Clone)]
pub struct Scanner {
    source_dir: PathBuf,
    extensions: Vec<String>,
}

impl Scanner {
    /// Create a new Scanner for `source_dir` matching `.md` files.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|&e| e.to_owned()).collect(),
        }
    }

    /// Set the file extensions to collect.
    ///
    /// A leading dot is ignored and matching is ASCII case-insensitive, so
    /// `".MD"` and `"md"` are equivalent.
    #[must_use]
    pub fn extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Root directory this scanner walks.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Walk the source directory and return matching file paths.
    pub fn scan(&self) -> Result<Vec<PathBuf>, ScanError> {
        if !self.source_dir.is_dir() {
            return Err(ScanError::SourceDirNotFound(self.source_dir.clone()));
        }

        let mut files = Vec::new();
        let mut visited = HashSet::new();
        if let Ok(root) = fs::canonicalize(&self.source_dir) {
            visited.insert(root);
        }
        self.scan_directory(&self.source_dir, &mut visited, &mut files);
        tracing::debug!(
            source_dir = %self.source_dir.display(),
            file_count = files.len(),
            "Scan completed"
        );
        Ok(files)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        visited: &mut HashSet<PathBuf>,
        files: &mut Vec<PathBuf>,
    ) {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %dir_path.display(), error = %e, "Failed to read directory");
                return;
            }
        };

        // Cache file_type to avoid repeated stat calls; symlinks are resolved
        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| {
                    t.is_dir() || (t.is_symlink() && e.path().is_dir())
                });
                (e, is_dir)
            })
            .collect();
        entries.sort_by_key(|(e, _)| e.file_name());

        for (entry, is_dir) in entries {
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            if is_dir {
                let Ok(real) = fs::canonicalize(&path) else {
                    continue;
                };
                if !visited.insert(real) {
                    tracing::debug!(path = %path.display(), "Directory already scanned, skipping");
                    continue;
                }
                self.scan_directory(&path, visited, files);
            } else if self.matches_extension(&path) {
                files.push(path);
            }
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy();
            self.extensions
                .iter()
                .any(|wanted| ext.eq_ignore_ascii_case(wanted))
        })
    }
}
