//! Per-file reports and the run summary.

use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::processor::FileOutcome;

/// Classification of a processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Fenced blocks were rewritten.
    Converted { blocks: usize },
    /// Nothing to rewrite.
    Unchanged,
    /// Reading or writing the file failed; the file was skipped.
    Failed { error: String },
}

impl From<FileOutcome> for FileStatus {
    fn from(outcome: FileOutcome) -> Self {
        match outcome {
            FileOutcome::Converted { blocks } => Self::Converted { blocks },
            FileOutcome::Unchanged => Self::Unchanged,
        }
    }
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    /// Whether the file was converted.
    #[must_use]
    pub fn is_converted(&self) -> bool {
        matches!(self.status, FileStatus::Converted { .. })
    }
}

/// Summary of a whole run, in discovery order.
///
/// Serializes with the computed `scanned`, `converted` and `blocks` totals and
/// the `converted_files` list next to the per-file reports.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Documentation root that was scanned.
    pub source_dir: PathBuf,
    /// `false` when the documentation root did not exist.
    pub source_dir_found: bool,
    /// Whether changes were only reported, not written.
    pub dry_run: bool,
    /// One report per discovered file.
    pub files: Vec<FileReport>,
}

impl RunSummary {
    /// Summary for a run whose documentation root was missing.
    #[must_use]
    pub fn source_dir_missing(source_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            source_dir,
            source_dir_found: false,
            dry_run,
            files: Vec::new(),
        }
    }

    /// Total number of files scanned.
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    /// Paths of converted files.
    pub fn converted(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| f.is_converted())
            .map(|f| f.path.as_path())
    }

    /// Number of converted files.
    #[must_use]
    pub fn converted_count(&self) -> usize {
        self.converted().count()
    }

    /// Files that failed, with their error messages.
    pub fn failed(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|f| match &f.status {
            FileStatus::Failed { error } => Some((f.path.as_path(), error.as_str())),
            _ => None,
        })
    }

    /// Total number of fenced blocks rewritten across all files.
    #[must_use]
    pub fn blocks_converted(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                FileStatus::Converted { blocks } => blocks,
                _ => 0,
            })
            .sum()
    }
}

impl Serialize for RunSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SummaryRepr<'a> {
            source_dir: &'a Path,
            source_dir_found: bool,
            dry_run: bool,
            scanned: usize,
            converted: usize,
            blocks: usize,
            converted_files: Vec<&'a Path>,
            files: &'a [FileReport],
        }

        SummaryRepr {
            source_dir: &self.source_dir,
            source_dir_found: self.source_dir_found,
            dry_run: self.dry_run,
            scanned: self.scanned(),
            converted: self.converted_count(),
            blocks: self.blocks_converted(),
            converted_files: self.converted().collect(),
            files: &self.files,
        }
        .serialize(serializer)
    }
}
