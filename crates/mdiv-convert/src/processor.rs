//! Per-file read, convert and write-back.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::fence::FenceConverter;

/// Error processing a single file.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// File could not be read or is not valid UTF-8.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Converted content could not be written back.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of successfully processing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File content changed (or would change, in dry-run mode).
    Converted {
        /// Number of fenced blocks rewritten.
        blocks: usize,
    },
    /// File left untouched.
    Unchanged,
}

/// Reads a file, converts its fenced blocks and writes it back when needed.
#[derive(Debug, Clone, Default)]
pub struct FileProcessor {
    converter: FenceConverter,
    dry_run: bool,
}

impl FileProcessor {
    /// Create a processor using `converter`.
    #[must_use]
    pub fn new(converter: FenceConverter) -> Self {
        Self {
            converter,
            dry_run: false,
        }
    }

    /// Report changes without writing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Converter used by this processor.
    #[must_use]
    pub fn converter(&self) -> &FenceConverter {
        &self.converter
    }

    /// Process `path`, returning whether the file was converted.
    ///
    /// Failures are logged and reported as "not converted".
    pub fn process(&self, path: &Path) -> bool {
        match self.try_process(path) {
            Ok(outcome) => matches!(outcome, FileOutcome::Converted { .. }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to process file");
                false
            }
        }
    }

    /// Process `path`, surfacing I/O failures to the caller.
    ///
    /// The file is only rewritten when the converted text differs from the
    /// original, so untouched files keep their modification time.
    pub fn try_process(&self, path: &Path) -> Result<FileOutcome, ProcessError> {
        let content = fs::read_to_string(path).map_err(|source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if !content.contains(self.converter.opening_token()) {
            tracing::debug!(path = %path.display(), "No fence token, skipping");
            return Ok(FileOutcome::Unchanged);
        }

        let conversion = self.converter.convert(&content);
        if conversion.text == content {
            tracing::debug!(path = %path.display(), "No changes needed");
            return Ok(FileOutcome::Unchanged);
        }

        if self.dry_run {
            tracing::debug!(path = %path.display(), blocks = conversion.blocks, "Would convert");
        } else {
            write_atomic(path, &conversion.text).map_err(|source| ProcessError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), blocks = conversion.blocks, "Converted");
        }

        Ok(FileOutcome::Converted {
            blocks: conversion.blocks,
        })
    }
}

/// Replace the file at `path` with `content` via a temp file next to it.
///
/// Symlinks are resolved first so the link stays in place and its target is
/// rewritten. The target's permissions are carried over to the replacement.
fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let dir = target.parent().unwrap_or(Path::new("."));
    let permissions = fs::metadata(&target)?.permissions();

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;
    temp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
