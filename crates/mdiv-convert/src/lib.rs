//! Fenced diagram block conversion for documentation trees.
//!
//! Static-site generators that render diagrams client-side expect a wrapper
//! element such as `<div class="mermaid">` rather than a fenced code block.
//! This crate rewrites those blocks in place:
//!
//! - [`FenceConverter`]: pure text rewrite of `` ```mermaid `` fences
//! - [`Scanner`]: recursive discovery of documentation files
//! - [`FileProcessor`]: read, convert, and write back only when changed
//! - [`Rewriter`]: drives a full run and produces a [`RunSummary`]
//!
//! # Example
//!
//! ```no_run
//! use mdiv_convert::Rewriter;
//!
//! let summary = Rewriter::new("docs").run(|_| {});
//! for path in summary.converted() {
//!     println!("{}", path.display());
//! }
//! ```

mod fence;
mod processor;
mod report;
mod scanner;

use std::path::{Path, PathBuf};

pub use fence::{
    Conversion, DEFAULT_CLASS, DEFAULT_LANGUAGE, FenceConverter, FenceError, convert,
};
pub use processor::{FileOutcome, FileProcessor, ProcessError};
pub use report::{FileReport, FileStatus, RunSummary};
pub use scanner::{DEFAULT_EXTENSIONS, ScanError, Scanner};

/// Converts every documentation file under a root directory.
///
/// Files are processed sequentially in discovery order. A failure on one file
/// is recorded in its [`FileReport`] and never stops the run.
#[derive(Debug, Clone)]
pub struct Rewriter {
    scanner: Scanner,
    processor: FileProcessor,
    dry_run: bool,
}

impl Rewriter {
    /// Create a rewriter for `source_dir` with default settings.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            scanner: Scanner::new(source_dir),
            processor: FileProcessor::default(),
            dry_run: false,
        }
    }

    /// Set the documentation file extensions to collect.
    #[must_use]
    pub fn extensions(mut self, extensions: &[String]) -> Self {
        self.scanner = self.scanner.extensions(extensions);
        self
    }

    /// Use `converter` instead of the default mermaid converter.
    #[must_use]
    pub fn converter(mut self, converter: FenceConverter) -> Self {
        self.processor = FileProcessor::new(converter).dry_run(self.dry_run);
        self
    }

    /// Report changes without writing them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self.processor = self.processor.dry_run(dry_run);
        self
    }

    /// Whether changes are only reported.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Documentation root this rewriter scans.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        self.scanner.source_dir()
    }

    /// Run over the whole tree, calling `observer` after each file.
    ///
    /// A missing documentation root yields an empty summary with
    /// `source_dir_found` unset.
    pub fn run(&self, mut observer: impl FnMut(&FileReport)) -> RunSummary {
        let source_dir = self.scanner.source_dir().to_path_buf();
        let paths = match self.scanner.scan() {
            Ok(paths) => paths,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping run");
                return RunSummary::source_dir_missing(source_dir, self.dry_run);
            }
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let status = match self.processor.try_process(&path) {
                Ok(outcome) => FileStatus::from(outcome),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "Failed to process file");
                    FileStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            let report = FileReport { path, status };
            observer(&report);
            files.push(report);
        }

        let summary = RunSummary {
            source_dir,
            source_dir_found: true,
            dry_run: self.dry_run,
            files,
        };
        tracing::info!(
            scanned = summary.scanned(),
            converted = summary.converted_count(),
            blocks = summary.blocks_converted(),
            "Run completed"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::{Arc, Mutex};

    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_run_converts_tree() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        let diagram = write(&docs, "arch/overview.md", "# Arch\n```mermaid\nA-->B;\n```\n");
        write(&docs, "index.md", "# Home\nSome text.");
        write(&docs, "notes.txt", "```mermaid\nA\n```\n");

        let mut seen = Vec::new();
        let summary = Rewriter::new(&docs).run(|report| seen.push(report.clone()));

        assert!(summary.source_dir_found);
        assert_eq!(summary.scanned(), 2);
        assert_eq!(summary.converted().collect::<Vec<_>>(), vec![diagram.as_path()]);
        assert_eq!(seen, summary.files);
        assert_eq!(
            fs::read_to_string(&diagram).unwrap(),
            "# Arch\n<div class=\"mermaid\">\nA-->B;\n</div>\n"
        );
        assert_eq!(
            fs::read_to_string(docs.join("notes.txt")).unwrap(),
            "```mermaid\nA\n```\n"
        );
    }

    #[test]
    fn test_run_missing_source_dir() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");

        let mut calls = 0;
        let summary = Rewriter::new(&docs).run(|_| calls += 1);

        assert!(!summary.source_dir_found);
        assert_eq!(summary.source_dir, docs);
        assert_eq!(summary.scanned(), 0);
        assert_eq!(summary.converted_count(), 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        write(&docs, "a.md", "```mermaid\nA\n```\n");
        write(&docs, "b/c.md", "x\n```mermaid\nB\n```\ny\n```mermaid\nC\n```\n");
        let rewriter = Rewriter::new(&docs);

        let first = rewriter.run(|_| {});
        let second = rewriter.run(|_| {});

        assert_eq!(first.converted_count(), 2);
        assert_eq!(first.blocks_converted(), 3);
        assert_eq!(second.scanned(), 2);
        assert_eq!(second.converted_count(), 0);
    }

    #[test]
    fn test_run_continues_after_failure() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        let bad = docs.join("a-bad.md");
        fs::create_dir_all(&docs).unwrap();
        fs::write(&bad, [0xff, 0xfe, 0xfd]).unwrap();
        let good = write(&docs, "b-good.md", "```mermaid\nA\n```\n");

        let summary = Rewriter::new(&docs).run(|_| {});

        assert_eq!(summary.scanned(), 2);
        assert_eq!(summary.failed().count(), 1);
        assert_eq!(summary.failed().next().unwrap().0, bad.as_path());
        assert_eq!(summary.converted().collect::<Vec<_>>(), vec![good.as_path()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_converts_symlink_target_and_keeps_link() {
        let temp_dir = create_test_dir();
        let target = write(temp_dir.path(), "shared.md", "```mermaid\nA\n```\n");
        let docs = temp_dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        let link = docs.join("link.md");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let summary = Rewriter::new(&docs).run(|_| {});

        assert_eq!(summary.converted().collect::<Vec<_>>(), vec![link.as_path()]);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "<div class=\"mermaid\">\nA\n</div>\n"
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_run_reports_failures_without_warn_logs() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("bad.md"), [0xff, 0xfe]).unwrap();
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let (summary, missing) = tracing::subscriber::with_default(subscriber, || {
            let summary = Rewriter::new(&docs).run(|_| {});
            let missing = Rewriter::new(docs.join("missing")).run(|_| {});
            (summary, missing)
        });

        assert_eq!(summary.failed().count(), 1);
        assert!(!missing.source_dir_found);
        assert_eq!(String::from_utf8(log.0.lock().unwrap().clone()).unwrap(), "");
    }

    #[test]
    fn test_run_dry_run_keeps_files() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        let page = write(&docs, "page.md", "```mermaid\nA\n```\n");

        let summary = Rewriter::new(&docs).dry_run(true).run(|_| {});

        assert!(summary.dry_run);
        assert_eq!(summary.converted_count(), 1);
        assert_eq!(fs::read_to_string(&page).unwrap(), "```mermaid\nA\n```\n");
    }

    #[test]
    fn test_run_with_custom_converter_and_extensions() {
        let temp_dir = create_test_dir();
        let docs = temp_dir.path().join("docs");
        let page = write(&docs, "page.markdown", "```dot\ndigraph {}\n```\n");
        write(&docs, "other.md", "```dot\ndigraph {}\n```\n");

        let converter = FenceConverter::new("dot", "graphviz").unwrap();
        let summary = Rewriter::new(&docs)
            .dry_run(true)
            .converter(converter)
            .extensions(&["markdown".to_owned()])
            .run(|_| {});

        assert_eq!(summary.scanned(), 1);
        assert_eq!(summary.converted().collect::<Vec<_>>(), vec![page.as_path()]);
        // dry run set before the converter still applies
        assert_eq!(
            fs::read_to_string(&page).unwrap(),
            "```dot\ndigraph {}\n```\n"
        );
    }
}
