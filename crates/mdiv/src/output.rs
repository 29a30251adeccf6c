//! Colored terminal output utilities.

use console::{Style, Term};
use mdiv_convert::{FileReport, FileStatus, RunSummary};

/// Terminal output formatter.
///
/// Human-readable progress goes to stderr; machine-readable output to stdout.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a separator line.
    pub(crate) fn separator(&self) {
        let _ = self.term.write_line(&"-".repeat(50));
    }

    /// Print raw data to stdout.
    pub(crate) fn data(&self, data: &str) {
        let _ = self.stdout.write_line(data);
    }

    /// Print the progress line for one processed file.
    pub(crate) fn file(&self, report: &FileReport, dry_run: bool) {
        self.info(&format!("Processing: {}", report.path.display()));
        match &report.status {
            FileStatus::Converted { blocks } => {
                let verb = if dry_run { "Would convert" } else { "Converted" };
                self.success(&format!("  {verb} {}", plural(*blocks, "diagram block")));
            }
            FileStatus::Unchanged => self.info("  No diagram blocks found or no changes needed"),
            FileStatus::Failed { error } => self.error(&format!("  Error: {error}")),
        }
    }

    /// Print the run summary block.
    pub(crate) fn summary(&self, summary: &RunSummary) {
        let converted_label = if summary.dry_run {
            "Files needing conversion"
        } else {
            "Files converted"
        };

        self.separator();
        self.highlight("Summary:");
        self.info(&format!("  Total files processed: {}", summary.scanned()));
        self.info(&format!(
            "  {converted_label}: {}",
            summary.converted_count()
        ));

        let failed: Vec<_> = summary.failed().collect();
        if !failed.is_empty() {
            self.warning(&format!("  Files failed: {}", failed.len()));
        }

        if summary.converted_count() > 0 {
            self.info("");
            self.info(&format!("{converted_label}:"));
            for path in summary.converted() {
                self.info(&format!("  - {}", path.display()));
            }
        }

        if !failed.is_empty() {
            self.info("");
            self.warning("Failed files:");
            for (path, error) in failed {
                self.warning(&format!("  - {}: {error}", path.display()));
            }
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
