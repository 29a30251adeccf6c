//! `mdiv convert` command implementation.

use clap::Args;

use super::source::{SourceArgs, run};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// A missing source directory is reported but is not an error.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let rewriter = self.source.rewriter()?.dry_run(self.dry_run);

        run(&rewriter, &output, self.json)?;
        Ok(())
    }
}
