//! `mdiv check` command implementation.

use clap::Args;

use super::source::{SourceArgs, run};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Fails when at least one file still contains a convertible fence.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let rewriter = self.source.rewriter()?.dry_run(true);

        let summary = run(&rewriter, &output, self.json)?;

        match summary.converted_count() {
            0 => Ok(()),
            1 => Err(CliError::Validation(
                "1 file needs conversion, run `mdiv convert`".to_owned(),
            )),
            n => Err(CliError::Validation(format!(
                "{n} files need conversion, run `mdiv convert`"
            ))),
        }
    }
}
