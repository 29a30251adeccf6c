//! Options shared by commands that walk the documentation tree.

use std::path::PathBuf;

use clap::Args;
use mdiv_config::{CliSettings, Config};
use mdiv_convert::{FenceConverter, Rewriter, RunSummary};

use crate::error::CliError;
use crate::output::Output;

/// Documentation source selection.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover mdiv.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    pub source_dir: Option<PathBuf>,

    /// Fence language tag to convert (overrides config, default: mermaid).
    #[arg(long)]
    pub language: Option<String>,

    /// Class attribute of the wrapper element (overrides config, default: mermaid).
    #[arg(long)]
    pub class: Option<String>,

    /// Enable verbose output (debug logs for every file decision).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration and build the rewriter it describes.
    pub(crate) fn rewriter(&self) -> Result<Rewriter, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            language: self.language.clone(),
            class: self.class.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let converter = FenceConverter::new(&config.convert.language, &config.convert.class)?;
        Ok(Rewriter::new(config.docs_resolved.source_dir)
            .extensions(&config.docs_resolved.extensions)
            .converter(converter))
    }
}

/// Run `rewriter`, printing progress unless `json` output is requested.
pub(crate) fn run(
    rewriter: &Rewriter,
    output: &Output,
    json: bool,
) -> Result<RunSummary, CliError> {
    let summary = if json {
        rewriter.run(|_| {})
    } else {
        output.highlight(&format!(
            "Converting diagram blocks under {}...",
            rewriter.source_dir().display()
        ));
        output.separator();
        let summary = rewriter.run(|report| output.file(report, rewriter.is_dry_run()));
        if !summary.source_dir_found {
            output.warning(&format!(
                "Directory {} not found!",
                summary.source_dir.display()
            ));
        }
        summary
    };

    if json {
        output.data(&serde_json::to_string_pretty(&summary)?);
    } else {
        output.summary(&summary);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use pretty_assertions::assert_eq;

    fn source_args(config: PathBuf) -> SourceArgs {
        SourceArgs {
            config: Some(config),
            source_dir: None,
            language: None,
            class: None,
            verbose: false,
        }
    }

    #[test]
    fn test_rewriter_uses_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdiv.toml");
        fs::write(&config_path, "[docs]\nsource_dir = \"handbook\"\n").unwrap();

        let rewriter = source_args(config_path).rewriter().unwrap();

        assert_eq!(rewriter.source_dir(), temp_dir.path().join("handbook"));
    }

    #[test]
    fn test_rewriter_cli_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdiv.toml");
        fs::write(&config_path, "").unwrap();
        let docs = temp_dir.path().join("elsewhere");

        let mut args = source_args(config_path);
        args.source_dir = Some(docs.clone());
        let rewriter = args.rewriter().unwrap();

        assert_eq!(rewriter.source_dir(), docs);
    }

    #[test]
    fn test_rewriter_rejects_invalid_language() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("mdiv.toml");
        fs::write(&config_path, "[convert]\nlanguage = \"a`b\"\n").unwrap();

        let result = source_args(config_path).rewriter();

        assert!(matches!(result, Err(CliError::Fence(_))));
    }

    #[test]
    fn test_rewriter_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = source_args(temp_dir.path().join("missing.toml")).rewriter();

        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
