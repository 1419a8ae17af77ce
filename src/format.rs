//! Post-processing of the generated file by an external formatter.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// What to do with the formatter step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatPolicy {
    /// Run the formatter; any failure fails the run
    #[default]
    Required,
    /// Run the formatter; failures are logged and ignored
    BestEffort,
    /// Leave the file as rendered
    Skip,
}

/// Rewrites a source file in place
#[async_trait]
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    async fn format(&self, path: &Path) -> Result<()>;
}

/// Edition passed to `rustfmt` unless overridden
pub const DEFAULT_EDITION: &str = "2024";

/// Formats with `rustfmt`
pub struct Rustfmt {
    program: PathBuf,
    edition: String,
}

impl Rustfmt {
    pub fn new() -> Self {
        Self::with_program("rustfmt")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            edition: DEFAULT_EDITION.to_string(),
        }
    }

    /// Format for the edition of the crate that includes the output
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = edition.into();
        self
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.arg("--edition").arg(&self.edition).arg(path);
        command
    }
}

impl Default for Rustfmt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Formatter for Rustfmt {
    fn name(&self) -> &str {
        "rustfmt"
    }

    async fn format(&self, path: &Path) -> Result<()> {
        let format_error = |reason: String| Error::Format {
            path: path.to_path_buf(),
            reason,
        };

        let output = self
            .command(path)
            .output()
            .await
            .map_err(|e| format_error(format!("cannot run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format_error(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Run `formatter` on `path` according to `policy`.
///
/// Returns whether the file was formatted.
pub async fn apply(formatter: &dyn Formatter, path: &Path, policy: FormatPolicy) -> Result<bool> {
    match policy {
        FormatPolicy::Skip => Ok(false),
        FormatPolicy::Required => {
            formatter.format(path).await?;
            info!(formatter = formatter.name(), path = %path.display(), "formatted output");
            Ok(true)
        }
        FormatPolicy::BestEffort => match formatter.format(path).await {
            Ok(()) => {
                info!(formatter = formatter.name(), path = %path.display(), "formatted output");
                Ok(true)
            }
            Err(e) => {
                warn!(formatter = formatter.name(), error = %e, "leaving output unformatted");
                Ok(false)
            }
        },
    }
}
