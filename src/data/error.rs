//! Errors raised by the ingestion pipeline.

use thiserror::Error;

/// How loudly a [`PipelineError`] should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Everything that can stop a pipeline run.
///
/// All variants are recoverable: the caller shows the message and waits for
/// the next user action. The type is `Clone` so a failed parse can be cached
/// just like a successful one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The delimiter / decimal mark combination cannot be parsed unambiguously.
    #[error("invalid settings: {0}")]
    InvalidConfig(String),

    /// The CSV is structurally unreadable.
    #[error("could not read CSV: {0}")]
    Parse(String),

    /// No column name matches the recognized time-column names.
    #[error("no time column found (expected: 'tijd', 'time', 'timestamp', 'datetime')")]
    MissingTimeColumn,

    /// The table has a time index but nothing to plot.
    #[error("no numeric columns found to plot")]
    NoNumericColumns,

    /// The user deselected every parameter.
    #[error("select at least one parameter to show a chart")]
    NoParametersSelected,
}

impl PipelineError {
    pub fn severity(&self) -> Severity {
        match self {
            PipelineError::InvalidConfig(_)
            | PipelineError::Parse(_)
            | PipelineError::MissingTimeColumn => Severity::Error,
            PipelineError::NoNumericColumns => Severity::Warning,
            PipelineError::NoParametersSelected => Severity::Info,
        }
    }
}
