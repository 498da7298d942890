use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use super::error::PipelineError;

// ---------------------------------------------------------------------------
// Delimiter
// ---------------------------------------------------------------------------

/// Field separator, or auto-detection from the file structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
    Auto,
}

impl Delimiter {
    pub const ALL: [Delimiter; 5] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
        Delimiter::Auto,
    ];

    /// The literal separator byte, `None` for [`Delimiter::Auto`].
    pub fn byte(self) -> Option<u8> {
        match self {
            Delimiter::Comma => Some(b','),
            Delimiter::Semicolon => Some(b';'),
            Delimiter::Tab => Some(b'\t'),
            Delimiter::Pipe => Some(b'|'),
            Delimiter::Auto => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Semicolon => ";",
            Delimiter::Tab => "<tab>",
            Delimiter::Pipe => "|",
            Delimiter::Auto => "auto",
        }
    }
}

// ---------------------------------------------------------------------------
// Decimal mark
// ---------------------------------------------------------------------------

/// Character that separates the integer and fractional part of a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecimalMark {
    Comma,
    Point,
}

impl DecimalMark {
    pub const ALL: [DecimalMark; 2] = [DecimalMark::Comma, DecimalMark::Point];

    pub fn byte(self) -> u8 {
        match self {
            DecimalMark::Comma => b',',
            DecimalMark::Point => b'.',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DecimalMark::Comma => ",",
            DecimalMark::Point => ".",
        }
    }
}

// ---------------------------------------------------------------------------
// Resample rule
// ---------------------------------------------------------------------------

/// Fixed-width time buckets for mean resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResampleRule {
    None,
    FiveMinutes,
    FifteenMinutes,
    Hourly,
    SixHourly,
    Daily,
}

impl ResampleRule {
    pub const ALL: [ResampleRule; 6] = [
        ResampleRule::None,
        ResampleRule::FiveMinutes,
        ResampleRule::FifteenMinutes,
        ResampleRule::Hourly,
        ResampleRule::SixHourly,
        ResampleRule::Daily,
    ];

    /// Width of one bucket; `None` when resampling is disabled.
    pub fn bucket_width(self) -> Option<TimeDelta> {
        match self {
            ResampleRule::None => None,
            ResampleRule::FiveMinutes => Some(TimeDelta::minutes(5)),
            ResampleRule::FifteenMinutes => Some(TimeDelta::minutes(15)),
            ResampleRule::Hourly => Some(TimeDelta::hours(1)),
            ResampleRule::SixHourly => Some(TimeDelta::hours(6)),
            ResampleRule::Daily => Some(TimeDelta::days(1)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResampleRule::None => "none",
            ResampleRule::FiveMinutes => "5min",
            ResampleRule::FifteenMinutes => "15min",
            ResampleRule::Hourly => "1hour",
            ResampleRule::SixHourly => "6hour",
            ResampleRule::Daily => "1day",
        }
    }
}

impl fmt::Display for ResampleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResampleRule {
    type Err = PipelineError;

    /// Accepts the dashboard labels plus the pandas-style aliases
    /// (`1H`, `6H`, `1D`) found in older exported settings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" | "None" | "Geen" | "" => Ok(ResampleRule::None),
            "5min" | "5T" => Ok(ResampleRule::FiveMinutes),
            "15min" | "15T" => Ok(ResampleRule::FifteenMinutes),
            "1hour" | "1H" | "1h" => Ok(ResampleRule::Hourly),
            "6hour" | "6H" | "6h" => Ok(ResampleRule::SixHourly),
            "1day" | "1D" | "1d" => Ok(ResampleRule::Daily),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown resample rule '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Option bundles
// ---------------------------------------------------------------------------

/// Everything that influences how the file bytes are read. Part of the
/// parse cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseOptions {
    pub delimiter: Delimiter,
    pub decimal_mark: DecimalMark,
    /// Resolve `01-02-2024` as 1 February rather than 2 January.
    pub dayfirst: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Auto,
            decimal_mark: DecimalMark::Point,
            dayfirst: true,
        }
    }
}

impl ParseOptions {
    /// Reject a delimiter that is also the decimal mark.
    pub fn validate(&self) -> Result<(), PipelineError> {
        match self.delimiter.byte() {
            Some(b) if b == self.decimal_mark.byte() => Err(PipelineError::InvalidConfig(
                format!(
                    "delimiter and decimal mark are both '{}'",
                    self.decimal_mark.label()
                ),
            )),
            _ => Ok(()),
        }
    }
}

/// Full set of user settings for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub parse: ParseOptions,
    pub resample: ResampleRule,
    /// Moving-average window in data points; 0 disables smoothing.
    pub rolling_window: usize,
    /// Chosen parameters; `None` selects the first three numeric columns.
    pub selected_parameters: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            resample: ResampleRule::None,
            rolling_window: 0,
            selected_parameters: None,
        }
    }
}
