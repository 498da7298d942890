use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use sha2::{Digest, Sha256};

use super::error::PipelineError;
use super::model::{CellValue, Column, RawTable};
use super::options::{DecimalMark, ParseOptions};

/// Candidates for delimiter auto-detection, in tie-break order.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Lines inspected by [`detect_delimiter`].
const SNIFF_LINES: usize = 10;

/// Cell contents read as a missing value.
const MISSING_TOKENS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-nan", "NULL", "null", "None", "<NA>", "#N/A", "#NA",
];

// ---------------------------------------------------------------------------
// Uploaded file
// ---------------------------------------------------------------------------

/// The raw bytes of one user-chosen file plus its content digest.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub digest: [u8; 32],
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let digest = Sha256::digest(&bytes).into();
        Self {
            name: name.into(),
            bytes,
            digest,
        }
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Read a file from disk into an [`UploadedFile`].
pub fn read_upload(path: &Path) -> Result<UploadedFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    Ok(UploadedFile::new(name, bytes))
}

// ---------------------------------------------------------------------------
// Table parsing
// ---------------------------------------------------------------------------

/// Parse CSV bytes into a [`RawTable`].
///
/// * The header row gives the column names (trimmed, empty names become
///   `Unnamed: i`, duplicates get a `.1`, `.2`, ... suffix).
/// * Blank lines are skipped; short rows are padded with missing cells.
/// * A row with more fields than the header is a [`PipelineError::Parse`].
pub fn parse_table(bytes: &[u8], opts: &ParseOptions) -> Result<RawTable, PipelineError> {
    opts.validate()?;

    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| PipelineError::Parse(format!("file is not valid UTF-8: {e}")))?;

    let delimiter = match opts.delimiter.byte() {
        Some(b) => b,
        None => {
            let detected = detect_delimiter(text);
            log::debug!("Detected delimiter {:?}", detected as char);
            if detected == opts.decimal_mark.byte() {
                return Err(PipelineError::InvalidConfig(format!(
                    "detected delimiter '{}' is also the decimal mark; choose another decimal mark",
                    detected as char
                )));
            }
            detected
        }
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut names: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<CellValue>> = Vec::new();
    let mut have_header = false;
    let mut n_rows = 0;

    for result in reader.records() {
        let record = result.map_err(|e| PipelineError::Parse(e.to_string()))?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if !have_header {
            names = unique_column_names(record.iter());
            cells = vec![Vec::new(); names.len()];
            have_header = true;
            continue;
        }

        if record.len() > names.len() {
            let line = record.position().map_or(n_rows + 2, |p| p.line() as usize);
            return Err(PipelineError::Parse(format!(
                "expected {} fields on line {line}, saw {}",
                names.len(),
                record.len()
            )));
        }

        for (idx, column) in cells.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .map_or(CellValue::Missing, |raw| parse_cell(raw, opts.decimal_mark));
            column.push(value);
        }
        n_rows += 1;
    }

    if !have_header {
        return Err(PipelineError::Parse("no columns to parse".to_string()));
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Ok(RawTable { columns, n_rows })
}

fn unique_column_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (i, name) in raw.enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {i}")
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// Type one raw field under the given decimal mark.
pub fn parse_cell(raw: &str, decimal_mark: DecimalMark) -> CellValue {
    let s = raw.trim();
    if s.is_empty() || MISSING_TOKENS.contains(&s) {
        return CellValue::Missing;
    }
    match parse_number(s, decimal_mark) {
        Some(v) if v.is_nan() => CellValue::Missing,
        Some(v) => CellValue::Number(v),
        None => CellValue::Text(raw.to_string()),
    }
}

fn parse_number(s: &str, decimal_mark: DecimalMark) -> Option<f64> {
    match decimal_mark {
        DecimalMark::Point => {
            if s.contains(',') {
                return None;
            }
            s.parse().ok()
        }
        DecimalMark::Comma => {
            if s.contains('.') || s.matches(',').count() > 1 {
                return None;
            }
            s.replacen(',', ".", 1).parse().ok()
        }
    }
}

// ---------------------------------------------------------------------------
// Delimiter detection
// ---------------------------------------------------------------------------

/// Guess the field separator from the first non-empty lines.
///
/// Each candidate is scored by its mean count per line divided by
/// `1 + std-dev`, so frequent *and* consistent separators win. Characters
/// inside double quotes are not counted.
pub fn detect_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    if lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0.0f64;

    for candidate in DELIMITER_CANDIDATES {
        let counts: Vec<f64> = lines
            .iter()
            .map(|line| count_unquoted(line, candidate) as f64)
            .collect();
        let mean = counts.iter().sum::<f64>() / counts.len() as f64;
        let variance =
            counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / counts.len() as f64;
        let score = mean / (1.0 + variance.sqrt());

        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
