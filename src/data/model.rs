use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a parsed table
// ---------------------------------------------------------------------------

/// A cell as typed by the loader under the configured decimal mark.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    /// Anything that is neither missing nor a number, kept verbatim.
    Text(String),
    Missing,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Missing => write!(f, ""),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric view of the column; non-numbers map to `None`.
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.values.iter().map(CellValue::as_f64).collect()
    }

    pub fn from_numbers(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.map_or(CellValue::Missing, CellValue::Number))
            .collect();
        Self::new(name, values)
    }
}

/// Kind of a column after the post-index classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    NonNumeric,
}

impl ColumnKind {
    /// A column is numeric when no retained cell holds text.
    pub fn classify(values: &[CellValue]) -> Self {
        if values.iter().any(|v| matches!(v, CellValue::Text(_))) {
            ColumnKind::NonNumeric
        } else {
            ColumnKind::Numeric
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – loader output
// ---------------------------------------------------------------------------

/// Rows × named columns, straight out of the loader. Column names are
/// trimmed and unique.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<Column>,
    pub n_rows: usize,
}

impl RawTable {
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// TimeIndexedTable – one column promoted to a sorted time index
// ---------------------------------------------------------------------------

/// A table ordered by a timestamp index. The index column is not part of
/// `columns`; `kinds[i]` classifies `columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeIndexedTable {
    pub index_name: String,
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
    pub kinds: Vec<ColumnKind>,
}

impl TimeIndexedTable {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The numeric column universe, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .zip(&self.kinds)
            .filter(|(_, kind)| **kind == ColumnKind::Numeric)
            .map(|(c, _)| c.name.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TransformedTable – presentation-ready output
// ---------------------------------------------------------------------------

/// Output of the series transformer. Same ordering guarantees as the
/// [`TimeIndexedTable`] it came from; row count may shrink under resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedTable {
    pub index_name: String,
    pub index: Vec<NaiveDateTime>,
    pub columns: Vec<Column>,
}

impl TransformedTable {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}
