use anyhow::{Context, Result};
use csv::WriterBuilder;

use super::error::PipelineError;
use super::model::{CellValue, TransformedTable};

/// File name offered in the save dialog.
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Render the selected parameters of `table` as CSV.
///
/// The time index is the leading column. Output always uses `,` between
/// fields and `.` as decimal point, whatever the input conventions were.
pub fn to_csv(table: &TransformedTable, selected: &[String]) -> Result<String> {
    if selected.is_empty() {
        return Err(PipelineError::NoParametersSelected.into());
    }

    let columns: Vec<_> = selected
        .iter()
        .filter_map(|name| table.column(name))
        .collect();

    let mut writer = WriterBuilder::new().delimiter(b',').from_writer(Vec::new());

    let mut header = vec![table.index_name.as_str()];
    header.extend(columns.iter().map(|c| c.name.as_str()));
    writer.write_record(&header).context("writing CSV header")?;

    for (row, ts) in table.index.iter().enumerate() {
        let mut record = vec![ts.format(TIMESTAMP_FORMAT).to_string()];
        record.extend(columns.iter().map(|c| format_cell(&c.values[row])));
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    let bytes = writer.into_inner().context("flushing CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e16 => format!("{v:.1}"),
        CellValue::Number(v) if v.is_finite() && *v != 0.0 && (v.abs() < 1e-4 || v.abs() >= 1e16) => {
            scientific(*v)
        }
        CellValue::Number(v) => format!("{v}"),
        CellValue::Text(s) => s.clone(),
        CellValue::Missing => String::new(),
    }
}

/// Exponent notation with a signed, at least two-digit exponent (`1e-05`).
fn scientific(v: f64) -> String {
    let formatted = format!("{v:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use chrono::NaiveDateTime;

    fn table() -> TransformedTable {
        let ts = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        TransformedTable {
            index_name: "tijd".to_string(),
            index: vec![ts("2024-01-01 00:00"), ts("2024-01-01 00:05")],
            columns: vec![
                Column::from_numbers("temp", vec![Some(10.5), None]),
                Column::from_numbers("ph", vec![Some(7.0), Some(7.25)]),
                Column::from_numbers("o2", vec![Some(9.1), Some(9.3)]),
            ],
        }
    }

    #[test]
    fn exports_index_and_selected_columns() {
        let csv = to_csv(&table(), &["temp".to_string(), "ph".to_string()]).unwrap();
        assert_eq!(
            csv,
            "tijd,temp,ph\n2024-01-01 00:00:00,10.5,7.0\n2024-01-01 00:05:00,,7.25\n"
        );
    }

    #[test]
    fn empty_selection_is_refused() {
        let err = to_csv(&table(), &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::NoParametersSelected)
        );
    }

    #[test]
    fn decimal_point_is_always_a_dot() {
        assert_eq!(format_cell(&CellValue::Number(0.125)), "0.125");
        assert_eq!(format_cell(&CellValue::Number(-3.0)), "-3.0");
        assert_eq!(format_cell(&CellValue::Missing), "");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_notation() {
        assert_eq!(format_cell(&CellValue::Number(0.00001)), "1e-05");
        assert_eq!(format_cell(&CellValue::Number(-2.5e-7)), "-2.5e-07");
        assert_eq!(format_cell(&CellValue::Number(1.5e20)), "1.5e+20");
        assert_eq!(format_cell(&CellValue::Number(1e16)), "1e+16");
        assert_eq!(format_cell(&CellValue::Number(0.0001)), "0.0001");
        assert_eq!(format_cell(&CellValue::Number(0.0)), "0.0");
    }

    #[test]
    fn sub_second_timestamps_keep_their_fraction() {
        let base = NaiveDateTime::parse_from_str("2024-01-01 00:00", "%Y-%m-%d %H:%M").unwrap();
        let table = TransformedTable {
            index_name: "tijd".to_string(),
            index: vec![base, base + chrono::TimeDelta::milliseconds(500)],
            columns: vec![Column::from_numbers("temp", vec![Some(1.5), Some(2.5)])],
        };
        let csv = to_csv(&table, &["temp".to_string()]).unwrap();
        assert_eq!(
            csv,
            "tijd,temp\n2024-01-01 00:00:00,1.5\n2024-01-01 00:00:00.500,2.5\n"
        );
    }
}
