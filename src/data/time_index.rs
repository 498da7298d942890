use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::error::PipelineError;
use super::model::{CellValue, Column, ColumnKind, RawTable, TimeIndexedTable};

/// Column names (compared case-insensitively) that hold the timestamp.
pub const TIME_COLUMN_NAMES: [&str; 4] = ["tijd", "time", "timestamp", "datetime"];

/// Year-first layouts, unambiguous regardless of `dayfirst`.
const ISO_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const ISO_OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_ONLY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const NUMERIC_DATE_SEPARATORS: [char; 3] = ['-', '/', '.'];

const TIME_SUFFIXES: [&str; 3] = [" %H:%M:%S%.f", " %H:%M", ""];

// ---------------------------------------------------------------------------
// Index building
// ---------------------------------------------------------------------------

/// Promote the recognized time column to a sorted index.
///
/// Rows whose timestamp does not parse are dropped entirely. The sort is
/// stable, so equal timestamps keep their file order.
pub fn build_index(raw: &RawTable, dayfirst: bool) -> Result<TimeIndexedTable, PipelineError> {
    let time_idx = find_time_column(raw.column_names()).ok_or(PipelineError::MissingTimeColumn)?;
    let time_col = &raw.columns[time_idx];

    let stamps: Vec<Option<NaiveDateTime>> = time_col
        .values
        .iter()
        .map(|cell| match cell {
            CellValue::Text(s) => parse_timestamp(s, dayfirst),
            _ => None,
        })
        .collect();

    let mut order: Vec<usize> = (0..stamps.len()).filter(|&i| stamps[i].is_some()).collect();
    order.sort_by_key(|&i| stamps[i]);

    let dropped = stamps.len() - order.len();
    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} of {} rows with an unparseable '{}' value",
            stamps.len(),
            time_col.name
        );
    }

    let index: Vec<NaiveDateTime> = order.iter().filter_map(|&i| stamps[i]).collect();

    let columns: Vec<Column> = raw
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_idx)
        .map(|(_, col)| {
            let values = order.iter().map(|&row| col.values[row].clone()).collect();
            Column::new(col.name.clone(), values)
        })
        .collect();

    let kinds = columns.iter().map(|c| ColumnKind::classify(&c.values)).collect();

    Ok(TimeIndexedTable {
        index_name: time_col.name.clone(),
        index,
        columns,
        kinds,
    })
}

/// Position of the first column whose name is a recognized time-column name.
pub fn find_time_column<'a>(mut names: impl Iterator<Item = &'a str>) -> Option<usize> {
    names.position(|name| {
        let lower = name.to_lowercase();
        TIME_COLUMN_NAMES.contains(&lower.as_str())
    })
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Parse one timestamp cell.
///
/// Year-first layouts (4-digit leading year) are tried before numeric
/// day/month layouts, which take a 4- or 2-digit trailing year. For the
/// latter an ambiguous date (both readings valid) follows `dayfirst`; a date
/// valid in only one order is read in that order.
pub fn parse_timestamp(raw: &str, dayfirst: bool) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // `%Y` accepts any digit count, so year-first layouts need a 4-digit lead.
    if leading_digits(s) != 4 {
        return parse_numeric_date(s, dayfirst).or_else(|| parse_numeric_date(s, !dayfirst));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in ISO_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_ONLY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }

    parse_numeric_date(s, dayfirst).or_else(|| parse_numeric_date(s, !dayfirst))
}

fn leading_digits(s: &str) -> usize {
    s.chars().take_while(char::is_ascii_digit).count()
}

/// Day/month/year with a 4-digit or 2-digit trailing year.
fn parse_numeric_date(s: &str, dayfirst: bool) -> Option<NaiveDateTime> {
    let date_part = s.split(' ').next()?;
    for sep in NUMERIC_DATE_SEPARATORS {
        let fields: Vec<&str> = date_part.split(sep).collect();
        let year = match fields.as_slice() {
            [_, _, y] if y.len() == 4 => "%Y",
            [_, _, y] if y.len() == 2 => "%y",
            _ => continue,
        };
        let date = if dayfirst {
            format!("%d{sep}%m{sep}{year}")
        } else {
            format!("%m{sep}%d{sep}{year}")
        };
        for time in TIME_SUFFIXES {
            let fmt = format!("{date}{time}");
            if time.is_empty() {
                if let Ok(d) = NaiveDate::parse_from_str(s, &fmt) {
                    return Some(d.and_time(NaiveTime::MIN));
                }
            } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, &fmt) {
                return Some(dt);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;
    use crate::data::options::{DecimalMark, Delimiter, ParseOptions};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn raw(csv: &str) -> RawTable {
        let opts = ParseOptions {
            delimiter: Delimiter::Comma,
            decimal_mark: DecimalMark::Point,
            dayfirst: true,
        };
        parse_table(csv.as_bytes(), &opts).unwrap()
    }

    #[test]
    fn finds_time_column_case_insensitively() {
        assert_eq!(find_time_column(["sensor", "TimeStamp", "x"].into_iter()), Some(1));
        assert_eq!(find_time_column(["Tijd"].into_iter()), Some(0));
        assert_eq!(find_time_column(["sensorId", "value"].into_iter()), None);
        assert_eq!(find_time_column(["times", "datetime2"].into_iter()), None);
    }

    #[test]
    fn first_matching_column_wins() {
        assert_eq!(find_time_column(["value", "time", "tijd"].into_iter()), Some(1));
    }

    #[test]
    fn missing_time_column_is_reported() {
        let table = raw("sensorId,value\nA,1\n");
        assert_eq!(
            build_index(&table, true).unwrap_err(),
            PipelineError::MissingTimeColumn
        );
    }

    #[test]
    fn index_column_is_removed_and_rows_kept() {
        let table = raw(
            "tijd,temp,ph\n2024-01-01 00:00,10.5,7.1\n2024-01-01 00:05,11.0,7.2\n2024-01-01 00:10,,7.0\n",
        );
        let indexed = build_index(&table, true).unwrap();

        assert_eq!(indexed.index_name, "tijd");
        assert!(indexed.column("tijd").is_none());
        assert_eq!(
            indexed.index,
            vec![
                ts("2024-01-01 00:00:00"),
                ts("2024-01-01 00:05:00"),
                ts("2024-01-01 00:10:00")
            ]
        );
        assert_eq!(indexed.column("temp").unwrap().values[2], CellValue::Missing);
        assert_eq!(indexed.numeric_columns(), ["temp", "ph"]);
    }

    #[test]
    fn unparseable_rows_are_dropped_across_all_columns() {
        let table = raw("time,x,label\n2024-01-02,2,b\nnonsense,99,z\n,98,y\n2024-01-01,1,a\n");
        let indexed = build_index(&table, true).unwrap();

        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed.column("x").unwrap().numbers(), vec![Some(1.0), Some(2.0)]);
        assert_eq!(
            indexed.column("label").unwrap().values,
            vec![CellValue::Text("a".into()), CellValue::Text("b".into())]
        );
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let table = raw("time,x\n2024-01-02,1\n2024-01-01,2\n2024-01-02,3\n2024-01-01,4\n");
        let indexed = build_index(&table, true).unwrap();
        assert_eq!(
            indexed.column("x").unwrap().numbers(),
            vec![Some(2.0), Some(4.0), Some(1.0), Some(3.0)]
        );
        assert!(indexed.index.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn numeric_classification_uses_retained_rows_only() {
        let table = raw("time,x\n2024-01-01,1\nbad,not-a-number\n2024-01-02,2\n");
        let indexed = build_index(&table, true).unwrap();
        assert_eq!(indexed.kinds, vec![ColumnKind::Numeric]);
    }

    #[test]
    fn text_columns_are_non_numeric() {
        let table = raw("time,x,status\n2024-01-01,1,ok\n2024-01-02,2,3\n");
        let indexed = build_index(&table, true).unwrap();
        assert_eq!(indexed.kinds, vec![ColumnKind::Numeric, ColumnKind::NonNumeric]);
        assert_eq!(indexed.numeric_columns(), ["x"]);
    }

    #[test]
    fn parses_iso_variants() {
        let expected = ts("2024-03-05 14:30:00");
        for s in [
            "2024-03-05 14:30:00",
            "2024-03-05T14:30:00",
            "2024-03-05 14:30",
            "2024-03-05T14:30",
            "2024/03/05 14:30",
            " 2024-03-05 14:30:00.000 ",
            "2024-03-05T15:30:00+01:00",
            "2024-03-05T14:30:00Z",
        ] {
            assert_eq!(parse_timestamp(s, true), Some(expected), "{s}");
            assert_eq!(parse_timestamp(s, false), Some(expected), "{s}");
        }
        assert_eq!(parse_timestamp("2024-03-05", true), Some(ts("2024-03-05 00:00:00")));
    }

    #[test]
    fn dayfirst_resolves_ambiguous_dates() {
        assert_eq!(
            parse_timestamp("01-02-2024 08:00", true),
            Some(ts("2024-02-01 08:00:00"))
        );
        assert_eq!(
            parse_timestamp("01-02-2024 08:00", false),
            Some(ts("2024-01-02 08:00:00"))
        );
        assert_eq!(parse_timestamp("05/03/2024", true), Some(ts("2024-03-05 00:00:00")));
        assert_eq!(parse_timestamp("05.03.2024 10:15:30", true), Some(ts("2024-03-05 10:15:30")));
    }

    #[test]
    fn unambiguous_dates_ignore_dayfirst() {
        assert_eq!(parse_timestamp("13-01-2024", false), Some(ts("2024-01-13 00:00:00")));
        assert_eq!(parse_timestamp("01/13/2024", true), Some(ts("2024-01-13 00:00:00")));
    }

    #[test]
    fn two_digit_years_follow_dayfirst() {
        assert_eq!(parse_timestamp("01-02-24 08:00", true), Some(ts("2024-02-01 08:00:00")));
        assert_eq!(parse_timestamp("01-02-24 08:00", false), Some(ts("2024-01-02 08:00:00")));
        assert_eq!(parse_timestamp("01-02-24", true), Some(ts("2024-02-01 00:00:00")));
        assert_eq!(parse_timestamp("13/01/24 10:15", true), Some(ts("2024-01-13 10:15:00")));
    }

    #[test]
    fn two_digit_year_rows_sort_with_the_rest() {
        let table = raw("tijd,x\n02-02-2024 00:00,2\n01-02-24 00:00,1\n");
        let indexed = build_index(&table, true).unwrap();
        assert_eq!(indexed.index, vec![ts("2024-02-01 00:00:00"), ts("2024-02-02 00:00:00")]);
    }

    #[test]
    fn garbage_does_not_parse() {
        for s in ["", "  ", "yesterday", "2024-13-45", "32-13-2024", "12:00", "1-2-3", "01-02-2024x"] {
            assert_eq!(parse_timestamp(s, true), None, "{s}");
        }
    }

    #[test]
    fn dayfirst_applies_to_every_row() {
        let table = raw("tijd,x\n01-02-2024,1\n02-02-2024,2\n");
        let dayfirst = build_index(&table, true).unwrap();
        let monthfirst = build_index(&table, false).unwrap();
        assert_eq!(dayfirst.index, vec![ts("2024-02-01 00:00:00"), ts("2024-02-02 00:00:00")]);
        assert_eq!(monthfirst.index, vec![ts("2024-01-02 00:00:00"), ts("2024-02-02 00:00:00")]);
    }
}
