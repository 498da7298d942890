//! Resampling and moving-average smoothing of a [`TimeIndexedTable`].
//!
//! Order is fixed: resample first, then smooth whatever index is current.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use super::model::{Column, ColumnKind, TimeIndexedTable, TransformedTable};
use super::options::ResampleRule;

/// Apply the optional resample and the optional rolling mean.
///
/// * `ResampleRule::None` keeps every column; any other rule keeps only the
///   numeric columns, averaged per bucket.
/// * `rolling_window == 0` disables smoothing.
pub fn transform(
    table: &TimeIndexedTable,
    rule: ResampleRule,
    rolling_window: usize,
) -> TransformedTable {
    let (mut out, numeric) = match rule.bucket_width() {
        Some(width) => {
            let out = resample(table, width);
            let numeric = vec![true; out.columns.len()];
            (out, numeric)
        }
        None => {
            let out = TransformedTable {
                index_name: table.index_name.clone(),
                index: table.index.clone(),
                columns: table.columns.clone(),
            };
            let numeric = table.kinds.iter().map(|k| *k == ColumnKind::Numeric).collect();
            (out, numeric)
        }
    };

    if rolling_window > 0 {
        for (column, is_numeric) in out.columns.iter_mut().zip(numeric) {
            if is_numeric {
                let smoothed = rolling_mean(&column.numbers(), rolling_window);
                *column = Column::from_numbers(std::mem::take(&mut column.name), smoothed);
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Resampling
// ---------------------------------------------------------------------------

/// Mean of every numeric column per fixed-width bucket.
///
/// Buckets start at midnight of the first timestamp's day and are labelled
/// by their left edge. A bucket in which every column averages to missing is
/// left out of the result.
pub fn resample(table: &TimeIndexedTable, width: TimeDelta) -> TransformedTable {
    let numeric: Vec<(&str, Vec<Option<f64>>)> = table
        .columns
        .iter()
        .zip(&table.kinds)
        .filter(|(_, kind)| **kind == ColumnKind::Numeric)
        .map(|(c, _)| (c.name.as_str(), c.numbers()))
        .collect();

    let mut index: Vec<NaiveDateTime> = Vec::new();
    let mut means: Vec<Vec<Option<f64>>> = vec![Vec::new(); numeric.len()];

    let width_s = width.num_seconds().max(1);
    if let Some(first) = table.index.first() {
        let origin = first.date().and_time(NaiveTime::MIN);
        let bucket_of = |ts: &NaiveDateTime| (*ts - origin).num_seconds().div_euclid(width_s);

        let mut start = 0;
        let mut dropped = 0;
        while start < table.index.len() {
            let key = bucket_of(&table.index[start]);
            let end = table.index[start..]
                .iter()
                .position(|ts| bucket_of(ts) != key)
                .map_or(table.index.len(), |offset| start + offset);

            let row: Vec<Option<f64>> = numeric
                .iter()
                .map(|(_, values)| mean(&values[start..end]))
                .collect();

            if row.iter().any(Option::is_some) {
                index.push(origin + TimeDelta::seconds(key * width_s));
                for (column, value) in means.iter_mut().zip(row) {
                    column.push(value);
                }
            } else {
                dropped += 1;
            }
            start = end;
        }

        log::debug!(
            "Resampled {} rows into {} buckets of {width_s}s ({dropped} all-missing dropped)",
            table.len(),
            index.len()
        );
    }

    let columns = numeric
        .iter()
        .zip(means)
        .map(|((name, _), values)| Column::from_numbers(*name, values))
        .collect();

    TransformedTable {
        index_name: table.index_name.clone(),
        index,
        columns,
    }
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

/// Trailing moving average over `window` points.
///
/// The first `window - 1` points average over the shorter prefix. Missing
/// values are skipped; a point is missing only when its whole window is.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return values.to_vec();
    }
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean(&values[start..=i])
        })
        .collect()
}
