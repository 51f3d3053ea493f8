use std::collections::BTreeMap;

use super::model::{FilteredView, Value};

// ---------------------------------------------------------------------------
// DerivedTable – chart-ready output handed to the presentation layer
// ---------------------------------------------------------------------------

/// A grouped/reduced table computed from a filtered view. Plain data, nothing
/// chart-library-specific; consumed immediately and never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DerivedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DerivedTable {
    pub fn empty(columns: &[&str]) -> Self {
        DerivedTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Sum of a numeric column over the view. Non-numeric cells contribute
/// nothing; an empty view sums to 0.
pub fn sum(view: &FilteredView<'_>, column: &str) -> f64 {
    view.column_values(column).filter_map(Value::as_f64).sum()
}

/// Mean of a numeric column over the view. `None` ("no data") when the view
/// holds no numeric values for the column, never NaN.
pub fn mean(view: &FilteredView<'_>, column: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut n = 0usize;
    for v in view.column_values(column).filter_map(Value::as_f64) {
        total += v;
        n += 1;
    }
    (n > 0).then(|| total / n as f64)
}

// ---------------------------------------------------------------------------
// Group-by reductions
// ---------------------------------------------------------------------------

/// How a grouped column is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
    Count,
}

/// Group the view by `key` and reduce each `(column, reducer)` pair, one
/// output column per reduction, keeping the reduced column's name (`Count`
/// reductions are named by their column argument). Groups appear in
/// ascending key order; rows with a null key are dropped. An empty view
/// yields an empty table.
pub fn group_by(
    view: &FilteredView<'_>,
    key: &str,
    reductions: &[(&str, Reducer)],
) -> DerivedTable {
    let mut groups: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
    for &row in view.indices() {
        match view.table().value(row, key) {
            Some(Value::Null) | None => continue,
            Some(k) => groups.entry(k.clone()).or_default().push(row),
        }
    }

    let mut columns = vec![key.to_string()];
    columns.extend(reductions.iter().map(|(c, _)| c.to_string()));

    let rows = groups
        .into_iter()
        .map(|(k, members)| {
            let mut row = vec![k];
            for &(col, reducer) in reductions {
                row.push(reduce(view, &members, col, reducer));
            }
            row
        })
        .collect();

    DerivedTable { columns, rows }
}

fn reduce(view: &FilteredView<'_>, members: &[usize], column: &str, reducer: Reducer) -> Value {
    let numeric = || {
        members
            .iter()
            .filter_map(|&row| view.table().value(row, column))
            .filter_map(Value::as_f64)
    };
    match reducer {
        Reducer::Count => Value::Integer(members.len() as i64),
        Reducer::Sum => Value::Float(numeric().sum()),
        Reducer::Mean => {
            let (total, n) = numeric().fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
            if n == 0 {
                Value::Null
            } else {
                Value::Float(total / n as f64)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Frequency tables and rankings
// ---------------------------------------------------------------------------

/// Count occurrences per distinct value of `column`, in first-seen order.
/// Output columns: the grouping column and `Count`.
pub fn frequency(view: &FilteredView<'_>, column: &str) -> DerivedTable {
    let mut order: Vec<Value> = Vec::new();
    let mut counts: BTreeMap<Value, i64> = BTreeMap::new();
    for v in view.column_values(column) {
        if *v == Value::Null {
            continue;
        }
        let entry = counts.entry(v.clone()).or_insert(0);
        if *entry == 0 {
            order.push(v.clone());
        }
        *entry += 1;
    }

    DerivedTable {
        columns: vec![column.to_string(), "Count".to_string()],
        rows: order
            .into_iter()
            .map(|v| {
                let n = counts[&v];
                vec![v, Value::Integer(n)]
            })
            .collect(),
    }
}

/// Top-N ranking over a frequency table: descending by count, ties broken by
/// first-seen order, truncated to min(n, distinct value count) rows.
pub fn top_n_frequency(view: &FilteredView<'_>, column: &str, n: usize) -> DerivedTable {
    let mut table = frequency(view, column);
    // Stable sort keeps the first-seen order among equal counts.
    table.rows.sort_by(|a, b| {
        let ca = a[1].as_f64().unwrap_or(0.0);
        let cb = b[1].as_f64().unwrap_or(0.0);
        cb.total_cmp(&ca)
    });
    table.rows.truncate(n);
    table
}

/// Group by `key` and sum `value`, then rank descending by the sum and keep
/// the top `n` groups (the "top countries by financial loss" shape).
pub fn top_n_by_sum(view: &FilteredView<'_>, key: &str, value: &str, n: usize) -> DerivedTable {
    let mut table = group_by(view, key, &[(value, Reducer::Sum)]);
    table.rows.sort_by(|a, b| {
        let sa = a[1].as_f64().unwrap_or(0.0);
        let sb = b[1].as_f64().unwrap_or(0.0);
        sb.total_cmp(&sa)
    });
    table.rows.truncate(n);
    table
}

/// Group by `key`, reduce `value` by mean, and sort ascending by the mean.
/// Groups with no numeric values are dropped rather than ranked.
pub fn mean_by(view: &FilteredView<'_>, key: &str, value: &str) -> DerivedTable {
    let mut table = group_by(view, key, &[(value, Reducer::Mean)]);
    table.rows.retain(|row| row[1] != Value::Null);
    table.rows.sort_by(|a, b| {
        let ma = a[1].as_f64().unwrap_or(0.0);
        let mb = b[1].as_f64().unwrap_or(0.0);
        ma.total_cmp(&mb)
    });
    table
}

// ---------------------------------------------------------------------------
// Histogram and linear trend
// ---------------------------------------------------------------------------

/// Equal-width histogram of a numeric column. Bins cover the observed
/// [min, max]; the last bin's upper bound is inclusive so the maximum lands
/// in a bin. Output columns: `bin` (lower edge) and `Count`.
pub fn histogram(view: &FilteredView<'_>, column: &str, bins: usize) -> DerivedTable {
    let out_columns = ["bin", "Count"];
    let values: Vec<f64> = view
        .column_values(column)
        .filter_map(Value::as_f64)
        .collect();
    if values.is_empty() || bins == 0 {
        return DerivedTable::empty(&out_columns);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0i64; bins];
    for v in values {
        let slot = if width == 0.0 {
            0
        } else {
            (((v - min) / width) as usize).min(bins - 1)
        };
        counts[slot] += 1;
    }

    DerivedTable {
        columns: out_columns.iter().map(|c| c.to_string()).collect(),
        rows: counts
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                vec![
                    Value::Float(min + i as f64 * width),
                    Value::Integer(n),
                ]
            })
            .collect(),
    }
}

/// Least-squares linear trend over (x, y) pairs, for scatter overlays.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

/// Fit `y = slope * x + intercept` over rows where both columns are numeric.
/// `None` with fewer than two points or when x has no variance.
pub fn linear_trend(view: &FilteredView<'_>, x: &str, y: &str) -> Option<TrendLine> {
    let pairs: Vec<(f64, f64)> = view
        .indices()
        .iter()
        .filter_map(|&row| {
            let t = view.table();
            let xv = t.value(row, x)?.as_f64()?;
            let yv = t.value(row, y)?.as_f64()?;
            Some((xv, yv))
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let sxx: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some(TrendLine {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// The (x, y) pairs behind a scatter chart, in view order, rows where either
/// cell is non-numeric dropped.
pub fn scatter_pairs(view: &FilteredView<'_>, x: &str, y: &str) -> DerivedTable {
    DerivedTable {
        columns: vec![x.to_string(), y.to_string()],
        rows: view
            .indices()
            .iter()
            .filter_map(|&row| {
                let t = view.table();
                let xv = t.value(row, x)?.as_f64()?;
                let yv = t.value(row, y)?.as_f64()?;
                Some(vec![Value::Float(xv), Value::Float(yv)])
            })
            .collect(),
    }
}
