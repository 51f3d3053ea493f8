use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Value – a single cell of a record table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value covering the dtypes seen in the source CSVs.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord/Hash so Value can key BTreeSet/BTreeMap --
//
// A year column parsed as a mix of 2015 and 2015.0 must dedupe to one domain
// entry and one group, so Integer and Float compare (and hash) by magnitude.
// Equality is defined through `cmp` to keep the Ord contract intact.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Integer(_) | Float(_) => 1,
                String(_) => 2,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            // Integer(3) == Float(3.0), so both hash through the f64 bits.
            Value::Integer(_) | Value::Float(_) => {
                1u8.hash(state);
                self.as_f64().unwrap_or(f64::NAN).to_bits().hash(state);
            }
            Value::String(s) => {
                2u8.hash(state);
                s.hash(state);
            }
            Value::Null => 0u8.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64` for numeric reductions and
    /// range filters.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

// ---------------------------------------------------------------------------
// RecordTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An in-memory tabular dataset. The column set is fixed for the lifetime of
/// the table; column names are whitespace-trimmed by the loader before they
/// get here.
#[derive(Debug, Clone)]
pub struct RecordTable {
    /// Ordered column names, as they appeared in the header row.
    columns: Vec<String>,
    /// Row-major cells; every row has exactly `columns.len()` values.
    rows: Vec<Vec<Value>>,
    /// column name → position in `columns` / each row.
    index: BTreeMap<String, usize>,
}

impl RecordTable {
    /// Build a table from a header and rows. Rows shorter than the header are
    /// padded with `Null` so positional access never goes out of bounds.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), Value::Null);
        }
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        RecordTable {
            columns,
            rows,
            index,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Cell at (row, column name). `None` when the column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(|r| r.as_slice())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows passing the current filter selection
// ---------------------------------------------------------------------------

/// The subsequence of table rows satisfying a filter selection. Borrowed and
/// transient: recomputed in full on every selection change, never mutated.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a RecordTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a RecordTable, indices: Vec<usize>) -> Self {
        FilteredView { table, indices }
    }

    /// A view containing every row of the table.
    pub fn all(table: &'a RecordTable) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn table(&self) -> &'a RecordTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate cells of a column in view order. Missing columns yield nothing.
    pub fn column_values(&self, column: &str) -> impl Iterator<Item = &'a Value> + '_ {
        let col = self.table.column_index(column);
        self.indices
            .iter()
            .filter_map(move |&i| col.and_then(|c| self.table.row(i).map(|r| &r[c])))
    }
}
