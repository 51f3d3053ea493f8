use std::collections::{BTreeMap, BTreeSet};

use super::model::{FilteredView, RecordTable, Value};

// ---------------------------------------------------------------------------
// Dimensions – which columns are exposed for filtering, and how
// ---------------------------------------------------------------------------

/// How a dimension column is filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// Multi-select over the distinct values observed at load time.
    Categorical,
    /// Closed interval clamped to the observed [min, max].
    NumericRange,
}

/// A column designated as filterable by a report.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub column: &'static str,
    pub kind: DimensionKind,
}

impl Dimension {
    pub const fn categorical(column: &'static str) -> Self {
        Dimension {
            column,
            kind: DimensionKind::Categorical,
        }
    }

    pub const fn numeric(column: &'static str) -> Self {
        Dimension {
            column,
            kind: DimensionKind::NumericRange,
        }
    }
}

// ---------------------------------------------------------------------------
// Domains – distinct values / observed bounds per dimension
// ---------------------------------------------------------------------------

/// The domain of one dimension column, derived from the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDomain {
    /// Distinct values in ascending order (`BTreeSet` keeps them sorted).
    Categorical(BTreeSet<Value>),
    /// Observed numeric bounds, both inclusive.
    Numeric { min: f64, max: f64 },
}

/// column name → domain, for every configured dimension.
pub type Domains = BTreeMap<String, ColumnDomain>;

/// Enumerate each dimension's domain from the table: sorted distinct values
/// for categorical columns, observed min/max for numeric ones. A blank cell
/// contributes `Null` to a categorical domain, so the full-domain default
/// selection keeps rows with gaps. Non-numeric cells do not contribute to a
/// numeric domain; a numeric column with no numeric values gets the
/// degenerate domain [0, 0].
pub fn derive_domains(table: &RecordTable, dimensions: &[Dimension]) -> Domains {
    let mut domains = Domains::new();
    for dim in dimensions {
        let cells = (0..table.len()).filter_map(|row| table.value(row, dim.column));
        let domain = match dim.kind {
            DimensionKind::Categorical => ColumnDomain::Categorical(cells.cloned().collect()),
            DimensionKind::NumericRange => {
                let mut bounds: Option<(f64, f64)> = None;
                for v in cells.filter_map(Value::as_f64) {
                    bounds = Some(match bounds {
                        None => (v, v),
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    });
                }
                let (min, max) = bounds.unwrap_or((0.0, 0.0));
                ColumnDomain::Numeric { min, max }
            }
        };
        domains.insert(dim.column.to_string(), domain);
    }
    domains
}

// ---------------------------------------------------------------------------
// Selection – the user's chosen constraints
// ---------------------------------------------------------------------------

/// Per-dimension constraint: a chosen subset of the categorical domain, or a
/// chosen closed interval for a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    OneOf(BTreeSet<Value>),
    Range { lo: f64, hi: f64 },
}

/// Per-column selection state: column name → constraint.
///
/// An empty `OneOf` set means "nothing selected" and excludes every row, by
/// conjunctive semantics. Callers wanting "no constraint" must select the
/// full domain, which is exactly what [`default_selection`] produces.
pub type FilterSelection = BTreeMap<String, Selection>;

/// Initialise a [`FilterSelection`] covering every domain in full, so the
/// unfiltered view equals the whole table.
pub fn default_selection(domains: &Domains) -> FilterSelection {
    domains
        .iter()
        .map(|(col, domain)| {
            let sel = match domain {
                ColumnDomain::Categorical(vals) => Selection::OneOf(vals.clone()),
                ColumnDomain::Numeric { min, max } => Selection::Range { lo: *min, hi: *max },
            };
            (col.clone(), sel)
        })
        .collect()
}

/// Clamp a requested interval to the domain's observed bounds. Used when a
/// caller supplies a range wider than (or outside) the data.
pub fn clamp_range(domain: &ColumnDomain, lo: f64, hi: f64) -> (f64, f64) {
    match domain {
        ColumnDomain::Numeric { min, max } => (lo.max(*min), hi.min(*max)),
        ColumnDomain::Categorical(_) => (lo, hi),
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Apply every selection predicate conjunctively and return the passing rows.
///
/// A row passes a column constraint when:
/// * `OneOf`: its cell is in the selected set (an empty set fails everything;
///   a missing cell counts as `Null` and passes only if `Null` is selected)
/// * `Range`: its cell is numeric and inside the inclusive interval
///
/// Deterministic and side-effect free; recomputed in full on every change.
pub fn apply<'a>(table: &'a RecordTable, selection: &FilterSelection) -> FilteredView<'a> {
    let indices = (0..table.len())
        .filter(|&row| {
            selection.iter().all(|(col, sel)| {
                let cell = table.value(row, col).unwrap_or(&Value::Null);
                match sel {
                    Selection::OneOf(selected) => selected.contains(cell),
                    Selection::Range { lo, hi } => cell
                        .as_f64()
                        .map(|v| v >= *lo && v <= *hi)
                        .unwrap_or(false),
                }
            })
        })
        .collect();
    FilteredView::new(table, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incidents() -> RecordTable {
        RecordTable::new(
            vec!["Year".into(), "Country".into(), "Loss".into()],
            vec![
                vec![2015.into(), "US".into(), 10.0.into()],
                vec![2016.into(), "US".into(), 5.0.into()],
                vec![2015.into(), "DE".into(), 3.0.into()],
            ],
        )
    }

    fn dims() -> Vec<Dimension> {
        vec![
            Dimension::categorical("Year"),
            Dimension::categorical("Country"),
        ]
    }

    #[test]
    fn domains_are_sorted_distinct_values() {
        let table = incidents();
        let domains = derive_domains(&table, &dims());
        let ColumnDomain::Categorical(years) = &domains["Year"] else {
            panic!("expected categorical domain");
        };
        let years: Vec<_> = years.iter().cloned().collect();
        assert_eq!(years, vec![Value::Integer(2015), Value::Integer(2016)]);
    }

    #[test]
    fn numeric_domain_is_min_max() {
        let table = incidents();
        let domains = derive_domains(&table, &[Dimension::numeric("Loss")]);
        assert_eq!(
            domains["Loss"],
            ColumnDomain::Numeric { min: 3.0, max: 10.0 }
        );
    }

    #[test]
    fn default_selection_is_identity() {
        let table = incidents();
        let selection = default_selection(&derive_domains(&table, &dims()));
        let view = apply(&table, &selection);
        assert_eq!(view.len(), table.len());
        assert_eq!(view.indices(), [0, 1, 2]);
    }

    #[test]
    fn categorical_subset_keeps_matching_rows() {
        let table = incidents();
        let mut selection = default_selection(&derive_domains(&table, &dims()));
        selection.insert(
            "Year".into(),
            Selection::OneOf([Value::Integer(2015)].into()),
        );
        let view = apply(&table, &selection);
        assert_eq!(view.indices(), [0, 2]);
        let total: f64 = view.column_values("Loss").filter_map(Value::as_f64).sum();
        assert_eq!(total, 13.0);
    }

    #[test]
    fn blank_cells_join_the_domain_and_survive_the_default_selection() {
        let table = RecordTable::new(
            vec!["Year".into(), "Country".into()],
            vec![
                vec![2015.into(), "US".into()],
                vec![2016.into(), Value::Null],
            ],
        );
        let domains = derive_domains(&table, &[Dimension::categorical("Country")]);
        let ColumnDomain::Categorical(countries) = &domains["Country"] else {
            panic!("expected categorical domain");
        };
        assert!(countries.contains(&Value::Null));

        // Full-domain default keeps the row with the gap.
        let selection = default_selection(&domains);
        assert_eq!(apply(&table, &selection).len(), table.len());

        // Deselecting the blank bucket drops exactly that row.
        let mut narrowed = selection;
        if let Some(Selection::OneOf(subset)) = narrowed.get_mut("Country") {
            subset.remove(&Value::Null);
        }
        assert_eq!(apply(&table, &narrowed).indices(), [0]);
    }

    #[test]
    fn empty_categorical_selection_excludes_everything() {
        let table = incidents();
        let mut selection = default_selection(&derive_domains(&table, &dims()));
        selection.insert("Country".into(), Selection::OneOf(BTreeSet::new()));
        assert!(apply(&table, &selection).is_empty());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let table = incidents();
        let selection: FilterSelection =
            [("Loss".to_string(), Selection::Range { lo: 3.0, hi: 5.0 })].into();
        let view = apply(&table, &selection);
        assert_eq!(view.indices(), [1, 2]);
    }

    #[test]
    fn clamp_respects_observed_bounds() {
        let domain = ColumnDomain::Numeric { min: 17.0, max: 24.0 };
        assert_eq!(clamp_range(&domain, 0.0, 100.0), (17.0, 24.0));
        assert_eq!(clamp_range(&domain, 18.0, 21.0), (18.0, 21.0));
    }
}
