//! Property tests for the filter evaluator: the identity of the default
//! selection, and monotone shrinkage when a selection narrows.

use std::collections::BTreeSet;

use proptest::prelude::*;

use report_hub::data::filter::{
    apply, default_selection, derive_domains, Dimension, FilterSelection, Selection,
};
use report_hub::{RecordTable, Value};

const COUNTRIES: &[&str] = &["USA", "UK", "Germany", "France", "India"];

fn dimensions() -> Vec<Dimension> {
    vec![
        Dimension::categorical("Year"),
        Dimension::categorical("Country"),
        Dimension::numeric("Loss"),
    ]
}

prop_compose! {
    fn arb_row()(year in 2015i64..=2024, country in 0usize..COUNTRIES.len(), loss in 0.0f64..100.0) -> Vec<Value> {
        vec![
            Value::Integer(year),
            Value::String(COUNTRIES[country].to_string()),
            Value::Float(loss),
        ]
    }
}

prop_compose! {
    fn arb_table()(rows in proptest::collection::vec(arb_row(), 0..60)) -> RecordTable {
        RecordTable::new(
            vec!["Year".into(), "Country".into(), "Loss".into()],
            rows,
        )
    }
}

fn selection_with_subset(table: &RecordTable, keep: &[bool]) -> FilterSelection {
    let domains = derive_domains(table, &dimensions());
    let mut selection = default_selection(&domains);
    if let Some(Selection::OneOf(countries)) = selection.get("Country") {
        let subset: BTreeSet<Value> = countries
            .iter()
            .zip(keep.iter().cycle())
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| v.clone())
            .collect();
        selection.insert("Country".into(), Selection::OneOf(subset));
    }
    selection
}

proptest! {
    #[test]
    fn default_selection_keeps_every_row(table in arb_table()) {
        let selection = default_selection(&derive_domains(&table, &dimensions()));
        prop_assert_eq!(apply(&table, &selection).len(), table.len());
    }

    #[test]
    fn narrowing_a_subset_never_grows_the_view(
        table in arb_table(),
        keep in proptest::collection::vec(any::<bool>(), 1..6),
        drop_at in 0usize..5,
    ) {
        let selection = selection_with_subset(&table, &keep);
        let baseline = apply(&table, &selection).len();

        // Remove one more value from the chosen subset.
        let mut narrowed = selection.clone();
        if let Some(Selection::OneOf(subset)) = narrowed.get_mut("Country") {
            if let Some(victim) = subset.iter().nth(drop_at % subset.len().max(1)).cloned() {
                subset.remove(&victim);
            }
        }
        prop_assert!(apply(&table, &narrowed).len() <= baseline);
    }

    #[test]
    fn shrinking_a_range_never_grows_the_view(
        table in arb_table(),
        lo in 0.0f64..50.0,
        hi in 50.0f64..100.0,
        squeeze in 0.0f64..25.0,
    ) {
        let wide: FilterSelection =
            [("Loss".to_string(), Selection::Range { lo, hi })].into();
        let narrow: FilterSelection = [(
            "Loss".to_string(),
            Selection::Range { lo: lo + squeeze, hi: hi - squeeze },
        )]
        .into();
        prop_assert!(apply(&table, &narrow).len() <= apply(&table, &wide).len());
    }

    #[test]
    fn view_rows_all_satisfy_the_selection(
        table in arb_table(),
        keep in proptest::collection::vec(any::<bool>(), 1..6),
    ) {
        let selection = selection_with_subset(&table, &keep);
        let view = apply(&table, &selection);
        if let Some(Selection::OneOf(subset)) = selection.get("Country") {
            for value in view.column_values("Country") {
                prop_assert!(subset.contains(value));
            }
        }
    }
}
