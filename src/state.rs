use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::cache::TableCache;
use crate::data::filter::{
    apply, clamp_range, default_selection, derive_domains, Domains, FilterSelection, Selection,
};
use crate::data::loader::DataSource;
use crate::data::model::{FilteredView, RecordTable, Value};
use crate::report::{self, ReportOutput, ReportSpec};

// ---------------------------------------------------------------------------
// Report session state
// ---------------------------------------------------------------------------

/// One report's interactive state, independent of rendering: the loaded
/// table, the filter panel's domains, and the current selection. Every
/// mutation recomputes the passing row indices in full; derived tables are
/// produced on demand by [`ReportState::output`] and discarded after use.
pub struct ReportState {
    pub spec: ReportSpec,

    /// Loaded dataset (None while an upload source is still pending).
    table: Option<Arc<RecordTable>>,

    /// Per-dimension domains derived from the table at load time.
    pub domains: Domains,

    /// Current per-dimension constraints.
    pub selection: FilterSelection,

    /// Indices of rows passing the current selection (cached).
    visible: Vec<usize>,

    /// Status / error message for the surface to show.
    pub status_message: Option<String>,
}

impl ReportState {
    pub fn new(spec: ReportSpec) -> Self {
        ReportState {
            spec,
            table: None,
            domains: Domains::new(),
            selection: FilterSelection::new(),
            visible: Vec::new(),
            status_message: None,
        }
    }

    /// Load (or reload) the report's table from a source, through the cache.
    /// A pending upload leaves the state in its neutral waiting condition; a
    /// load failure records the message and keeps the report empty, without
    /// touching any other report.
    pub fn load_from(&mut self, cache: &mut TableCache, source: &DataSource) {
        match cache.get_or_load(source, self.spec.required_columns) {
            Ok(Some(table)) => self.set_table(table),
            Ok(None) => {
                self.table = None;
                self.visible.clear();
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("report '{}': {e}", self.spec.key);
                self.table = None;
                self.visible.clear();
                self.status_message = Some(e.to_string());
            }
        }
    }

    /// Ingest a loaded table: derive domains and reset the selection to the
    /// full domain so the unfiltered view shows every row.
    pub fn set_table(&mut self, table: Arc<RecordTable>) {
        self.domains = derive_domains(&table, self.spec.dimensions);
        self.selection = default_selection(&self.domains);
        self.visible = (0..table.len()).collect();
        self.table = Some(table);
        self.status_message = None;
    }

    /// Whether the report is waiting for user input (upload source with no
    /// bytes yet). No aggregation runs in this condition.
    pub fn is_waiting(&self) -> bool {
        self.table.is_none() && self.status_message.is_none()
    }

    pub fn table(&self) -> Option<&RecordTable> {
        self.table.as_deref()
    }

    /// The rows passing the current selection.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.table
            .as_deref()
            .map(|t| FilteredView::new(t, self.visible.clone()))
    }

    /// One full recomputation pass: filter, then the aggregation battery.
    pub fn output(&self) -> Option<ReportOutput> {
        self.view().map(|view| report::run(&self.spec, &view))
    }

    /// Recompute the passing indices after a selection change.
    pub fn refilter(&mut self) {
        if let Some(table) = self.table.as_deref() {
            self.visible = apply(table, &self.selection).indices().to_vec();
        }
    }

    /// Toggle a single value in a categorical dimension's subset.
    pub fn toggle_value(&mut self, column: &str, value: &Value) {
        if let Some(Selection::OneOf(selected)) = self.selection.get_mut(column) {
            if !selected.remove(value) {
                selected.insert(value.clone());
            }
            self.refilter();
        }
    }

    /// Select a categorical dimension's full domain.
    pub fn select_all(&mut self, column: &str) {
        if let Some(crate::data::filter::ColumnDomain::Categorical(vals)) =
            self.domains.get(column)
        {
            self.selection
                .insert(column.to_string(), Selection::OneOf(vals.clone()));
            self.refilter();
        }
    }

    /// Clear a categorical dimension's subset (excludes every row).
    pub fn select_none(&mut self, column: &str) {
        self.selection
            .insert(column.to_string(), Selection::OneOf(BTreeSet::new()));
        self.refilter();
    }

    /// Set a numeric dimension's interval, clamped to the observed bounds.
    pub fn set_range(&mut self, column: &str, lo: f64, hi: f64) {
        if let Some(domain) = self.domains.get(column) {
            let (lo, hi) = clamp_range(domain, lo, hi);
            self.selection
                .insert(column.to_string(), Selection::Range { lo, hi });
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::cybersecurity;

    fn loaded_state() -> ReportState {
        let spec = cybersecurity();
        let mut cache = TableCache::new();
        let source = spec.bundled_source();
        let mut state = ReportState::new(spec);
        state.load_from(&mut cache, &source);
        state
    }

    #[test]
    fn loading_resets_selection_to_full_domain() {
        let state = loaded_state();
        let table = state.table().unwrap();
        assert_eq!(state.view().unwrap().len(), table.len());
        assert!(!state.is_waiting());
    }

    #[test]
    fn toggling_a_value_narrows_the_view() {
        let mut state = loaded_state();
        let full = state.view().unwrap().len();

        // Drop one year from the selection.
        let year = state
            .table()
            .unwrap()
            .value(0, "Year")
            .cloned()
            .unwrap();
        state.toggle_value("Year", &year);
        let narrowed = state.view().unwrap().len();
        assert!(narrowed < full);

        // Toggling it back restores the identity.
        state.toggle_value("Year", &year);
        assert_eq!(state.view().unwrap().len(), full);
    }

    #[test]
    fn select_none_empties_the_view() {
        let mut state = loaded_state();
        state.select_none("Country");
        assert!(state.view().unwrap().is_empty());
        state.select_all("Country");
        assert_eq!(
            state.view().unwrap().len(),
            state.table().unwrap().len()
        );
    }

    #[test]
    fn pending_upload_is_waiting_and_produces_no_output() {
        let spec = cybersecurity();
        let mut cache = TableCache::new();
        let mut state = ReportState::new(spec);
        state.load_from(
            &mut cache,
            &DataSource::Upload {
                name: "pending.csv".into(),
                bytes: None,
            },
        );
        assert!(state.is_waiting());
        assert!(state.output().is_none());
    }

    #[test]
    fn load_failure_records_a_message() {
        let spec = cybersecurity();
        let mut cache = TableCache::new();
        let mut state = ReportState::new(spec);
        state.load_from(
            &mut cache,
            &DataSource::Path("/no/such/file.csv".into()),
        );
        assert!(!state.is_waiting());
        assert!(state.status_message.is_some());
        assert!(state.output().is_none());
    }
}
