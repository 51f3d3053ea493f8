//! Filter-and-aggregate core behind a small hub of data-exploration reports.
//!
//! Each report loads a tabular dataset, derives filterable domains for its
//! dimension columns, applies the user's selection conjunctively, and runs a
//! fixed aggregation battery over the filtered rows. The outputs are plain
//! derived tables and KPI scalars for an external presentation layer.

pub mod data;
pub mod error;
pub mod narrative;
pub mod report;
pub mod state;

pub use data::aggregate::{DerivedTable, Reducer, TrendLine};
pub use data::cache::TableCache;
pub use data::filter::{ColumnDomain, Dimension, FilterSelection, Selection};
pub use data::loader::{DataSource, LoadOutcome};
pub use data::model::{FilteredView, RecordTable, Value};
pub use error::DataError;
pub use report::{ReportOutput, ReportSpec};
pub use state::ReportState;
