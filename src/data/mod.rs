/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  bundled CSV / path / upload
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → RecordTable (via cache)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordTable  │  fixed columns, row-major cells
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply selection predicates → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  group/reduce → DerivedTable, KPI scalars
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
