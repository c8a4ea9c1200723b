/// Data layer: posting model, CSV loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///   cleaned_dataset.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → RecordSet (lenient dates)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ RecordSet │  immutable Arc<[JobPosting]>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection predicates → filtered RecordSet
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ query / stats │  KPIs, rankings, grouped means, monthly counts, bins
///   └──────────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod query;
pub mod stats;
