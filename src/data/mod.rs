/// Data layer: core types, loading, and chart aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → LaunchDataset (+ skipped rows)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, site / booster index
///   └───────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  site selector + payload range → PieChart / ScatterChart
///   └───────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod loader;
pub mod model;
