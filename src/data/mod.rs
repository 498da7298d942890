/// Data layer: parsing, time indexing, transforms and export.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes + ParseOptions
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → RawTable (delimiter / decimal mark)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ time_index  │  find time column, parse, drop, sort → TimeIndexedTable
///   └────────────┘
///        │                          (loader + time_index cached in `cache`)
///        ▼
///   ┌───────────┐
///   │ transform  │  resample (mean) → rolling mean → TransformedTable
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  RenderModel for the UI, `export` for the download
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod selection;
pub mod time_index;
pub mod transform;
