/// Data layer: record model, decoding, filtering, paging and the store.
///
/// Architecture:
/// ```text
///  .xlsx / .xls bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first sheet → Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  store    │  full records + visible indices + page
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  filter   │ ───▶ │  page     │  search term → view → current page
///   └──────────┘      └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod page;
pub mod store;
