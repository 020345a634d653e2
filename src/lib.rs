//! Progress dashboard: import a workbook of progress records, search and page
//! through them as completion gauges, and export the filtered view as Excel
//! or PDF.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod gauge;
pub mod snapshot;
pub mod state;
pub mod ui;
