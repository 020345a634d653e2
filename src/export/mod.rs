/// Export layer: the filtered view back out as a workbook or a PDF.
///
/// ```text
///   view ──▶ tabular  ──▶ .xlsx bytes
///
///   view ─┐
///         ├─▶ document (layout) ──▶ pdf (encode) ──▶ .pdf bytes
///   snapshot ┘
/// ```

pub mod document;
pub mod pdf;
pub mod tabular;

pub use document::{DocumentExport, DocumentExporter, DocumentKind};
pub use tabular::to_tabular_blob;
