use thiserror::Error;

/// The uploaded blob could not be read as a workbook.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not a readable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no sheets")]
    NoSheets,
}

/// A snapshot of a render target could not be produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("render target has nothing to draw")]
    EmptyTarget,

    #[error("snapshot of {width}x{height} px exceeds the {max} px limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("snapshot backend failed: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no data available to export")]
    NothingToExport,

    #[error("XLSX write error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF encode error: {0}")]
    Document(String),
}

/// Non-fatal problems an export recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportWarning {
    #[error("charts could not be captured, exported without them: {0}")]
    SnapshotFailed(CaptureError),
}
