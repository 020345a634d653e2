use std::path::Path;

use anyhow::{Context, Result};

use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::loader;
use crate::data::store::RecordStore;
use crate::error::{DecodeError, ExportError};
use crate::export::{to_tabular_blob, DocumentExport, DocumentExporter, DocumentKind};
use crate::gauge::GaugeGrid;
use crate::snapshot::GaugeRasterizer;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Warning(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// `store` has exactly one owner, so every mutation of the records, the
/// search term or the page goes through `&mut self` here.
pub struct AppState {
    pub config: DashboardConfig,
    pub store: RecordStore,
    pub theme: Theme,

    /// Contents of the search box.
    pub search_input: String,

    /// Name of the last successfully imported file.
    pub source_name: Option<String>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    rasterizer: GaugeRasterizer,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            store: RecordStore::new(config.page_size),
            rasterizer: GaugeRasterizer::new(&config.snapshot),
            config,
            theme: Theme::default(),
            search_input: String::new(),
            source_name: None,
            status: None,
        }
    }

    // ---- import ----

    /// Read and decode a workbook file, reporting the outcome in `status`.
    pub fn import_file(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match loader::load_file(path) {
            Ok(records) => {
                self.store.replace(records);
                self.imported(&name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status = Some(Status::Error(
                    "Failed to load Excel file. Please check the file format.".to_string(),
                ));
            }
        }
    }

    /// Replace the records with a decoded workbook. On failure nothing changes.
    pub fn import_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<usize, DecodeError> {
        self.store.import(bytes)?;
        Ok(self.imported(name))
    }

    fn imported(&mut self, name: &str) -> usize {
        let count = self.store.full().len();
        log::info!(
            "Loaded {count} records from {name} with columns {:?}",
            self.store
                .full()
                .first()
                .map(|r| r.keys().collect::<Vec<_>>())
                .unwrap_or_default()
        );
        self.search_input.clear();
        self.source_name = Some(name.to_string());
        self.status = Some(Status::Info(format!("Loaded {count} records from {name}")));
        count
    }

    // ---- view ----

    pub fn search(&mut self, term: &str) {
        self.search_input = term.to_string();
        self.store.set_search_term(term);
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.store.set_page(page_index);
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Gauges of the active page: what the dashboard shows and what chart
    /// exports capture.
    pub fn current_grid(&self) -> GaugeGrid {
        GaugeGrid::from_records(self.store.current_page(), &self.config, self.theme)
    }

    // ---- export ----

    /// Workbook bytes of the current view. Refuses an empty view.
    pub fn workbook_export(&self) -> Result<Vec<u8>, ExportError> {
        let view = self.store.view();
        if view.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        to_tabular_blob(&view, &self.config.export.sheet_name)
    }

    /// PDF of the current view with a snapshot of the current page's gauges.
    /// Refuses an empty view.
    pub fn document_export(&self, kind: DocumentKind) -> Result<DocumentExport, ExportError> {
        let view = self.store.view();
        if view.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let exporter = match kind {
            DocumentKind::Full => DocumentExporter::full(&self.config.export),
            DocumentKind::ChartsOnly => DocumentExporter::charts_only(&self.config.export),
        };
        exporter.export_with(&view, &self.rasterizer, &self.current_grid())
    }

    pub fn save_workbook(&mut self, path: &Path) {
        let result = self
            .workbook_export()
            .map_err(anyhow::Error::from)
            .and_then(|bytes| write_export(path, &bytes));
        self.status = Some(match result {
            Ok(()) => {
                log::info!("Excel exported to {}", path.display());
                Status::Info("Excel exported successfully!".to_string())
            }
            Err(e) => export_failure(e, "No data available to export."),
        });
    }

    pub fn save_document(&mut self, path: &Path, kind: DocumentKind) {
        let result = self
            .document_export(kind)
            .map_err(anyhow::Error::from)
            .and_then(|export| write_export(path, &export.bytes).map(|()| export));
        let (done, empty) = match kind {
            DocumentKind::Full => ("PDF exported successfully!", "No data available to export."),
            DocumentKind::ChartsOnly => (
                "Charts PDF exported successfully!",
                "No charts available to export.",
            ),
        };
        self.status = Some(match result {
            Ok(export) if export.warnings.is_empty() => Status::Info(done.to_string()),
            Ok(export) => {
                let warnings: Vec<String> = export.warnings.iter().map(|w| w.to_string()).collect();
                Status::Warning(format!("{done} ({})", warnings.join("; ")))
            }
            Err(e) => export_failure(e, empty),
        });
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn export_failure(e: anyhow::Error, empty_message: &str) -> Status {
    if matches!(e.downcast_ref::<ExportError>(), Some(ExportError::NothingToExport)) {
        return Status::Warning(empty_message.to_string());
    }
    log::error!("Export failed: {e:#}");
    Status::Error(format!("Export failed: {e:#}"))
}

/// Load a file given on the command line before the first frame.
pub fn initial_state(config: DashboardConfig, open: Option<&Path>) -> AppState {
    let mut state = AppState::new(config);
    if let Some(path) = open {
        state.import_file(path);
    }
    state
}
