use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Runtime settings. Every field has a default, so a config file only needs
/// the keys it changes:
///
/// ```json
/// { "page_size": 20, "export": { "document_title": "Route Progress" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Gauges per page.
    pub page_size: usize,
    /// Column shown as the gauge caption.
    pub label_column: String,
    /// Column holding the completion fraction (0.0 – 1.0).
    pub value_column: String,
    pub snapshot: SnapshotConfig,
    pub export: ExportConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            label_column: "route".to_string(),
            value_column: "% Complete".to_string(),
            snapshot: SnapshotConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Offscreen rendering of the gauge grid for PDF exports.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub columns: usize,
    /// Logical size of one gauge cell, in pixels.
    pub cell_size: u32,
    /// Pixel density multiplier.
    pub scale: u32,
    /// Captures wider or taller than this fail instead of allocating.
    pub max_dimension: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_size: 120,
            scale: 2,
            max_dimension: 16_384,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub workbook_file_name: String,
    pub document_title: String,
    pub document_file_name: String,
    pub charts_title: String,
    pub charts_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "DashboardData".to_string(),
            workbook_file_name: "DashboardData.xlsx".to_string(),
            document_title: "Dashboard Data".to_string(),
            document_file_name: "DashboardData.pdf".to_string(),
            charts_title: "Dashboard Charts".to_string(),
            charts_file_name: "DashboardCharts.pdf".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(text).context("parsing JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.snapshot.scale == 0 || self.snapshot.cell_size == 0 {
            bail!("snapshot cell_size and scale must be at least 1");
        }
        if self.export.sheet_name.trim().is_empty() {
            bail!("export.sheet_name must not be empty");
        }
        Ok(())
    }
}
