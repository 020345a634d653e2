use std::borrow::Borrow;

use super::pdf::{self, fit_text, text_width};
use crate::config::ExportConfig;
use crate::data::model::Record;
use crate::error::{CaptureError, ExportError, ExportWarning};
use crate::gauge::GaugeGrid;
use crate::snapshot::{RasterImage, SnapshotProvider};

// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 20.0;
pub const PRINTABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 18.0;
const TITLE_ADVANCE: f32 = 30.0;
const SECTION_GAP: f32 = 20.0;

const TABLE_FONT_SIZE: f32 = 8.0;
const CELL_PADDING: f32 = 4.0;
pub const ROW_HEIGHT: f32 = TABLE_FONT_SIZE * 1.15 + 2.0 * CELL_PADDING;

const TITLE_TEXT: [u8; 3] = [0, 0, 0];
const HEADER_FILL: [u8; 3] = [22, 160, 133];
const HEADER_TEXT: [u8; 3] = [255, 255, 255];
const STRIPE_FILL: [u8; 3] = [245, 245, 245];
const BODY_TEXT: [u8; 3] = [80, 80, 80];

// ---------------------------------------------------------------------------
// Layout model
// ---------------------------------------------------------------------------

/// Which sections a document export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Title, chart snapshot and data table.
    Full,
    /// Title and chart snapshot.
    ChartsOnly,
}

/// Axis-aligned box; `y` grows downwards from the top edge of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text {
        x: f32,
        baseline: f32,
        size: f32,
        weight: FontWeight,
        color: [u8; 3],
        text: String,
    },
    Fill {
        rect: Rect,
        color: [u8; 3],
    },
    /// Placement of the chart snapshot.
    Image {
        rect: Rect,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPage {
    pub blocks: Vec<Block>,
    /// Table header rows placed on this page (repeated on continuation pages).
    pub header_rows: usize,
    /// Table body rows placed on this page.
    pub body_rows: usize,
}

/// A fully positioned document, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<LayoutPage>,
}

impl DocumentLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| &p.blocks).filter_map(|b| match b {
            Block::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_rect(&self) -> Option<Rect> {
        self.pages.iter().flat_map(|p| &p.blocks).find_map(|b| match b {
            Block::Image { rect } => Some(*rect),
            _ => None,
        })
    }

    pub fn body_rows(&self) -> usize {
        self.pages.iter().map(|p| p.body_rows).sum()
    }
}

/// Result of a document export.
#[derive(Debug)]
pub struct DocumentExport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<ExportWarning>,
}

// ---------------------------------------------------------------------------
// Exporter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DocumentExporter {
    title: String,
    kind: DocumentKind,
}

impl DocumentExporter {
    pub fn new(title: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }

    /// Title + charts + table, titled per the export config.
    pub fn full(config: &ExportConfig) -> Self {
        Self::new(config.document_title.clone(), DocumentKind::Full)
    }

    /// Title + charts, titled per the export config.
    pub fn charts_only(config: &ExportConfig) -> Self {
        Self::new(config.charts_title.clone(), DocumentKind::ChartsOnly)
    }

    /// Capture `target` with `provider`, then export.
    pub fn export_with(
        &self,
        view: &[impl Borrow<Record>],
        provider: &dyn SnapshotProvider,
        target: &GaugeGrid,
    ) -> Result<DocumentExport, ExportError> {
        self.export(view, Some(provider.capture(target)))
    }

    /// Build the PDF.
    ///
    /// `snapshot` is `None` when there is no chart to capture. A failed
    /// capture does not fail the export: the image section is dropped and an
    /// [`ExportWarning`] is returned alongside the document. The only hard
    /// failure (besides encoding) is an empty view with no image.
    pub fn export<R: Borrow<Record>>(
        &self,
        view: &[R],
        snapshot: Option<Result<RasterImage, CaptureError>>,
    ) -> Result<DocumentExport, ExportError> {
        let mut warnings = Vec::new();
        let image = match snapshot {
            Some(Ok(img)) if img.width() > 0 && img.height() > 0 => Some(img),
            Some(Ok(_)) => {
                log::warn!("snapshot capture returned an empty image");
                warnings.push(ExportWarning::SnapshotFailed(CaptureError::EmptyTarget));
                None
            }
            Some(Err(err)) => {
                log::warn!("snapshot capture failed: {err}");
                warnings.push(ExportWarning::SnapshotFailed(err));
                None
            }
            None => None,
        };

        if view.is_empty() && image.is_none() {
            return Err(ExportError::NothingToExport);
        }

        let layout = self.layout(view, image.as_ref());
        let bytes = pdf::render(&layout, image.as_ref())?;
        log::info!(
            "exported '{}' ({} pages, {} bytes)",
            self.title,
            layout.pages.len(),
            bytes.len()
        );
        Ok(DocumentExport {
            bytes,
            page_count: layout.pages.len(),
            warnings,
        })
    }

    /// Position every block of the document, top to bottom.
    pub fn layout<R: Borrow<Record>>(
        &self,
        view: &[R],
        image: Option<&RasterImage>,
    ) -> DocumentLayout {
        let mut pages = vec![LayoutPage::default()];

        let title_w = text_width(&self.title, TITLE_SIZE, FontWeight::Bold);
        pages[0].blocks.push(Block::Text {
            x: ((PAGE_WIDTH - title_w) / 2.0).max(MARGIN),
            baseline: MARGIN + TITLE_SIZE * 0.75,
            size: TITLE_SIZE,
            weight: FontWeight::Bold,
            color: TITLE_TEXT,
            text: fit_text(&self.title, PRINTABLE_WIDTH, TITLE_SIZE, FontWeight::Bold),
        });
        let mut y = MARGIN + TITLE_ADVANCE;

        if let Some(img) = image {
            let rect = place_image(img, y);
            pages[0].blocks.push(Block::Image { rect });
            y = rect.bottom() + SECTION_GAP;
        }

        if self.kind == DocumentKind::Full && !view.is_empty() {
            layout_table(view, y, &mut pages);
        }

        DocumentLayout {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            pages,
        }
    }
}

/// Fit the printable width, keeping aspect ratio; shrink further (centered)
/// if the result would run off the page.
fn place_image(img: &RasterImage, y: f32) -> Rect {
    let mut width = PRINTABLE_WIDTH;
    let mut height = img.height() as f32 * width / img.width() as f32;
    let available = PAGE_HEIGHT - MARGIN - y;
    if height > available {
        width *= available / height;
        height = available;
    }
    Rect {
        x: MARGIN + (PRINTABLE_WIDTH - width) / 2.0,
        y,
        width,
        height,
    }
}

// ---------------------------------------------------------------------------
// Table layout
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum RowStyle {
    Header,
    Plain,
    Striped,
}

fn layout_table<R: Borrow<Record>>(view: &[R], mut y: f32, pages: &mut Vec<LayoutPage>) {
    let Some(first) = view
        .iter()
        .map(<R as Borrow<Record>>::borrow)
        .find(|r| !r.is_empty())
    else {
        return;
    };
    let columns: Vec<String> = first.keys().map(str::to_string).collect();
    let rows: Vec<Vec<String>> = view
        .iter()
        .map(|r| columns.iter().map(|c| r.borrow().display(c)).collect())
        .collect();
    let natural = natural_widths(&columns, &rows);

    for (n, (group, widths)) in column_groups(&natural).into_iter().enumerate() {
        if n > 0 {
            y += SECTION_GAP;
        }
        let header: Vec<String> = group.iter().map(|&c| columns[c].clone()).collect();
        let body: Vec<Vec<String>> = rows
            .iter()
            .map(|r| group.iter().map(|&c| r[c].clone()).collect())
            .collect();
        y = layout_section(&header, &body, &widths, y, pages);
    }
}

/// Lay out one block of columns starting at `y`; returns the y below it.
fn layout_section(
    header: &[String],
    rows: &[Vec<String>],
    widths: &[f32],
    mut y: f32,
    pages: &mut Vec<LayoutPage>,
) -> f32 {
    let bottom = PAGE_HEIGHT - MARGIN;

    // Header plus at least one body row must fit, or the table starts fresh.
    if y + 2.0 * ROW_HEIGHT > bottom {
        pages.push(LayoutPage::default());
        y = MARGIN;
    }
    push_row(current(pages), header, widths, y, RowStyle::Header);
    y += ROW_HEIGHT;

    for (i, cells) in rows.iter().enumerate() {
        if y + ROW_HEIGHT > bottom {
            pages.push(LayoutPage::default());
            y = MARGIN;
            push_row(current(pages), header, widths, y, RowStyle::Header);
            y += ROW_HEIGHT;
        }
        let style = if i % 2 == 1 {
            RowStyle::Striped
        } else {
            RowStyle::Plain
        };
        push_row(current(pages), cells, widths, y, style);
        y += ROW_HEIGHT;
    }
    y
}

fn current(pages: &mut [LayoutPage]) -> &mut LayoutPage {
    let last = pages.len() - 1;
    &mut pages[last]
}

/// Narrowest column that still shows one character and the ellipsis.
fn min_column_width() -> f32 {
    text_width("W...", TABLE_FONT_SIZE, FontWeight::Bold) + 2.0 * CELL_PADDING
}

/// Each column's widest content plus padding, between the minimum column
/// width and half the printable width.
fn natural_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<f32> {
    columns
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let widest = rows
                .iter()
                .map(|r| text_width(&r[i], TABLE_FONT_SIZE, FontWeight::Regular))
                .fold(text_width(header, TABLE_FONT_SIZE, FontWeight::Bold), f32::max);
            (widest + 2.0 * CELL_PADDING).clamp(min_column_width(), PRINTABLE_WIDTH / 2.0)
        })
        .collect()
}

/// Scale `widths` so they span the printable width exactly.
fn spread(widths: &[f32]) -> Vec<f32> {
    let total: f32 = widths.iter().sum();
    widths.iter().map(|w| w * PRINTABLE_WIDTH / total).collect()
}

/// Split the columns into blocks that each fit the printable width.
///
/// All columns share one block while scaling them to the page keeps every
/// column at the minimum width. Otherwise columns are packed left to right at
/// their natural width, and every block after the first repeats the first
/// column so its rows stay identifiable.
fn column_groups(natural: &[f32]) -> Vec<(Vec<usize>, Vec<f32>)> {
    let total: f32 = natural.iter().sum();
    let narrowest = natural.iter().copied().fold(f32::INFINITY, f32::min);
    if total <= PRINTABLE_WIDTH || narrowest * PRINTABLE_WIDTH / total >= min_column_width() {
        return vec![((0..natural.len()).collect(), spread(natural))];
    }

    let mut groups = Vec::new();
    let mut group: Vec<usize> = Vec::new();
    let mut used = 0.0;
    for (i, &w) in natural.iter().enumerate() {
        if used + w > PRINTABLE_WIDTH {
            groups.push(std::mem::take(&mut group));
            group.push(0);
            used = natural[0];
        }
        group.push(i);
        used += w;
    }
    groups.push(group);

    groups
        .into_iter()
        .map(|g| {
            let widths: Vec<f32> = g.iter().map(|&c| natural[c]).collect();
            (g, spread(&widths))
        })
        .collect()
}

fn push_row(page: &mut LayoutPage, cells: &[String], widths: &[f32], y: f32, style: RowStyle) {
    let (fill, color, weight) = match style {
        RowStyle::Header => (Some(HEADER_FILL), HEADER_TEXT, FontWeight::Bold),
        RowStyle::Striped => (Some(STRIPE_FILL), BODY_TEXT, FontWeight::Regular),
        RowStyle::Plain => (None, BODY_TEXT, FontWeight::Regular),
    };
    match style {
        RowStyle::Header => page.header_rows += 1,
        _ => page.body_rows += 1,
    }

    if let Some(fill) = fill {
        page.blocks.push(Block::Fill {
            rect: Rect {
                x: MARGIN,
                y,
                width: PRINTABLE_WIDTH,
                height: ROW_HEIGHT,
            },
            color: fill,
        });
    }

    let baseline = y + (ROW_HEIGHT + TABLE_FONT_SIZE * 0.7) / 2.0;
    let mut x = MARGIN;
    for (cell, &width) in cells.iter().zip(widths) {
        let text = fit_text(cell, width - 2.0 * CELL_PADDING, TABLE_FONT_SIZE, weight);
        if !text.is_empty() {
            page.blocks.push(Block::Text {
                x: x + CELL_PADDING,
                baseline,
                size: TABLE_FONT_SIZE,
                weight,
                color,
                text,
            });
        }
        x += width;
    }
}
