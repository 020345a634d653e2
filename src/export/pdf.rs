use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use super::document::{Block, DocumentLayout, FontWeight, LayoutPage};
use crate::error::ExportError;
use crate::snapshot::RasterImage;

const IMAGE_NAME: &str = "Im1";
const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// Font metrics (standard Helvetica, 1/1000 em, chars 32..=126)
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold runs roughly this much wider than the regular face.
const BOLD_FACTOR: f32 = 1.06;

fn char_width(c: char, size: f32, weight: FontWeight) -> f32 {
    let units = match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => 556,
    };
    let w = units as f32 * size / 1000.0;
    match weight {
        FontWeight::Regular => w,
        FontWeight::Bold => w * BOLD_FACTOR,
    }
}

/// Rendered width of `text` in points.
pub fn text_width(text: &str, size: f32, weight: FontWeight) -> f32 {
    text.chars().map(|c| char_width(c, size, weight)).sum()
}

/// `text` shortened with a trailing `...` so it is at most `max_width` wide.
pub fn fit_text(text: &str, max_width: f32, size: f32, weight: FontWeight) -> String {
    if text_width(text, size, weight) <= max_width {
        return text.to_string();
    }
    let mut width = text_width(ELLIPSIS, size, weight);
    if width > max_width {
        return String::new();
    }
    let mut out = String::new();
    for c in text.chars() {
        let cw = char_width(c, size, weight);
        if width + cw > max_width {
            break;
        }
        width += cw;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Encode for the WinAnsi standard fonts; unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            code @ (32..=126 | 160..=255) => code as u8,
            _ => b'?',
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Layout → PDF bytes
// ---------------------------------------------------------------------------

fn encode_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Document(e.to_string())
}

fn real(v: f32) -> Object {
    Object::from(v)
}

fn name(n: &str) -> Object {
    Object::Name(n.as_bytes().to_vec())
}

fn fill_color(rgb: [u8; 3]) -> Operation {
    Operation::new(
        "rg",
        rgb.iter().map(|&c| real(c as f32 / 255.0)).collect(),
    )
}

fn page_operations(page: &LayoutPage, page_height: f32, has_image: bool) -> Vec<Operation> {
    let mut ops = Vec::new();
    for block in &page.blocks {
        match block {
            Block::Fill { rect, color } => {
                ops.push(fill_color(*color));
                ops.push(Operation::new(
                    "re",
                    vec![
                        real(rect.x),
                        real(page_height - rect.bottom()),
                        real(rect.width),
                        real(rect.height),
                    ],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            Block::Text {
                x,
                baseline,
                size,
                weight,
                color,
                text,
            } => {
                let font = match weight {
                    FontWeight::Regular => "F1",
                    FontWeight::Bold => "F2",
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(fill_color(*color));
                ops.push(Operation::new("Tf", vec![name(font), real(*size)]));
                ops.push(Operation::new("Td", vec![real(*x), real(page_height - baseline)]));
                ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
                ops.push(Operation::new("ET", vec![]));
            }
            Block::Image { rect } if has_image => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(rect.width),
                        real(0.0),
                        real(0.0),
                        real(rect.height),
                        real(rect.x),
                        real(page_height - rect.bottom()),
                    ],
                ));
                ops.push(Operation::new("Do", vec![name(IMAGE_NAME)]));
                ops.push(Operation::new("Q", vec![]));
            }
            Block::Image { .. } => {}
        }
    }
    ops
}

/// Encode a computed layout as a PDF document.
pub fn render(
    layout: &DocumentLayout,
    image: Option<&RasterImage>,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut xobjects = Dictionary::new();
    if let Some(img) = image {
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img.width() as i64,
                "Height" => img.height() as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            img.rgb_bytes(),
        );
        let image_id = doc.add_object(stream);
        xobjects.set(IMAGE_NAME, image_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page, layout.height, image.is_some()),
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(encode_err)?,
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(layout.width),
                real(layout.height),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(encode_err)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_use_helvetica_metrics() {
        assert_eq!(text_width("", 10.0, FontWeight::Regular), 0.0);
        assert!((text_width("0", 10.0, FontWeight::Regular) - 5.56).abs() < 1e-4);
        assert!(text_width("W", 8.0, FontWeight::Bold) > text_width("W", 8.0, FontWeight::Regular));
    }

    #[test]
    fn fit_text_truncates_with_ellipsis() {
        assert_eq!(fit_text("route", 100.0, 8.0, FontWeight::Regular), "route");

        let long = "A very long route description that will not fit";
        let fitted = fit_text(long, 60.0, 8.0, FontWeight::Regular);
        assert!(fitted.ends_with("..."));
        assert!(fitted.len() < long.len());
        assert!(text_width(&fitted, 8.0, FontWeight::Regular) <= 60.0);

        assert_eq!(fit_text(long, 1.0, 8.0, FontWeight::Regular), "");
    }

    #[test]
    fn win_ansi_replaces_unmappable_chars() {
        assert_eq!(win_ansi("Route é→"), b"Route \xe9?".to_vec());
    }
}
