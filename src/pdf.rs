// Document renderer: lays a linear sequence of content blocks out onto
// landscape pages and writes the result with lopdf.
//
// The layout model is deliberately small: a cursor walks down the page,
// any block that would overflow starts a new page, tables can split across
// pages (re-drawing their header rows), and `PageBreak` forces the split.
use std::collections::HashMap;
use std::mem;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::RenderError;
use crate::types::{ContentBlock, ParagraphStyle};

/// Page size and margins in points.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// Landscape US letter with the report's margins.
    pub fn landscape_letter() -> Self {
        PageGeometry {
            width: 792.0,
            height: 612.0,
            margin_left: 30.0,
            margin_right: 30.0,
            margin_top: 20.0,
            margin_bottom: 10.0,
        }
    }
}

const FONT_BODY: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_BOLD_ITALIC: &str = "F3";

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const WHITE: (f32, f32, f32) = (1.0, 1.0, 1.0);
const RED: (f32, f32, f32) = (1.0, 0.0, 0.0);
const TEAL: (f32, f32, f32) = (0.0, 0.5, 0.5);

const HEADER_FONT_SIZE: f32 = 10.0;
const BODY_FONT_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 3.0;
const BLOCK_GAP: f32 = 6.0;

struct TextStyle {
    font: &'static str,
    size: f32,
    color: (f32, f32, f32),
    centered: bool,
    space_after: f32,
}

fn paragraph_style(style: ParagraphStyle) -> TextStyle {
    match style {
        ParagraphStyle::Notice => TextStyle {
            font: FONT_BOLD,
            size: 12.0,
            color: RED,
            centered: true,
            space_after: 12.0,
        },
        ParagraphStyle::LegendTitle => TextStyle {
            font: FONT_BOLD_ITALIC,
            size: 11.0,
            color: RED,
            centered: false,
            space_after: 4.0,
        },
        ParagraphStyle::LegendBody => TextStyle {
            font: FONT_BODY,
            size: 11.0,
            color: BLACK,
            centered: false,
            space_after: 2.0,
        },
        ParagraphStyle::Spacer => TextStyle {
            font: FONT_BODY,
            size: 1.0,
            color: WHITE,
            centered: false,
            space_after: 6.0,
        },
    }
}

/// Map text to WinAnsi bytes. The report strings are Latin-1, which this
/// covers; anything outside becomes `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let cp = c as u32;
            if cp <= 0xFF {
                cp as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Rough Helvetica width estimate, good enough for centering headings and
/// clipping cell text.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52
}

fn clip_to_width(text: &str, width: f32, size: f32) -> String {
    let max_chars = ((width - 2.0 * CELL_PADDING) / (size * 0.52)).max(1.0) as usize;
    text.chars().take(max_chars).collect()
}

/// Renders content-block sequences into PDF files.
pub struct DocRenderer {
    geometry: PageGeometry,
}

impl DocRenderer {
    pub fn landscape_letter() -> Self {
        DocRenderer {
            geometry: PageGeometry::landscape_letter(),
        }
    }

    pub fn with_geometry(geometry: PageGeometry) -> Self {
        DocRenderer { geometry }
    }

    /// Lay out `blocks` and write the document to `path`.
    pub fn render(&self, blocks: &[ContentBlock], path: &Path) -> Result<(), RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let images = register_images(&mut doc, blocks)?;
        let mut walker = PageWalker::new(self.geometry, &images);
        for block in blocks {
            walker.push(block);
        }
        let page_ops = walker.finish();

        let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
        let mut page_count = 0i64;
        for ops in page_ops {
            let content = Content { operations: ops };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
            page_count += 1;
        }

        let font_f1 = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_f2 = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let font_f3 = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-BoldOblique",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut resources = dictionary! {
            "Font" => dictionary! {
                FONT_BODY => font_f1,
                FONT_BOLD => font_f2,
                FONT_BOLD_ITALIC => font_f3,
            },
        };
        if !images.is_empty() {
            let mut xobjects = lopdf::Dictionary::new();
            for registered in images.values() {
                xobjects.set(registered.name.clone(), Object::Reference(registered.id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(resources);

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.geometry.width.into(),
                self.geometry.height.into(),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc.save(path)?;
        Ok(())
    }
}

struct RegisteredImage {
    name: String,
    id: ObjectId,
}

/// Load every distinct image referenced by the blocks and embed each once
/// as an RGB XObject.
fn register_images(
    doc: &mut Document,
    blocks: &[ContentBlock],
) -> Result<HashMap<PathBuf, RegisteredImage>, RenderError> {
    let mut images: HashMap<PathBuf, RegisteredImage> = HashMap::new();
    for block in blocks {
        let ContentBlock::Image { path, .. } = block else {
            continue;
        };
        if images.contains_key(path) {
            continue;
        }
        let decoded = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(_) => RenderError::MissingAsset(path.clone()),
            other => RenderError::BadAsset {
                path: path.clone(),
                reason: other.to_string(),
            },
        })?;
        let rgb = decoded.to_rgb8();
        let (pixel_width, pixel_height) = rgb.dimensions();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixel_width as i64,
                "Height" => pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        );
        let id = doc.add_object(stream);
        let name = format!("Im{}", images.len() + 1);
        images.insert(path.clone(), RegisteredImage { name, id });
    }
    Ok(images)
}

/// Walks the block sequence, accumulating drawing operations per page.
struct PageWalker<'a> {
    geometry: PageGeometry,
    images: &'a HashMap<PathBuf, RegisteredImage>,
    ops: Vec<Operation>,
    pages: Vec<Vec<Operation>>,
    cursor: f32,
}

impl<'a> PageWalker<'a> {
    fn new(geometry: PageGeometry, images: &'a HashMap<PathBuf, RegisteredImage>) -> Self {
        PageWalker {
            geometry,
            images,
            ops: Vec::new(),
            pages: Vec::new(),
            cursor: geometry.height - geometry.margin_top,
        }
    }

    fn flush_page(&mut self) {
        if !self.ops.is_empty() {
            self.pages.push(mem::take(&mut self.ops));
        }
        self.cursor = self.geometry.height - self.geometry.margin_top;
    }

    /// Start a new page if `needed` points do not fit above the bottom
    /// margin. An empty page always accepts the content to guarantee
    /// progress.
    fn ensure_space(&mut self, needed: f32) {
        if self.cursor - needed < self.geometry.margin_bottom && !self.ops.is_empty() {
            self.flush_page();
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.flush_page();
        if self.pages.is_empty() {
            // A valid document needs at least one page.
            self.pages.push(Vec::new());
        }
        self.pages
    }

    fn push(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::PageBreak => self.flush_page(),
            ContentBlock::Paragraph { text, style } => self.draw_paragraph(text, *style),
            ContentBlock::Image {
                path,
                width,
                height,
            } => self.draw_image(path, *width, *height),
            ContentBlock::Table {
                rows,
                col_widths,
                row_height,
                repeat_header_rows,
            } => self.draw_table(rows, col_widths, *row_height, *repeat_header_rows),
        }
    }

    fn draw_text(
        &mut self,
        font: &str,
        size: f32,
        color: (f32, f32, f32),
        x: f32,
        y: f32,
        text: &str,
    ) {
        self.ops.push(Operation::new(
            "rg",
            vec![color.0.into(), color.1.into(), color.2.into()],
        ));
        self.ops.push(Operation::new("BT", vec![]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi_bytes(text), StringFormat::Literal)],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn draw_paragraph(&mut self, text: &str, style: ParagraphStyle) {
        let spec = paragraph_style(style);
        let line_height = spec.size * 1.2;
        self.ensure_space(line_height + spec.space_after);
        let x = if spec.centered {
            (self.geometry.width - text_width(text, spec.size)) / 2.0
        } else {
            self.geometry.margin_left
        };
        let baseline = self.cursor - spec.size;
        self.draw_text(spec.font, spec.size, spec.color, x, baseline, text);
        self.cursor -= line_height + spec.space_after;
    }

    fn draw_image(&mut self, path: &Path, width: f32, height: f32) {
        let Some(registered) = self.images.get(path) else {
            return;
        };
        self.ensure_space(height + BLOCK_GAP);
        let x = (self.geometry.width - width) / 2.0;
        let y = self.cursor - height;
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        ));
        self.ops.push(Operation::new(
            "Do",
            vec![Object::Name(registered.name.clone().into_bytes())],
        ));
        self.ops.push(Operation::new("Q", vec![]));
        self.cursor -= height + BLOCK_GAP;
    }

    fn draw_table(
        &mut self,
        rows: &[Vec<String>],
        col_widths: &[f32],
        row_height: f32,
        repeat_header_rows: usize,
    ) {
        let header_rows: Vec<Vec<String>> = rows.iter().take(repeat_header_rows).cloned().collect();
        for (index, row) in rows.iter().enumerate() {
            let fits = self.cursor - row_height >= self.geometry.margin_bottom;
            if !fits && !self.ops.is_empty() {
                self.flush_page();
                // Repeat the table header at the top of the continuation
                // page, unless the overflowing row is itself a header row.
                if index >= repeat_header_rows {
                    for header in &header_rows {
                        self.draw_row(header, col_widths, row_height, true);
                    }
                }
            }
            self.draw_row(row, col_widths, row_height, index < repeat_header_rows);
        }
        self.cursor -= BLOCK_GAP;
    }

    fn draw_row(&mut self, row: &[String], col_widths: &[f32], row_height: f32, is_header: bool) {
        let y_bottom = self.cursor - row_height;
        let mut x = self.geometry.margin_left;
        for (cell, width) in row.iter().zip(col_widths) {
            if is_header {
                self.ops.push(Operation::new(
                    "rg",
                    vec![TEAL.0.into(), TEAL.1.into(), TEAL.2.into()],
                ));
                self.ops.push(Operation::new(
                    "re",
                    vec![
                        x.into(),
                        y_bottom.into(),
                        (*width).into(),
                        row_height.into(),
                    ],
                ));
                self.ops.push(Operation::new("f", vec![]));
            }
            self.ops.push(Operation::new("w", vec![1.into()]));
            self.ops.push(Operation::new(
                "RG",
                vec![BLACK.0.into(), BLACK.1.into(), BLACK.2.into()],
            ));
            self.ops.push(Operation::new(
                "re",
                vec![
                    x.into(),
                    y_bottom.into(),
                    (*width).into(),
                    row_height.into(),
                ],
            ));
            self.ops.push(Operation::new("S", vec![]));

            if !cell.is_empty() {
                let (font, size, color) = if is_header {
                    (FONT_BOLD, HEADER_FONT_SIZE, WHITE)
                } else {
                    (FONT_BODY, BODY_FONT_SIZE, BLACK)
                };
                let text = clip_to_width(cell, *width, size);
                let baseline = y_bottom + (row_height - size) / 2.0;
                self.draw_text(font, size, color, x + CELL_PADDING, baseline, &text);
            }
            x += width;
        }
        self.cursor -= row_height;
    }
}
