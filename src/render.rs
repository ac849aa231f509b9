// The ticket layout engine: lays out one candidate and paints the page with
// printpdf.

use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
    Rgb,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::assets::RasterAsset;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::layout::{
    layout_page, AssetKind, Decorations, DrawOp, Font, PageLayout, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::record::CandidateRecord;
use crate::reproducible;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// Replaces printpdf's random per-document ID; the trailer `/ID` is derived
/// from content afterwards.
const DOCUMENT_ID: &str = "hallticket";

fn pt(value: f32) -> Mm {
    Mm(value * MM_PER_PT)
}

/// A finished ticket, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl OutputDocument {
    pub fn write_to(&self, path: &Path) -> Result<(), RenderError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Stateless; one instance can render any number of records, from any thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct TicketLayoutEngine;

impl TicketLayoutEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        record: &CandidateRecord,
        context: &RenderContext,
    ) -> Result<OutputDocument, RenderError> {
        let logo = RasterAsset::load_optional(context.logo_path.as_deref());
        let photo = RasterAsset::load_optional(record.photo_path.as_deref());
        let decorations = Decorations {
            logo: logo.is_some(),
            photo: photo.is_some(),
        };

        let page = layout_page(record, context, decorations)?;
        debug!(
            seat_no = %record.seat_no,
            subjects_end = page.copies[0].subjects_end,
            logo = decorations.logo,
            photo = decorations.photo,
            "ticket laid out"
        );

        let painted = paint(&page, logo.as_ref(), photo.as_ref())?;
        let bytes = reproducible::normalize(&painted)?;

        Ok(OutputDocument {
            file_name: record.output_file_name(),
            bytes,
        })
    }

    /// Renders and writes `dir/hallticket_<SeatNo>.pdf`.
    pub fn render_to_dir(
        &self,
        record: &CandidateRecord,
        context: &RenderContext,
        dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        let document = self.render(record, context)?;
        let path = dir.join(&document.file_name);
        document.write_to(&path)?;
        Ok(path)
    }
}

// ============================================================================
// PDF Painting
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, RenderError> {
        let add = |font: BuiltinFont| {
            doc.add_builtin_font(font)
                .map_err(|e| RenderError::Pdf(e.to_string()))
        };
        Ok(Self {
            regular: add(BuiltinFont::Helvetica)?,
            bold: add(BuiltinFont::HelveticaBold)?,
            oblique: add(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
            Font::Oblique => &self.oblique,
        }
    }
}

fn paint(
    page: &PageLayout,
    logo: Option<&RasterAsset>,
    photo: Option<&RasterAsset>,
) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) = PdfDocument::new(
        "Hall Ticket",
        pt(PAGE_WIDTH),
        pt(PAGE_HEIGHT),
        "Layer 1",
    );
    let doc = doc.with_document_id(DOCUMENT_ID.to_string());
    let layer = doc.get_page(page1).get_layer(layer1);
    let fonts = Fonts::load(&doc)?;

    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

    for op in page.ops() {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                line_width,
            } => {
                layer.set_outline_thickness(*line_width);
                draw_polyline(
                    &layer,
                    &[
                        (*x, *y),
                        (x + width, *y),
                        (x + width, y + height),
                        (*x, y + height),
                    ],
                    true,
                );
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                line_width,
            } => {
                layer.set_outline_thickness(*line_width);
                draw_polyline(&layer, &[(*x1, *y1), (*x2, *y2)], false);
            }
            DrawOp::Text {
                text,
                x,
                y,
                font,
                size,
            } => {
                layer.use_text(text.as_str(), *size, pt(*x), pt(*y), fonts.get(*font));
            }
            DrawOp::Image {
                asset,
                x,
                y,
                width,
                height,
            } => {
                let source = match asset {
                    AssetKind::Logo => logo,
                    AssetKind::Photo => photo,
                };
                if let Some(source) = source {
                    embed_image(&layer, source, *x, *y, *width, *height);
                }
            }
        }
    }

    let mut buffer = Vec::new();
    {
        let mut writer = BufWriter::new(&mut buffer);
        doc.save(&mut writer)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
    }
    Ok(buffer)
}

/// Stretches `asset` to exactly `width` x `height` points with its
/// bottom-left corner at (`x`, `y`).
fn embed_image(
    layer: &PdfLayerReference,
    asset: &RasterAsset,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) {
    let image = Image::from(ImageXObject {
        width: Px(asset.width as usize),
        height: Px(asset.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: asset.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // At 72 dpi one pixel is one point, so scale maps pixels onto the box.
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt(x)),
            translate_y: Some(pt(y)),
            scale_x: Some(width / asset.width as f32),
            scale_y: Some(height / asset.height as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

fn draw_polyline(layer: &PdfLayerReference, points: &[(f32, f32)], is_closed: bool) {
    let points = points
        .iter()
        .map(|&(x, y)| (Point::new(pt(x), pt(y)), false))
        .collect();
    layer.add_line(Line { points, is_closed });
}
