//! PDF backend
//!
//! Draws a [`ReceiptDocument`] on a single roll-style page: fixed width,
//! height grown to fit every line. Uses the built-in Courier faces so no
//! font files need to ship with the binary.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use tracing::instrument;

use crate::builder::{Align, ReceiptDocument};
use crate::error::{ReceiptError, ReceiptResult};
use crate::text::text_width;

/// Courier advance width as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;
const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.25;

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    /// Page width (mm)
    pub page_width: f32,
    /// Horizontal and vertical margin (mm)
    pub margin: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self {
            page_width: 80.0,
            margin: 4.0,
        }
    }
}

impl PdfRenderer {
    /// Font size (pt) at which `columns` Courier cells fill the printable width
    fn font_size(&self, columns: usize) -> f32 {
        let usable = self.page_width - 2.0 * self.margin;
        usable / (columns as f32 * COURIER_ADVANCE * PT_TO_MM)
    }

    /// Page height needed for the document (mm)
    pub fn page_height(&self, doc: &ReceiptDocument) -> f32 {
        let base = self.font_size(doc.width) * PT_TO_MM * LINE_SPACING;
        let body: f32 = doc
            .lines
            .iter()
            .map(|l| if l.double { base * 2.0 } else { base })
            .sum();
        body + 2.0 * self.margin
    }

    #[instrument(skip(self, doc), fields(lines = doc.lines.len()))]
    pub fn render(&self, doc: &ReceiptDocument) -> ReceiptResult<Vec<u8>> {
        if doc.is_empty() {
            return Err(ReceiptError::Empty);
        }
        if self.page_width <= 2.0 * self.margin {
            return Err(ReceiptError::InvalidLayout(format!(
                "page width {}mm leaves no printable area",
                self.page_width
            )));
        }

        let height = self.page_height(doc);
        let (pdf, page, layer) = PdfDocument::new(
            doc.title.as_str(),
            Mm(self.page_width),
            Mm(height),
            "receipt",
        );
        let regular = add_font(&pdf, BuiltinFont::Courier)?;
        let bold = add_font(&pdf, BuiltinFont::CourierBold)?;
        let layer = pdf.get_page(page).get_layer(layer);

        let normal_size = self.font_size(doc.width);
        let usable = self.page_width - 2.0 * self.margin;
        let mut y = height - self.margin;

        for line in &doc.lines {
            let size = if line.double {
                normal_size * 2.0
            } else {
                normal_size
            };
            y -= size * PT_TO_MM * LINE_SPACING;
            if line.text.is_empty() {
                continue;
            }

            let text_mm = text_width(&line.text) as f32 * size * COURIER_ADVANCE * PT_TO_MM;
            let x = match line.align {
                Align::Left => self.margin,
                Align::Center => self.margin + ((usable - text_mm) / 2.0).max(0.0),
                Align::Right => self.margin + (usable - text_mm).max(0.0),
            };
            let font = if line.bold { &bold } else { &regular };
            layer.use_text(line.text.as_str(), size, Mm(x), Mm(y), font);
        }

        let bytes = pdf
            .save_to_bytes()
            .map_err(|e| ReceiptError::Pdf(e.to_string()))?;
        tracing::debug!(bytes = bytes.len(), height_mm = height, "Receipt rendered");
        Ok(bytes)
    }
}

fn add_font(
    pdf: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> ReceiptResult<IndirectFontRef> {
    pdf.add_builtin_font(font)
        .map_err(|e| ReceiptError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReceiptBuilder;

    fn sample(lines: usize) -> ReceiptDocument {
        let mut b = ReceiptBuilder::new(42);
        b.center().bold().double_size().line("Forno").reset_size().bold_off();
        b.left();
        for i in 0..lines {
            b.line_lr(&format!("Item {i}"), "R$ 1,00");
        }
        b.build()
    }

    #[test]
    fn renders_pdf_bytes() {
        let bytes = PdfRenderer::default().render(&sample(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn height_grows_with_lines() {
        let r = PdfRenderer::default();
        assert!(r.page_height(&sample(30)) > r.page_height(&sample(3)));
    }

    #[test]
    fn empty_document_rejected() {
        let doc = ReceiptBuilder::new(42).build();
        assert!(matches!(
            PdfRenderer::default().render(&doc),
            Err(ReceiptError::Empty)
        ));
    }

    #[test]
    fn full_width_line_fits_printable_area() {
        let r = PdfRenderer::default();
        let size = r.font_size(42);
        let width_mm = 42.0 * size * COURIER_ADVANCE * PT_TO_MM;
        assert!((width_mm - 72.0).abs() < 0.01);
    }
}
