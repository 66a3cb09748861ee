//! Receipt layout builder
//!
//! Provides a fluent API for building a fixed-width receipt. Alignment and
//! style are modal, like a thermal printer: they apply to every line written
//! after the call until changed again.

use crate::text::{text_width, truncate, wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One rendered row of the receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub text: String,
    pub align: Align,
    pub bold: bool,
    /// Double width and height; such a line holds half as many characters
    pub double: bool,
}

/// Finished layout, ready for a rendering backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDocument {
    pub title: String,
    /// Paper width in characters at normal size
    pub width: usize,
    pub lines: Vec<ReceiptLine>,
}

impl ReceiptDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text rendering (alignment applied), handy for logs and tests
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let cols = if line.double { self.width / 2 } else { self.width };
            let w = text_width(&line.text);
            let indent = match line.align {
                Align::Left => 0,
                Align::Center => cols.saturating_sub(w) / 2,
                Align::Right => cols.saturating_sub(w),
            };
            out.push_str(&" ".repeat(indent));
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

/// Receipt layout builder
///
/// Common widths:
/// - 58mm paper: 32 characters
/// - 80mm paper: 42 characters
pub struct ReceiptBuilder {
    title: String,
    width: usize,
    lines: Vec<ReceiptLine>,
    align: Align,
    bold: bool,
    double: bool,
}

impl ReceiptBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            title: String::from("Recibo"),
            width: width.max(8),
            lines: Vec::with_capacity(64),
            align: Align::Left,
            bold: false,
            double: false,
        }
    }

    /// Document title (PDF metadata)
    pub fn title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Characters available on the current line
    fn columns(&self) -> usize {
        if self.double { self.width / 2 } else { self.width }
    }

    fn push(&mut self, text: String) {
        self.lines.push(ReceiptLine {
            text,
            align: self.align,
            bold: self.bold,
            double: self.double,
        });
    }

    // === Text Output ===

    /// Write a line; longer text is word-wrapped
    pub fn line(&mut self, s: &str) -> &mut Self {
        let cols = self.columns();
        if text_width(s) <= cols {
            self.push(s.to_string());
        } else {
            for part in wrap(s, cols) {
                self.push(part);
            }
        }
        self
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.push(String::new());
        self
    }

    pub fn feed(&mut self, lines: u8) -> &mut Self {
        for _ in 0..lines {
            self.newline();
        }
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.align = Align::Center;
        self
    }

    /// Align text to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.align = Align::Left;
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.align = Align::Right;
        self
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.bold = true;
        self
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.bold = false;
        self
    }

    /// Double width and height
    pub fn double_size(&mut self) -> &mut Self {
        self.double = true;
        self
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.double = false;
        self
    }

    // === Separators ===

    /// Print a line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.columns());
        self.push(sep);
        self
    }

    /// Print a line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.columns());
        self.push(sep);
        self
    }

    // === Layout Helpers ===

    /// Print left and right text on the same line
    ///
    /// Left text is left-aligned, right text is right-aligned, with spaces
    /// filling the gap. When both do not fit, the left text is wrapped above
    /// and the right text ends the last row.
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let cols = self.columns();
        let rw = text_width(right);
        let saved = self.align;
        self.align = Align::Left;

        if text_width(left) + rw < cols {
            let spaces = cols - text_width(left) - rw;
            self.push(format!("{left}{}{right}", " ".repeat(spaces)));
        } else {
            let room = cols.saturating_sub(rw + 1).max(1);
            let mut parts = wrap(left, room);
            let last = parts.pop().unwrap_or_default();
            for part in parts {
                self.push(part);
            }
            let spaces = cols.saturating_sub(text_width(&last) + rw).max(1);
            let row = format!("{last}{}{right}", " ".repeat(spaces));
            self.push(truncate(&row, cols.max(rw)));
        }

        self.align = saved;
        self
    }

    // === Build ===

    pub fn build(self) -> ReceiptDocument {
        ReceiptDocument {
            title: self.title,
            width: self.width,
            lines: self.lines,
        }
    }
}

impl Default for ReceiptBuilder {
    fn default() -> Self {
        Self::new(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_lr_fills_width() {
        let mut b = ReceiptBuilder::new(20);
        b.line_lr("Subtotal", "R$ 10,00");
        let doc = b.build();
        assert_eq!(doc.lines[0].text, "Subtotal    R$ 10,00");
        assert_eq!(text_width(&doc.lines[0].text), 20);
    }

    #[test]
    fn line_lr_wraps_long_left_text() {
        let mut b = ReceiptBuilder::new(20);
        b.line_lr("2x Pizza Portuguesa Grande", "R$ 99,80");
        let doc = b.build();
        assert!(doc.lines.len() >= 2);
        let last = &doc.lines.last().unwrap().text;
        assert!(last.ends_with("R$ 99,80"));
        assert!(doc.lines.iter().all(|l| text_width(&l.text) <= 20));
    }

    #[test]
    fn modal_style_applies_to_following_lines() {
        let mut b = ReceiptBuilder::new(20);
        b.center().bold().line("FORNO").bold_off().left().line("x");
        let doc = b.build();
        assert_eq!(doc.lines[0].align, Align::Center);
        assert!(doc.lines[0].bold);
        assert_eq!(doc.lines[1].align, Align::Left);
        assert!(!doc.lines[1].bold);
    }

    #[test]
    fn double_size_halves_separator() {
        let mut b = ReceiptBuilder::new(20);
        b.double_size().sep_double().reset_size().sep_single();
        let doc = b.build();
        assert_eq!(doc.lines[0].text.len(), 10);
        assert_eq!(doc.lines[1].text.len(), 20);
    }

    #[test]
    fn to_text_centers() {
        let mut b = ReceiptBuilder::new(10);
        b.center().line("abcd");
        assert_eq!(b.build().to_text(), "   abcd\n");
    }
}
