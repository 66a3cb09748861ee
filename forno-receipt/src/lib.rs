//! # forno-receipt
//!
//! Receipt layout and PDF rendering - low-level capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW a receipt is laid out and drawn:
//! - Fixed-width line layout (alignment, separators, left/right columns)
//! - Monospace PDF rendering on an 80 mm roll-style page
//!
//! Business logic (WHAT goes on the receipt) stays in application code:
//! - Order receipt rendering → forno-server
//!
//! ## Example
//!
//! ```
//! use forno_receipt::{PdfRenderer, ReceiptBuilder};
//!
//! let mut builder = ReceiptBuilder::new(42);
//! builder.center().double_size().line("Forno").reset_size();
//! builder.sep_double();
//! builder.left().line_lr("Pizza G x1", "R$ 49,90");
//! let doc = builder.build();
//!
//! let pdf = PdfRenderer::default().render(&doc).unwrap();
//! assert!(pdf.starts_with(b"%PDF"));
//! ```

mod builder;
mod error;
mod pdf;
mod text;

// Re-exports
pub use builder::{Align, ReceiptBuilder, ReceiptDocument, ReceiptLine};
pub use error::{ReceiptError, ReceiptResult};
pub use pdf::PdfRenderer;
pub use text::{pad, text_width, truncate, wrap};
