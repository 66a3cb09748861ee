//! Order receipt layout
//!
//! Lays an [`Order`] out on the 80 mm receipt grid and hands the document to
//! the PDF backend.

use chrono::{TimeZone, Utc};
use forno_receipt::{PdfRenderer, ReceiptBuilder, ReceiptDocument};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Fulfillment, Order};

const WIDTH: usize = 42;

/// `R$ 1234,50`
pub fn brl(value: Decimal) -> String {
    format!("R$ {:.2}", value.round_dp(2)).replace('.', ",")
}

pub struct OrderReceiptRenderer<'a> {
    order: &'a Order,
    store_name: &'a str,
    tz: chrono_tz::Tz,
}

impl<'a> OrderReceiptRenderer<'a> {
    pub fn new(order: &'a Order, store_name: &'a str, tz: chrono_tz::Tz) -> Self {
        Self {
            order,
            store_name,
            tz,
        }
    }

    fn created_local(&self) -> String {
        match Utc.timestamp_millis_opt(self.order.created_at).single() {
            Some(utc) => utc.with_timezone(&self.tz).format("%d/%m/%Y %H:%M").to_string(),
            None => String::from("-"),
        }
    }

    pub fn document(&self) -> ReceiptDocument {
        let order = self.order;
        let mut b = ReceiptBuilder::new(WIDTH);
        b.title(&format!("Pedido {}", order.number));

        // Header
        b.center().double_size().bold();
        b.line(self.store_name);
        b.reset_size().bold_off();
        b.line("Comprovante de pedido");
        b.newline();

        b.left();
        b.line_lr(&format!("Pedido {}", order.number), &self.created_local());
        let kind = match order.fulfillment {
            Fulfillment::Entrega => "Entrega",
            Fulfillment::Retirada => "Retirada no balcão",
        };
        b.line_lr(kind, order.status.label());
        b.sep_double();

        // Customer
        b.bold().line(&order.customer.name).bold_off();
        if let Some(phone) = &order.customer.phone {
            b.line(&format!("Tel: {phone}"));
        }
        if order.fulfillment == Fulfillment::Entrega
            && let Some(address) = &order.customer.address
        {
            b.line(address);
        }
        b.sep_single();

        // Items
        for item in &order.items {
            b.line_lr(
                &format!("{}x {} ({})", item.quantity, item.product_name, item.size),
                &brl(item.line_total),
            );
            if item.quantity > 1 {
                b.line(&format!("   {} cada", brl(item.unit_price)));
            }
            if let Some(notes) = item.notes.as_deref().filter(|n| !n.is_empty()) {
                b.line(&format!("   Obs: {notes}"));
            }
        }
        b.sep_single();

        // Totals
        b.line_lr("Subtotal", &brl(order.subtotal));
        if order.fulfillment == Fulfillment::Entrega {
            b.line_lr("Taxa de entrega", &brl(order.delivery_fee));
        }
        b.bold().line_lr("TOTAL", &brl(order.total)).bold_off();
        b.line_lr("Pagamento", order.payment_method.label());
        if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
            b.newline();
            b.line(&format!("Obs: {notes}"));
        }
        b.sep_double();

        b.center();
        b.line("Obrigado pela preferência!");
        b.feed(2);
        b.build()
    }

    pub fn render_pdf(&self) -> Result<Vec<u8>, AppError> {
        PdfRenderer::default()
            .render(&self.document())
            .map_err(|e| {
                tracing::error!(order_id = self.order.id, error = %e, "Receipt rendering failed");
                AppError::new(ErrorCode::ReceiptRenderFailed)
            })
    }
}
