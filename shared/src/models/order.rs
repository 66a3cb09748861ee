//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order lifecycle: pendente → preparando → a_caminho → entregue, or cancelado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendente,
    Preparando,
    ACaminho,
    Entregue,
    Cancelado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pendente,
        Self::Preparando,
        Self::ACaminho,
        Self::Entregue,
        Self::Cancelado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendente => "pendente",
            Self::Preparando => "preparando",
            Self::ACaminho => "a_caminho",
            Self::Entregue => "entregue",
            Self::Cancelado => "cancelado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Position on the linear progression; `None` for cancelado
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Pendente => Some(0),
            Self::Preparando => Some(1),
            Self::ACaminho => Some(2),
            Self::Entregue => Some(3),
            Self::Cancelado => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregue | Self::Cancelado)
    }

    /// Forward moves only; cancellation from any non-terminal status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(cur), Some(nxt)) => nxt > cur,
            (None, Some(_)) => false,
        }
    }

    /// Human label used on receipts
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pendente => "Pendente",
            Self::Preparando => "Preparando",
            Self::ACaminho => "A caminho",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
        }
    }
}

/// Delivery or pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Fulfillment {
    #[default]
    Entrega,
    Retirada,
}

impl Fulfillment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrega => "entrega",
            Self::Retirada => "retirada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entrega" => Some(Self::Entrega),
            "retirada" => Some(Self::Retirada),
            _ => None,
        }
    }
}

/// How the customer pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid through the processor; orders are created by the webhook
    Online,
    /// Cash on delivery/pickup
    Dinheiro,
    /// Card machine on delivery/pickup
    CartaoEntrega,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Dinheiro => "dinheiro",
            Self::CartaoEntrega => "cartao_entrega",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Self::Online),
            "dinheiro" => Some(Self::Dinheiro),
            "cartao_entrega" => Some(Self::CartaoEntrega),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Pagamento online",
            Self::Dinheiro => "Dinheiro",
            Self::CartaoEntrega => "Cartão na entrega",
        }
    }
}

/// Priced order line (snapshot of catalog data at order time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub size: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// Customer contact data copied onto the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CustomerSnapshot {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub number: String,
    pub customer_id: i64,
    pub customer: CustomerSnapshot,
    pub items: Vec<OrderItem>,
    pub fulfillment: Fulfillment,
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_txid: Option<String>,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line as sent by the browser (prices are never trusted)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItem {
    pub product_id: i64,
    #[validate(length(min = 1, max = 40))]
    pub size: String,
    pub quantity: u32,
    #[validate(length(max = 200))]
    pub notes: Option<String>,
}

/// Cart quote / order creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(nested)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub fulfillment: Fulfillment,
    pub payment_method: Option<PaymentMethod>,
    /// Overrides the profile address for this order
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Admin status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
