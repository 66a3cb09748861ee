//! Order Intent Model
//!
//! An intent is the pre-order placeholder created before online payment is
//! confirmed. The payment webhook materializes it into an [`Order`].
//!
//! [`Order`]: super::order::Order

use serde::{Deserialize, Serialize};

use super::order::{CustomerSnapshot, Fulfillment};
use crate::pricing::PricedCart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentState {
    /// Waiting for the processor
    Aguardando,
    /// Paid and materialized into an order
    Pago,
    /// Processor reported a failure
    Falhou,
    /// TTL elapsed before payment
    Expirado,
}

impl IntentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aguardando => "aguardando",
            Self::Pago => "pago",
            Self::Falhou => "falhou",
            Self::Expirado => "expirado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "aguardando" => Some(Self::Aguardando),
            "pago" => Some(Self::Pago),
            "falhou" => Some(Self::Falhou),
            "expirado" => Some(Self::Expirado),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderIntent {
    pub id: String,
    pub customer_id: i64,
    pub customer: CustomerSnapshot,
    pub cart: PricedCart,
    pub fulfillment: Fulfillment,
    pub notes: Option<String>,
    /// Amount the processor must confirm, in cents
    pub amount_cents: i64,
    pub state: IntentState,
    pub order_id: Option<i64>,
    pub created_at: i64,
    pub expires_at: i64,
}

impl OrderIntent {
    /// Effective state at `now`: a waiting intent past its TTL reads as expired
    pub fn state_at(&self, now: i64) -> IntentState {
        if self.state == IntentState::Aguardando && now >= self.expires_at {
            IntentState::Expirado
        } else {
            self.state
        }
    }
}
