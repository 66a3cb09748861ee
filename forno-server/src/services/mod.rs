//! Business operations spanning several repositories

pub mod checkout;
pub mod payment;
pub mod store;
