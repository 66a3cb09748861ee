//! Data models
//!
//! Shared between forno-server and the browser front-ends (via API).
//! DB row types live in the server and convert into these.
//! Resource IDs are `i64`; order intents use UUID strings.

pub mod dashboard;
pub mod intent;
pub mod layout;
pub mod order;
pub mod product;
pub mod review;
pub mod store_status;
pub mod user;

// Re-exports
pub use dashboard::*;
pub use intent::*;
pub use layout::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use store_status::*;
pub use user::*;
