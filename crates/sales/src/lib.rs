//! Sales domain module.
//!
//! The shop catalog and the order session that reserves warehouse stock and
//! settles it on commit. Pure in-memory domain logic (no IO, no storage).

pub mod order;
pub mod shop;

pub use order::{OrderSession, OrderStatus};
pub use shop::SalesCatalog;
