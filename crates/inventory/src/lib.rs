//! Inventory domain module.
//!
//! The warehouse: a product catalog plus units on hand per product, implemented
//! purely as in-memory domain logic (no IO, no storage).

pub mod store;

pub use store::{InventoryStore, StockLedger};
