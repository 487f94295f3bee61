//! Products domain module.
//!
//! Product records and the keyed catalog that owns them, implemented purely as
//! in-memory domain logic (no IO, no storage).

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, ProductLookup};
pub use product::{DEFAULT_ENERGY_RATE, EnergyTariff, Product, ProductDraft, ProductPatch};
