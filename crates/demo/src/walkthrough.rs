//! Shop + warehouse + order walkthrough.

use chrono::NaiveDate;

use retail_core::{DomainError, Entity, ProductId};
use retail_inventory::InventoryStore;
use retail_products::{Product, ProductDraft};
use retail_sales::{OrderSession, SalesCatalog};

use crate::config::DemoConfig;

/// What the walkthrough observed.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkthroughReport {
    /// Shop catalog, one display line per product.
    pub catalog: Vec<String>,
    /// Units handed out by the first commit.
    pub ordered: Vec<Product>,
    /// Energy cost of one ordered unit under the configured tariff.
    pub unit_energy_cost: f64,
    /// Warehouse stock of the ordered product after both commits.
    pub stock_left: u64,
    pub second_commit_rejected: bool,
}

pub fn run(config: &DemoConfig) -> anyhow::Result<WalkthroughReport> {
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let mut shop = SalesCatalog::new();
    let mut warehouse = InventoryStore::new();

    shop.list_draft(ProductDraft::new("Product", "A", 8.0, 16.0))?;
    shop.list_draft(ProductDraft::new("Product", "B", 8.0, 16.0).with_id("test-id"))?;

    let released = NaiveDate::from_ymd_opt(1993, 1, 1)
        .ok_or_else(|| anyhow::anyhow!("invalid release date"))?;
    let product_c = Product::new("product-c".parse::<ProductId>()?, "Prod", "C", released, 9.0, 10.0)?;
    let id = product_c.id().clone();
    shop.list_product(product_c.clone())?;
    warehouse.add_stock(product_c, 3)?;

    let mut order = OrderSession::new(&shop, &mut warehouse);
    order.reserve(&id)?;
    order.reserve(&id)?;
    let ordered = order.commit()?;

    let second_commit_rejected = match order.commit() {
        Ok(_) => false,
        Err(DomainError::SessionAlreadyCommitted) => true,
        Err(err) => return Err(err.into()),
    };

    let unit_energy_cost = ordered
        .first()
        .map(|product| product.energy_cost(&config.tariff))
        .unwrap_or_default();
    let stock_left = warehouse.quantity_of(&id)?;
    tracing::info!(product_id = %id, stock_left, unit_energy_cost, "walkthrough finished");

    Ok(WalkthroughReport {
        catalog: shop.render_all().collect(),
        ordered,
        unit_energy_cost,
        stock_left,
        second_commit_rejected,
    })
}
