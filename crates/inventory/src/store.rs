use std::collections::BTreeMap;

use retail_core::{DomainError, DomainResult, Entity, ProductId};
use retail_products::{Catalog, Product, ProductLookup, ProductPatch};

/// Stock-side contract a warehouse exposes to order sessions.
pub trait StockLedger: ProductLookup {
    fn quantity_of(&self, id: &ProductId) -> DomainResult<u64>;

    /// Remove one unit and hand back an owned copy of the product.
    ///
    /// Must succeed whenever `quantity_of(id)` is positive. A failure does not
    /// roll back units taken earlier in the same order commit.
    fn take_unit(&mut self, id: &ProductId) -> DomainResult<Product>;
}

/// Warehouse: a catalog plus units on hand per product.
///
/// Every product registered through [`InventoryStore::add_stock`] has a
/// quantity, and quantities never go below zero.
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    catalog: Catalog,
    quantities: BTreeMap<ProductId, u64>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`, registering it if unknown.
    ///
    /// Re-adding a known product tops up its quantity; the stored record is
    /// kept and the passed one dropped.
    pub fn add_stock(&mut self, product: Product, quantity: u64) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }

        let id = product.id().clone();
        let current = self.quantities.get(&id).copied().unwrap_or(0);
        let updated = current.checked_add(quantity).ok_or_else(|| {
            DomainError::validation(format!("stock of product {id} would overflow"))
        })?;

        match self.catalog.add(product) {
            Ok(()) | Err(DomainError::DuplicateProduct(_)) => {}
            Err(err) => return Err(err),
        }
        self.quantities.insert(id.clone(), updated);

        tracing::info!(product_id = %id, added = quantity, on_hand = updated, "stock added");
        Ok(())
    }

    /// Add a single unit of `product`.
    pub fn add_product(&mut self, product: Product) -> DomainResult<()> {
        self.add_stock(product, 1)
    }

    pub fn take_unit(&mut self, id: &ProductId) -> DomainResult<Product> {
        let product = self.catalog.get(id)?.clone();
        let on_hand = self
            .quantities
            .get_mut(id)
            .ok_or_else(|| DomainError::ProductNotFound(id.clone()))?;

        if *on_hand == 0 {
            tracing::warn!(product_id = %id, "take rejected: out of stock");
            return Err(DomainError::OutOfStock(id.clone()));
        }
        *on_hand -= 1;

        tracing::debug!(product_id = %id, on_hand = *on_hand, "unit taken");
        Ok(product)
    }

    pub fn quantity_of(&self, id: &ProductId) -> DomainResult<u64> {
        self.catalog.get(id)?;
        self.quantities
            .get(id)
            .copied()
            .ok_or_else(|| DomainError::ProductNotFound(id.clone()))
    }

    pub fn get(&self, id: &ProductId) -> DomainResult<&Product> {
        self.catalog.get(id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.catalog.contains(id)
    }

    pub fn update(&mut self, id: &ProductId, patch: &ProductPatch) -> DomainResult<()> {
        self.catalog.update(id, patch)
    }

    pub fn list(&self) -> impl Iterator<Item = &Product> + '_ {
        self.catalog.list()
    }

    /// Products paired with their quantity on hand.
    pub fn stock_levels(&self) -> impl Iterator<Item = (&Product, u64)> + '_ {
        self.catalog.list().map(|product| {
            let on_hand = self.quantities.get(product.id()).copied().unwrap_or(0);
            (product, on_hand)
        })
    }
}

impl ProductLookup for InventoryStore {
    fn get(&self, id: &ProductId) -> DomainResult<&Product> {
        InventoryStore::get(self, id)
    }

    fn contains(&self, id: &ProductId) -> bool {
        InventoryStore::contains(self, id)
    }
}

impl StockLedger for InventoryStore {
    fn quantity_of(&self, id: &ProductId) -> DomainResult<u64> {
        InventoryStore::quantity_of(self, id)
    }

    fn take_unit(&mut self, id: &ProductId) -> DomainResult<Product> {
        InventoryStore::take_unit(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn product(id: &str) -> Product {
        Product::new(
            ProductId::from(id),
            "Prod",
            "C",
            NaiveDate::from_ymd_opt(1993, 1, 1).unwrap(),
            9.0,
            10.0,
        )
        .unwrap()
    }

    #[test]
    fn unknown_identifier_is_not_found_everywhere() {
        let mut store = InventoryStore::new();
        let id = ProductId::from("ghost");

        assert_eq!(store.get(&id).unwrap_err(), DomainError::ProductNotFound(id.clone()));
        assert_eq!(store.quantity_of(&id).unwrap_err(), DomainError::ProductNotFound(id.clone()));
        assert_eq!(store.take_unit(&id).unwrap_err(), DomainError::ProductNotFound(id));
    }

    #[test]
    fn add_stock_rejects_zero_quantity() {
        let mut store = InventoryStore::new();
        assert_eq!(store.add_stock(product("p1"), 0), Err(DomainError::InvalidQuantity));
        assert!(!store.contains(&ProductId::from("p1")));
    }

    #[test]
    fn re_adding_tops_up_and_keeps_stored_record() {
        let mut store = InventoryStore::new();
        let id = ProductId::from("p1");
        store.add_stock(product("p1"), 2).unwrap();

        let patch = ProductPatch {
            name: Some("Stored".to_string()),
            ..ProductPatch::default()
        };
        store.update(&id, &patch).unwrap();

        store.add_product(product("p1")).unwrap();
        assert_eq!(store.quantity_of(&id).unwrap(), 3);
        assert_eq!(store.get(&id).unwrap().name(), "Stored");
    }

    #[test]
    fn take_unit_drains_to_zero_then_fails() {
        let mut store = InventoryStore::new();
        let id = ProductId::from("p1");
        store.add_stock(product("p1"), 2).unwrap();

        store.take_unit(&id).unwrap();
        store.take_unit(&id).unwrap();
        assert_eq!(store.quantity_of(&id).unwrap(), 0);
        assert_eq!(store.take_unit(&id).unwrap_err(), DomainError::OutOfStock(id.clone()));
        assert_eq!(store.quantity_of(&id).unwrap(), 0);
    }

    #[test]
    fn take_unit_returns_an_independent_copy() {
        let mut store = InventoryStore::new();
        let id = ProductId::from("p1");
        let original = product("p1");
        store.add_stock(original.clone(), 1).unwrap();

        let taken = store.take_unit(&id).unwrap();
        assert_eq!(taken, original);
        assert!(!std::ptr::eq(&taken, store.get(&id).unwrap()));
        assert_eq!(store.get(&id).unwrap(), &original);
    }

    #[test]
    fn stock_levels_pair_products_with_quantities() {
        let mut store = InventoryStore::new();
        store.add_stock(product("a"), 4).unwrap();
        store.add_stock(product("b"), 1).unwrap();

        let levels: Vec<_> = store
            .stock_levels()
            .map(|(p, q)| (p.id().as_str().to_string(), q))
            .collect();
        assert_eq!(levels, vec![("a".to_string(), 4), ("b".to_string(), 1)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: quantity on hand equals the sum of all quantities added.
        #[test]
        fn quantity_is_sum_of_additions(additions in prop::collection::vec(1u64..50, 1..12)) {
            let mut store = InventoryStore::new();
            let id = ProductId::from("p1");
            let mut total = 0;

            for n in additions {
                store.add_stock(product("p1"), n).unwrap();
                total += n;
                prop_assert_eq!(store.quantity_of(&id).unwrap(), total);
            }
        }

        /// Property: exactly `quantity_of` takes succeed, the next one is out of stock.
        #[test]
        fn takes_succeed_up_to_availability(stock in 1u64..40) {
            let mut store = InventoryStore::new();
            let id = ProductId::from("p1");
            store.add_stock(product("p1"), stock).unwrap();

            for _ in 0..store.quantity_of(&id).unwrap() {
                prop_assert!(store.take_unit(&id).is_ok());
            }
            prop_assert_eq!(store.quantity_of(&id).unwrap(), 0);
            prop_assert_eq!(store.take_unit(&id), Err(DomainError::OutOfStock(id.clone())));
        }
    }
}
