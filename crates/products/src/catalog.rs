use std::collections::BTreeMap;

use retail_core::{DomainError, DomainResult, Entity, ProductId};

use crate::product::{Product, ProductPatch};

/// Read-side contract a catalog exposes to its consumers (e.g. order sessions).
pub trait ProductLookup {
    fn get(&self, id: &ProductId) -> DomainResult<&Product>;

    fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_ok()
    }
}

/// Keyed registry of products.
///
/// Keys are unique for the catalog's lifetime; a registered identifier always
/// resolves to its product.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product; fails if its identifier is already taken.
    pub fn add(&mut self, product: Product) -> DomainResult<()> {
        let id = product.id().clone();
        if self.products.contains_key(&id) {
            return Err(DomainError::DuplicateProduct(id));
        }

        tracing::debug!(product_id = %id, "product registered");
        self.products.insert(id, product);
        Ok(())
    }

    /// Borrow a stored product. The borrow is read-only; use [`Catalog::update`]
    /// to change it.
    pub fn get(&self, id: &ProductId) -> DomainResult<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| DomainError::ProductNotFound(id.clone()))
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.contains_key(id)
    }

    pub fn update(&mut self, id: &ProductId, patch: &ProductPatch) -> DomainResult<()> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| DomainError::ProductNotFound(id.clone()))?;
        if patch.is_empty() {
            return Ok(());
        }
        product.apply_patch(patch)?;

        tracing::debug!(product_id = %id, "product updated");
        Ok(())
    }

    /// Iterate over the current products in identifier order.
    ///
    /// Each call starts a fresh pass over the live state.
    pub fn list(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.values()
    }

    /// One display line per product.
    pub fn render_all(&self) -> impl Iterator<Item = String> + '_ {
        self.list().map(|product| product.to_string())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductLookup for Catalog {
    fn get(&self, id: &ProductId) -> DomainResult<&Product> {
        Catalog::get(self, id)
    }

    fn contains(&self, id: &ProductId) -> bool {
        Catalog::contains(self, id)
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
    fn add_rejects_duplicate_identifier() {
        let mut catalog = Catalog::new();
        catalog.add(product("p1")).unwrap();

        let err = catalog.add(product("p1")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateProduct(ProductId::from("p1")));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn get_and_update_fail_for_unknown_identifier() {
        let mut catalog = Catalog::new();
        let missing = ProductId::from("missing");

        assert_eq!(
            catalog.get(&missing).unwrap_err(),
            DomainError::ProductNotFound(missing.clone())
        );
        assert_eq!(
            catalog.update(&missing, &ProductPatch::default()).unwrap_err(),
            DomainError::ProductNotFound(missing)
        );
    }

    #[test]
    fn update_is_visible_through_get() {
        let mut catalog = Catalog::new();
        let id = ProductId::from("p1");
        catalog.add(product("p1")).unwrap();

        let patch = ProductPatch {
            name: Some("Renamed".to_string()),
            ..ProductPatch::default()
        };
        catalog.update(&id, &patch).unwrap();

        let stored = catalog.get(&id).unwrap();
        assert_eq!(stored.name(), "Renamed");
        assert_eq!(stored.model(), "C");
    }

    #[test]
    fn empty_patch_leaves_product_unchanged() {
        let mut catalog = Catalog::new();
        let id = ProductId::from("p1");
        catalog.add(product("p1")).unwrap();

        catalog.update(&id, &ProductPatch::default()).unwrap();
        assert_eq!(catalog.get(&id).unwrap(), &product("p1"));
    }

    #[test]
    fn list_reflects_current_state_on_each_pass() {
        let mut catalog = Catalog::new();
        catalog.add(product("b")).unwrap();
        catalog.add(product("a")).unwrap();

        let ids: Vec<_> = catalog.list().map(|p| p.id().as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        catalog.add(product("c")).unwrap();
        assert_eq!(catalog.list().count(), 3);
        assert_eq!(catalog.render_all().count(), 3);
    }

    #[test]
    fn lookup_trait_delegates_to_catalog() {
        let mut catalog = Catalog::new();
        catalog.add(product("p1")).unwrap();

        let lookup: &dyn ProductLookup = &catalog;
        assert!(lookup.contains(&ProductId::from("p1")));
        assert!(!lookup.contains(&ProductId::from("p2")));
        assert!(lookup.get(&ProductId::from("p2")).unwrap_err().is_not_found());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every distinct identifier added resolves; duplicates are rejected.
        #[test]
        fn added_identifiers_resolve(ids in prop::collection::vec("[a-z0-9-]{1,12}", 1..20)) {
            let mut catalog = Catalog::new();
            let mut seen = std::collections::BTreeSet::new();

            for id in &ids {
                let result = catalog.add(product(id));
                if seen.insert(id.clone()) {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(result, Err(DomainError::DuplicateProduct(ProductId::from(id.as_str()))));
                }
            }

            prop_assert_eq!(catalog.len(), seen.len());
            for id in &seen {
                let stored = catalog.get(&ProductId::from(id.as_str())).unwrap();
                prop_assert_eq!(stored.id().as_str(), id.as_str());
            }
        }
    }
}
