use chrono::{NaiveDate, Utc};

use retail_core::{DomainResult, ProductId};
use retail_products::{Catalog, Product, ProductDraft, ProductLookup, ProductPatch};

/// Products a shop offers for sale. Tracks no quantities.
#[derive(Debug, Clone, Default)]
pub struct SalesCatalog {
    catalog: Catalog,
}

impl SalesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a product from `draft`, register it, and return a copy.
    ///
    /// A missing release date defaults to today (UTC).
    pub fn list_draft(&mut self, draft: ProductDraft) -> DomainResult<Product> {
        self.list_draft_on(draft, Utc::now().date_naive())
    }

    /// Like [`SalesCatalog::list_draft`] with an explicit listing date.
    pub fn list_draft_on(&mut self, draft: ProductDraft, today: NaiveDate) -> DomainResult<Product> {
        let product = draft.into_product(today)?;
        self.catalog.add(product.clone())?;
        Ok(product)
    }

    /// Register a pre-built product.
    pub fn list_product(&mut self, product: Product) -> DomainResult<()> {
        self.catalog.add(product)
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

    pub fn render_all(&self) -> impl Iterator<Item = String> + '_ {
        self.catalog.render_all()
    }
}

impl ProductLookup for SalesCatalog {
    fn get(&self, id: &ProductId) -> DomainResult<&Product> {
        SalesCatalog::get(self, id)
    }

    fn contains(&self, id: &ProductId) -> bool {
        SalesCatalog::contains(self, id)
    }
}
