use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use retail_core::{DomainError, DomainResult, ProductId};
use retail_inventory::StockLedger;
use retail_products::{Product, ProductLookup};

/// Order session lifecycle. A session settles at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Committed,
}

/// Accumulates unit reservations against a shop and a warehouse, then deducts
/// them from the warehouse in one commit.
///
/// The session holds the warehouse mutably for its whole lifetime, so no other
/// code can change stock between a reservation check and the commit.
pub struct OrderSession<'a, C: ?Sized, S: ?Sized> {
    shop: &'a C,
    warehouse: &'a mut S,
    pending: BTreeMap<ProductId, u64>,
    status: OrderStatus,
}

impl<'a, C, S> OrderSession<'a, C, S>
where
    C: ProductLookup + ?Sized,
    S: StockLedger + ?Sized,
{
    pub fn new(shop: &'a C, warehouse: &'a mut S) -> Self {
        Self {
            shop,
            warehouse,
            pending: BTreeMap::new(),
            status: OrderStatus::Open,
        }
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_committed(&self) -> bool {
        self.status == OrderStatus::Committed
    }

    /// Units of `id` reserved so far.
    pub fn pending_quantity(&self, id: &ProductId) -> u64 {
        self.pending.get(id).copied().unwrap_or(0)
    }

    pub fn pending(&self) -> impl Iterator<Item = (&ProductId, u64)> + '_ {
        self.pending.iter().map(|(id, quantity)| (id, *quantity))
    }

    pub fn total_units(&self) -> u64 {
        self.pending.values().sum()
    }

    /// Read-only view of the warehouse this session settles against.
    pub fn warehouse(&self) -> &S {
        &*self.warehouse
    }

    /// Reserve one unit of `id`. Returns the new pending count for `id`.
    ///
    /// On error the pending reservations are unchanged.
    pub fn reserve(&mut self, id: &ProductId) -> DomainResult<u64> {
        self.ensure_open()?;

        if let Err(err) = self.shop.get(id) {
            tracing::warn!(product_id = %id, "reservation rejected: not sold in this shop");
            return Err(DomainError::unavailable_in_shop(id.clone(), err));
        }
        if let Err(err) = self.warehouse.get(id) {
            tracing::warn!(product_id = %id, "reservation rejected: not carried by this warehouse");
            return Err(DomainError::unavailable_in_warehouse(id.clone(), err));
        }

        let available = self.warehouse.quantity_of(id)?;
        let requested = self.pending_quantity(id) + 1;
        if requested > available {
            tracing::warn!(product_id = %id, requested, available, "reservation rejected");
            return Err(DomainError::InsufficientStock {
                id: id.clone(),
                requested,
                available,
            });
        }

        self.pending.insert(id.clone(), requested);
        tracing::debug!(product_id = %id, pending = requested, "unit reserved");
        Ok(requested)
    }

    /// Deduct every pending unit from the warehouse and settle the session.
    ///
    /// All pending quantities are checked against current stock before the
    /// first unit is taken; if any falls short nothing is deducted and the
    /// session stays open. Returns the taken units.
    ///
    /// If the warehouse still fails a take after that check, the units already
    /// taken stay deducted and the session is settled anyway, so a retry can
    /// never deduct them twice.
    pub fn commit(&mut self) -> DomainResult<Vec<Product>> {
        self.ensure_open()?;

        for (id, &requested) in &self.pending {
            let available = self.warehouse.quantity_of(id)?;
            if requested > available {
                tracing::warn!(product_id = %id, requested, available, "commit rejected");
                return Err(DomainError::InsufficientStock {
                    id: id.clone(),
                    requested,
                    available,
                });
            }
        }

        let mut taken = Vec::with_capacity(self.pending.values().sum::<u64>() as usize);
        for (id, &quantity) in &self.pending {
            for _ in 0..quantity {
                match self.warehouse.take_unit(id) {
                    Ok(unit) => taken.push(unit),
                    Err(err) => {
                        self.status = OrderStatus::Committed;
                        tracing::error!(
                            product_id = %id,
                            units_taken = taken.len(),
                            error = %err,
                            "commit failed mid-deduction; session settled without rollback"
                        );
                        return Err(err);
                    }
                }
            }
        }

        self.status = OrderStatus::Committed;
        tracing::info!(
            products = self.pending.len(),
            units = taken.len(),
            "order committed"
        );
        Ok(taken)
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.is_committed() {
            return Err(DomainError::SessionAlreadyCommitted);
        }
        Ok(())
    }
}
