//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure the catalog, warehouse and order session can report. None of
/// them are retried or swallowed inside the domain; callers decide what to do.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A product with this identifier is already registered.
    #[error("product {0} is already on the list")]
    DuplicateProduct(ProductId),

    /// No product with this identifier is registered.
    #[error("product {0} is not on the list")]
    ProductNotFound(ProductId),

    /// A stock quantity was zero.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// A field value failed validation (e.g. negative price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The warehouse holds no units of the product.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// The shop an order was opened against does not sell the product.
    #[error("product {id} is not available in this shop")]
    UnavailableInShop {
        id: ProductId,
        #[source]
        source: Box<DomainError>,
    },

    /// The warehouse an order was opened against does not carry the product.
    #[error("product {id} is not available in this warehouse")]
    UnavailableInWarehouse {
        id: ProductId,
        #[source]
        source: Box<DomainError>,
    },

    /// Reserving (or settling) would take more units than the warehouse holds.
    #[error("order quantity {requested} of product {id} exceeds warehouse stock {available}")]
    InsufficientStock {
        id: ProductId,
        requested: u64,
        available: u64,
    },

    /// The order session was already settled.
    #[error("order session is already committed")]
    SessionAlreadyCommitted,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unavailable_in_shop(id: ProductId, source: DomainError) -> Self {
        Self::UnavailableInShop {
            id,
            source: Box::new(source),
        }
    }

    pub fn unavailable_in_warehouse(id: ProductId, source: DomainError) -> Self {
        Self::UnavailableInWarehouse {
            id,
            source: Box::new(source),
        }
    }

    /// True for `ProductNotFound`, including when wrapped by an order session.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ProductNotFound(_) => true,
            Self::UnavailableInShop { source, .. } | Self::UnavailableInWarehouse { source, .. } => {
                source.is_not_found()
            }
            _ => false,
        }
    }
}
