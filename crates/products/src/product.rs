use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use retail_core::{DomainError, DomainResult, Entity, ProductId};

/// Energy price used when no tariff is configured.
pub const DEFAULT_ENERGY_RATE: f64 = 0.21;

/// Price per unit of energy consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TariffRecord")]
pub struct EnergyTariff {
    rate: f64,
}

impl EnergyTariff {
    pub fn new(rate: f64) -> DomainResult<Self> {
        ensure_non_negative("energy rate", rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// Unvalidated wire shape of [`EnergyTariff`].
#[derive(Deserialize)]
struct TariffRecord {
    rate: f64,
}

impl TryFrom<TariffRecord> for EnergyTariff {
    type Error = DomainError;

    fn try_from(record: TariffRecord) -> Result<Self, Self::Error> {
        Self::new(record.rate)
    }
}

impl Default for EnergyTariff {
    fn default() -> Self {
        Self {
            rate: DEFAULT_ENERGY_RATE,
        }
    }
}

/// A sellable product record.
///
/// Fields are private; the only way to change a stored product is
/// [`Catalog::update`](crate::Catalog::update) with a [`ProductPatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    model: String,
    release_date: NaiveDate,
    price: f64,
    consumption: f64,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        model: impl Into<String>,
        release_date: NaiveDate,
        price: f64,
        consumption: f64,
    ) -> DomainResult<Self> {
        let name = name.into();
        ensure_id(&id)?;
        ensure_name(&name)?;
        ensure_non_negative("price", price)?;
        ensure_non_negative("consumption", consumption)?;

        Ok(Self {
            id,
            name,
            model: model.into(),
            release_date,
            price,
            consumption,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn consumption(&self) -> f64 {
        self.consumption
    }

    /// Price of one unit (no currency or tax handling).
    pub fn cost(&self) -> f64 {
        self.price
    }

    pub fn energy_cost(&self, tariff: &EnergyTariff) -> f64 {
        tariff.rate() * self.consumption
    }

    /// Calendar years between the release year and `today`'s year.
    pub fn age_in_years(&self, today: NaiveDate) -> i32 {
        today.year() - self.release_date.year()
    }

    /// Validate the whole patch, then overwrite only the supplied fields.
    pub(crate) fn apply_patch(&mut self, patch: &ProductPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            ensure_name(name)?;
        }
        if let Some(price) = patch.price {
            ensure_non_negative("price", price)?;
        }
        if let Some(consumption) = patch.consumption {
            ensure_non_negative("consumption", consumption)?;
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(model) = &patch.model {
            self.model = model.clone();
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = release_date;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(consumption) = patch.consumption {
            self.consumption = consumption;
        }
        Ok(())
    }
}

/// Unvalidated wire shape of [`Product`]; deserialization goes through `Product::new`.
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    model: String,
    release_date: NaiveDate,
    price: f64,
    consumption: f64,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.id,
            record.name,
            record.model,
            record.release_date,
            record.price,
            record.consumption,
        )
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {} (released {}) price {} consumption {}",
            self.id, self.name, self.model, self.release_date, self.price, self.consumption
        )
    }
}

/// Partial update: `None` leaves the stored field untouched.
///
/// The identifier is not patchable; it is the catalog key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub consumption: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Input for listing a new product in a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Generated when absent.
    pub id: Option<ProductId>,
    pub name: String,
    pub model: String,
    /// Defaults to the listing date when absent.
    pub release_date: Option<NaiveDate>,
    pub price: f64,
    pub consumption: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, model: impl Into<String>, price: f64, consumption: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            model: model.into(),
            release_date: None,
            price,
            consumption,
        }
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn released_on(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn into_product(self, today: NaiveDate) -> DomainResult<Product> {
        Product::new(
            self.id.unwrap_or_else(ProductId::generate),
            self.name,
            self.model,
            self.release_date.unwrap_or(today),
            self.price,
            self.consumption,
        )
    }
}

fn ensure_id(id: &ProductId) -> DomainResult<()> {
    if id.as_str().trim().is_empty() {
        return Err(DomainError::validation("product id cannot be empty"));
    }
    Ok(())
}

fn ensure_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
