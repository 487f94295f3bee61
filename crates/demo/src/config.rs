//! Environment-driven configuration for the demo binary.

use retail_observability::LogFormat;
use retail_products::EnergyTariff;

pub const LOG_FORMAT_VAR: &str = "RETAIL_LOG_FORMAT";
pub const ENERGY_RATE_VAR: &str = "RETAIL_ENERGY_RATE";

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub log_format: LogFormat,
    pub tariff: EnergyTariff,
    /// Problems found while reading the environment. Logged once tracing is up.
    pub warnings: Vec<String>,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let log_format = match lookup(LOG_FORMAT_VAR) {
            None => LogFormat::default(),
            Some(raw) => raw.parse::<LogFormat>().unwrap_or_else(|err| {
                warnings.push(format!("{LOG_FORMAT_VAR}: {err}; using json"));
                LogFormat::default()
            }),
        };

        let tariff = match lookup(ENERGY_RATE_VAR) {
            None => EnergyTariff::default(),
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(rate) => EnergyTariff::new(rate).unwrap_or_else(|err| {
                    warnings.push(format!("{ENERGY_RATE_VAR}: {err}; using default"));
                    EnergyTariff::default()
                }),
                Err(err) => {
                    warnings.push(format!("{ENERGY_RATE_VAR}: {err}; using default"));
                    EnergyTariff::default()
                }
            },
        };

        Self {
            log_format,
            tariff,
            warnings,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
