use core::fmt::{Debug, Display};

use chrono::NaiveDate;
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct BillingConfig {
    /// Flat fee billed to every resident each calendar month.
    pub monthly_amount: f64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            monthly_amount: 2000.0,
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default)]
    pub billing: BillingConfig,
    /// Date the meal-skip dashboard reports on. Defaults to "today" when unset.
    #[serde(default)]
    pub reporting_date: Option<NaiveDate>,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] figment::Error),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file("hostel.toml"))
        .merge(Env::prefixed("HOSTEL_"))
        .extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_defaults_to_flat_monthly_amount() {
        let config: Config = Figment::new()
            .merge(figment::providers::Serialized::defaults(
                serde_json::json!({ "database_url": "postgres://localhost/hostel" }),
            ))
            .extract()
            .unwrap();
        assert!((config.billing.monthly_amount - 2000.0).abs() < f64::EPSILON);
        assert!(config.reporting_date.is_none());
    }

    #[test]
    fn reporting_date_and_amount_override_the_defaults() {
        let config: Config = Figment::new()
            .merge(figment::providers::Serialized::defaults(serde_json::json!({
                "database_url": "postgres://localhost/hostel",
                "billing": { "monthly_amount": 2500.0 },
                "reporting_date": "2025-10-15",
            })))
            .extract()
            .unwrap();
        assert_eq!(
            config.reporting_date,
            Some(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
        );
    }
}
