//! Resolved agent parameters
//!
//! Parameters arrive as already-resolved `key -> string` pairs (templating
//! and file formats are handled upstream). Absent optional keys keep their
//! default; a value that is present but does not parse is always an error
//! naming the key.

use std::collections::BTreeMap;
use std::str::FromStr;

use desim_core::AgentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Exchange key, with the legacy spelling accepted as a fallback
pub const EXCHANGE_KEY: &str = "exchange";
pub const LEGACY_EXCHANGE_KEY: &str = "exchange_1";

/// Exchange name used by default-constructed configs
pub const DEFAULT_EXCHANGE: &str = "EXCHANGE";

/// Ordered set of resolved parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.trim())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse a key if present
    pub fn parse<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::malformed(key, raw, e)),
        }
    }

    /// Finite float, or `default` when absent
    pub fn f64_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        match self.parse::<f64>(key)? {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(v),
            Some(_) => Err(ConfigError::malformed(
                key,
                self.get(key).unwrap_or_default(),
                "value is not finite",
            )),
        }
    }

    /// Unsigned integer, or `default` when absent
    pub fn u64_or(&self, key: &str, default: u64) -> ConfigResult<u64> {
        Ok(self.parse::<u64>(key)?.unwrap_or(default))
    }

    /// Decimal (plain or scientific notation), or `default` when absent
    pub fn decimal_or(&self, key: &str, default: Decimal) -> ConfigResult<Decimal> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => Decimal::from_str(raw)
                .or_else(|_| Decimal::from_scientific(raw))
                .map_err(|e| ConfigError::malformed(key, raw, e)),
        }
    }

    /// Probability in `[0, 1]`, or `default` when absent
    pub fn probability_or(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let p = self.f64_or(key, default)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::invalid(key, format!("{p} is outside [0, 1]")));
        }
        Ok(p)
    }

    /// Unsigned integer that must be present and nonzero
    ///
    /// Used for divisors such as trader counts.
    pub fn required_nonzero_u64(&self, key: &str) -> ConfigResult<u64> {
        match self.parse::<u64>(key)? {
            None => Err(ConfigError::MissingRequired(key.to_string())),
            Some(0) => Err(ConfigError::invalid(key, "must be greater than zero")),
            Some(v) => Ok(v),
        }
    }

    /// Exchange the agent talks to
    pub fn exchange(&self) -> ConfigResult<AgentId> {
        self.get(EXCHANGE_KEY)
            .or_else(|| self.get(LEGACY_EXCHANGE_KEY))
            .filter(|name| !name.is_empty())
            .map(AgentId::new)
            .ok_or_else(|| ConfigError::MissingRequired(EXCHANGE_KEY.to_string()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_absent_keys_keep_defaults() {
        let params = Params::new();
        assert_eq!(params.f64_or("k1", 0.0).unwrap(), 0.0);
        assert_eq!(params.u64_or("max_risk", 0).unwrap(), 0);
        assert_eq!(params.decimal_or("spread", dec!(0)).unwrap(), dec!(0));
    }

    #[test]
    fn test_malformed_value_names_the_key() {
        let params = Params::new().with("sigma", "0.1.2");
        let err = params.f64_or("sigma", 0.0).unwrap_err();

        match err {
            ConfigError::Malformed { key, value, .. } => {
                assert_eq!(key, "sigma");
                assert_eq!(value, "0.1.2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let params = Params::new().with("alpha", "NaN");
        assert!(params.f64_or("alpha", 0.0).is_err());
    }

    #[test]
    fn test_integer_key_rejects_fraction() {
        let params = Params::new().with("quantity_per_level", "10.5");
        assert!(params.u64_or("quantity_per_level", 0).is_err());
    }

    #[test]
    fn test_decimal_accepts_scientific() {
        let params = Params::new().with("initial_price", "1e2").with("spread", " 0.25 ");
        assert_eq!(params.decimal_or("initial_price", dec!(0)).unwrap(), dec!(100));
        assert_eq!(params.decimal_or("spread", dec!(0)).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_required_divisor() {
        let missing = Params::new();
        assert_eq!(
            missing.required_nonzero_u64("num_noise_traders"),
            Err(ConfigError::MissingRequired("num_noise_traders".to_string()))
        );

        let zero = Params::new().with("num_noise_traders", 0);
        assert!(matches!(
            zero.required_nonzero_u64("num_noise_traders"),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_probability_bounds() {
        let params = Params::new().with("cancel_probability", "1.5");
        assert!(params.probability_or("cancel_probability", 0.0).is_err());
    }

    #[test]
    fn test_exchange_key_and_legacy_spelling() {
        let legacy = Params::new().with("exchange_1", "EXCHANGE");
        assert_eq!(legacy.exchange().unwrap(), AgentId::new("EXCHANGE"));

        let both = Params::new().with("exchange", "A").with("exchange_1", "B");
        assert_eq!(both.exchange().unwrap(), AgentId::new("A"));

        assert!(Params::new().exchange().is_err());
    }
}
