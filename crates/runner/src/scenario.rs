//! Scenario files
//!
//! A scenario names the exchange stand-in, the agents and the seed of the
//! shared random stream:
//!
//! ```json
//! {
//!   "seed": 42,
//!   "duration": 1000,
//!   "exchange": { "name": "EXCHANGE", "params": { "best_bid": 99, "best_ask": 101 } },
//!   "agents": [
//!     { "name": "NOISE", "strategy": "NoiseAgent", "count": 10,
//!       "params": { "num_noise_traders": 10, "sigma": 0.3 } }
//!   ]
//! }
//! ```
//!
//! Parameter values may be strings, numbers or booleans; they are handed to
//! the agents as resolved strings. Agents without an `exchange` parameter
//! talk to the scenario's exchange.

use std::collections::BTreeMap;
use std::path::Path;

use desim_core::Timestamp;
use desim_strategy::Params;
use desim_strategy::params::{EXCHANGE_KEY, LEGACY_EXCHANGE_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SimulationError};
use crate::factory::build_agent;
use crate::scheduler::Scheduler;

const DEFAULT_DURATION: Timestamp = 1_000;

fn default_duration() -> Timestamp {
    DEFAULT_DURATION
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    /// Last tick to simulate
    #[serde(default = "default_duration")]
    pub duration: Timestamp,
    pub exchange: ExchangeSpec,
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSpec {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub strategy: String,
    /// Number of identical copies; copies are named `{name}_{i}`
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl AgentSpec {
    /// Names of the agents this entry expands to
    pub fn instance_names(&self) -> Vec<String> {
        if self.count == 1 {
            vec![self.name.clone()]
        } else {
            (1..=self.count).map(|i| format!("{}_{i}", self.name)).collect()
        }
    }
}

/// Flatten JSON scalars to resolved strings
pub fn resolve_params(raw: &BTreeMap<String, Value>) -> Result<Params> {
    raw.iter()
        .map(|(key, value)| {
            let resolved = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(SimulationError::InvalidParam {
                        key: key.clone(),
                        value: other.to_string(),
                    });
                }
            };
            Ok((key.clone(), resolved))
        })
        .collect()
}

/// Load a scenario from a JSON file
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario> {
    let content = std::fs::read_to_string(path)?;
    load_scenario_from_str(&content)
}

/// Load a scenario from a JSON string
pub fn load_scenario_from_str(json: &str) -> Result<Scenario> {
    let scenario: Scenario = serde_json::from_str(json)?;
    Ok(scenario)
}

impl Scenario {
    /// Build a scheduler with the exchange and every agent registered
    pub fn build(&self) -> Result<Scheduler> {
        let mut scheduler = Scheduler::new(self.seed);

        let exchange_params = resolve_params(&self.exchange.params)?;
        scheduler.register(build_agent(
            "StaticQuoteExchange",
            &self.exchange.name,
            &exchange_params,
        )?)?;

        for spec in &self.agents {
            let mut params = resolve_params(&spec.params)?;
            if !params.contains(EXCHANGE_KEY) && !params.contains(LEGACY_EXCHANGE_KEY) {
                params.insert(EXCHANGE_KEY, &self.exchange.name);
            }
            for name in spec.instance_names() {
                scheduler.register(build_agent(&spec.strategy, &name, &params)?)?;
            }
        }
        Ok(scheduler)
    }

    /// Total number of agents, excluding the exchange
    pub fn agent_count(&self) -> usize {
        self.agents.iter().map(|a| a.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "seed": 7,
        "exchange": { "name": "EXCHANGE" },
        "agents": [
            { "name": "POP", "strategy": "ExchangePopulator",
              "params": { "initial_price": "100", "quantity_per_level": 10,
                          "num_levels_both_sides": 3, "level_spacing": 1 } },
            { "name": "NOISE", "strategy": "NoiseAgent", "count": 3,
              "params": { "num_noise_traders": 3, "sigma": 0.3 } }
        ]
    }"#;

    #[test]
    fn test_load_from_str() {
        let scenario = load_scenario_from_str(SCENARIO).unwrap();
        assert_eq!(scenario.seed, 7);
        assert_eq!(scenario.duration, DEFAULT_DURATION);
        assert_eq!(scenario.agent_count(), 4);
        assert_eq!(
            scenario.agents[1].instance_names(),
            vec!["NOISE_1", "NOISE_2", "NOISE_3"]
        );
    }

    #[test]
    fn test_numbers_resolve_to_strings() {
        let scenario = load_scenario_from_str(SCENARIO).unwrap();
        let params = resolve_params(&scenario.agents[1].params).unwrap();
        assert_eq!(params.get("sigma"), Some("0.3"));
        assert_eq!(params.get("num_noise_traders"), Some("3"));
    }

    #[test]
    fn test_nested_values_rejected() {
        let mut raw = BTreeMap::new();
        raw.insert("levels".to_string(), serde_json::json!([1, 2]));
        assert!(matches!(
            resolve_params(&raw),
            Err(SimulationError::InvalidParam { key, .. }) if key == "levels"
        ));
    }

    #[test]
    fn test_build_registers_everyone() {
        let scheduler = load_scenario_from_str(SCENARIO).unwrap().build().unwrap();
        let names: Vec<_> = scheduler.agent_ids().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["EXCHANGE", "POP", "NOISE_1", "NOISE_2", "NOISE_3"]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            load_scenario_from_str("{ \"seed\": "),
            Err(SimulationError::Parse(_))
        ));
    }
}
