//! Agent construction by strategy name

use desim_core::AgentId;
use desim_strategy::{
    Agent, DownwardShockAgent, ExchangePopulator, FundamentalAgent, MarketMakerAgent,
    MomentumAgent, NoiseAgent, Params,
};

use crate::error::{Result, SimulationError};
use crate::quote_exchange::StaticQuoteExchange;

/// Strategy names accepted by [`build_agent`]
pub const STRATEGIES: [&str; 7] = [
    "ExchangePopulator",
    "FundamentalAgent",
    "MomentumAgent",
    "NoiseAgent",
    "MarketMakerAgent",
    "DownwardShockAgent",
    "StaticQuoteExchange",
];

/// Create and configure an agent
pub fn build_agent(strategy: &str, name: &str, params: &Params) -> Result<Box<dyn Agent>> {
    let mut agent: Box<dyn Agent> = match strategy {
        "ExchangePopulator" => Box::new(ExchangePopulator::new(name)),
        "FundamentalAgent" => Box::new(FundamentalAgent::new(name)),
        "MomentumAgent" => Box::new(MomentumAgent::new(name)),
        "NoiseAgent" => Box::new(NoiseAgent::new(name)),
        "MarketMakerAgent" => Box::new(MarketMakerAgent::new(name)),
        "DownwardShockAgent" => Box::new(DownwardShockAgent::new(name)),
        "StaticQuoteExchange" => Box::new(StaticQuoteExchange::new(name)),
        other => return Err(SimulationError::UnknownStrategy(other.to_string())),
    };

    agent
        .configure(params)
        .map_err(|source| SimulationError::Configure {
            agent: AgentId::new(name),
            source,
        })?;
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        Params::new()
            .with("exchange", "EXCHANGE")
            .with("num_fundamental_traders", 1)
            .with("num_momentum_traders", 1)
            .with("num_noise_traders", 1)
    }

    #[test]
    fn test_every_strategy_builds() {
        for strategy in STRATEGIES {
            let agent = build_agent(strategy, "x", &params()).unwrap();
            assert_eq!(agent.agent_type(), strategy);
            assert_eq!(agent.id(), &AgentId::new("x"));
        }
    }

    #[test]
    fn test_unknown_strategy() {
        assert!(matches!(
            build_agent("ArbitrageAgent", "x", &params()),
            Err(SimulationError::UnknownStrategy(name)) if name == "ArbitrageAgent"
        ));
    }

    #[test]
    fn test_configure_error_names_agent() {
        let err = build_agent("NoiseAgent", "NOISE_7", &Params::new().with("exchange", "E"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("NOISE_7"));
        assert!(err.to_string().contains("num_noise_traders"));
    }
}
