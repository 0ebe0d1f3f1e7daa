//! Exchange Populator
//!
//! Seeds an empty book once, at simulation start, with a symmetric ladder of
//! limit orders around an initial price. Level `i` (counting from zero) rests
//! at `initial_price ∓ (i + 1) * level_spacing`, buy before sell.

use desim_core::{AgentId, Price, Quantity};
use desim_protocol::{Message, MessageKind, PlaceOrderLimit};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentContext};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};

/// Configuration for the book populator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatorConfig {
    pub exchange: AgentId,
    pub initial_price: Price,
    pub quantity_per_level: Quantity,
    /// Number of levels placed on each side
    pub num_levels_both_sides: u64,
    pub level_spacing: Price,
}

impl Default for PopulatorConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            initial_price: Decimal::ZERO,
            quantity_per_level: 0,
            num_levels_both_sides: 0,
            level_spacing: Decimal::ZERO,
        }
    }
}

impl PopulatorConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            initial_price: params.decimal_or("initial_price", Decimal::ZERO)?,
            quantity_per_level: params.u64_or("quantity_per_level", 0)?,
            num_levels_both_sides: params.u64_or("num_levels_both_sides", 0)?,
            level_spacing: params.decimal_or("level_spacing", Decimal::ZERO)?,
        })
    }

    /// Orders of the ladder, in emission order
    pub fn ladder(&self) -> Vec<PlaceOrderLimit> {
        (0..self.num_levels_both_sides)
            .flat_map(|i| {
                let offset = Decimal::from(i + 1) * self.level_spacing;
                [
                    PlaceOrderLimit::buy(self.quantity_per_level, self.initial_price - offset),
                    PlaceOrderLimit::sell(self.quantity_per_level, self.initial_price + offset),
                ]
            })
            .collect()
    }
}

/// One-shot book seeder
pub struct ExchangePopulator {
    id: AgentId,
    config: PopulatorConfig,
    seeded: bool,
}

impl ExchangePopulator {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, PopulatorConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: PopulatorConfig) -> Self {
        Self {
            id: id.into(),
            config,
            seeded: false,
        }
    }

    pub fn config(&self) -> &PopulatorConfig {
        &self.config
    }

    /// Whether the ladder has already been sent
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    fn seed(&mut self, ctx: &mut AgentContext<'_>) {
        if self.seeded {
            return;
        }
        for order in self.config.ladder() {
            ctx.place_limit(&self.config.exchange, 0, order);
        }
        self.seeded = true;
    }
}

impl Agent for ExchangePopulator {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "ExchangePopulator"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = PopulatorConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => ctx.wake_self(0, MessageKind::WakeupForPopulator),
            MessageKind::WakeupForPopulator => self.seed(ctx),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desim_core::Side;
    use desim_ports::ScriptedRandom;
    use rust_decimal_macros::dec;

    fn config() -> PopulatorConfig {
        PopulatorConfig {
            initial_price: dec!(100),
            quantity_per_level: 10,
            num_levels_both_sides: 2,
            level_spacing: dec!(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_ladder_interleaves_buy_then_sell() {
        let ladder = config().ladder();
        let prices: Vec<_> = ladder.iter().map(|o| (o.direction, o.price)).collect();
        assert_eq!(
            prices,
            vec![
                (Side::Buy, dec!(99.5)),
                (Side::Sell, dec!(100.5)),
                (Side::Buy, dec!(99)),
                (Side::Sell, dec!(101)),
            ]
        );
    }

    #[test]
    fn test_seeds_only_once() {
        let mut agent = ExchangePopulator::with_config("pop", config());
        let mut rng = ScriptedRandom::default();
        let wake = Message::empty("pop", "pop", 0, 0, MessageKind::WakeupForPopulator);

        let mut ctx = AgentContext::new(0, AgentId::new("pop"), &mut rng);
        agent.on_message(&wake, &mut ctx).unwrap();
        agent.on_message(&wake, &mut ctx).unwrap();

        assert_eq!(ctx.outbox().len(), 4);
        assert!(ctx.outbox().iter().all(|m| m.deliver_at == 0));
        assert!(agent.is_seeded());
    }

    #[test]
    fn test_configure_from_params() {
        let params = Params::new()
            .with("exchange_1", "EXCHANGE")
            .with("initial_price", "100")
            .with("quantity_per_level", "10")
            .with("num_levels_both_sides", "3")
            .with("level_spacing", "1");

        let mut agent = ExchangePopulator::new("pop");
        agent.configure(&params).unwrap();
        assert_eq!(agent.config().ladder().len(), 6);
    }

    #[test]
    fn test_configure_rejects_malformed_level_count() {
        let params = Params::new()
            .with("exchange", "EXCHANGE")
            .with("num_levels_both_sides", "three");

        let mut agent = ExchangePopulator::new("pop");
        assert!(agent.configure(&params).is_err());
        assert_eq!(agent.config(), &PopulatorConfig::default());
    }
}
