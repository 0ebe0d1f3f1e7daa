//! Fundamental Trader
//!
//! Mean-reversion trader against a latent fundamental value. Each poll draws
//! a fundamental from `N(expectation, std)`, compares it with the midpoint
//! and fires a market order with probability
//!
//! ```text
//! µ = k1·|d| + k2·|d|³ / num_fundamental_traders,   d = fundamental − midpoint
//! ```
//!
//! in the direction of `d` (positive buys). More competing fundamental
//! traders scale the cubic term down.

use desim_core::{AgentId, Side, Timestamp};
use desim_protocol::{Message, MessageKind, RetrieveL1Response};
use log::info;
use serde::{Deserialize, Serialize};

use crate::agent::{
    Agent, AgentContext, DEFAULT_ORDER_VOLUME, EXCHANGE_DELAY, POLL_INTERVAL, price_to_f64,
    read_payload,
};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};

/// Ticks between polls once a price is available
pub const FUNDAMENTAL_POLL_INTERVAL: Timestamp = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalConfig {
    pub exchange: AgentId,
    pub fundamental_value_expectation: f64,
    pub fundamental_value_std: f64,
    /// Linear aggressiveness coefficient
    pub k1: f64,
    /// Cubic aggressiveness coefficient
    pub k2: f64,
    pub num_fundamental_traders: u64,
}

impl Default for FundamentalConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            fundamental_value_expectation: 0.0,
            fundamental_value_std: 0.0,
            k1: 0.0,
            k2: 0.0,
            num_fundamental_traders: 1,
        }
    }
}

impl FundamentalConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            fundamental_value_expectation: params.f64_or("fundamental_value_expectation", 0.0)?,
            fundamental_value_std: params.f64_or("fundamental_value_std", 0.0)?,
            k1: params.f64_or("k1", 0.0)?,
            k2: params.f64_or("k2", 0.0)?,
            num_fundamental_traders: params.required_nonzero_u64("num_fundamental_traders")?,
        })
    }
}

pub struct FundamentalAgent {
    id: AgentId,
    config: FundamentalConfig,
    last_fundamental: Option<f64>,
}

impl FundamentalAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, FundamentalConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: FundamentalConfig) -> Self {
        Self {
            id: id.into(),
            config,
            last_fundamental: None,
        }
    }

    pub fn config(&self) -> &FundamentalConfig {
        &self.config
    }

    /// Fundamental value drawn on the most recent priced poll
    pub fn last_fundamental(&self) -> Option<f64> {
        self.last_fundamental
    }

    /// Probability of trading for a given fundamental deviation
    pub fn aggressiveness(&self, deviation: f64) -> f64 {
        let d = deviation.abs();
        let crowd = self.config.num_fundamental_traders.max(1) as f64;
        self.config.k1 * d + (self.config.k2 * d.powi(3)) / crowd
    }

    fn on_quote(&mut self, quote: &RetrieveL1Response, ctx: &mut AgentContext<'_>) {
        let exchange = &self.config.exchange;

        let Some(mid) = quote.midpoint() else {
            ctx.retrieve_l1(exchange, POLL_INTERVAL);
            return;
        };

        let fundamental = ctx.normal(
            self.config.fundamental_value_expectation,
            self.config.fundamental_value_std,
        );
        self.last_fundamental = Some(fundamental);

        let deviation = fundamental - price_to_f64(mid);
        let mu = self.aggressiveness(deviation);

        if mu > ctx.uniform() {
            let side = if deviation > 0.0 { Side::Buy } else { Side::Sell };
            ctx.place_market(exchange, EXCHANGE_DELAY, side, DEFAULT_ORDER_VOLUME);
        }

        ctx.retrieve_l1(exchange, FUNDAMENTAL_POLL_INTERVAL);
    }
}

impl Agent for FundamentalAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "FundamentalAgent"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = FundamentalConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => ctx.wake_self(0, MessageKind::WakeupForFundamental),
            MessageKind::WakeupForFundamental => {
                ctx.retrieve_l1(&self.config.exchange, EXCHANGE_DELAY)
            }
            MessageKind::ResponseRetrieveL1 => {
                let quote = *read_payload(&self.id, msg.quote())?;
                self.on_quote(&quote, ctx);
            }
            _ => {}
        }
        Ok(())
    }
}
