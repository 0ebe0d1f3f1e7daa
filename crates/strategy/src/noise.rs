//! Noise Trader
//!
//! Signal-free liquidity trader. Shares the momentum trader's poll and
//! cancel loop, but trades with constant probability `sigma /
//! num_noise_traders` and picks each order's direction by a coin flip. The
//! market and limit decisions are drawn independently, so both may fire on
//! the same quote.

use desim_core::{AgentId, OrderId, Side};
use desim_protocol::{Message, MessageKind, PlaceOrderLimit, RetrieveL1Response};
use log::info;
use serde::{Deserialize, Serialize};

use crate::agent::{
    Agent, AgentContext, DEFAULT_LIMIT_OFFSET, DEFAULT_ORDER_VOLUME, EXCHANGE_DELAY,
    POLL_INTERVAL, read_payload,
};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};
use crate::tracker::OrderTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub exchange: AgentId,
    pub cancel_probability: f64,
    pub market_to_limit_ratio: f64,
    pub num_noise_traders: u64,
    pub sigma: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            cancel_probability: 0.0,
            market_to_limit_ratio: 0.0,
            num_noise_traders: 1,
            sigma: 0.0,
        }
    }
}

impl NoiseConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            cancel_probability: params.probability_or("cancel_probability", 0.0)?,
            market_to_limit_ratio: params.f64_or("market_to_limit_ratio", 0.0)?,
            num_noise_traders: params.required_nonzero_u64("num_noise_traders")?,
            sigma: params.f64_or("sigma", 0.0)?,
        })
    }

    pub fn market_probability(&self) -> f64 {
        self.sigma / self.num_noise_traders.max(1) as f64
    }

    pub fn limit_probability(&self) -> f64 {
        self.market_probability() * self.market_to_limit_ratio
    }
}

pub struct NoiseAgent {
    id: AgentId,
    config: NoiseConfig,
    orders: OrderTracker,
}

impl NoiseAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, NoiseConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: NoiseConfig) -> Self {
        Self {
            id: id.into(),
            config,
            orders: OrderTracker::new(),
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    pub fn outstanding_orders(&self) -> &[OrderId] {
        self.orders.ids()
    }

    fn on_quote(&mut self, quote: &RetrieveL1Response, ctx: &mut AgentContext<'_>) {
        let exchange = &self.config.exchange;

        let Some(mid) = quote.midpoint() else {
            ctx.retrieve_l1(exchange, POLL_INTERVAL);
            return;
        };

        let cancel = self
            .orders
            .sample_cancellations(self.config.cancel_probability, ctx);
        ctx.cancel(exchange, EXCHANGE_DELAY, cancel);

        if self.config.market_probability() > ctx.uniform() {
            let side = if ctx.coin_flip() { Side::Buy } else { Side::Sell };
            ctx.place_market(exchange, EXCHANGE_DELAY, side, DEFAULT_ORDER_VOLUME);
        }

        if self.config.limit_probability() > ctx.uniform() {
            let order = if ctx.coin_flip() {
                PlaceOrderLimit::buy(DEFAULT_ORDER_VOLUME, mid - DEFAULT_LIMIT_OFFSET)
            } else {
                PlaceOrderLimit::sell(DEFAULT_ORDER_VOLUME, mid + DEFAULT_LIMIT_OFFSET)
            };
            ctx.place_limit(exchange, EXCHANGE_DELAY, order);
        }

        ctx.retrieve_l1(exchange, POLL_INTERVAL);
    }
}

impl Agent for NoiseAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "NoiseAgent"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = NoiseConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => ctx.wake_self(0, MessageKind::WakeupForNoise),
            MessageKind::WakeupForNoise => ctx.retrieve_l1(&self.config.exchange, EXCHANGE_DELAY),
            MessageKind::ResponseRetrieveL1 => {
                let quote = *read_payload(&self.id, msg.quote())?;
                self.on_quote(&quote, ctx);
            }
            MessageKind::ResponsePlaceOrderLimit => {
                let ack = read_payload(&self.id, msg.limit_ack())?;
                self.orders.track(ack.id);
            }
            MessageKind::ResponseCancelOrders => {
                let ack = read_payload(&self.id, msg.cancel_ack())?;
                self.orders.retire_cancelled(ack);
            }
            MessageKind::ResponseTrade => {
                let event = read_payload(&self.id, msg.trade())?;
                self.orders.retire_traded(&event.trade);
            }
            _ => {}
        }
        Ok(())
    }
}
