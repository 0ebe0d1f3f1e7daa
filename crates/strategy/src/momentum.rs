//! Momentum Trader
//!
//! Trend follower driven by an exponentially weighted signal over midpoint
//! changes:
//!
//! ```text
//! signal ← signal·(1 − α) + α·(mid − previous_mid)
//! ```
//!
//! The market-order probability `β·tanh(demand_saturation·signal) / n`
//! saturates through `tanh` and is shared across all momentum traders. It is
//! negative, and never fires, when the signal and `demand_saturation` have
//! opposite signs. A limit order is considered only when the market order did
//! not fire.

use desim_core::{AgentId, OrderId, Price, Side};
use desim_protocol::{Message, MessageKind, PlaceOrderLimit, RetrieveL1Response};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agent::{
    Agent, AgentContext, DEFAULT_LIMIT_OFFSET, DEFAULT_ORDER_VOLUME, EXCHANGE_DELAY,
    POLL_INTERVAL, price_to_f64, read_payload,
};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};
use crate::tracker::OrderTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    pub exchange: AgentId,
    pub cancel_probability: f64,
    pub market_to_limit_ratio: f64,
    pub num_momentum_traders: u64,
    /// EWMA smoothing factor
    pub alpha: f64,
    /// Maximum market-order probability (before crowding)
    pub beta: f64,
    pub demand_saturation: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            cancel_probability: 0.0,
            market_to_limit_ratio: 0.0,
            num_momentum_traders: 1,
            alpha: 0.0,
            beta: 0.0,
            demand_saturation: 0.0,
        }
    }
}

impl MomentumConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            cancel_probability: params.probability_or("cancel_probability", 0.0)?,
            market_to_limit_ratio: params.f64_or("market_to_limit_ratio", 0.0)?,
            num_momentum_traders: params.required_nonzero_u64("num_momentum_traders")?,
            alpha: params.f64_or("alpha", 0.0)?,
            beta: params.f64_or("beta", 0.0)?,
            demand_saturation: params.f64_or("demand_saturation", 0.0)?,
        })
    }
}

pub struct MomentumAgent {
    id: AgentId,
    config: MomentumConfig,
    orders: OrderTracker,
    signal: f64,
    previous_midpoint: Price,
}

impl MomentumAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, MomentumConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: MomentumConfig) -> Self {
        Self {
            id: id.into(),
            config,
            orders: OrderTracker::new(),
            signal: 0.0,
            previous_midpoint: Decimal::ZERO,
        }
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    pub fn signal(&self) -> f64 {
        self.signal
    }

    pub fn previous_midpoint(&self) -> Price {
        self.previous_midpoint
    }

    pub fn outstanding_orders(&self) -> &[OrderId] {
        self.orders.ids()
    }

    /// Fold a new midpoint into the signal
    pub fn update_signal(&mut self, mid: Price) {
        let change = price_to_f64(mid - self.previous_midpoint);
        let alpha = self.config.alpha;
        self.signal = self.signal * (1.0 - alpha) + alpha * change;
        self.previous_midpoint = mid;
    }

    /// Market-order probability for a signal value
    pub fn market_probability(&self, signal: f64) -> f64 {
        let crowd = self.config.num_momentum_traders.max(1) as f64;
        self.config.beta * (self.config.demand_saturation * signal).tanh() / crowd
    }

    pub fn limit_probability(&self, signal: f64) -> f64 {
        self.market_probability(signal) * self.config.market_to_limit_ratio
    }

    fn on_quote(&mut self, quote: &RetrieveL1Response, ctx: &mut AgentContext<'_>) {
        let exchange = self.config.exchange.clone();

        let Some(mid) = quote.midpoint() else {
            ctx.retrieve_l1(&exchange, POLL_INTERVAL);
            return;
        };

        let cancel = self
            .orders
            .sample_cancellations(self.config.cancel_probability, ctx);
        ctx.cancel(&exchange, EXCHANGE_DELAY, cancel);

        self.update_signal(mid);
        let side = if self.signal > 0.0 { Side::Buy } else { Side::Sell };

        if self.market_probability(self.signal) > ctx.uniform() {
            ctx.place_market(&exchange, EXCHANGE_DELAY, side, DEFAULT_ORDER_VOLUME);
        } else if self.limit_probability(self.signal) > ctx.uniform() {
            let price = match side {
                Side::Buy => mid - DEFAULT_LIMIT_OFFSET,
                Side::Sell => mid + DEFAULT_LIMIT_OFFSET,
            };
            ctx.place_limit(
                &exchange,
                EXCHANGE_DELAY,
                PlaceOrderLimit::new(side, DEFAULT_ORDER_VOLUME, price),
            );
        }

        ctx.retrieve_l1(&exchange, POLL_INTERVAL);
    }
}

impl Agent for MomentumAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "MomentumAgent"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = MomentumConfig::from_params(params)?;
        info!(
            "[{}] configured: {:?}, signal={}, previous_midpoint={}",
            self.id, self.config, self.signal, self.previous_midpoint
        );
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => ctx.wake_self(0, MessageKind::WakeupForMomentum),
            MessageKind::WakeupForMomentum => ctx.retrieve_l1(&self.config.exchange, EXCHANGE_DELAY),
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
