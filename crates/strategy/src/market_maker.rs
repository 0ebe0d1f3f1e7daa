//! Two-Sided Market Maker with Inventory Circuit Breaker
//!
//! Quotes both sides around the midpoint at `mid ∓ spread / 2`. When the
//! absolute position exceeds `max_risk` the agent switches to
//! [`RiskState::RiskExceeded`]: every outstanding order is cancelled and the
//! whole position is flattened at market. Once back within the limit, a
//! cooldown of `restart_interval` quote ticks must elapse before quoting
//! resumes.
//!
//! ```text
//!            |position| > max_risk
//!   Normal ───────────────────────► RiskExceeded (cooldown = restart_interval)
//!     ▲                                  │
//!     └──────────────────────────────────┘
//!            |position| <= max_risk
//! ```

use std::collections::{HashMap, HashSet};

use desim_core::{AgentId, OrderId, Price, Quantity, Side, Trade};
use desim_protocol::{Message, MessageKind, PlaceOrderLimit, RetrieveL1Response};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agent::{
    Agent, AgentContext, DEFAULT_ORDER_VOLUME, EXCHANGE_DELAY, POLL_INTERVAL, read_payload,
};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};
use crate::tracker::OrderTracker;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMakerConfig {
    pub exchange: AgentId,
    /// Probability of quoting both sides on a tick
    pub limit_order_probability: f64,
    /// Per-order cancellation probability
    pub cancel_probability: f64,
    /// Quote ticks to wait after a risk breach
    pub restart_interval: u64,
    pub spread: Price,
    /// Maximum tolerated absolute position
    pub max_risk: u64,
    /// Parsed for completeness; quoting does not scale with it
    pub num_market_makers: u64,
}

impl Default for MarketMakerConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            limit_order_probability: 0.0,
            cancel_probability: 0.0,
            restart_interval: 0,
            spread: Decimal::ZERO,
            max_risk: 0,
            num_market_makers: 0,
        }
    }
}

impl MarketMakerConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            limit_order_probability: params.probability_or("limit_order_probability", 0.0)?,
            cancel_probability: params.probability_or("cancel_probability", 0.0)?,
            restart_interval: params.u64_or("restart_interval", 0)?,
            spread: params.decimal_or("spread", Decimal::ZERO)?,
            max_risk: params.u64_or("max_risk", 0)?,
            num_market_makers: params.u64_or("num_market_makers", 0)?,
        })
    }
}

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskState {
    #[default]
    Normal,
    RiskExceeded,
}

pub struct MarketMakerAgent {
    id: AgentId,
    config: MarketMakerConfig,
    orders: OrderTracker,
    /// Every id the exchange ever acknowledged to us, kept after fills and
    /// cancels so later partial fills are still attributed to the resting side
    acknowledged: HashSet<OrderId>,
    /// Position credited as aggressor against a resting id we did not know yet
    provisional: HashMap<OrderId, i64>,
    /// Signed net traded volume (positive = long)
    position: i64,
    risk_state: RiskState,
    cooldown: u64,
}

impl MarketMakerAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, MarketMakerConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: MarketMakerConfig) -> Self {
        Self {
            id: id.into(),
            config,
            orders: OrderTracker::new(),
            acknowledged: HashSet::new(),
            provisional: HashMap::new(),
            position: 0,
            risk_state: RiskState::Normal,
            cooldown: 0,
        }
    }

    pub fn config(&self) -> &MarketMakerConfig {
        &self.config
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn risk_state(&self) -> RiskState {
        self.risk_state
    }

    /// Remaining quote ticks before quoting may resume
    pub fn cooldown(&self) -> u64 {
        self.cooldown
    }

    pub fn outstanding_orders(&self) -> &[OrderId] {
        self.orders.ids()
    }

    /// Side this agent took in a trade
    ///
    /// If the resting order is one of ours we were the passive side;
    /// otherwise the trade is attributed to our (untracked) market order.
    fn our_side(&self, trade: &Trade) -> Side {
        if self.acknowledged.contains(&trade.resting_order_id) {
            trade.direction.opposite()
        } else {
            trade.direction
        }
    }

    fn on_trade(&mut self, trade: &Trade) {
        let side = self.our_side(trade);
        let volume = i64::try_from(trade.volume).unwrap_or(i64::MAX);
        let delta = side.sign().saturating_mul(volume);
        if side == trade.direction {
            let credited = self.provisional.entry(trade.resting_order_id).or_insert(0);
            *credited = credited.saturating_add(delta);
        }
        self.position = self.position.saturating_add(delta);
        self.orders.retire_traded(trade);
        debug!(
            "[{}] {} {} @ {}, position={}",
            self.id, side, trade.volume, trade.price, self.position
        );
    }

    /// Record an acknowledged limit order
    ///
    /// A fill seen before the ack was credited as aggressor; it is flipped
    /// to the resting side here.
    fn on_limit_ack(&mut self, id: OrderId) {
        self.orders.track(id);
        self.acknowledged.insert(id);
        if let Some(credited) = self.provisional.remove(&id) {
            self.position = self.position.saturating_sub(credited.saturating_mul(2));
            debug!(
                "[{}] late ack {} re-attributes fills, position={}",
                self.id, id, self.position
            );
        }
    }

    fn update_risk_state(&mut self) {
        let exposure = self.position.unsigned_abs();

        if exposure > self.config.max_risk {
            if self.risk_state == RiskState::Normal {
                info!(
                    "[{}] risk limit breached: position={}, max_risk={}",
                    self.id, self.position, self.config.max_risk
                );
            }
            self.risk_state = RiskState::RiskExceeded;
            self.cooldown = self.config.restart_interval;
        }

        if self.risk_state == RiskState::RiskExceeded && exposure <= self.config.max_risk {
            info!("[{}] back within risk limit", self.id);
            self.risk_state = RiskState::Normal;
        }
    }

    /// Cancel everything and close the whole position at market
    fn flatten(&self, ctx: &mut AgentContext<'_>) {
        let exchange = &self.config.exchange;
        ctx.cancel(exchange, EXCHANGE_DELAY, self.orders.cancel_all());

        let volume: Quantity = self.position.unsigned_abs();
        if self.position > 0 {
            ctx.place_market(exchange, EXCHANGE_DELAY, Side::Sell, volume);
        } else if self.position < 0 {
            ctx.place_market(exchange, EXCHANGE_DELAY, Side::Buy, volume);
        }
    }

    fn quote(&self, mid: Price, ctx: &mut AgentContext<'_>) {
        let exchange = &self.config.exchange;

        let cancel = self
            .orders
            .sample_cancellations(self.config.cancel_probability, ctx);
        ctx.cancel(exchange, EXCHANGE_DELAY, cancel);

        if ctx.uniform() < self.config.limit_order_probability {
            let half_spread = self.config.spread / Decimal::from(2);
            ctx.place_limit(
                exchange,
                EXCHANGE_DELAY,
                PlaceOrderLimit::buy(DEFAULT_ORDER_VOLUME, mid - half_spread),
            );
            ctx.place_limit(
                exchange,
                EXCHANGE_DELAY,
                PlaceOrderLimit::sell(DEFAULT_ORDER_VOLUME, mid + half_spread),
            );
        }
    }

    fn on_quote(&mut self, quote: &RetrieveL1Response, ctx: &mut AgentContext<'_>) {
        self.update_risk_state();

        match self.risk_state {
            RiskState::RiskExceeded => self.flatten(ctx),
            RiskState::Normal if self.cooldown == 0 => {
                if let Some(mid) = quote.midpoint() {
                    self.quote(mid, ctx);
                }
            }
            RiskState::Normal => {}
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        ctx.retrieve_l1(&self.config.exchange, POLL_INTERVAL);
    }
}

impl Agent for MarketMakerAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "MarketMakerAgent"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = MarketMakerConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => ctx.wake_self(0, MessageKind::WakeupForMarketMaker),
            MessageKind::WakeupForMarketMaker => {
                ctx.retrieve_l1(&self.config.exchange, EXCHANGE_DELAY)
            }
            MessageKind::ResponseRetrieveL1 => {
                let quote = *read_payload(&self.id, msg.quote())?;
                self.on_quote(&quote, ctx);
            }
            MessageKind::ResponsePlaceOrderLimit => {
                let ack = read_payload(&self.id, msg.limit_ack())?;
                self.on_limit_ack(ack.id);
            }
            MessageKind::ResponseCancelOrders => {
                let ack = read_payload(&self.id, msg.cancel_ack())?;
                self.orders.retire_cancelled(ack);
            }
            MessageKind::ResponseTrade => {
                let event = read_payload(&self.id, msg.trade())?;
                self.on_trade(&event.trade);
            }
            _ => {}
        }
        Ok(())
    }
}
