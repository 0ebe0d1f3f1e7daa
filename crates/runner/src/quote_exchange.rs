//! Scripted Exchange Stand-In
//!
//! Answers the agents' requests without a matching engine:
//! - `RETRIEVE_L1` returns a fixed quote (an empty book before `open_at`)
//! - limit orders are acknowledged with sequential ids and rest forever
//! - cancellations are honoured for ids that are resting
//! - market orders fill in full at the far touch against a synthetic
//!   counterparty
//!
//! Enough to exercise every agent's control loop end to end.

use std::collections::HashMap;

use desim_core::{AgentId, OrderId, Price, Side, Timestamp, Trade};
use desim_protocol::{
    CancelOrdersResponse, EventTrade, Message, MessageKind, PlaceOrderLimit,
    PlaceOrderLimitResponse, RetrieveL1Response,
};
use desim_strategy::{Agent, AgentContext, ConfigError, Params, Result};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticQuoteConfig {
    pub best_bid: Price,
    pub best_ask: Price,
    /// First tick at which a quote is published
    pub open_at: Timestamp,
}

impl Default for StaticQuoteConfig {
    fn default() -> Self {
        Self {
            best_bid: Decimal::from(99),
            best_ask: Decimal::from(101),
            open_at: 0,
        }
    }
}

impl StaticQuoteConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            best_bid: params.decimal_or("best_bid", defaults.best_bid)?,
            best_ask: params.decimal_or("best_ask", defaults.best_ask)?,
            open_at: params.u64_or("open_at", defaults.open_at)?,
        })
    }
}

/// A resting limit order and its owner
#[derive(Debug, Clone)]
struct Resting {
    owner: AgentId,
    order: PlaceOrderLimit,
}

pub struct StaticQuoteExchange {
    id: AgentId,
    config: StaticQuoteConfig,
    resting: HashMap<OrderId, Resting>,
    next_id: u128,
    fills: u64,
    filled_notional: Price,
}

impl StaticQuoteExchange {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, StaticQuoteConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: StaticQuoteConfig) -> Self {
        Self {
            id: id.into(),
            config,
            resting: HashMap::new(),
            next_id: 1,
            fills: 0,
            filled_notional: Decimal::ZERO,
        }
    }

    /// Number of resting limit orders
    pub fn resting(&self) -> usize {
        self.resting.len()
    }

    /// Number of market orders filled
    pub fn fills(&self) -> u64 {
        self.fills
    }

    /// Total price * volume of all market fills
    pub fn filled_notional(&self) -> Price {
        self.filled_notional
    }

    /// Resting orders owned by `owner`
    pub fn resting_for(&self, owner: &AgentId) -> Vec<&PlaceOrderLimit> {
        self.resting
            .values()
            .filter(|r| &r.owner == owner)
            .map(|r| &r.order)
            .collect()
    }

    fn next_order_id(&mut self) -> OrderId {
        let id = Uuid::from_u128(self.next_id);
        self.next_id += 1;
        id
    }

    fn quote(&self, now: Timestamp) -> RetrieveL1Response {
        if now < self.config.open_at {
            RetrieveL1Response::empty()
        } else {
            RetrieveL1Response::new(self.config.best_bid, self.config.best_ask)
        }
    }
}

impl Agent for StaticQuoteExchange {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "StaticQuoteExchange"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = StaticQuoteConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        let from = &msg.sender;
        match msg.kind {
            MessageKind::RetrieveL1 => {
                let quote = self.quote(ctx.now());
                ctx.send(from, 0, MessageKind::ResponseRetrieveL1, quote);
            }
            MessageKind::PlaceOrderLimit => {
                let order = msg.limit_order()?.clone();
                let id = self.next_order_id();
                self.resting.insert(
                    id,
                    Resting {
                        owner: from.clone(),
                        order,
                    },
                );
                ctx.send(
                    from,
                    0,
                    MessageKind::ResponsePlaceOrderLimit,
                    PlaceOrderLimitResponse { id },
                );
            }
            MessageKind::CancelOrders => {
                let request = msg.cancel_orders()?;
                let cancellations = request
                    .cancellations
                    .iter()
                    .filter(|c| {
                        self.resting
                            .get(&c.id)
                            .is_some_and(|r| &r.owner == from)
                    })
                    .copied()
                    .collect::<Vec<_>>();
                for c in &cancellations {
                    self.resting.remove(&c.id);
                }
                ctx.send(
                    from,
                    0,
                    MessageKind::ResponseCancelOrders,
                    CancelOrdersResponse { cancellations },
                );
            }
            MessageKind::PlaceOrderMarket => {
                let order = msg.market_order()?;
                let price = match order.direction {
                    Side::Buy => self.config.best_ask,
                    Side::Sell => self.config.best_bid,
                };
                let trade = Trade::new(
                    self.next_order_id(),
                    Uuid::nil(),
                    order.direction,
                    order.quantity,
                    price,
                );
                self.fills += 1;
                self.filled_notional += trade.notional();
                debug!(
                    "[{}] filled {} {} {} @ {} (notional {})",
                    self.id,
                    from,
                    order.direction,
                    order.quantity,
                    price,
                    trade.notional()
                );
                ctx.send(from, 0, MessageKind::ResponseTrade, EventTrade::new(trade));
            }
            _ => {}
        }
        Ok(())
    }
}
