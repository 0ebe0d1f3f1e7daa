//! Agent Contract and Handler Context
//!
//! Every strategy implements [`Agent`]: it is configured once from resolved
//! parameters, then reacts to each delivered message through
//! [`Agent::on_message`]. A handler never blocks and never calls another
//! agent; its only effects are local state changes and the messages it
//! queues on the [`AgentContext`], which the driver delivers later at
//! `now + delay`.

use desim_core::{AgentId, Price, Quantity, Side, Timestamp};
use desim_ports::RandomSource;
use desim_protocol::{
    CancelOrders, Message, MessageKind, Payload, PlaceOrderLimit, PlaceOrderMarket,
};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::error::{ConfigError, Result};
use crate::params::Params;

/// Volume of every order whose size is not configured
pub const DEFAULT_ORDER_VOLUME: Quantity = 100;

/// Distance from the midpoint at which directional limit orders are placed
pub const DEFAULT_LIMIT_OFFSET: Decimal = dec!(0.5);

/// Delay of every exchange-bound request
pub const EXCHANGE_DELAY: Timestamp = 1;

/// Re-poll interval for quote-driven agents
pub const POLL_INTERVAL: Timestamp = 1;

/// Core trait for all simulation participants
pub trait Agent {
    /// Unique name of this agent
    fn id(&self) -> &AgentId;

    /// Strategy name (for logging/reporting)
    fn agent_type(&self) -> &'static str;

    /// Read strategy-specific options from resolved parameters
    ///
    /// Replaces the whole configuration on success and leaves it untouched
    /// on error.
    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError>;

    /// React to one delivered message
    ///
    /// Kinds the agent does not handle are ignored. A payload that does not
    /// match its kind is reported as an error.
    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()>;
}

/// Per-delivery handler context
///
/// Carries the current time, the shared random stream (lent for this one
/// invocation) and the outbox of messages emitted by the handler, in
/// emission order.
pub struct AgentContext<'a> {
    now: Timestamp,
    me: AgentId,
    rng: &'a mut dyn RandomSource,
    outbox: Vec<Message>,
}

impl<'a> AgentContext<'a> {
    pub fn new(now: Timestamp, me: AgentId, rng: &'a mut dyn RandomSource) -> Self {
        Self {
            now,
            me,
            rng,
            outbox: Vec::new(),
        }
    }

    /// Current simulation time
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// The agent this context was built for
    pub fn me(&self) -> &AgentId {
        &self.me
    }

    pub fn uniform(&mut self) -> f64 {
        self.rng.uniform()
    }

    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.rng.normal(mean, std_dev)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.coin_flip()
    }

    /// Messages emitted so far
    pub fn outbox(&self) -> &[Message] {
        &self.outbox
    }

    pub fn into_outbox(self) -> Vec<Message> {
        self.outbox
    }

    /// Queue a message for delivery `delay` ticks from now
    pub fn send(
        &mut self,
        recipient: &AgentId,
        delay: Timestamp,
        kind: MessageKind,
        payload: impl Into<Payload>,
    ) {
        self.outbox.push(Message::new(
            self.me.clone(),
            recipient.clone(),
            self.now,
            delay,
            kind,
            payload,
        ));
    }

    /// Re-arm this agent `delay` ticks from now
    pub fn wake_self(&mut self, delay: Timestamp, kind: MessageKind) {
        let me = self.me.clone();
        self.send(&me, delay, kind, Payload::Empty);
    }

    /// Re-arm this agent at an absolute tick (immediately if already past)
    pub fn wake_self_at(&mut self, at: Timestamp, kind: MessageKind) {
        self.wake_self(at.saturating_sub(self.now), kind);
    }

    /// Ask the exchange for its top of book
    pub fn retrieve_l1(&mut self, exchange: &AgentId, delay: Timestamp) {
        self.send(exchange, delay, MessageKind::RetrieveL1, Payload::Empty);
    }

    pub fn place_limit(&mut self, exchange: &AgentId, delay: Timestamp, order: PlaceOrderLimit) {
        debug!(
            "[{}] t={} limit {} {}@{}",
            self.me, self.now, order.direction, order.quantity, order.price
        );
        self.send(exchange, delay, MessageKind::PlaceOrderLimit, order);
    }

    pub fn place_market(
        &mut self,
        exchange: &AgentId,
        delay: Timestamp,
        direction: Side,
        quantity: Quantity,
    ) {
        debug!(
            "[{}] t={} market {} {}",
            self.me, self.now, direction, quantity
        );
        self.send(
            exchange,
            delay,
            MessageKind::PlaceOrderMarket,
            PlaceOrderMarket::new(direction, quantity),
        );
    }

    /// Send a batched cancellation; an empty batch is not sent
    pub fn cancel(&mut self, exchange: &AgentId, delay: Timestamp, cancel: CancelOrders) {
        if cancel.is_empty() {
            return;
        }
        debug!(
            "[{}] t={} cancelling {} orders",
            self.me,
            self.now,
            cancel.len()
        );
        self.send(exchange, delay, MessageKind::CancelOrders, cancel);
    }
}

/// Unwrap a typed payload, logging a shape mismatch before reporting it
pub(crate) fn read_payload<T>(me: &AgentId, body: desim_protocol::Result<T>) -> Result<T> {
    body.map_err(|err| {
        warn!("[{me}] {err}");
        err.into()
    })
}

/// Lossy conversion for the floating-point decision policies
pub(crate) fn price_to_f64(price: Price) -> f64 {
    price.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use desim_ports::ScriptedRandom;
    use rust_decimal_macros::dec;

    #[test]
    fn test_context_stamps_sender_and_time() {
        let mut rng = ScriptedRandom::default();
        let mut ctx = AgentContext::new(5, AgentId::new("noise"), &mut rng);
        let exchange = AgentId::new("exchange");

        ctx.retrieve_l1(&exchange, POLL_INTERVAL);
        ctx.wake_self(0, MessageKind::WakeupForNoise);

        let out = ctx.into_outbox();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].sender, AgentId::new("noise"));
        assert_eq!(out[0].recipient, exchange);
        assert_eq!(out[0].deliver_at, 6);
        assert_eq!(out[1].recipient, AgentId::new("noise"));
        assert_eq!(out[1].deliver_at, 5);
    }

    #[test]
    fn test_wake_at_absolute_tick() {
        let mut rng = ScriptedRandom::default();
        let mut ctx = AgentContext::new(2, AgentId::new("shock"), &mut rng);

        ctx.wake_self_at(9, MessageKind::WakeupForDownwardShock);
        ctx.wake_self_at(1, MessageKind::WakeupForDownwardShock);

        let out = ctx.outbox();
        assert_eq!(out[0].deliver_at, 9);
        assert_eq!(out[1].deliver_at, 2);
    }

    #[test]
    fn test_empty_cancel_not_sent() {
        let mut rng = ScriptedRandom::default();
        let mut ctx = AgentContext::new(0, AgentId::new("mm"), &mut rng);

        ctx.cancel(&AgentId::new("exchange"), 1, CancelOrders::default());
        assert!(ctx.outbox().is_empty());
    }

    #[test]
    fn test_price_to_f64() {
        assert_eq!(price_to_f64(dec!(100.5)), 100.5);
    }
}
