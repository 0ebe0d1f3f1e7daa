//! Message envelope

use desim_core::{AgentId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::kind::MessageKind;
use crate::messages::{
    CancelOrders, CancelOrdersResponse, EventTrade, PlaceOrderLimit, PlaceOrderLimitResponse,
    PlaceOrderMarket, RetrieveL1Response,
};
use crate::payload::Payload;

/// Timestamped message between two participants
///
/// Delivered by the driver at `deliver_at`, which is never earlier than
/// `sent_at`. Handlers only ever see a shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: AgentId,
    pub recipient: AgentId,
    pub sent_at: Timestamp,
    pub deliver_at: Timestamp,
    pub kind: MessageKind,
    pub payload: Payload,
}

/// Generates a typed payload accessor that fails on a shape mismatch
macro_rules! payload_accessor {
    ($(#[$doc:meta])* $fn_name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $fn_name(&self) -> Result<&$ty> {
            match &self.payload {
                Payload::$variant(body) => Ok(body),
                other => Err(self.mismatch(stringify!($variant), other)),
            }
        }
    };
}

impl Message {
    /// Create a message sent at `sent_at` for delivery `delay` ticks later
    pub fn new(
        sender: impl Into<AgentId>,
        recipient: impl Into<AgentId>,
        sent_at: Timestamp,
        delay: Timestamp,
        kind: MessageKind,
        payload: impl Into<Payload>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            sent_at,
            deliver_at: sent_at.saturating_add(delay),
            kind,
            payload: payload.into(),
        }
    }

    /// Create a message with an empty payload
    pub fn empty(
        sender: impl Into<AgentId>,
        recipient: impl Into<AgentId>,
        sent_at: Timestamp,
        delay: Timestamp,
        kind: MessageKind,
    ) -> Self {
        Self::new(sender, recipient, sent_at, delay, kind, Payload::Empty)
    }

    /// Ticks between send and delivery
    pub fn delay(&self) -> Timestamp {
        self.deliver_at - self.sent_at
    }

    fn mismatch(&self, expected: &'static str, found: &Payload) -> ProtocolError {
        ProtocolError::PayloadMismatch {
            kind: self.kind,
            expected,
            found: found.name(),
        }
    }

    payload_accessor!(
        /// Body of a `PLACE_ORDER_LIMIT` request
        limit_order, PlaceOrderLimit, PlaceOrderLimit
    );
    payload_accessor!(
        /// Body of a `PLACE_ORDER_MARKET` request
        market_order, PlaceOrderMarket, PlaceOrderMarket
    );
    payload_accessor!(
        /// Body of a `CANCEL_ORDERS` request
        cancel_orders, CancelOrders, CancelOrders
    );
    payload_accessor!(
        /// Body of a `RESPONSE_PLACE_ORDER_LIMIT`
        limit_ack, PlaceOrderLimitResponse, PlaceOrderLimitResponse
    );
    payload_accessor!(
        /// Body of a `RESPONSE_CANCEL_ORDERS`
        cancel_ack, CancelOrdersResponse, CancelOrdersResponse
    );
    payload_accessor!(
        /// Body of a `RESPONSE_RETRIEVE_L1`
        quote, RetrieveL1Response, RetrieveL1Response
    );
    payload_accessor!(
        /// Body of a `RESPONSE_TRADE`
        trade, EventTrade, EventTrade
    );
}
