//! Desim Protocol
//!
//! The message envelope and typed payloads exchanged between agents and the
//! exchange. Every message carries an enumerated [`MessageKind`] and a
//! [`Payload`] from a closed set of variants; handlers read the payload
//! through typed accessors on [`Message`] that fail with
//! [`ProtocolError::PayloadMismatch`] instead of reinterpreting the body.
//!
//! ## Flow
//!
//! ```text
//! Agent ──RETRIEVE_L1──────────► Exchange ──RESPONSE_RETRIEVE_L1──► Agent
//! Agent ──PLACE_ORDER_LIMIT────► Exchange ──RESPONSE_PLACE_ORDER_LIMIT──► Agent
//! Agent ──CANCEL_ORDERS────────► Exchange ──RESPONSE_CANCEL_ORDERS──► Agent
//! Agent ──PLACE_ORDER_MARKET───► Exchange ──RESPONSE_TRADE (per match)──► Agent
//! Agent ──WAKEUP_FOR_*─────────► Agent (self-scheduled)
//! ```

pub mod error;
pub mod kind;
pub mod message;
pub mod messages;
pub mod payload;

// Re-export commonly used types
pub use error::{ProtocolError, Result};
pub use kind::MessageKind;
pub use message::Message;
pub use messages::{
    market_data::{EventTrade, RetrieveL1Response},
    order::{
        CancelOrders, CancelOrdersResponse, Cancellation, PlaceOrderLimit,
        PlaceOrderLimitResponse, PlaceOrderMarket,
    },
};
pub use payload::Payload;
