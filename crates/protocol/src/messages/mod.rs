//! Typed payload bodies
//!
//! Order entry messages live in [`order`]; quote and trade notifications in
//! [`market_data`].

pub mod market_data;
pub mod order;

pub use market_data::{EventTrade, RetrieveL1Response};
pub use order::{
    CancelOrders, CancelOrdersResponse, Cancellation, PlaceOrderLimit, PlaceOrderLimitResponse,
    PlaceOrderMarket,
};
