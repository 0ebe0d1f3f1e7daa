//! Closed set of payload bodies

use serde::{Deserialize, Serialize};

use crate::messages::{
    CancelOrders, CancelOrdersResponse, EventTrade, PlaceOrderLimit, PlaceOrderLimitResponse,
    PlaceOrderMarket, RetrieveL1Response,
};

/// Message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Payload {
    Empty,
    PlaceOrderLimit(PlaceOrderLimit),
    PlaceOrderMarket(PlaceOrderMarket),
    PlaceOrderLimitResponse(PlaceOrderLimitResponse),
    CancelOrders(CancelOrders),
    CancelOrdersResponse(CancelOrdersResponse),
    RetrieveL1Response(RetrieveL1Response),
    EventTrade(EventTrade),
}

impl Payload {
    /// Variant name, used in mismatch reports
    pub fn name(&self) -> &'static str {
        match self {
            Payload::Empty => "Empty",
            Payload::PlaceOrderLimit(_) => "PlaceOrderLimit",
            Payload::PlaceOrderMarket(_) => "PlaceOrderMarket",
            Payload::PlaceOrderLimitResponse(_) => "PlaceOrderLimitResponse",
            Payload::CancelOrders(_) => "CancelOrders",
            Payload::CancelOrdersResponse(_) => "CancelOrdersResponse",
            Payload::RetrieveL1Response(_) => "RetrieveL1Response",
            Payload::EventTrade(_) => "EventTrade",
        }
    }
}

impl From<PlaceOrderLimit> for Payload {
    fn from(p: PlaceOrderLimit) -> Self {
        Payload::PlaceOrderLimit(p)
    }
}

impl From<PlaceOrderMarket> for Payload {
    fn from(p: PlaceOrderMarket) -> Self {
        Payload::PlaceOrderMarket(p)
    }
}

impl From<PlaceOrderLimitResponse> for Payload {
    fn from(p: PlaceOrderLimitResponse) -> Self {
        Payload::PlaceOrderLimitResponse(p)
    }
}

impl From<CancelOrders> for Payload {
    fn from(p: CancelOrders) -> Self {
        Payload::CancelOrders(p)
    }
}

impl From<CancelOrdersResponse> for Payload {
    fn from(p: CancelOrdersResponse) -> Self {
        Payload::CancelOrdersResponse(p)
    }
}

impl From<RetrieveL1Response> for Payload {
    fn from(p: RetrieveL1Response) -> Self {
        Payload::RetrieveL1Response(p)
    }
}

impl From<EventTrade> for Payload {
    fn from(p: EventTrade) -> Self {
        Payload::EventTrade(p)
    }
}
