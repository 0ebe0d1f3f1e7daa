//! Message kind tags

use serde::{Deserialize, Serialize};

/// Enumerated message kind
///
/// Replaces string-keyed dispatch: handlers match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Delivered by the driver to every agent at simulation start
    SimulationStart,

    // Self-addressed wake-ups, one per strategy
    WakeupForPopulator,
    WakeupForFundamental,
    WakeupForMomentum,
    WakeupForNoise,
    WakeupForMarketMaker,
    WakeupForDownwardShock,

    // Agent -> exchange
    RetrieveL1,
    PlaceOrderLimit,
    PlaceOrderMarket,
    CancelOrders,

    // Exchange -> agent
    ResponseRetrieveL1,
    ResponsePlaceOrderLimit,
    ResponseCancelOrders,
    ResponseTrade,
}

impl MessageKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimulationStart => "EVENT_SIMULATION_START",
            Self::WakeupForPopulator => "WAKEUP_FOR_POPULATOR",
            Self::WakeupForFundamental => "WAKEUP_FOR_FUNDAMENTAL",
            Self::WakeupForMomentum => "WAKEUP_FOR_MOMENTUM",
            Self::WakeupForNoise => "WAKEUP_FOR_NOISE",
            Self::WakeupForMarketMaker => "WAKEUP_FOR_MARKET_MAKER",
            Self::WakeupForDownwardShock => "WAKEUP_FOR_DOWNWARD_SHOCK",
            Self::RetrieveL1 => "RETRIEVE_L1",
            Self::PlaceOrderLimit => "PLACE_ORDER_LIMIT",
            Self::PlaceOrderMarket => "PLACE_ORDER_MARKET",
            Self::CancelOrders => "CANCEL_ORDERS",
            Self::ResponseRetrieveL1 => "RESPONSE_RETRIEVE_L1",
            Self::ResponsePlaceOrderLimit => "RESPONSE_PLACE_ORDER_LIMIT",
            Self::ResponseCancelOrders => "RESPONSE_CANCEL_ORDERS",
            Self::ResponseTrade => "RESPONSE_TRADE",
        }
    }

    /// Whether this is a self-scheduled wake-up
    pub fn is_wakeup(&self) -> bool {
        matches!(
            self,
            Self::WakeupForPopulator
                | Self::WakeupForFundamental
                | Self::WakeupForMomentum
                | Self::WakeupForNoise
                | Self::WakeupForMarketMaker
                | Self::WakeupForDownwardShock
        )
    }

    /// Name of the payload variant this kind carries
    pub fn expected_payload(&self) -> &'static str {
        match self {
            Self::PlaceOrderLimit => "PlaceOrderLimit",
            Self::PlaceOrderMarket => "PlaceOrderMarket",
            Self::CancelOrders => "CancelOrders",
            Self::ResponseRetrieveL1 => "RetrieveL1Response",
            Self::ResponsePlaceOrderLimit => "PlaceOrderLimitResponse",
            Self::ResponseCancelOrders => "CancelOrdersResponse",
            Self::ResponseTrade => "EventTrade",
            _ => "Empty",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(MessageKind::SimulationStart.as_str(), "EVENT_SIMULATION_START");
        assert_eq!(MessageKind::ResponseTrade.to_string(), "RESPONSE_TRADE");
    }

    #[test]
    fn test_wakeups() {
        assert!(MessageKind::WakeupForNoise.is_wakeup());
        assert!(!MessageKind::RetrieveL1.is_wakeup());
        assert_eq!(MessageKind::WakeupForNoise.expected_payload(), "Empty");
    }
}
