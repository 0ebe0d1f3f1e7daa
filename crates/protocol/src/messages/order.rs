//! Order message types

use desim_core::{OrderId, Price, Quantity, Side};
use serde::{Deserialize, Serialize};

/// Limit order submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderLimit {
    pub direction: Side,
    pub quantity: Quantity,
    pub price: Price,
}

impl PlaceOrderLimit {
    pub fn new(direction: Side, quantity: Quantity, price: Price) -> Self {
        Self {
            direction,
            quantity,
            price,
        }
    }

    pub fn buy(quantity: Quantity, price: Price) -> Self {
        Self::new(Side::Buy, quantity, price)
    }

    pub fn sell(quantity: Quantity, price: Price) -> Self {
        Self::new(Side::Sell, quantity, price)
    }
}

/// Market order submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderMarket {
    pub direction: Side,
    pub quantity: Quantity,
}

impl PlaceOrderMarket {
    pub fn new(direction: Side, quantity: Quantity) -> Self {
        Self {
            direction,
            quantity,
        }
    }
}

/// Acknowledgement of an accepted limit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderLimitResponse {
    /// Exchange-assigned order ID
    pub id: OrderId,
}

/// One cancellation request (or, in a response, one cancellation honoured)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub id: OrderId,
    /// Upper bound on the volume to cancel
    pub max_quantity: Quantity,
}

impl Cancellation {
    pub fn new(id: OrderId, max_quantity: Quantity) -> Self {
        Self { id, max_quantity }
    }

    /// Cancel whatever volume remains on the order
    pub fn all(id: OrderId) -> Self {
        Self::new(id, Quantity::MAX)
    }
}

/// Batched cancellation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrders {
    pub cancellations: Vec<Cancellation>,
}

impl CancelOrders {
    /// Cancel the full remaining volume of every listed order
    pub fn all<'a>(ids: impl IntoIterator<Item = &'a OrderId>) -> Self {
        Self {
            cancellations: ids.into_iter().copied().map(Cancellation::all).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cancellations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cancellations.len()
    }
}

/// Cancellations the exchange acted on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrdersResponse {
    pub cancellations: Vec<Cancellation>,
}

impl CancelOrdersResponse {
    pub fn ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.cancellations.iter().map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_cancel_all_requests_full_volume() {
        let ids = [Uuid::from_u128(1), Uuid::from_u128(2)];
        let cancel = CancelOrders::all(&ids);

        assert_eq!(cancel.len(), 2);
        assert!(
            cancel
                .cancellations
                .iter()
                .all(|c| c.max_quantity == Quantity::MAX)
        );
        assert_eq!(cancel.cancellations[1].id, ids[1]);
    }
}
