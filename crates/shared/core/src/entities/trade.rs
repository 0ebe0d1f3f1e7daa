use serde::{Deserialize, Serialize};

use super::{OrderId, Side};
use crate::values::{Price, Quantity};

/// Trade resulting from one matching event
///
/// Produced by the exchange's matching engine. `direction` is the side of the
/// aggressing order; the resting order traded on the opposite side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub aggressing_order_id: OrderId,
    pub resting_order_id: OrderId,
    pub direction: Side,
    pub volume: Quantity,
    pub price: Price,
}

impl Trade {
    pub fn new(
        aggressing_order_id: OrderId,
        resting_order_id: OrderId,
        direction: Side,
        volume: Quantity,
        price: Price,
    ) -> Self {
        Self {
            aggressing_order_id,
            resting_order_id,
            direction,
            volume,
            price,
        }
    }

    /// Side traded by the owner of `order_id`, if that order took part
    pub fn side_of(&self, order_id: OrderId) -> Option<Side> {
        if order_id == self.aggressing_order_id {
            Some(self.direction)
        } else if order_id == self.resting_order_id {
            Some(self.direction.opposite())
        } else {
            None
        }
    }

    /// Returns the notional value of the trade (price * volume)
    pub fn notional(&self) -> Price {
        self.price * Price::from(self.volume)
    }
}
