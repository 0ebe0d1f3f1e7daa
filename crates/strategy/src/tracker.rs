//! Outstanding Order Bookkeeping
//!
//! Each order-placing agent keeps the ids it believes are live at the
//! exchange. Ids enter on a limit acknowledgement and leave on a cancel
//! acknowledgement or a trade, one occurrence per retirement, matched by
//! identity. Retiring an unknown id is a no-op.

use desim_core::{OrderId, Trade};
use desim_protocol::{CancelOrders, CancelOrdersResponse, Cancellation};

use crate::agent::AgentContext;

/// Insertion-ordered list of outstanding order ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTracker {
    ids: Vec<OrderId>,
}

impl OrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an acknowledged limit order
    pub fn track(&mut self, id: OrderId) {
        self.ids.push(id);
    }

    /// Remove the first occurrence of `id`; returns whether it was present
    pub fn retire(&mut self, id: OrderId) -> bool {
        match self.ids.iter().position(|tracked| *tracked == id) {
            Some(idx) => {
                self.ids.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Retire every order the exchange reports as cancelled
    pub fn retire_cancelled(&mut self, response: &CancelOrdersResponse) -> usize {
        response.ids().filter(|id| self.retire(*id)).count()
    }

    /// Retire both parties of a trade, if they are ours
    pub fn retire_traded(&mut self, trade: &Trade) -> usize {
        [trade.aggressing_order_id, trade.resting_order_id]
            .into_iter()
            .filter(|id| self.retire(*id))
            .count()
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[OrderId] {
        &self.ids
    }

    /// Cancel everything currently tracked
    pub fn cancel_all(&self) -> CancelOrders {
        CancelOrders::all(&self.ids)
    }

    /// Pick each order independently with probability `p`
    ///
    /// Consumes exactly one uniform draw per tracked order, in insertion
    /// order. The tracker itself is unchanged until the exchange confirms.
    pub fn sample_cancellations(&self, p: f64, ctx: &mut AgentContext<'_>) -> CancelOrders {
        let cancellations = self
            .ids
            .iter()
            .filter(|_| ctx.uniform() < p)
            .map(|id| Cancellation::all(*id))
            .collect();
        CancelOrders { cancellations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desim_core::{AgentId, Side};
    use desim_ports::ScriptedRandom;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn id(n: u128) -> OrderId {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_track_grows_by_one() {
        let mut tracker = OrderTracker::new();
        tracker.track(id(1));
        tracker.track(id(1));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_retire_unknown_is_noop() {
        let mut tracker = OrderTracker::new();
        tracker.track(id(1));

        assert!(!tracker.retire(id(9)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_retire_removes_single_occurrence() {
        let mut tracker = OrderTracker::new();
        tracker.track(id(1));
        tracker.track(id(2));
        tracker.track(id(1));

        assert!(tracker.retire(id(1)));
        assert_eq!(tracker.ids(), &[id(2), id(1)]);
    }

    #[test]
    fn test_retire_traded_both_sides() {
        let mut tracker = OrderTracker::new();
        tracker.track(id(1));
        tracker.track(id(2));
        tracker.track(id(3));

        let trade = Trade::new(id(1), id(3), Side::Sell, 10, dec!(100));
        assert_eq!(tracker.retire_traded(&trade), 2);
        assert_eq!(tracker.ids(), &[id(2)]);
    }

    #[test]
    fn test_retire_cancelled() {
        let mut tracker = OrderTracker::new();
        tracker.track(id(1));
        tracker.track(id(2));

        let response = CancelOrdersResponse {
            cancellations: vec![Cancellation::all(id(2)), Cancellation::all(id(7))],
        };
        assert_eq!(tracker.retire_cancelled(&response), 1);
        assert_eq!(tracker.ids(), &[id(1)]);
    }

    #[test]
    fn test_sampling_draws_once_per_order() {
        let mut tracker = OrderTracker::new();
        for n in 1..=3 {
            tracker.track(id(n));
        }

        let mut rng = ScriptedRandom::new([0.1, 0.9, 0.2]);
        let mut ctx = AgentContext::new(0, AgentId::new("noise"), &mut rng);
        let cancel = tracker.sample_cancellations(0.5, &mut ctx);
        drop(ctx);

        assert_eq!(rng.uniform_draws(), 3);
        let picked: Vec<_> = cancel.cancellations.iter().map(|c| c.id).collect();
        assert_eq!(picked, vec![id(1), id(3)]);
        assert_eq!(tracker.len(), 3);
    }
}
