mod agent;
mod order;
mod side;
mod trade;

pub use agent::AgentId;
pub use order::OrderId;
pub use side::Side;
pub use trade::Trade;
