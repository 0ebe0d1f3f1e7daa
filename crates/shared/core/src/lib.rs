//! Desim Core Domain
//!
//! Pure domain types shared by the protocol, the agents and the driver.
//! This crate contains no I/O and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{AgentId, OrderId, Side, Trade};
pub use values::{Price, Quantity, Timestamp};
