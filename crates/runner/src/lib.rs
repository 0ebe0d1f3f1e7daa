//! Desim Runner - Deterministic Discrete-Event Driver
//!
//! Delivers messages between agents in time order and lends the single
//! shared random stream to one handler at a time:
//!
//! - **Scheduler**: event queue ordered by `(deliver_at, send sequence)`
//! - **SimRng**: seeded generator behind the `RandomSource` port
//! - **Scenario**: JSON description of the exchange, agents and seed
//! - **Factory**: strategy name to configured agent
//! - **StaticQuoteExchange**: scripted exchange stand-in
//!
//! ## Architecture
//!
//! ```text
//!   scenario.json ──► Scenario::build ──► Scheduler
//!                                            │
//!            ┌───────────────────────────────┤ pop (t, seq)
//!            ▼                               │
//!   Agent::on_message(msg, ctx{now, rng}) ───┘
//!            │
//!            └── outbox ──► push (t + delay, next seq)
//! ```
//!
//! The simulation is single-threaded; a fixed seed and a fixed scenario
//! reproduce a run exactly.

pub mod error;
pub mod factory;
pub mod quote_exchange;
pub mod rng;
pub mod scenario;
pub mod scheduler;

pub use error::{Result, SimulationError};
pub use factory::{STRATEGIES, build_agent};
pub use quote_exchange::{StaticQuoteConfig, StaticQuoteExchange};
pub use rng::SimRng;
pub use scenario::{
    AgentSpec, ExchangeSpec, Scenario, load_scenario, load_scenario_from_str, resolve_params,
};
pub use scheduler::{DRIVER, Scheduler};
