//! Desim Strategy Agents
//!
//! The agent contract and the built-in trading agents of the simulator:
//! - [`Agent`] trait and the per-delivery [`AgentContext`] outbox
//! - [`Params`] reader for resolved configuration values
//! - [`OrderTracker`] bookkeeping of outstanding order ids
//! - Six strategies: book populator, fundamental, momentum, noise, market
//!   maker and downward shock
//!
//! ## Control loop
//!
//! ```text
//!   EVENT_SIMULATION_START
//!            │
//!            ▼
//!     WAKEUP_FOR_* ──► RETRIEVE_L1 ──► Exchange
//!                                        │
//!                                        ▼ RESPONSE_RETRIEVE_L1
//!                               decide (shared RNG)
//!                                        │
//!              orders / cancels ◄────────┴────► RETRIEVE_L1 (re-poll)
//! ```
//!
//! Agents never block: waiting for a price means returning and re-arming a
//! future message.
//!
//! ## Usage
//!
//! ```ignore
//! use desim_strategy::{Agent, NoiseAgent, Params};
//!
//! let mut agent = NoiseAgent::new("NOISE_1");
//! agent.configure(&Params::new()
//!     .with("exchange", "EXCHANGE")
//!     .with("num_noise_traders", 10)
//!     .with("sigma", 0.3))?;
//! ```

pub mod agent;
pub mod downward_shock;
pub mod error;
pub mod fundamental;
pub mod market_maker;
pub mod momentum;
pub mod noise;
pub mod params;
pub mod populator;
pub mod tracker;

pub use agent::{
    Agent, AgentContext, DEFAULT_LIMIT_OFFSET, DEFAULT_ORDER_VOLUME, EXCHANGE_DELAY,
    POLL_INTERVAL,
};
pub use downward_shock::{DownwardShockAgent, DownwardShockConfig};
pub use error::{AgentError, ConfigError, Result};
pub use fundamental::{FUNDAMENTAL_POLL_INTERVAL, FundamentalAgent, FundamentalConfig};
pub use market_maker::{MarketMakerAgent, MarketMakerConfig, RiskState};
pub use momentum::{MomentumAgent, MomentumConfig};
pub use noise::{NoiseAgent, NoiseConfig};
pub use params::Params;
pub use populator::{ExchangePopulator, PopulatorConfig};
pub use tracker::OrderTracker;
