//! Downward Shock Injector
//!
//! Wakes at `start_tick` and, on every wake-up, sells `volume_per_order` at
//! market with probability `spike_probability`. It re-arms one tick later
//! while that tick is still before `end_tick`, so the first wake-up always
//! happens even when `start_tick >= end_tick`.

use desim_core::{AgentId, Quantity, Side, Timestamp};
use desim_protocol::{Message, MessageKind};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentContext, EXCHANGE_DELAY};
use crate::error::{ConfigError, Result};
use crate::params::{DEFAULT_EXCHANGE, Params};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownwardShockConfig {
    pub exchange: AgentId,
    pub spike_probability: f64,
    pub volume_per_order: Quantity,
    pub start_tick: Timestamp,
    /// No wake-up is re-armed at or after this tick
    pub end_tick: Timestamp,
}

impl Default for DownwardShockConfig {
    fn default() -> Self {
        Self {
            exchange: AgentId::new(DEFAULT_EXCHANGE),
            spike_probability: 0.0,
            volume_per_order: 0,
            start_tick: 0,
            end_tick: 0,
        }
    }
}

impl DownwardShockConfig {
    pub fn from_params(params: &Params) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            exchange: params.exchange()?,
            spike_probability: params.probability_or("spike_probability", 0.0)?,
            volume_per_order: params.u64_or("volume_per_order", 0)?,
            start_tick: params.u64_or("start_tick", 0)?,
            end_tick: params.u64_or("end_tick", 0)?,
        })
    }
}

pub struct DownwardShockAgent {
    id: AgentId,
    config: DownwardShockConfig,
    shocks_sent: u64,
}

impl DownwardShockAgent {
    pub fn new(id: impl Into<AgentId>) -> Self {
        Self::with_config(id, DownwardShockConfig::default())
    }

    pub fn with_config(id: impl Into<AgentId>, config: DownwardShockConfig) -> Self {
        Self {
            id: id.into(),
            config,
            shocks_sent: 0,
        }
    }

    pub fn config(&self) -> &DownwardShockConfig {
        &self.config
    }

    /// Number of market sells emitted so far
    pub fn shocks_sent(&self) -> u64 {
        self.shocks_sent
    }

    fn on_wakeup(&mut self, ctx: &mut AgentContext<'_>) {
        let now = ctx.now();
        if ctx.uniform() < self.config.spike_probability {
            self.shocks_sent += 1;
            ctx.place_market(
                &self.config.exchange,
                EXCHANGE_DELAY,
                Side::Sell,
                self.config.volume_per_order,
            );
        }

        if now.saturating_add(1) < self.config.end_tick {
            ctx.wake_self(1, MessageKind::WakeupForDownwardShock);
        } else {
            debug!("[{}] shock window closed at t={}", self.id, now);
        }
    }
}

impl Agent for DownwardShockAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> &'static str {
        "DownwardShockAgent"
    }

    fn configure(&mut self, params: &Params) -> std::result::Result<(), ConfigError> {
        self.config = DownwardShockConfig::from_params(params)?;
        info!("[{}] configured: {:?}", self.id, self.config);
        Ok(())
    }

    fn on_message(&mut self, msg: &Message, ctx: &mut AgentContext<'_>) -> Result<()> {
        match msg.kind {
            MessageKind::SimulationStart => {
                ctx.wake_self_at(self.config.start_tick, MessageKind::WakeupForDownwardShock)
            }
            MessageKind::WakeupForDownwardShock => self.on_wakeup(ctx),
            _ => {}
        }
        Ok(())
    }
}
