//! Deterministic Event Queue
//!
//! Messages are ordered by `(deliver_at, send sequence)`, so messages due at
//! the same tick are delivered in the order they were sent. Each delivery
//! runs exactly one handler with the shared random stream lent to it; the
//! handler's outbox is then enqueued in emission order.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use desim_core::{AgentId, Timestamp};
use desim_ports::RandomSource;
use desim_protocol::{Message, MessageKind};
use desim_strategy::{Agent, AgentContext};
use log::{debug, info, warn};
use priority_queue::PriorityQueue;

use crate::error::{Result, SimulationError};
use crate::rng::SimRng;

/// Sender name used for driver-originated messages
pub const DRIVER: &str = "SIMULATION";

/// Queue entry, identified by its send sequence
struct Queued {
    seq: u64,
    msg: Message,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Queued {}

impl Hash for Queued {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.seq.hash(state);
    }
}

type Priority = Reverse<(Timestamp, u64)>;

pub struct Scheduler {
    now: Timestamp,
    next_seq: u64,
    queue: PriorityQueue<Queued, Priority>,
    agents: Vec<Box<dyn Agent>>,
    index: HashMap<AgentId, usize>,
    rng: Box<dyn RandomSource>,
    delivered: u64,
    dropped: u64,
    history: Option<Vec<Message>>,
}

impl Scheduler {
    /// Scheduler with a seeded [`SimRng`]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Box::new(SimRng::new(seed)))
    }

    pub fn with_rng(rng: Box<dyn RandomSource>) -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: PriorityQueue::new(),
            agents: Vec::new(),
            index: HashMap::new(),
            rng,
            delivered: 0,
            dropped: 0,
            history: None,
        }
    }

    /// Keep a copy of every delivered message
    pub fn record_history(mut self) -> Self {
        self.history = Some(Vec::new());
        self
    }

    /// Add a participant; names must be unique
    pub fn register(&mut self, agent: Box<dyn Agent>) -> Result<()> {
        let id = agent.id().clone();
        if self.index.contains_key(&id) {
            return Err(SimulationError::DuplicateAgent(id));
        }
        debug!("Registered {} ({})", id, agent.agent_type());
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    /// Send `EVENT_SIMULATION_START` to every participant, in registration order
    pub fn start(&mut self) -> Result<()> {
        info!(
            "Starting simulation at t={} with {} participants",
            self.now,
            self.agents.len()
        );
        let recipients: Vec<AgentId> = self.agents.iter().map(|a| a.id().clone()).collect();
        for recipient in recipients {
            self.schedule(Message::empty(
                DRIVER,
                recipient,
                self.now,
                0,
                MessageKind::SimulationStart,
            ))?;
        }
        Ok(())
    }

    /// Enqueue a message; delivery before the current time is rejected
    pub fn schedule(&mut self, msg: Message) -> Result<()> {
        if msg.deliver_at < self.now {
            return Err(SimulationError::ScheduledInPast {
                now: self.now,
                deliver_at: msg.deliver_at,
            });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let priority = Reverse((msg.deliver_at, seq));
        self.queue.push(Queued { seq, msg }, priority);
        Ok(())
    }

    /// Deliver the next message; returns `false` once the queue is empty
    pub fn step(&mut self) -> Result<bool> {
        let Some((Queued { msg, .. }, _)) = self.queue.pop() else {
            return Ok(false);
        };
        self.now = msg.deliver_at;

        let Some(&idx) = self.index.get(&msg.recipient) else {
            warn!(
                "Dropping {} from {} to unknown recipient {}",
                msg.kind, msg.sender, msg.recipient
            );
            self.dropped += 1;
            return Ok(true);
        };

        let agent = &mut self.agents[idx];
        let mut ctx = AgentContext::new(self.now, agent.id().clone(), &mut *self.rng);
        agent
            .on_message(&msg, &mut ctx)
            .map_err(|source| SimulationError::Agent {
                agent: msg.recipient.clone(),
                at: self.now,
                source,
            })?;
        let outbox = ctx.into_outbox();

        self.delivered += 1;
        if let Some(history) = self.history.as_mut() {
            history.push(msg);
        }
        for out in outbox {
            self.schedule(out)?;
        }
        Ok(true)
    }

    /// Deliver every message due at or before `until`
    ///
    /// Returns the number of messages taken off the queue.
    pub fn run_until(&mut self, until: Timestamp) -> Result<u64> {
        let mut count = 0;
        while self.next_due().is_some_and(|t| t <= until) {
            self.step()?;
            count += 1;
        }
        Ok(count)
    }

    /// Delivery time of the next queued message
    pub fn next_due(&self) -> Option<Timestamp> {
        self.queue.peek().map(|(_, Reverse((t, _)))| *t)
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Messages waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Messages handed to a handler so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Messages discarded for lack of a recipient
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn history(&self) -> &[Message] {
        self.history.as_deref().unwrap_or_default()
    }

    pub fn agent(&self, id: &AgentId) -> Option<&dyn Agent> {
        self.index.get(id).map(|&idx| self.agents[idx].as_ref())
    }

    /// Registered participant names, in registration order
    pub fn agent_ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter().map(|a| a.id())
    }
}
