//! Multi-Agent Simulation Integration Test
//!
//! Runs scenarios end to end through the scheduler against the scripted
//! exchange and checks the delivered message history.

use desim_core::{AgentId, Side, Trade};
use desim_protocol::{EventTrade, Message, MessageKind, Payload};
use desim_runner::{Scheduler, SimulationError, load_scenario_from_str};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn build(json: &str) -> Scheduler {
    let _ = env_logger::try_init();
    load_scenario_from_str(json)
        .unwrap()
        .build()
        .unwrap()
        .record_history()
}

fn from<'a>(sched: &'a Scheduler, sender: &str, kind: MessageKind) -> Vec<&'a Message> {
    sched
        .history()
        .iter()
        .filter(|m| m.sender.as_str() == sender && m.kind == kind)
        .collect()
}

const MIXED: &str = r#"{
    "seed": 2024,
    "exchange": { "name": "EXCHANGE", "params": { "best_bid": 99, "best_ask": 101 } },
    "agents": [
        { "name": "POP", "strategy": "ExchangePopulator",
          "params": { "initial_price": 100, "quantity_per_level": 10,
                      "num_levels_both_sides": 3, "level_spacing": 1 } },
        { "name": "FUND", "strategy": "FundamentalAgent",
          "params": { "fundamental_value_expectation": 100, "fundamental_value_std": 5,
                      "k1": 0.05, "k2": 0.001, "num_fundamental_traders": 1 } },
        { "name": "MOM", "strategy": "MomentumAgent",
          "params": { "cancel_probability": 0.1, "market_to_limit_ratio": 2,
                      "num_momentum_traders": 1, "alpha": 0.3, "beta": 0.5,
                      "demand_saturation": 1 } },
        { "name": "NOISE", "strategy": "NoiseAgent", "count": 3,
          "params": { "cancel_probability": 0.2, "market_to_limit_ratio": 1,
                      "num_noise_traders": 3, "sigma": 0.9 } },
        { "name": "MM", "strategy": "MarketMakerAgent",
          "params": { "limit_order_probability": 0.5, "cancel_probability": 0.1,
                      "restart_interval": 5, "spread": 1, "max_risk": 1000 } },
        { "name": "SHOCK", "strategy": "DownwardShockAgent",
          "params": { "spike_probability": 1.0, "volume_per_order": 500,
                      "start_tick": 10, "end_tick": 13 } }
    ]
}"#;

#[test]
fn test_mixed_population_runs() {
    let mut sim = build(MIXED);
    sim.start().unwrap();
    sim.run_until(100).unwrap();

    assert!(sim.delivered() > 0);
    assert_eq!(sim.dropped(), 0);
    assert!(sim.pending() > 0, "polling agents keep the queue alive");

    // populator ladder lands at t=0
    let ladder = from(&sim, "POP", MessageKind::PlaceOrderLimit);
    assert_eq!(ladder.len(), 6);
    assert!(ladder.iter().all(|m| m.deliver_at == 0));
    assert_eq!(ladder[0].limit_order().unwrap().price, dec!(99));
    assert_eq!(ladder[1].limit_order().unwrap().price, dec!(101));

    // shock sells once per tick of its window
    let shocks: Vec<_> = from(&sim, "SHOCK", MessageKind::PlaceOrderMarket)
        .iter()
        .map(|m| m.sent_at)
        .collect();
    assert_eq!(shocks, vec![10, 11, 12]);
    let wakes = from(&sim, "SHOCK", MessageKind::WakeupForDownwardShock);
    assert!(wakes.iter().all(|m| m.deliver_at < 13));

    // fundamental polls every ten ticks once priced
    let polls: Vec<_> = from(&sim, "FUND", MessageKind::RetrieveL1)
        .iter()
        .map(|m| m.deliver_at)
        .collect();
    assert_eq!(&polls[..4], &[1, 11, 21, 31]);

    // every quote-driven agent polls every tick
    for name in ["MOM", "NOISE_1", "NOISE_2", "NOISE_3", "MM"] {
        let polls = from(&sim, name, MessageKind::RetrieveL1);
        assert_eq!(polls.len(), 100, "{name} should poll at ticks 1..=100");
    }
}

#[test]
fn test_same_seed_reproduces_run() {
    let mut a = build(MIXED);
    let mut b = build(MIXED);
    for sim in [&mut a, &mut b] {
        sim.start().unwrap();
        sim.run_until(60).unwrap();
    }
    assert_eq!(a.history(), b.history());

    let mut c = build(&MIXED.replace("2024", "2025"));
    c.start().unwrap();
    c.run_until(60).unwrap();
    assert_ne!(a.history(), c.history());
}

#[test]
fn test_agents_poll_until_exchange_opens() {
    let mut sim = build(
        r#"{
        "seed": 1,
        "exchange": { "name": "EXCHANGE", "params": { "open_at": 5 } },
        "agents": [
            { "name": "FUND", "strategy": "FundamentalAgent",
              "params": { "num_fundamental_traders": 1 } }
        ]
    }"#,
    );
    sim.start().unwrap();
    sim.run_until(30).unwrap();

    let polls: Vec<_> = from(&sim, "FUND", MessageKind::RetrieveL1)
        .iter()
        .map(|m| m.deliver_at)
        .collect();
    assert_eq!(polls, vec![1, 2, 3, 4, 5, 15, 25]);
    assert!(from(&sim, "FUND", MessageKind::PlaceOrderMarket).is_empty());
}

#[test]
fn test_market_maker_flattens_after_breach() {
    let mut sim = build(
        r#"{
        "seed": 3,
        "exchange": { "name": "EXCHANGE" },
        "agents": [
            { "name": "MM", "strategy": "MarketMakerAgent",
              "params": { "limit_order_probability": 0, "restart_interval": 2,
                          "spread": 1, "max_risk": 100 } }
        ]
    }"#,
    );
    sim.start().unwrap();
    sim.run_until(2).unwrap();

    // an outside fill leaves the maker long 150
    let fill = Trade::new(
        Uuid::from_u128(900),
        Uuid::from_u128(901),
        Side::Buy,
        150,
        dec!(101),
    );
    sim.schedule(Message::new(
        "EXCHANGE",
        "MM",
        sim.now(),
        1,
        MessageKind::ResponseTrade,
        EventTrade::new(fill),
    ))
    .unwrap();
    sim.run_until(10).unwrap();

    let flattens = from(&sim, "MM", MessageKind::PlaceOrderMarket);
    assert_eq!(flattens.len(), 1);
    let order = flattens[0].market_order().unwrap();
    assert_eq!((order.direction, order.quantity), (Side::Sell, 150));

    // the exchange filled it and the maker kept polling
    let fills: Vec<_> = sim
        .history()
        .iter()
        .filter(|m| m.recipient == AgentId::new("MM") && m.kind == MessageKind::ResponseTrade)
        .collect();
    assert_eq!(fills.len(), 2);
    assert_eq!(from(&sim, "MM", MessageKind::RetrieveL1).last().unwrap().deliver_at, 10);
}

#[test]
fn test_payload_mismatch_stops_the_run() {
    let mut sim = build(
        r#"{
        "seed": 3,
        "exchange": { "name": "EXCHANGE" },
        "agents": [
            { "name": "NOISE", "strategy": "NoiseAgent", "params": { "num_noise_traders": 1 } }
        ]
    }"#,
    );
    sim.schedule(Message::new(
        "EXCHANGE",
        "NOISE",
        0,
        0,
        MessageKind::ResponseRetrieveL1,
        Payload::Empty,
    ))
    .unwrap();

    match sim.run_until(5) {
        Err(SimulationError::Agent { agent, at, .. }) => {
            assert_eq!(agent, AgentId::new("NOISE"));
            assert_eq!(at, 0);
        }
        other => panic!("expected agent error, got {other:?}"),
    }
}

#[test]
fn test_unknown_strategy_in_scenario() {
    let err = load_scenario_from_str(
        r#"{ "seed": 1, "exchange": { "name": "E" },
             "agents": [ { "name": "X", "strategy": "HighFrequencyAgent" } ] }"#,
    )
    .unwrap()
    .build()
    .err()
    .unwrap();
    assert!(matches!(err, SimulationError::UnknownStrategy(_)));
}
