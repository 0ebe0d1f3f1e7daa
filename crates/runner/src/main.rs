use std::collections::BTreeMap;
use std::process::ExitCode;

use desim_protocol::MessageKind;
use desim_runner::{Result, Scheduler, load_scenario};
use log::{error, info};

fn run(path: &str) -> Result<Scheduler> {
    let scenario = load_scenario(path)?;
    info!(
        "Loaded {}: seed={}, {} agents, duration={}",
        path,
        scenario.seed,
        scenario.agent_count(),
        scenario.duration
    );

    let mut scheduler = scenario.build()?.record_history();
    scheduler.start()?;
    scheduler.run_until(scenario.duration)?;
    Ok(scheduler)
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: desim <scenario.json>");
        return ExitCode::FAILURE;
    };

    let scheduler = match run(&path) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            error!("Simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut by_kind: BTreeMap<&'static str, u64> = BTreeMap::new();
    for msg in scheduler.history() {
        *by_kind.entry(msg.kind.as_str()).or_default() += 1;
    }

    info!(
        "Finished at t={}: {} delivered, {} dropped, {} pending",
        scheduler.now(),
        scheduler.delivered(),
        scheduler.dropped(),
        scheduler.pending()
    );
    for (kind, count) in &by_kind {
        info!("  {kind:<28} {count}");
    }
    let orders = by_kind.get(MessageKind::PlaceOrderMarket.as_str()).copied().unwrap_or(0)
        + by_kind.get(MessageKind::PlaceOrderLimit.as_str()).copied().unwrap_or(0);
    println!(
        "t={} delivered={} orders={}",
        scheduler.now(),
        scheduler.delivered(),
        orders
    );
    ExitCode::SUCCESS
}
