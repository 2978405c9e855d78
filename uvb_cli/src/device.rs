//! Config mapping, simulated hardware assembly, and the meter session.

use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use serde_json::json;
use uvb_config::{Config, EventKind, SimulationCfg};
use uvb_core::calibration::{NAMESPACE, load_offset};
use uvb_core::error::{MeterError, Result as CoreResult};
use uvb_core::{RunOutcome, RunSummary, UvbMeter};
use uvb_hardware::{FileStore, SimEvent, SimParams, SimWorld, TimedEvent};
use uvb_traits::{Accelerometer, Adc, SimClock};

use crate::console::ConsoleDisplay;

pub fn sim_params(sim: &SimulationCfg) -> SimParams {
    SimParams {
        uv_voltage: sim.uv_voltage,
        noise_counts: sim.noise_counts,
        accel_noise_g: sim.accel_noise_g,
        seed: sim.seed,
        connected: sim.connected,
    }
}

pub fn sim_events(sim: &SimulationCfg) -> Vec<TimedEvent> {
    sim.events
        .iter()
        .map(|ev| TimedEvent {
            at_ms: ev.at_ms,
            event: match ev.kind {
                EventKind::ButtonA => SimEvent::ButtonA,
                EventKind::ButtonB => SimEvent::ButtonB,
                EventKind::PowerShort => SimEvent::PowerShort,
                EventKind::PowerLong => SimEvent::PowerLong,
                EventKind::Shake => SimEvent::Shake,
                EventKind::Unplug => SimEvent::Unplug,
                EventKind::Plug => SimEvent::Plug,
                EventKind::Uv => SimEvent::UvVoltage(ev.value.unwrap_or(sim.uv_voltage)),
            },
        })
        .collect()
}

pub fn outcome_name(o: RunOutcome) -> &'static str {
    match o {
        RunOutcome::PoweredOff(_) => "powered-off",
        RunOutcome::Interrupted => "interrupted",
        RunOutcome::TickLimit => "tick-limit",
    }
}

fn open_store(cfg: &Config) -> CoreResult<FileStore> {
    FileStore::open(&cfg.store.path, NAMESPACE)
        .map_err(|e| eyre::Report::new(MeterError::Store(e.to_string())))
        .wrap_err_with(|| format!("open calibration store {}", cfg.store.path))
}

fn world(cfg: &Config) -> SimWorld {
    let sim = &cfg.simulation;
    SimWorld::new(
        SimClock::starting_at(sim.start_ms),
        sim_params(sim),
        sim_events(sim),
    )
}

fn assemble(world: &SimWorld, store: &FileStore, json: bool) -> CoreResult<UvbMeter> {
    UvbMeter::builder()
        .with_clock(world.clock().clone())
        .with_adc(world.adc())
        .with_accelerometer(world.imu())
        .with_buttons(world.buttons())
        .with_display(ConsoleDisplay::stdout(json))
        .with_power_control(world.power())
        .with_store(store)
        .try_build()
}

/// Boot the meter and run the tick loop.
pub fn run_meter(
    cfg: &Config,
    calibrate: bool,
    max_ticks: Option<u64>,
    print_summary: bool,
    json: bool,
    shutdown: &AtomicBool,
) -> CoreResult<RunSummary> {
    let mut store = open_store(cfg)?;
    let world = world(cfg);
    let mut meter = assemble(&world, &store, json)?;
    tracing::info!(
        store = %store.path().display(),
        offset_voltage = meter.offset_voltage(),
        start_ms = cfg.simulation.start_ms,
        events = cfg.simulation.events.len(),
        "boot"
    );

    uvb_core::boot(&mut meter, &mut store, calibrate)?;
    let max_ticks = max_ticks.or(cfg.simulation.max_ticks);
    let summary = uvb_core::run(&mut meter, shutdown, max_ticks)?;

    if print_summary {
        print_run_summary(&summary, json);
    }
    Ok(summary)
}

fn print_run_summary(s: &RunSummary, json: bool) {
    let reason = match s.outcome {
        RunOutcome::PoweredOff(r) => Some(r.to_string()),
        _ => None,
    };
    if json {
        println!(
            "{}",
            json!({
                "event": "summary",
                "outcome": outcome_name(s.outcome),
                "reason": reason,
                "ticks": s.ticks,
                "sampler_passes": s.sampler_passes,
                "voltage": s.voltage,
                "offset_voltage": s.offset_voltage,
            })
        );
    } else {
        let reason = reason.map(|r| format!(" ({r})")).unwrap_or_default();
        println!(
            "summary: {}{reason} after {} ticks, {:.4} V (offset {:.4} V)",
            outcome_name(s.outcome),
            s.ticks,
            s.voltage,
            s.offset_voltage
        );
    }
}

/// Run the calibration routine once and persist the offset.
pub fn calibrate(cfg: &Config, json: bool) -> CoreResult<f32> {
    let mut store = open_store(cfg)?;
    let world = world(cfg);
    let mut meter = assemble(&world, &store, json)?;
    let offset = meter.calibrate(&mut store)?;
    if json {
        println!(
            "{}",
            json!({
                "event": "calibrated",
                "offset_voltage": offset,
                "store": store.path().display().to_string(),
            })
        );
    } else {
        println!(
            "calibration offset {offset:.4} V stored in {}",
            store.path().display()
        );
    }
    Ok(offset)
}

/// Probe the peripherals the way boot would, without ticking.
pub fn self_check(cfg: &Config, json: bool) -> CoreResult<()> {
    let store = open_store(cfg)?;
    let world = world(cfg);
    let mut adc = world.adc();
    let connected = adc.is_connected();
    let accel = world.imu().read_accel();
    let offset = load_offset(&store);

    if json {
        println!(
            "{}",
            json!({
                "event": "self-check",
                "adc_connected": connected,
                "accel_g": accel,
                "offset_voltage": offset,
                "store": store.path().display().to_string(),
            })
        );
    } else {
        println!(
            "adc: {}",
            if connected { "ok" } else { "not connected" }
        );
        println!(
            "imu: ok ({:.3}, {:.3}, {:.3}) g",
            accel[0], accel[1], accel[2]
        );
        println!(
            "store: {} (offset {offset:.4} V)",
            store.path().display()
        );
    }
    if !connected {
        return Err(eyre::Report::new(MeterError::HardwareFault(
            "sensor adc not connected".into(),
        )));
    }
    if !json {
        println!("OK");
    }
    Ok(())
}
