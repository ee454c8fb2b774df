//! holdctl: process entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │  SimLed ×2     ConsoleDisplay   SerialTelemetry   LocalClock │
//! │  (Actuator)    (Display)        (Telemetry)       (Clock)    │
//! │  SimTemperatureSensor  StdinInput   JsonFileConfig  StdDelay │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ──────────────────     │
//! │                                                              │
//! │   EventBridge ──▶ shared state ◀── Worker ──▶ Fsm + policy   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The main thread only wires things up, then idles with a heartbeat
//! until Ctrl-C (or `q` on the console) raises the stop flag.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use tracing_subscriber::EnvFilter;

use holdctl::adapters::config_file::JsonFileConfig;
use holdctl::adapters::console::ConsoleDisplay;
use holdctl::adapters::serial::SerialTelemetry;
use holdctl::adapters::stdin_input::StdinInput;
use holdctl::adapters::time::{LocalClock, StdDelay};
use holdctl::app::bridge::EventBridge;
use holdctl::app::commands::{MORSE_BINDINGS, THERMOSTAT_BINDINGS};
use holdctl::app::ports::{ConfigPort, InputSource, TelemetryPort};
use holdctl::app::shared::{ActiveMessage, SetPoint, StopFlag};
use holdctl::app::worker::{MorseWorker, ThermostatIo, ThermostatWorker};
use holdctl::config::SystemConfig;
use holdctl::control::schedule::TickSchedule;
use holdctl::control::thermostat::Thermostat;
use holdctl::drivers::led::SimLed;
use holdctl::fsm::context::{MorseContext, MorseTiming};
use holdctl::pins;
use holdctl::sensors::temperature::SimTemperatureSensor;

type WorkerHandle = JoinHandle<holdctl::error::Result<()>>;

const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "holdctl")]
#[command(version)]
#[command(about = "Morse signaler and thermostat control loops")]
struct Args {
    /// JSON configuration file; defaults apply when absent
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. `debug`, `holdctl=trace`)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    app: AppKind,
}

#[derive(Subcommand, Debug)]
enum AppKind {
    /// Flash a message in Morse on the red (dot) and blue (dash) lights
    Morse {
        /// Primary message
        #[arg(long)]
        message: Option<String>,
        /// Dot length in milliseconds
        #[arg(long)]
        dot_ms: Option<u32>,
    },
    /// Run the three-mode thermostat
    Thermostat {
        /// Initial set point, degrees Fahrenheit
        #[arg(long, allow_negative_numbers = true)]
        set_point: Option<i32>,
        /// Telemetry device or file (stdout when unset)
        #[arg(long, value_name = "PATH")]
        serial: Option<PathBuf>,
        /// Starting simulated temperature, degrees Celsius
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f32>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(&args.log_level);

    info!("holdctl v{}", env!("CARGO_PKG_VERSION"));

    let mut cfg = JsonFileConfig::new(args.config.clone()).load()?;
    apply_overrides(&mut cfg, &args.app);
    cfg.validate()?;

    let stop = Arc::new(StopFlag::new());
    let s = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        s.request();
    })?;

    let worker = match args.app {
        AppKind::Morse { .. } => start_morse(&cfg, &stop)?,
        AppKind::Thermostat { .. } => match &cfg.thermostat.serial_path {
            Some(path) => start_thermostat(&cfg, &stop, SerialTelemetry::open(path)?)?,
            None => start_thermostat(&cfg, &stop, SerialTelemetry::stdout())?,
        },
    };

    idle(&cfg, &stop);
    finish(worker, Duration::from_millis(u64::from(cfg.shutdown_grace_ms)))
}

fn setup_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();
}

fn apply_overrides(cfg: &mut SystemConfig, app: &AppKind) {
    match app {
        AppKind::Morse { message, dot_ms } => {
            if let Some(m) = message {
                cfg.morse.primary_message.clone_from(m);
            }
            if let Some(d) = dot_ms {
                cfg.morse.dot_ms = *d;
            }
        }
        AppKind::Thermostat {
            set_point,
            serial,
            temperature,
        } => {
            if let Some(sp) = set_point {
                cfg.thermostat.initial_set_point_f = *sp;
            }
            if let Some(p) = serial {
                cfg.thermostat.serial_path = Some(p.display().to_string());
            }
            if let Some(t) = temperature {
                cfg.thermostat.sim_temperature_c = *t;
            }
        }
    }
}

fn start_morse(cfg: &SystemConfig, stop: &Arc<StopFlag>) -> Result<WorkerHandle> {
    let m = &cfg.morse;
    info!(
        "Morse: '{}' / '{}', dot={}ms",
        m.primary_message, m.alternate_message, m.dot_ms
    );
    let message = Arc::new(ActiveMessage::new(&m.primary_message, &m.alternate_message)?);

    let ctx = MorseContext::new(
        SimLed::new("red", pins::RED_LED_GPIO),
        SimLed::new("blue", pins::BLUE_LED_GPIO),
        StdDelay,
        MorseTiming::from_dot_ms(m.dot_ms),
    );
    let worker = MorseWorker::new(
        ctx,
        ConsoleDisplay::new(cfg.display_columns),
        Arc::clone(&message),
        Arc::clone(stop),
    )?;

    let mut input = StdinInput::new(None, Arc::clone(stop));
    EventBridge::new(message, MORSE_BINDINGS).attach(&mut input);
    input.start()?;

    Ok(worker.spawn()?)
}

fn start_thermostat<T>(
    cfg: &SystemConfig,
    stop: &Arc<StopFlag>,
    telemetry: T,
) -> Result<WorkerHandle>
where
    T: TelemetryPort + Send + 'static,
{
    let t = &cfg.thermostat;
    info!(
        "Thermostat: SP={}F, tick={}ms, sensor starts at {:.1}C",
        t.initial_set_point_f, t.tick_ms, t.sim_temperature_c
    );
    let sensor = SimTemperatureSensor::new(t.sim_temperature_c);
    let temperature = sensor.handle();
    let core = Arc::new(Mutex::new(Thermostat::new(
        SimLed::new("red", pins::RED_LED_GPIO),
        SimLed::new("blue", pins::BLUE_LED_GPIO),
        sensor,
        Arc::new(SetPoint::new(t.initial_set_point_f)),
    )?));

    let worker = ThermostatWorker::new(
        Arc::clone(&core),
        ThermostatIo {
            display: ConsoleDisplay::new(cfg.display_columns),
            telemetry,
            clock: LocalClock,
            delay: StdDelay,
        },
        TickSchedule::from_config(t),
        t.tick_ms,
        Arc::clone(stop),
    );

    let mut input = StdinInput::new(Some(temperature), Arc::clone(stop));
    EventBridge::new(core, THERMOSTAT_BINDINGS).attach(&mut input);
    input.start()?;

    Ok(worker.spawn()?)
}

/// Block until the stop flag is raised, logging a heartbeat.
fn idle(cfg: &SystemConfig, stop: &StopFlag) {
    let heartbeat = Duration::from_secs(u64::from(cfg.heartbeat_interval_secs.max(1)));
    let started = Instant::now();
    let mut last = Instant::now();
    while !stop.is_requested() {
        std::thread::sleep(IDLE_POLL);
        if last.elapsed() >= heartbeat {
            info!("heartbeat: up {}s", started.elapsed().as_secs());
            last = Instant::now();
        }
    }
}

/// Give the worker one grace period to wind down.
fn finish(worker: WorkerHandle, grace: Duration) -> Result<()> {
    info!("Cleaning up. Exiting...");
    let deadline = Instant::now() + grace;
    while !worker.is_finished() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    if !worker.is_finished() {
        warn!("worker still in a hold after {:?}; exiting anyway", grace);
        return Ok(());
    }
    match worker.join() {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("worker failed: {}", e);
            Err(e.into())
        }
        Err(_) => Err(anyhow!("worker thread panicked")),
    }
}
