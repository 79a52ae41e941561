//! Claisen condensation kinetics: explicit Euler integration of three coupled
//! concentrations, shown as a live chart next to a cosmetic particle view.

mod app;
mod config;
mod controls;
mod error;
mod gpu;
mod simulation;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::config::{DEFAULT_FORWARD_RATE, MAX_TIME, TIME_STEP, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::controls::Controls;
use crate::error::AppError;
use crate::simulation::{Integrator, ParticleAnimator, Session};

#[derive(Parser, Debug)]
#[command(name = "claisen-kinetics")]
#[command(about = "Toy Claisen condensation kinetics with a live chart and particle view")]
struct Cli {
    /// Initial forward (enolate formation) rate constant. Not validated.
    #[arg(long, default_value_t = DEFAULT_FORWARD_RATE, allow_negative_numbers = true)]
    rate: f64,

    /// Seed for particle spawning; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Run one full simulation without a window and print the chart series
    #[arg(long)]
    headless: bool,
}

fn build_session(cli: &Cli) -> Session {
    Session::new(
        Integrator::new(TIME_STEP, MAX_TIME),
        Controls::new(cli.rate),
        ParticleAnimator::new(
            f64::from(WINDOW_WIDTH / 2),
            f64::from(WINDOW_HEIGHT),
            cli.seed,
        ),
    )
}

/// Run to completion and print `time EtA Enol Prod` rows
fn run_headless(mut session: Session) {
    session.start();
    let steps = session.run_to_completion();
    log::info!(
        "Headless run finished after {} steps: t = {}, yield {}%",
        steps,
        session.readout.time,
        session.readout.yield_percent
    );

    let series = session.chart.series();
    println!("{:>6} {:>10} {:>10} {:>10}", "time", "EtA", "Enol", "Prod");
    for (i, label) in series.labels.iter().enumerate() {
        println!(
            "{:>6} {:>10.6} {:>10.6} {:>10.6}",
            label, series.eta[i], series.enol[i], series.prod[i]
        );
    }
}

fn run_windowed(session: Session) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    // Ticks are driven by redraw requests, not a timer
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(session);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Forward rate: {}, seed: {:?}", cli.rate, cli.seed);

    let session = build_session(&cli);
    log::info!(
        "Integrating with dt = {} up to t = {}",
        session.integrator.time_step(),
        session.integrator.max_time()
    );
    if cli.headless {
        run_headless(session);
        return;
    }

    if let Err(e) = run_windowed(session) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
