use std::path::PathBuf;

use arbiter::{Arbiter, FlightKind};
use arbiter_sim::{config::Config, scenario};
use clap::Parser;

#[derive(Parser)]
struct Cli {
  /// TOML config file (thresholds, runway geometry, tick rate). Falls back
  /// to built-in defaults if omitted.
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Number of ticks to run before printing a final summary and exiting.
  #[arg(short, long, default_value_t = 180)]
  ticks: u32,
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt::init();

  let Cli { config, ticks } = Cli::parse();

  let config = match config {
    Some(path) => match Config::from_path(&path) {
      Ok(config) => config,
      Err(e) => {
        tracing::error!("{e}");
        std::process::exit(1);
      }
    },
    None => Config::default(),
  };

  let end = config.runway_end();
  let mut arbiter = Arbiter::new(end, config.thresholds());
  let dt_secs = 1.0 / config.sim().tick_rate_hz;

  let flights = scenario::default_scenario(&end);
  for flight in &flights {
    let listener = Box::new(scenario::TracingListener(flight.id));
    let result = match flight.kind {
      FlightKind::Arrival => arbiter.check_in_arrival_live(
        flight.id,
        flight.aircraft_type,
        flight.kinematics_source(),
        listener,
      ),
      FlightKind::Departure => arbiter.check_in_departure_live(
        flight.id,
        flight.aircraft_type,
        flight.kinematics_source(),
        listener,
      ),
      FlightKind::Crossing => arbiter.check_in_crossing_live(
        flight.id,
        flight.aircraft_type,
        flight.kinematics_source(),
        listener,
      ),
    };
    if let Err(e) = result {
      tracing::error!(flight = %flight.id, "{e}");
      std::process::exit(1);
    }
  }

  let mut interval = tokio::time::interval(std::time::Duration::from_secs_f32(dt_secs));
  let mut elapsed = 0.0f32;
  for _ in 0..ticks {
    interval.tick().await;
    elapsed += dt_secs;
    for flight in &flights {
      flight.step(dt_secs);
    }
    if let Err(e) = arbiter.progress_to(elapsed) {
      tracing::error!("{e}");
      std::process::exit(1);
    }
  }

  let board = arbiter.board();
  tracing::info!(
    arrivals_waiting = board.arrivals_line.len(),
    departures_waiting = board.departures_line.len(),
    crossings_waiting = board.crossings_line.len(),
    cleared_to_land = board.cleared_to_land.is_some(),
    cleared_to_takeoff = board.cleared_to_takeoff.is_some(),
    authorized_luaw = board.authorized_luaw.is_some(),
    "final board state"
  );
}
