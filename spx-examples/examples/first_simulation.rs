//! # First Simulation
//!
//! Registers a PT100-like temperature sensor, steps it for ten seconds, and
//! charts the internal (true) and external (noisy) temperature.
//!
//! The ramp drives the internal temperature from 0 to 150 °C in 5 s with a
//! 5 °C overshoot. Proportional noise is applied to the external layer only,
//! so the internal trace stays smooth.
//!
//! To run this example against a local server:
//!
//! ```sh
//! SPX_PRODUCT_KEY=... cargo run --example first_simulation
//! ```
//!
//! Set `SPX_PLOT_BACKEND=headless` to skip the chart window.

use std::{error::Error, path::Path};

use spx_client::Config;
use spx_core::{
    ModelDescriptor, SimulationClient, TimeIncrement,
    driver::{self, Action, Event, Schedule},
};
use spx_plot::{Chart, Exporter};
use uom::si::time::second;

/// Indentation is significant: the action list must nest under `actions`.
const PT100_YAML: &str = "
attributes:
  temperature: 0.0
actions:
    - { ramp: $in(temperature), stop_value: 150, duration: 5, type: overshoot, overshoot: 5 }
    - { noise: $out(temperature), std: 0.01, mode: proportional }
";

/// Step size, in seconds.
const DT: f64 = 0.1;

/// Number of steps (about 10 s of simulated time).
const STEPS: usize = 100;

const OUTPUT_FILE: &str = "first_simulation.html";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = spx_client::init(&config)?;

    let model = ModelDescriptor::from_yaml(PT100_YAML)?;
    client.register_model("pt_100", &model)?;
    let pt100 = client.create_instance("pt100_1", "pt_100")?;

    let schedule = Schedule::new(TimeIncrement::new::<second>(DT)?, STEPS);
    let print_step = |event: &Event| -> Option<Action> {
        let sample = event.sample;
        println!(
            "time: {:.1}s internal: {:.3}C external: {:.3}C",
            sample.time, sample.internal, sample.external
        );
        None
    };
    let solution = driver::drive(&pt100, "temperature", schedule, print_step)?;

    let chart = Chart::new("PT100 Temperature Over Time")
        .x_title("Time [s]")
        .y_title("Temperature [°C]")
        .layers("Temperature", &solution.samples);

    let out_html = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join(OUTPUT_FILE);
    let report = Exporter::from_env().html(out_html).export(&chart);
    log::debug!("export finished: {report:?}");

    Ok(())
}
