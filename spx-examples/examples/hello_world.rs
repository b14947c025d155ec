//! # Hello World
//!
//! The smallest round trip: register a one-attribute model, bind an instance,
//! run a single step, and read the value back.
//!
//! ```sh
//! SPX_PRODUCT_KEY=... cargo run --example hello_world
//! ```

use std::error::Error;

use spx_client::Config;
use spx_core::{ModelDescriptor, SimulationClient};
use uom::si::{f64::Time, time::second};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let client = spx_client::init(&config)?;

    let model = ModelDescriptor::new().with_attribute("greeting", 42.0);
    client.register_model("hello", &model)?;
    let hello = client.create_instance("hello_1", "hello")?;

    client.prepare()?;
    hello.set_timer(Time::new::<second>(1.0))?;
    client.run()?;

    let value = hello.attribute("greeting")?;
    println!(
        "Hello from {}: greeting = {} (external {})",
        config.address, value.internal, value.external
    );

    Ok(())
}
