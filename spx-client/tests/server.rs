//! End-to-end tests against the in-memory development server.

use std::net::SocketAddr;

use approx::assert_relative_eq;
use spx_client::{ClientError, Config, HttpClient};
use spx_core::{
    ModelDescriptor, SimulationClient, TimeIncrement,
    driver::{self, Schedule, Status},
};
use uom::si::{f64::Time, time::second};

const PT100: &str = "
attributes:
  temperature: 0.0
actions:
  - { ramp: $in(temperature), stop_value: 150, duration: 5, type: overshoot, overshoot: 5 }
  - { noise: $out(temperature), std: 0.01, mode: proportional }
";

fn server() -> SocketAddr {
    spx_dev::spawn_in_background().expect("development server should start")
}

fn client(addr: SocketAddr) -> HttpClient {
    let config = Config::new(&format!("http://{addr}"), "test-key").unwrap();
    spx_client::init(&config).unwrap()
}

#[test]
fn pt100_run_over_http() {
    let client = client(server());
    let model = ModelDescriptor::from_yaml(PT100).unwrap();

    client.register_model("pt_100", &model).unwrap();
    let instance = client.create_instance("pt100_1", "pt_100").unwrap();

    let schedule = Schedule::new(TimeIncrement::new::<second>(0.1).unwrap(), 100);
    let solution = driver::drive_unobserved(&instance, "temperature", schedule).unwrap();

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.samples.len(), 100);

    let times = solution.samples.times();
    assert_relative_eq!(times[0], 0.1);
    assert_relative_eq!(times[99], 10.0, epsilon = 1e-9);
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));

    // Halfway up the ramp the internal value is noise-free.
    let midpoint = solution.samples.get(24).unwrap();
    assert_relative_eq!(midpoint.time, 2.5, epsilon = 1e-9);
    assert_relative_eq!(midpoint.internal, 77.5, epsilon = 1e-6);
    assert!((midpoint.external - midpoint.internal).abs() <= 0.01 * midpoint.internal + 1e-9);

    // Peak of the overshoot at the end of the ramp.
    let peak = solution.samples.get(49).unwrap();
    assert_relative_eq!(peak.internal, 155.0, epsilon = 1e-6);

    // Settled long after the ramp.
    let last = solution.samples.get(99).unwrap();
    assert!((last.internal - 150.0).abs() < 0.1);
}

#[test]
fn reading_before_any_run_returns_initial_values() {
    let client = client(server());
    let model = ModelDescriptor::from_yaml(PT100).unwrap();
    client.register_model("pt_100", &model).unwrap();
    let instance = client.create_instance("pt100_1", "pt_100").unwrap();

    client.prepare().unwrap();
    let value = instance.attribute("temperature").unwrap();
    assert_relative_eq!(value.internal, 0.0);
    assert_relative_eq!(value.external, 0.0);
}

#[test]
fn missing_product_key_is_rejected() {
    let addr = server();
    let config = Config::new(&format!("http://{addr}"), "").unwrap();
    let client = spx_client::init(&config).unwrap();

    let err = client.prepare().unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn run_before_prepare_conflicts() {
    let client = client(server());
    client
        .register_model("m", &ModelDescriptor::new().with_attribute("t", 1.0))
        .unwrap();
    client.bind_instance("i", "m").unwrap();

    let err = client.run().unwrap_err();
    assert_eq!(err.status(), Some(409));
}

#[test]
fn unknown_attribute_is_not_found() {
    let client = client(server());
    client
        .register_model("m", &ModelDescriptor::new().with_attribute("t", 1.0))
        .unwrap();
    let instance = client.create_instance("i", "m").unwrap();
    client.prepare().unwrap();
    instance.set_timer(Time::new::<second>(1.0)).unwrap();

    match instance.attribute("pressure") {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("pressure"), "unexpected body: {body}");
        }
        other => panic!("expected a 404, got {other:?}"),
    }
}

#[test]
fn unknown_model_is_not_found() {
    let client = client(server());
    let err = client.create_instance("i", "missing").unwrap_err();
    assert_eq!(err.status(), Some(404));
}
