//! Core types for driving SPX simulation servers.
//!
//! This crate defines the pieces every SPX program builds on:
//!
//! - [`ModelDescriptor`]: a model's initial attribute values and its ordered
//!   [`Action`]s, parsed from YAML and validated before it leaves the client
//! - [`SimulationClient`]: the typed operations a server connection provides,
//!   with [`Instance`] handles for per-instance timers and attributes
//! - [`driver`]: the fixed-step loop that advances an instance timer, runs the
//!   server, and collects [`Sample`]s into a [`Series`]
//! - [`Observer`]: watches each driver step and may stop the run early
//! - [`env`]: environment variable access behind a swappable provider

pub mod driver;
pub mod env;

mod client;
mod descriptor;
mod name;
mod observer;
mod sample;
mod time;

pub use client::{AttributeValue, Instance, SimulationClient};
pub use descriptor::{
    Action, AttributeRef, DescriptorError, Layer, ModelDescriptor, Noise, NoiseMode,
    ParseAttributeRefError, Ramp, RampProfile,
};
pub use name::{NameError, validate_name};
pub use observer::Observer;
pub use sample::{Sample, Series};
pub use time::{TimeIncrement, TimeIncrementError};
