//! Evaluation used by the development server.
//!
//! This is a stand-in for a real simulation kernel: just enough behavior to
//! produce plausible, deterministic traces for examples and tests.

use std::collections::BTreeMap;

use rand::Rng;
use spx_core::{Action, AttributeValue, Layer, ModelDescriptor, Noise, NoiseMode, Ramp, RampProfile};

/// Fraction of a ramp's duration used as the overshoot decay time constant.
const OVERSHOOT_DECAY: f64 = 0.2;

/// Evaluates every attribute of `descriptor` at time `t` (seconds).
///
/// Internal values start from the initial values and have `$in` actions
/// applied in order; external values start from the resulting internal
/// values and have `$out` actions applied in order.
pub(crate) fn evaluate<R: Rng>(
    descriptor: &ModelDescriptor,
    t: f64,
    rng: &mut R,
) -> BTreeMap<String, AttributeValue> {
    let mut internal = descriptor.attributes.clone();
    apply(descriptor, Layer::Internal, t, &mut internal, rng);

    let mut external = internal.clone();
    apply(descriptor, Layer::External, t, &mut external, rng);

    internal
        .into_iter()
        .map(|(name, internal)| {
            let external = external.get(&name).copied().unwrap_or(internal);
            (name, AttributeValue { internal, external })
        })
        .collect()
}

fn apply<R: Rng>(
    descriptor: &ModelDescriptor,
    layer: Layer,
    t: f64,
    values: &mut BTreeMap<String, f64>,
    rng: &mut R,
) {
    for action in &descriptor.actions {
        let target = action.target();
        if target.layer != layer {
            continue;
        }
        let Some(value) = values.get_mut(&target.attribute) else {
            continue;
        };
        let start = descriptor.initial_value(&target.attribute).unwrap_or(*value);

        *value = match action {
            Action::Ramp(ramp) => ramp_value(ramp, start, t),
            Action::Noise(noise) => *value + noise_offset(noise, *value, rng),
        };
    }
}

/// Value of a ramp from `start` at time `t`.
pub(crate) fn ramp_value(ramp: &Ramp, start: f64, t: f64) -> f64 {
    let progress = (t / ramp.duration).clamp(0.0, 1.0);

    match (ramp.profile, ramp.overshoot) {
        (RampProfile::Overshoot, Some(overshoot)) => {
            // Overshoot past the stop value in the direction of travel.
            let peak = ramp.stop_value + overshoot.copysign(ramp.stop_value - start);
            if t <= ramp.duration {
                start + (peak - start) * progress
            } else {
                let tau = ramp.duration * OVERSHOOT_DECAY;
                ramp.stop_value + (peak - ramp.stop_value) * (-(t - ramp.duration) / tau).exp()
            }
        }
        _ => start + (ramp.stop_value - start) * progress,
    }
}

fn noise_offset<R: Rng>(noise: &Noise, value: f64, rng: &mut R) -> f64 {
    if noise.std == 0.0 {
        return 0.0;
    }
    let u: f64 = rng.gen_range(-1.0..=1.0);
    match noise.mode {
        NoiseMode::Absolute => noise.std * u,
        NoiseMode::Proportional => value * noise.std * u,
    }
}
