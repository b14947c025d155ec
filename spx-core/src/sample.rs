use crate::client::AttributeValue;

/// One reading of an attribute at a simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Simulation time in seconds.
    pub time: f64,
    pub internal: f64,
    pub external: f64,
}

impl Sample {
    /// Creates a sample from a time and the attribute value read at that time.
    #[must_use]
    pub fn new(time: f64, value: AttributeValue) -> Self {
        Self {
            time,
            internal: value.internal,
            external: value.external,
        }
    }
}

/// Samples collected in step order, stored as parallel arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    times: Vec<f64>,
    internal: Vec<f64>,
    external: Vec<f64>,
}

impl Series {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            internal: Vec::with_capacity(capacity),
            external: Vec::with_capacity(capacity),
        }
    }

    /// Appends a sample to each array.
    pub fn push(&mut self, sample: Sample) {
        self.times.push(sample.time);
        self.internal.push(sample.internal);
        self.external.push(sample.external);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[must_use]
    pub fn internal(&self) -> &[f64] {
        &self.internal
    }

    #[must_use]
    pub fn external(&self) -> &[f64] {
        &self.external
    }

    /// Returns the sample at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Sample> {
        Some(Sample {
            time: *self.times.get(index)?,
            internal: *self.internal.get(index)?,
            external: *self.external.get(index)?,
        })
    }

    /// Iterates over the samples in step order.
    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }

    /// Returns `(time, internal)` points for plotting.
    #[must_use]
    pub fn internal_points(&self) -> Vec<[f64; 2]> {
        zip_points(&self.times, &self.internal)
    }

    /// Returns `(time, external)` points for plotting.
    #[must_use]
    pub fn external_points(&self) -> Vec<[f64; 2]> {
        zip_points(&self.times, &self.external)
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        let mut series = Self::new();
        iter.into_iter().for_each(|sample| series.push(sample));
        series
    }
}

fn zip_points(xs: &[f64], ys: &[f64]) -> Vec<[f64; 2]> {
    xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect()
}
