use spx_core::Series;

/// A named line of `[x, y]` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// A line chart with a title, axis titles, and any number of traces.
///
/// # Example
///
/// ```
/// use spx_plot::Chart;
///
/// let chart = Chart::new("Warm-up")
///     .x_title("Time [s]")
///     .y_title("Temperature [°C]")
///     .trace("Temperature", vec![[0.0, 20.0], [1.0, 21.5]]);
///
/// assert_eq!(chart.traces.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub traces: Vec<Trace>,
}

impl Chart {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn x_title(mut self, title: impl Into<String>) -> Self {
        self.x_title = title.into();
        self
    }

    #[must_use]
    pub fn y_title(mut self, title: impl Into<String>) -> Self {
        self.y_title = title.into();
        self
    }

    /// Appends a trace.
    #[must_use]
    pub fn trace(mut self, name: impl Into<String>, points: Vec<[f64; 2]>) -> Self {
        self.traces.push(Trace {
            name: name.into(),
            points,
        });
        self
    }

    /// Appends one trace per attribute layer of `series`, named
    /// `"{quantity} (internal)"` and `"{quantity} (external)"`.
    #[must_use]
    pub fn layers(self, quantity: &str, series: &Series) -> Self {
        self.trace(format!("{quantity} (internal)"), series.internal_points())
            .trace(format!("{quantity} (external)"), series.external_points())
    }
}
