use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoint};

use crate::Chart;

/// A native window showing one chart.
struct ChartApp {
    title: String,
    x_title: String,
    y_title: String,
    lines: Vec<(String, Vec<PlotPoint>)>,
}

impl From<&Chart> for ChartApp {
    fn from(chart: &Chart) -> Self {
        Self {
            title: chart.title.clone(),
            x_title: chart.x_title.clone(),
            y_title: chart.y_title.clone(),
            lines: chart
                .traces
                .iter()
                .map(|trace| {
                    let points = trace.points.iter().copied().map(Into::into).collect();
                    (trace.name.clone(), points)
                })
                .collect(),
        }
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.title);
            Plot::new("spx-chart")
                .legend(Legend::default())
                .x_axis_label(self.x_title.as_str())
                .y_axis_label(self.y_title.as_str())
                .show(ui, |plot_ui| {
                    for (name, points) in &self.lines {
                        plot_ui.line(Line::new(points.as_slice()).name(name));
                    }
                });
        });
    }
}

/// Opens a blocking window displaying `chart` until it is closed.
pub(crate) fn show(chart: &Chart) -> Result<(), eframe::Error> {
    let app = ChartApp::from(chart);
    eframe::run_native(
        &chart.title,
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
