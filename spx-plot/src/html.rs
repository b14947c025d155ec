//! Self-contained HTML rendering with plotly.js.
//!
//! The page loads plotly.js from its CDN, so it needs network access to
//! display but no local assets.

use std::{fs, io, path::Path};

use serde::Serialize;

use crate::Chart;

/// plotly.js bundle referenced by rendered pages.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const GRID_COLOR: &str = "#ebf0f8";

#[derive(Serialize)]
struct Figure<'a> {
    data: Vec<ScatterTrace<'a>>,
    layout: Layout<'a>,
}

#[derive(Serialize)]
struct ScatterTrace<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    mode: &'static str,
    name: &'a str,
    x: Vec<f64>,
    y: Vec<f64>,
}

#[derive(Serialize)]
struct Text<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Axis<'a> {
    title: Text<'a>,
    gridcolor: &'static str,
    zerolinecolor: &'static str,
}

#[derive(Serialize)]
struct Legend {
    orientation: &'static str,
    yanchor: &'static str,
    y: f64,
    xanchor: &'static str,
    x: f64,
}

#[derive(Serialize)]
struct Layout<'a> {
    title: Text<'a>,
    xaxis: Axis<'a>,
    yaxis: Axis<'a>,
    legend: Legend,
    paper_bgcolor: &'static str,
    plot_bgcolor: &'static str,
}

impl<'a> Figure<'a> {
    fn from_chart(chart: &'a Chart) -> Self {
        let data = chart
            .traces
            .iter()
            .map(|trace| ScatterTrace {
                kind: "scatter",
                mode: "lines",
                name: &trace.name,
                x: trace.points.iter().map(|[x, _]| *x).collect(),
                y: trace.points.iter().map(|[_, y]| *y).collect(),
            })
            .collect();

        let axis = |title: &'a str| Axis {
            title: Text { text: title },
            gridcolor: GRID_COLOR,
            zerolinecolor: GRID_COLOR,
        };

        // Horizontal legend above the plot area, right-aligned.
        let legend = Legend {
            orientation: "h",
            yanchor: "bottom",
            y: 1.02,
            xanchor: "right",
            x: 1.0,
        };

        Self {
            data,
            layout: Layout {
                title: Text { text: &chart.title },
                xaxis: axis(chart.x_title.as_str()),
                yaxis: axis(chart.y_title.as_str()),
                legend,
                paper_bgcolor: "white",
                plot_bgcolor: "white",
            },
        }
    }
}

/// Renders `chart` as a standalone HTML page.
///
/// # Errors
///
/// Returns an error if the figure cannot be serialized.
pub fn render(chart: &Chart) -> Result<String, serde_json::Error> {
    let figure = serde_json::to_string(&Figure::from_chart(chart))?;
    // Keep string contents from closing the script element early.
    let figure = figure.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8" />
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:100vh;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#,
        title = escape(&chart.title),
    ))
}

/// Renders `chart` and writes it to `path`.
///
/// # Errors
///
/// Returns an error if rendering fails or the file cannot be written.
pub fn write(chart: &Chart, path: &Path) -> io::Result<()> {
    let page = render(chart).map_err(io::Error::other)?;
    fs::write(path, page)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Chart {
        Chart::new("PT100 <Temperature> Over Time")
            .x_title("Time [s]")
            .y_title("Temperature [°C]")
            .trace("Temperature (internal)", vec![[0.1, 1.0], [0.2, 2.0]])
    }

    #[test]
    fn page_loads_plotly_and_embeds_the_figure() {
        let page = render(&chart()).unwrap();

        assert!(page.contains(PLOTLY_CDN));
        assert!(page.contains(r#""name":"Temperature (internal)""#));
        assert!(page.contains(r#""x":[0.1,0.2]"#));
        assert!(page.contains(r#""y":[1.0,2.0]"#));
        assert!(page.contains(r#""orientation":"h""#));
        assert!(page.contains("Temperature [°C]"));
    }

    #[test]
    fn title_is_escaped_in_the_head() {
        let page = render(&chart()).unwrap();
        assert!(page.contains("<title>PT100 &lt;Temperature&gt; Over Time</title>"));
    }

    #[test]
    fn script_end_tags_in_names_are_neutralized() {
        let chart = Chart::new("x").trace("</script><b>", vec![[0.0, 0.0]]);
        let page = render(&chart).unwrap();
        assert_eq!(page.matches("</script>").count(), 2);
    }

    #[test]
    fn write_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.html");

        write(&chart(), &path).unwrap();
        let page = fs::read_to_string(&path).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
