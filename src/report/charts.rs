//! Summary charts rendered as standalone SVG images.
//!
//! Charts are best-effort: a failure is logged and the remaining artifacts
//! are still produced.

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use super::tally::Tally;

pub const RISK_CHART_FILE: &str = "rischi.svg";
pub const TAG_CHART_FILE: &str = "sensibili.svg";

const RISK_CHART_TITLE: &str = "Distribuzione per Rischio";
const TAG_CHART_TITLE: &str = "Frequenza dei Dati Sensibili";

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// A single data point for charts
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl DataPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

fn data_points<'a>(counts: impl IntoIterator<Item = (&'a String, &'a usize)>) -> Vec<DataPoint> {
    counts
        .into_iter()
        .map(|(label, count)| DataPoint::new(label.clone(), *count as f64))
        .collect()
}

fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn svg_open(output: &mut String, width: f64, height: f64, title: &str) {
    let _ = writeln!(
        output,
        r#"<svg viewBox="0 0 {width} {height}" width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg" role="img">"#
    );
    let _ = writeln!(output, r#"    <rect width="100%" height="100%" fill="white"/>"#);
    let title = escape_xml(title);
    let _ = writeln!(output, "    <title>{title}</title>");
    let _ = writeln!(
        output,
        r#"    <text x="{}" y="28" text-anchor="middle" font-family="sans-serif" font-size="18">{title}</text>"#,
        width / 2.0
    );
}

/// Pie chart with a percentage label on every slice
#[derive(Debug)]
pub struct PieChart {
    pub title: String,
    pub data: Vec<DataPoint>,
    pub size: f64,
}

impl PieChart {
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            data,
            size: 480.0,
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        svg_open(&mut output, self.size, self.size, &self.title);

        let total: f64 = self.data.iter().map(|d| d.value).sum();
        let cx = self.size / 2.0;
        let cy = self.size / 2.0 + 20.0;
        let radius = self.size * 0.32;

        if total <= 0.0 {
            let _ = writeln!(
                output,
                r#"    <text x="{cx}" y="{cy}" text-anchor="middle" font-family="sans-serif" font-size="14">No data available</text>"#
            );
            output.push_str("</svg>\n");
            return output;
        }

        // Start at twelve o'clock, go counter-clockwise like matplotlib
        let mut start = PI / 2.0;
        for (i, point) in self.data.iter().enumerate() {
            let fraction = point.value / total;
            let sweep = fraction * 2.0 * PI;
            let end = start + sweep;
            let fill = color(i);

            if fraction >= 1.0 {
                let _ = writeln!(
                    output,
                    r#"    <circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{fill}"/>"#
                );
            } else if fraction > 0.0 {
                let (x1, y1) = (cx + radius * start.cos(), cy - radius * start.sin());
                let (x2, y2) = (cx + radius * end.cos(), cy - radius * end.sin());
                let large_arc = u8::from(sweep > PI);
                let _ = writeln!(
                    output,
                    r#"    <path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {radius:.2} {radius:.2} 0 {large_arc} 0 {x2:.2} {y2:.2} Z" fill="{fill}" stroke="white"/>"#
                );
            }

            let middle = start + sweep / 2.0;
            let (lx, ly) = (
                cx + radius * 1.2 * middle.cos(),
                cy - radius * 1.2 * middle.sin(),
            );
            let anchor = if middle.cos() < 0.0 { "end" } else { "start" };
            let _ = writeln!(
                output,
                r#"    <text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" font-family="sans-serif" font-size="13">{}</text>"#,
                escape_xml(&point.label)
            );

            let (px, py) = (
                cx + radius * 0.6 * middle.cos(),
                cy - radius * 0.6 * middle.sin(),
            );
            let _ = writeln!(
                output,
                r#"    <text x="{px:.2}" y="{py:.2}" text-anchor="middle" font-family="sans-serif" font-size="12" fill="white">{:.1}%</text>"#,
                fraction * 100.0
            );

            start = end;
        }

        output.push_str("</svg>\n");
        output
    }
}

/// Vertical bar chart with labels rotated by 45 degrees
#[derive(Debug)]
pub struct BarChart {
    pub title: String,
    pub data: Vec<DataPoint>,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Room below the axis for rotated labels
    pub label_space: f64,
}

impl BarChart {
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            data,
            width: 800.0,
            height: 480.0,
            padding: 50.0,
            label_space: 120.0,
        }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        svg_open(&mut output, self.width, self.height, &self.title);

        if self.data.is_empty() {
            let _ = writeln!(
                output,
                r#"    <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="14">No data available</text>"#,
                self.width / 2.0,
                self.height / 2.0
            );
            output.push_str("</svg>\n");
            return output;
        }

        let chart_width = self.width - self.padding * 2.0;
        let chart_height = self.height - self.padding - self.label_space;
        let baseline = self.padding + chart_height;

        let max_value = self
            .data
            .iter()
            .map(|d| d.value)
            .fold(0.0_f64, f64::max)
            .max(1.0);

        let bar_count = self.data.len();
        let gap_ratio = 0.2;
        let total_gap = chart_width * gap_ratio;
        let bar_width = (chart_width - total_gap) / bar_count as f64;
        let gap = total_gap / (bar_count + 1) as f64;

        let _ = writeln!(
            output,
            r##"    <line x1="{0}" y1="{baseline:.2}" x2="{1}" y2="{baseline:.2}" stroke="#333"/>"##,
            self.padding,
            self.width - self.padding
        );

        for (i, point) in self.data.iter().enumerate() {
            let x = self.padding + gap + (bar_width + gap) * i as f64;
            let bar_height = (point.value / max_value) * chart_height;
            let y = baseline - bar_height;
            let center = x + bar_width / 2.0;

            let _ = writeln!(
                output,
                r#"    <rect x="{x:.2}" y="{y:.2}" width="{bar_width:.2}" height="{bar_height:.2}" fill="{}"><title>{}: {}</title></rect>"#,
                color(0),
                escape_xml(&point.label),
                point.value
            );
            let _ = writeln!(
                output,
                r#"    <text x="{center:.2}" y="{:.2}" text-anchor="middle" font-family="sans-serif" font-size="11">{}</text>"#,
                y - 4.0,
                point.value
            );

            let label_y = baseline + 14.0;
            let _ = writeln!(
                output,
                r#"    <text x="{center:.2}" y="{label_y:.2}" text-anchor="end" transform="rotate(-45 {center:.2} {label_y:.2})" font-family="sans-serif" font-size="12">{}</text>"#,
                escape_xml(&point.label)
            );
        }

        output.push_str("</svg>\n");
        output
    }
}

fn write_svg(path: &Path, svg: &str) -> Result<PathBuf> {
    std::fs::write(path, svg).with_context(|| format!("Failed to write chart: {:?}", path))?;
    Ok(path.to_path_buf())
}

/// Writes the risk pie and the tag bar chart into `dir`.
///
/// Each chart is attempted on its own; only those written are returned.
pub fn write_charts(tally: &Tally, dir: &Path) -> Vec<PathBuf> {
    let mut written = Vec::new();

    if !tally.risks.is_empty() {
        let chart = PieChart::new(RISK_CHART_TITLE, data_points(&tally.risks));
        match write_svg(&dir.join(RISK_CHART_FILE), &chart.render()) {
            Ok(path) => written.push(path),
            Err(e) => warn!(error = %e, "Failed to generate risk chart"),
        }
    }

    if !tally.tags.is_empty() {
        let chart = BarChart::new(TAG_CHART_TITLE, data_points(&tally.tags));
        match write_svg(&dir.join(TAG_CHART_FILE), &chart.render()) {
            Ok(path) => written.push(path),
            Err(e) => warn!(error = %e, "Failed to generate tag chart"),
        }
    }

    written
}
