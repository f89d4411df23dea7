//! Pie chart rendering for the statistics views
//!
//! Charts are drawn as SVG: slices start at 12 o'clock and run
//! counter-clockwise, each labelled with its name and its share formatted
//! with one decimal.

use base64::{Engine, engine::general_purpose::STANDARD};
use std::f64::consts::PI;
use std::fmt::Write;

const SIZE: f64 = 600.0;
const CENTER_X: f64 = 300.0;
const CENTER_Y: f64 = 320.0;
const RADIUS: f64 = 200.0;
const START_ANGLE: f64 = 90.0;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Render a pie chart and return it base64-encoded, ready for a data URI
pub fn pie_chart_base64(data: &[(String, usize)], title: &str) -> String {
    STANDARD.encode(pie_chart_svg(data, title))
}

/// Render a pie chart as an SVG document
pub fn pie_chart_svg(data: &[(String, usize)], title: &str) -> String {
    let slices: Vec<(&str, usize)> = data
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    let total: usize = slices.iter().map(|(_, count)| count).sum();

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{SIZE}" height="{SIZE}" viewBox="0 0 {SIZE} {SIZE}">"#
    );
    let _ = write!(
        svg,
        r#"<text x="{CENTER_X}" y="40" text-anchor="middle" font-family="sans-serif" font-size="20">{}</text>"#,
        escape(title)
    );

    let mut angle = START_ANGLE;
    for (index, (label, count)) in slices.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let sweep = share * 360.0;
        let color = PALETTE[index % PALETTE.len()];

        if slices.len() == 1 {
            let _ = write!(
                svg,
                r#"<circle cx="{CENTER_X}" cy="{CENTER_Y}" r="{RADIUS}" fill="{color}"/>"#
            );
        } else {
            let (x0, y0) = point(angle, RADIUS);
            let (x1, y1) = point(angle + sweep, RADIUS);
            let large_arc = u8::from(sweep > 180.0);
            let _ = write!(
                svg,
                r#"<path d="M {CENTER_X} {CENTER_Y} L {x0:.2} {y0:.2} A {RADIUS} {RADIUS} 0 {large_arc} 0 {x1:.2} {y1:.2} Z" fill="{color}"/>"#
            );
        }

        let middle = angle + sweep / 2.0;
        let (lx, ly) = point(middle, RADIUS * 1.1);
        let anchor = if lx < CENTER_X { "end" } else { "start" };
        let _ = write!(
            svg,
            r#"<text x="{lx:.2}" y="{ly:.2}" text-anchor="{anchor}" font-family="sans-serif" font-size="14">{}</text>"#,
            escape(label)
        );

        let (px, py) = point(middle, RADIUS * 0.6);
        let _ = write!(
            svg,
            r#"<text x="{px:.2}" y="{py:.2}" text-anchor="middle" font-family="sans-serif" font-size="14">{:.1}%</text>"#,
            share * 100.0
        );

        angle += sweep;
    }

    svg.push_str("</svg>");
    svg
}

/// Point on the circle at `degrees`, measured counter-clockwise from 3 o'clock
fn point(degrees: f64, radius: f64) -> (f64, f64) {
    let radians = degrees * PI / 180.0;
    (
        CENTER_X + radius * radians.cos(),
        CENTER_Y - radius * radians.sin(),
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
