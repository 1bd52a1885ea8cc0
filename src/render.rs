//! Chart rendering for a [`HistogramSpec`]: standalone SVG for the browser
//! and `--svg`, and a text bar chart for the terminal.

use std::fmt::Write as _;
use std::path::Path;

use crate::engine::{HistogramSpec, Method};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 56.0;
const Y_TICKS: u64 = 5;

pub fn chart_title(method: Method) -> String {
    format!("Monte Carlo Prediction — {}", method.display_name())
}

/// Render the histogram as a self-contained SVG document.
pub fn render_svg(hist: &HistogramSpec, title: &str) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x0 = MARGIN_LEFT;
    let y0 = MARGIN_TOP + plot_h;

    let lo = hist.bin_edges.first().copied().unwrap_or(0.0);
    let hi = hist.bin_edges.last().copied().unwrap_or(1.0);
    let span = if hi > lo { hi - lo } else { 1.0 };
    let y_max = hist.max_count().max(1) as f64;

    let x_of = |v: f64| x0 + (v - lo) / span * plot_w;
    let y_of = |c: f64| y0 - c / y_max * plot_h;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="24" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(title)
    );

    for (lower, upper, count) in hist.bins() {
        if count == 0 {
            continue;
        }
        let x = x_of(lower);
        let w = (x_of(upper) - x).max(0.5);
        let y = y_of(count as f64);
        let _ = writeln!(
            svg,
            r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{:.2}" fill="#1f77b4" stroke="white" stroke-width="0.5"><title>[{lower:.3}, {upper:.3}): {count}</title></rect>"##,
            y0 - y
        );
    }

    // axes
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{y0}" x2="{:.1}" y2="{y0}" stroke="black"/>"#,
        x0 + plot_w
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{x0}" y1="{MARGIN_TOP}" x2="{x0}" y2="{y0}" stroke="black"/>"#
    );

    for (value, anchor) in [(lo, "start"), ((lo + hi) / 2.0, "middle"), (hi, "end")] {
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="{anchor}">{}</text>"#,
            x_of(value),
            y0 + 18.0,
            format_tick(value)
        );
    }

    let step = (y_max / Y_TICKS as f64).ceil().max(1.0);
    let mut tick = 0.0;
    while tick <= y_max {
        let y = y_of(tick);
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{tick:.0}</text>"#,
            x0 - 6.0,
            y + 4.0
        );
        tick += step;
    }

    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">Predicted Value</text>"#,
        x0 + plot_w / 2.0,
        HEIGHT - 14.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="16" y="{:.1}" text-anchor="middle" transform="rotate(-90 16 {:.1})">Frequency</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    );
    svg.push_str("</svg>\n");
    svg
}

/// Horizontal text histogram, one line per bin.
pub fn render_ascii(hist: &HistogramSpec, bar_width: usize) -> String {
    let max = hist.max_count().max(1) as f64;
    let mut out = String::new();
    for (lower, upper, count) in hist.bins() {
        let len = ((count as f64 / max) * bar_width as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:>10} .. {:<10} {:>7} {}",
            format_tick(lower),
            format_tick(upper),
            count,
            "█".repeat(len)
        );
    }
    out
}

/// Write to a file, or stdout when no path is given.
pub fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        tracing::info!(path = %path.display(), "written");
    } else {
        print!("{content}");
    }
    Ok(())
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 1000.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::build_histogram;

    #[test]
    fn test_svg_has_bar_per_nonempty_bin() {
        let values: Vec<f64> = (0..400).map(|i| (i % 40) as f64 + 0.5).collect();
        let hist = build_histogram(&values).unwrap();
        let svg = render_svg(&hist, &chart_title(Method::Empirical));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Monte Carlo Prediction — Empirical Bootstrap"));
        assert!(svg.contains("Predicted Value"));
        let bars = svg.matches("fill=\"#1f77b4\"").count();
        let nonempty = hist.counts.iter().filter(|&&c| c > 0).count();
        assert_eq!(bars, nonempty);
    }

    #[test]
    fn test_title_is_escaped() {
        let hist = build_histogram(&[1.0, 2.0]).unwrap();
        let svg = render_svg(&hist, "a < b & c");
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_ascii_lines() {
        let hist = build_histogram(&[1.0, 2.0, 3.0]).unwrap();
        let text = render_ascii(&hist, 20);
        assert_eq!(text.lines().count(), hist.counts.len());
    }
}
