use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::{FontStyle, FontTransform, IntoFont, register_font};
use tracing::{info, warn};

use crate::error::DashError;

const CHART_WIDTH: u32 = 500;
const CHART_HEIGHT: u32 = 300;

/// System font paths probed for the text backend. The first readable TTF
/// wins and is registered as "sans-serif".
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Register a TTF font for chart text. Call once at startup; without a
/// registered font, renders that draw text will fail.
pub fn init_fonts() {
    for path in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(path) {
            // register_font wants 'static bytes; the font lives for the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                info!(path, "registered chart font");
                return;
            }
        }
    }
    warn!("no usable TTF font found; chart text rendering will fail");
}

/// Render a single time series with circular markers into a base64 PNG.
/// `points` pairs an ISO date label with the value for that day.
pub fn render_line_chart(title: &str, points: &[(String, f64)]) -> Result<String, DashError> {
    if points.is_empty() {
        return Err(DashError::Chart("no data points".to_string()));
    }

    let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        // the backend borrows `buf`; this scope releases the drawing context
        // before encoding
        let root =
            BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let (y_min, y_max) = value_bounds(points.iter().map(|(_, v)| *v));
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(55)
            .y_label_area_size(50)
            .build_cartesian_2d(0..points.len() as i32, y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Rate")
            .x_labels(7)
            .x_label_formatter(&|i| {
                points
                    .get(*i as usize)
                    .map(|(date, _)| date.clone())
                    .unwrap_or_default()
            })
            .x_label_style(
                ("sans-serif", 11)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| (i as i32, *v)),
                &BLUE,
            ))
            .map_err(chart_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .enumerate()
                    .map(|(i, (_, v))| Circle::new((i as i32, *v), 3, BLUE.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    encode_png_base64(&buf, CHART_WIDTH, CHART_HEIGHT)
}

/// Render categorical vertical bars into a base64 PNG.
pub fn render_bar_chart(
    title: &str,
    labels: &[String],
    values: &[f64],
) -> Result<String, DashError> {
    if labels.is_empty() || labels.len() != values.len() {
        return Err(DashError::Chart(format!(
            "mismatched bar chart input: {} labels, {} values",
            labels.len(),
            values.len()
        )));
    }

    let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let y_max = values.iter().cloned().fold(0.0f64, f64::max).max(1.0) * 1.1;
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 16))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..labels.len() as i32).into_segmented(), 0f64..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("Country")
            .y_desc("Total deaths")
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
                    .get(*i as usize)
                    .cloned()
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BLUE.filled())
                    .margin(8)
                    .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    encode_png_base64(&buf, CHART_WIDTH, CHART_HEIGHT)
}

fn encode_png_base64(rgb: &[u8], width: u32, height: u32) -> Result<String, DashError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(chart_err)?;
    Ok(BASE64_STANDARD.encode(png))
}

/// Padded y-axis bounds so flat series still get a visible range.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.01);
    (lo - pad, hi + pad)
}

fn chart_err<E: std::fmt::Display>(e: E) -> DashError {
    DashError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_buffer_as_base64_png() {
        let buf = vec![255u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
        let encoded = encode_png_base64(&buf, CHART_WIDTH, CHART_HEIGHT).unwrap();

        let png = BASE64_STANDARD.decode(encoded).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn value_bounds_pad_flat_series() {
        let (lo, hi) = value_bounds([4.5, 4.5, 4.5].into_iter());
        assert!(lo < 4.5);
        assert!(hi > 4.5);
    }

    #[test]
    fn value_bounds_of_empty_series_are_safe() {
        let (lo, hi) = value_bounds(std::iter::empty());
        assert!(lo < hi);
    }
}
