//! Bar, heatmap, line and placeholder charts

use super::canvas::{Canvas, BLACK, BLUE, GRID, MUTED, ORANGE, WHITE};
use image::Rgb;

const LEFT: i64 = 70;
const RIGHT: i64 = 20;
const TOP: i64 = 44;
const BOTTOM: i64 = 40;

/// Short axis/label rendering of a number
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e12 {
        format!("{:.0}", value)
    } else if value.abs() >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn frame(canvas: &mut Canvas, title: &str) -> (i64, i64, i64, i64) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    canvas.text_centered(width / 2, 12, title, 2, BLACK);

    let (x0, y0, x1, y1) = (LEFT, TOP, width - RIGHT, height - BOTTOM);
    canvas.line(x0, y0, x0, y1, BLACK);
    canvas.line(x0, y1, x1, y1, BLACK);
    (x0, y0, x1, y1)
}

fn y_scale(canvas: &mut Canvas, (x0, y0, x1, y1): (i64, i64, i64, i64), max: f64) {
    for step in 0..=4 {
        let y = y1 - (y1 - y0) * step / 4;
        if step > 0 {
            canvas.line(x0 + 1, y, x1, y, GRID);
        }
        let label = format_value(max * step as f64 / 4.0);
        let width = Canvas::text_width(&label, 1) as i64;
        canvas.text(x0 - 6 - width, y - 3, &label, 1, BLACK);
    }
}

/// One bar per `(label, value)`, scaled to the largest value
pub fn bar_chart(title: &str, unit: &str, bars: &[(String, f64)]) -> Canvas {
    let mut canvas = Canvas::new(600, 320);
    let area = frame(&mut canvas, title);
    let (x0, y0, x1, y1) = area;

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    y_scale(&mut canvas, area, max);
    canvas.text(4, y0 - 14, unit, 1, BLACK);

    if bars.is_empty() {
        return canvas;
    }

    let slot = (x1 - x0) / bars.len() as i64;
    let bar_width = (slot * 3 / 5).max(1);
    for (i, (label, value)) in bars.iter().enumerate() {
        let height = ((value.max(0.0) / max) * (y1 - y0) as f64).round() as i64;
        let left = x0 + slot * i as i64 + (slot - bar_width) / 2;
        let color = if i % 2 == 0 { BLUE } else { ORANGE };
        canvas.fill_rect(left, y1 - height, bar_width as u32, height as u32, color);

        let center = left + bar_width / 2;
        canvas.text_centered(center, y1 - height - 10, &format_value(*value), 1, BLACK);
        canvas.text_centered(center, y1 + 8, label, 1, BLACK);
    }

    canvas
}

/// Colour for a position `t` in `[0, 1]`, dark purple through teal to yellow
fn heat(t: f64) -> Rgb<u8> {
    const STOPS: [(f64, [f64; 3]); 3] = [
        (0.0, [68.0, 1.0, 84.0]),
        (0.5, [33.0, 145.0, 140.0]),
        (1.0, [253.0, 231.0, 37.0]),
    ];
    let t = t.clamp(0.0, 1.0);
    let (lo, hi) = if t <= 0.5 { (STOPS[0], STOPS[1]) } else { (STOPS[1], STOPS[2]) };
    let f = (t - lo.0) / (hi.0 - lo.0);
    let channel = |c: usize| (lo.1[c] + (hi.1[c] - lo.1[c]) * f).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}

/// Grid of `rows` x `columns`; each cell coloured by its value, `None` greyed out
pub fn heatmap(title: &str, rows: &[String], columns: &[&str], matrix: &[Vec<Option<f64>>]) -> Canvas {
    let mut canvas = Canvas::new(520, 120 + 50 * rows.len().max(1) as u32);
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    canvas.text_centered(width / 2, 12, title, 2, BLACK);

    let values: Vec<f64> = matrix.iter().flatten().flatten().copied().collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (x0, y0) = (LEFT + 20, TOP);
    let cell_width = ((width - x0 - RIGHT) / columns.len().max(1) as i64).max(1);
    let cell_height = ((height - y0 - BOTTOM) / rows.len().max(1) as i64).max(1);

    for (r, row_label) in rows.iter().enumerate() {
        let top = y0 + cell_height * r as i64;
        let label_width = Canvas::text_width(row_label, 1) as i64;
        canvas.text(x0 - 8 - label_width, top + cell_height / 2 - 3, row_label, 1, BLACK);

        for (c, _) in columns.iter().enumerate() {
            let left = x0 + cell_width * c as i64;
            let value = matrix.get(r).and_then(|row| row.get(c)).copied().flatten();
            let (fill, ink, text) = match value {
                Some(v) => {
                    let t = if max > min { (v - min) / (max - min) } else { 0.5 };
                    (heat(t), if t < 0.5 { WHITE } else { BLACK }, format_value(v))
                }
                None => (MUTED, BLACK, "N/A".to_string()),
            };
            canvas.fill_rect(left, top, (cell_width as u32).saturating_sub(2), (cell_height as u32).saturating_sub(2), fill);
            canvas.text_centered(left + cell_width / 2, top + cell_height / 2 - 3, &text, 1, ink);
        }
    }

    let bottom = y0 + cell_height * rows.len() as i64;
    for (c, label) in columns.iter().enumerate() {
        let center = x0 + cell_width * c as i64 + cell_width / 2;
        canvas.text_centered(center, bottom + 8, label, 1, BLACK);
    }

    canvas
}

/// `series` against its sample index
pub fn line_chart(title: &str, y_label: &str, x_label: &str, series: &[f64]) -> Canvas {
    let mut canvas = Canvas::new(640, 400);
    let area = frame(&mut canvas, title);
    let (x0, y0, x1, y1) = area;

    let max = series.iter().copied().filter(|v| v.is_finite()).fold(0.0_f64, f64::max);
    let max = if max > 0.0 { max } else { 1.0 };
    y_scale(&mut canvas, area, max);
    canvas.text(4, y0 - 14, y_label, 1, BLACK);
    canvas.text_centered((x0 + x1) / 2, y1 + 22, x_label, 1, BLACK);

    if series.is_empty() {
        return canvas;
    }

    let last = (series.len() - 1).max(1) as f64;
    let point = |i: usize, v: f64| {
        let x = x0 + ((x1 - x0) as f64 * i as f64 / last).round() as i64;
        let y = y1 - ((y1 - y0) as f64 * (v.max(0.0) / max)).round() as i64;
        (x, y)
    };

    canvas.text(x0 - 3, y1 + 8, "0", 1, BLACK);
    let end_label = (series.len() - 1).to_string();
    canvas.text_centered(x1, y1 + 8, &end_label, 1, BLACK);

    let mut previous = point(0, series[0]);
    canvas.fill_rect(previous.0 - 1, previous.1 - 1, 3, 3, BLUE);
    for (i, value) in series.iter().enumerate().skip(1) {
        let next = point(i, *value);
        canvas.line(previous.0, previous.1, next.0, next.1, BLUE);
        previous = next;
    }

    canvas
}

/// Blank chart carrying an explanation
pub fn placeholder(message: &str) -> Canvas {
    let mut canvas = Canvas::new(400, 300);
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    canvas.text_centered(width / 2, height / 2 - 3, message, 1, BLACK);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(200.0), "200");
        assert_eq!(format_value(120.5), "120.5");
        assert_eq!(format_value(0.25), "0.25");
    }

    #[test]
    fn test_bar_chart_draws_bars() {
        let canvas = bar_chart("avg", "ms", &[("k6".to_string(), 100.0), ("locust".to_string(), 50.0)]);
        // first bar reaches the top of the plot area
        let bar_x = LEFT as u32 + (600 - (LEFT + RIGHT) as u32) / 4;
        assert_eq!(canvas.pixel(bar_x, (320 - BOTTOM) as u32 - 1), BLUE);
        assert_eq!(canvas.pixel(bar_x, TOP as u32 + 1), BLUE);
    }

    #[test]
    fn test_heat_scale_ends() {
        assert_eq!(heat(0.0), Rgb([68, 1, 84]));
        assert_eq!(heat(1.0), Rgb([253, 231, 37]));
        assert_eq!(heat(0.5), Rgb([33, 145, 140]));
    }

    #[test]
    fn test_heatmap_missing_cells_are_grey() {
        let rows = vec!["k6".to_string()];
        let canvas = heatmap("p", &rows, &["p90", "p95"], &[vec![Some(1.0), None]]);
        let x0 = (LEFT + 20) as u32;
        let cell_width = (520 - x0 - RIGHT as u32) / 2;
        assert_eq!(canvas.pixel(x0 + cell_width + 2, TOP as u32 + 2), MUTED);
        assert_eq!(canvas.pixel(x0 + 2, TOP as u32 + 2), heat(0.5));
    }

    #[test]
    fn test_line_and_placeholder() {
        let canvas = line_chart("rt", "ms", "samples", &[1.0, 3.0, 2.0]);
        assert_eq!((canvas.width(), canvas.height()), (640, 400));
        let canvas = line_chart("rt", "ms", "samples", &[]);
        assert_eq!(canvas.width(), 640);
        let canvas = placeholder("nothing here");
        assert_eq!(canvas.height(), 300);
    }
}
