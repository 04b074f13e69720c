// src/renderer.rs

use crate::error::{Error, Result};
use crate::model::Sample;
use image::RgbImage;
use palette::{FromColor, Lch, Srgb};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

const FONT_FAMILY: &str = "sans-serif";

// Checked in order when no font is given on the command line
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub struct ChartOptions<'a> {
    pub output: &'a Path,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub font: Option<&'a Path>,
}

pub fn chart_title(ext: &str, folder: &Path) -> String {
    format!("Lines of {} Code Over Time in directory {}", ext, folder.display())
}

/// Draws the line counts against commit index and saves the chart as PNG.
pub fn render_chart(samples: &[Sample], opts: &ChartOptions<'_>) -> Result<()> {
    if opts.width == 0 || opts.height == 0 {
        return Err(Error::Render(format!(
            "invalid canvas size {}x{}",
            opts.width, opts.height
        )));
    }

    let with_text = ensure_font(opts.font);
    let mut buffer = vec![0u8; opts.width as usize * opts.height as usize * 3];
    draw(&mut buffer, samples, opts, with_text)?;

    let image = RgbImage::from_raw(opts.width, opts.height, buffer)
        .ok_or_else(|| Error::Render("pixel buffer does not match canvas size".to_string()))?;
    if let Some(parent) = opts.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    image.save(opts.output)?;
    Ok(())
}

fn draw(buffer: &mut [u8], samples: &[Sample], opts: &ChartOptions<'_>, with_text: bool) -> Result<()> {
    let root = BitMapBackend::with_buffer(buffer, (opts.width, opts.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let points: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.lines as f64))
        .collect();
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0f64, f64::max).max(1.0) * 1.05;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(12);
    if with_text {
        builder
            .caption(&opts.title, (FONT_FAMILY, 20))
            .x_label_area_size(40)
            .y_label_area_size(70);
    }
    let mut chart = builder
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(render_error)?;

    if with_text {
        chart
            .configure_mesh()
            .x_desc("Commit")
            .y_desc("Lines of Code")
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .label_style((FONT_FAMILY, 14))
            .axis_desc_style((FONT_FAMILY, 16))
            .draw()
            .map_err(render_error)?;
    } else {
        let area = chart.plotting_area();
        let (x_range, y_range) = (area.get_x_range(), area.get_y_range());
        area.draw(&Rectangle::new(
            [(x_range.start, y_range.start), (x_range.end, y_range.end)],
            BLACK.stroke_width(1),
        ))
        .map_err(render_error)?;
    }

    let color = series_color();
    let line = chart
        .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
        .map_err(render_error)?;
    if with_text {
        line.label("Lines").legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
        });
    }
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
        .map_err(render_error)?;

    if with_text {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT_FAMILY, 14))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    Ok(())
}

fn render_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Render(err.to_string())
}

fn series_color() -> RGBColor {
    let srgb: Srgb<f32> = Srgb::from_color(Lch::new(45.0f32, 70.0f32, 265.0f32));
    let (r, g, b) = srgb.into_components();
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    RGBColor(to_u8(r), to_u8(g), to_u8(b))
}

/// Registers a font for chart text. The outcome is remembered for the last requested
/// path only, so a different `--font` later in the same process is loaded again.
/// Returns false when no usable font exists, in which case the chart is drawn
/// without any text.
fn ensure_font(requested: Option<&Path>) -> bool {
    static LAST: Mutex<Option<(Option<PathBuf>, bool)>> = Mutex::new(None);
    let key = requested.map(Path::to_path_buf);

    let mut last = LAST.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some((cached, found)) = last.as_ref() {
        if *cached == key {
            return *found;
        }
    }
    let found = register_first_font(requested);
    *last = Some((key, found));
    found
}

fn register_first_font(requested: Option<&Path>) -> bool {
    let candidates: Vec<PathBuf> = match requested {
        Some(path) => vec![path.to_path_buf()],
        None => FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
    };
    for path in candidates {
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        // plotters keeps a reference for the lifetime of the process
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        if register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
            debug!(font = %path.display(), "registered chart font");
            return true;
        }
        warn!(font = %path.display(), "not a usable TrueType font");
    }
    warn!("no font found, chart is drawn without title and labels (use --font)");
    false
}
