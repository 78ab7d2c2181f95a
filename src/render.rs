//! render.rs — Draws a [`Scene`] with plotters.
//!
//! Draw order: white canvas, axes frame, path strokes, marker, then labels, so
//! text stays readable on top of the marker. No mesh, ticks or tick labels.

use std::error::Error;
use std::fs::create_dir_all;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf32;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::config::{FigureConfig, OutputFormat};
use crate::error::{FigureError, Result};
use crate::layout::Scene;

/// plotters sizes text by line height; the emitted glyph size is `size / 1.24`.
const TEXT_LINE_HEIGHT: f64 = 1.24;

/// Horizontally centered. plotters has no baseline anchor, so the bottom
/// anchor is used; SVG output lifts the baseline by half an ex (`dy="-0.5ex"`).
fn label_anchor() -> Pos {
    Pos::new(HPos::Center, VPos::Bottom)
}

type SceneChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf32, RangedCoordf32>>;

fn rgb(c: [u8; 3]) -> RGBColor {
    RGBColor(c[0], c[1], c[2])
}

fn stroke_px(cfg: &FigureConfig, pt: f32) -> u32 {
    cfg.canvas.pt_to_px(pt).round().max(1.0) as u32
}

fn render_err(err: impl std::fmt::Display) -> FigureError {
    FigureError::Render(err.to_string())
}

/// Draws the whole figure onto `root`; the caller presents it.
pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    cfg: &FigureConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (w, h) = root.dim_in_pixel();
    let rect = cfg.canvas.plot_rect_px();
    let axes = root.margin(rect.y0, h as i32 - rect.y1, rect.x0, w as i32 - rect.x1);

    let (x0, x1) = scene.x_range;
    let (y0, y1) = scene.y_range;
    let mut chart = ChartBuilder::on(&axes).build_cartesian_2d(x0..x1, y0..y1)?;

    draw_frame(&mut chart, scene, cfg)?;
    draw_path(&mut chart, scene, cfg)?;
    draw_marker(&mut chart, scene, cfg)?;
    draw_labels(&mut chart, scene, cfg)?;
    Ok(())
}

fn draw_frame<DB: DrawingBackend>(
    chart: &mut SceneChart<'_, DB>,
    scene: &Scene,
    cfg: &FigureConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let style = ShapeStyle::from(&BLACK).stroke_width(stroke_px(cfg, cfg.style.frame_width_pt));
    chart.draw_series(std::iter::once(Rectangle::new(
        [
            (scene.x_range.0, scene.y_range.0),
            (scene.x_range.1, scene.y_range.1),
        ],
        style,
    )))?;
    Ok(())
}

fn draw_path<DB: DrawingBackend>(
    chart: &mut SceneChart<'_, DB>,
    scene: &Scene,
    cfg: &FigureConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let style = ShapeStyle::from(&rgb(cfg.style.path_rgb))
        .stroke_width(stroke_px(cfg, cfg.style.path_width_pt));
    chart.draw_series(
        scene
            .path
            .iter()
            .map(|seg| PathElement::new(vec![seg.from.xy(), seg.to.xy()], style)),
    )?;
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    chart: &mut SceneChart<'_, DB>,
    scene: &Scene,
    cfg: &FigureConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let radius = (cfg.canvas.pt_to_px(scene.marker.size_pt) / 2.0)
        .round()
        .max(1.0) as u32;
    chart.draw_series(std::iter::once(Circle::new(
        scene.marker.at.xy(),
        radius,
        rgb(cfg.style.marker_rgb).filled(),
    )))?;
    Ok(())
}

fn draw_labels<DB: DrawingBackend>(
    chart: &mut SceneChart<'_, DB>,
    scene: &Scene,
    cfg: &FigureConfig,
) -> std::result::Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let family = cfg.style.font_family.as_str();
    for label in &scene.labels {
        let size = cfg.canvas.pt_to_px(label.size_pt) as f64 * TEXT_LINE_HEIGHT;
        let style = (family, size).into_font().color(&BLACK).pos(label_anchor());
        chart.draw_series(std::iter::once(Text::new(
            label.text.clone(),
            label.at.xy(),
            style,
        )))?;
    }
    Ok(())
}

/// Renders to an in-memory SVG document.
pub fn render_svg(scene: &Scene, cfg: &FigureConfig) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, cfg.canvas.size_px()).into_drawing_area();
        draw_scene(&root, scene, cfg).map_err(render_err)?;
        root.present().map_err(render_err)?;
    }
    Ok(buf)
}

pub fn render_to_path(
    scene: &Scene,
    cfg: &FigureConfig,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let size = cfg.canvas.size_px();
    debug!(?format, ?size, "rendering {}", path.display());
    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_scene(&root, scene, cfg).map_err(render_err)?;
            root.present().map_err(render_err)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_scene(&root, scene, cfg).map_err(render_err)?;
            root.present().map_err(render_err)?;
        }
    }
    Ok(())
}
