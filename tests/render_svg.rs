use std::fs;
use std::path::PathBuf;

use gridfigure::config::{FigureConfig, OutputFormat};
use gridfigure::layout::{Scene, StateId};
use gridfigure::render::{render_svg, render_to_path};

fn unique_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "gridfigure_render_{}_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        name
    ));
    path
}

/// (attributes, content) for each `<text>` element.
fn text_elements(svg: &str) -> Vec<(String, String)> {
    svg.split("<text")
        .skip(1)
        .filter_map(|chunk| {
            let body = chunk.split("</text>").next()?;
            let (attrs, content) = body.split_once('>')?;
            Some((attrs.to_string(), content.trim().to_string()))
        })
        .collect()
}

fn attr<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let key = format!(" {name}=\"");
    let start = attrs.find(&key)? + key.len();
    let len = attrs[start..].find('"')?;
    Some(&attrs[start..start + len])
}

#[test]
fn svg_contains_every_label() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    for label in &scene.labels {
        assert!(
            svg.contains(&format!("{}</text>", label.text)),
            "missing label {}",
            label.text
        );
    }
}

#[test]
fn svg_uses_path_and_marker_colors() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap().to_lowercase();
    assert!(svg.contains("#ff0000"), "path strokes should be red");
    assert!(svg.contains("#008000"), "marker should be green");
}

#[test]
fn svg_draws_no_tick_labels() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    assert_eq!(svg.matches("<text").count(), scene.labels.len());
}

#[test]
fn marker_is_drawn_before_labels() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    let circle = svg.find("<circle").expect("marker circle");
    let first_text = svg.find("<text").expect("label text");
    assert!(circle < first_text);
}

#[test]
fn render_to_path_writes_svg_file() {
    let dir = unique_path("out");
    let path = dir.join("grid.svg");
    let cfg = FigureConfig::default();
    let scene = Scene::maze(StateId::parse("S4").unwrap()).unwrap();
    render_to_path(&scene, &cfg, &path, OutputFormat::Svg).unwrap();

    let text = fs::read_to_string(&path).expect("svg written");
    assert!(text.contains("<svg"));
    assert!(text.contains("S4</text>"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn svg_font_size_matches_point_size() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    let state_px = cfg.canvas.pt_to_px(14.0) as f64;
    let caption_px = cfg.canvas.pt_to_px(10.0) as f64;

    let texts = text_elements(&svg);
    assert_eq!(texts.len(), 11);
    for (attrs, content) in &texts {
        let size: f64 = attr(attrs, "font-size")
            .expect("font-size attribute")
            .parse()
            .expect("numeric font-size");
        let is_state = content.len() == 2 && content.starts_with('S');
        let expected = if is_state { state_px } else { caption_px };
        assert!(
            (size - expected).abs() < 1e-3,
            "{content}: font-size {size}, expected {expected}"
        );
    }
}

#[test]
fn labels_are_centered_with_bottom_anchor() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    for (attrs, content) in text_elements(&svg) {
        assert_eq!(attr(&attrs, "text-anchor"), Some("middle"), "{content}");
        assert_eq!(attr(&attrs, "dy"), Some("-0.5ex"), "{content}");
    }
}

#[test]
fn svg_draws_axes_frame_at_plot_rect() {
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    let svg = render_svg(&scene, &cfg).unwrap();
    let rect = cfg.canvas.plot_rect_px();

    let frames: Vec<&str> = svg
        .split("<rect")
        .skip(1)
        .filter(|r| r.contains("fill=\"none\"") && r.contains("stroke=\"#000000\""))
        .collect();
    assert_eq!(frames.len(), 1, "exactly one axes frame");
    assert_eq!(attr(frames[0], "x"), Some(rect.x0.to_string().as_str()));
    assert_eq!(attr(frames[0], "y"), Some(rect.y0.to_string().as_str()));
}

#[test]
fn render_to_path_writes_png_file() {
    let dir = unique_path("png");
    let path = dir.join("grid.png");
    let cfg = FigureConfig::default();
    let scene = Scene::from_config(&cfg).unwrap();
    render_to_path(&scene, &cfg, &path, OutputFormat::Png).unwrap();

    let bytes = fs::read(&path).expect("png written");
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']));

    let _ = fs::remove_dir_all(&dir);
}
