use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{FigureError, Result};
use crate::layout::{StateId, CAPTION_PT, MARKER_PT, STATE_LABEL_PT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "CanvasConfig::default_width_in")]
    pub width_in: f32,
    #[serde(default = "CanvasConfig::default_height_in")]
    pub height_in: f32,
    #[serde(default = "CanvasConfig::default_dpi")]
    pub dpi: f32,
    /// Axes placement as fractions of the canvas, measured from the left/bottom.
    #[serde(default = "CanvasConfig::default_left")]
    pub left: f32,
    #[serde(default = "CanvasConfig::default_right")]
    pub right: f32,
    #[serde(default = "CanvasConfig::default_bottom")]
    pub bottom: f32,
    #[serde(default = "CanvasConfig::default_top")]
    pub top: f32,
}

/// Pixel rectangle, origin at the top-left of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

impl CanvasConfig {
    fn default_width_in() -> f32 {
        5.0
    }
    fn default_height_in() -> f32 {
        5.0
    }
    fn default_dpi() -> f32 {
        100.0
    }
    fn default_left() -> f32 {
        0.125
    }
    fn default_right() -> f32 {
        0.9
    }
    fn default_bottom() -> f32 {
        0.11
    }
    fn default_top() -> f32 {
        0.88
    }

    pub fn size_px(&self) -> (u32, u32) {
        let w = (self.width_in * self.dpi).round().max(1.0) as u32;
        let h = (self.height_in * self.dpi).round().max(1.0) as u32;
        (w, h)
    }

    pub fn pt_to_px(&self, pt: f32) -> f32 {
        pt * self.dpi / 72.0
    }

    /// Where the axes land on the canvas.
    pub fn plot_rect_px(&self) -> PixelRect {
        let (w, h) = self.size_px();
        let (w, h) = (w as f32, h as f32);
        PixelRect {
            x0: (self.left * w).round() as i32,
            y0: ((1.0 - self.top) * h).round() as i32,
            x1: (self.right * w).round() as i32,
            y1: ((1.0 - self.bottom) * h).round() as i32,
        }
    }

    fn check(&self) -> std::result::Result<(), String> {
        require_positive("canvas.width_in", self.width_in)?;
        require_positive("canvas.height_in", self.height_in)?;
        require_positive("canvas.dpi", self.dpi)?;
        let in_unit = |v: f32| (0.0..=1.0).contains(&v);
        if !(in_unit(self.left) && in_unit(self.right) && in_unit(self.bottom) && in_unit(self.top))
        {
            return Err("subplot fractions must lie in [0, 1]".into());
        }
        if self.left >= self.right || self.bottom >= self.top {
            return Err("subplot fractions leave no room for the axes".into());
        }
        Ok(())
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width_in: Self::default_width_in(),
            height_in: Self::default_height_in(),
            dpi: Self::default_dpi(),
            left: Self::default_left(),
            right: Self::default_right(),
            bottom: Self::default_bottom(),
            top: Self::default_top(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "StyleConfig::default_path_rgb")]
    pub path_rgb: [u8; 3],
    #[serde(default = "StyleConfig::default_path_width_pt")]
    pub path_width_pt: f32,
    #[serde(default = "StyleConfig::default_marker_rgb")]
    pub marker_rgb: [u8; 3],
    #[serde(default = "StyleConfig::default_marker_size_pt")]
    pub marker_size_pt: f32,
    #[serde(default = "StyleConfig::default_state_label_pt")]
    pub state_label_pt: f32,
    #[serde(default = "StyleConfig::default_caption_pt")]
    pub caption_pt: f32,
    #[serde(default = "StyleConfig::default_frame_width_pt")]
    pub frame_width_pt: f32,
    #[serde(default = "StyleConfig::default_font_family")]
    pub font_family: String,
}

impl StyleConfig {
    fn default_path_rgb() -> [u8; 3] {
        [255, 0, 0]
    }
    fn default_path_width_pt() -> f32 {
        2.0
    }
    fn default_marker_rgb() -> [u8; 3] {
        [0, 128, 0]
    }
    fn default_marker_size_pt() -> f32 {
        MARKER_PT
    }
    fn default_state_label_pt() -> f32 {
        STATE_LABEL_PT
    }
    fn default_caption_pt() -> f32 {
        CAPTION_PT
    }
    fn default_frame_width_pt() -> f32 {
        0.8
    }
    fn default_font_family() -> String {
        "sans-serif".to_string()
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            path_rgb: Self::default_path_rgb(),
            path_width_pt: Self::default_path_width_pt(),
            marker_rgb: Self::default_marker_rgb(),
            marker_size_pt: Self::default_marker_size_pt(),
            state_label_pt: Self::default_state_label_pt(),
            caption_pt: Self::default_caption_pt(),
            frame_width_pt: Self::default_frame_width_pt(),
            font_family: Self::default_font_family(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(FigureError::UnsupportedFormat(ext)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_path")]
    pub path: PathBuf,
    /// Inferred from the path extension when unset.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl OutputConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("target/plots/gridworld.png")
    }

    pub fn resolved_format(&self) -> Result<OutputFormat> {
        match self.format {
            Some(f) => Ok(f),
            None => OutputFormat::from_path(&self.path),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    #[serde(default = "MarkerConfig::default_state")]
    pub state: String,
}

impl MarkerConfig {
    fn default_state() -> String {
        "S0".to_string()
    }

    pub fn state_id(&self) -> Result<StateId> {
        StateId::parse(&self.state)
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            state: Self::default_state(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FigureConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub marker: MarkerConfig,
}

fn require_positive(name: &str, v: f32) -> std::result::Result<(), String> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a positive number, got {v}"))
    }
}

impl FigureConfig {
    /// Parsed config that also passes `validate`; invalid files fall back to defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str::<FigureConfig>(&contents) {
                    Ok(cfg) => match cfg.validate() {
                        Ok(()) => {
                            debug!("loaded config from {path}");
                            return cfg;
                        }
                        Err(err) => warn!("Invalid config {path}: {err}. Using defaults."),
                    },
                    Err(err) => warn!("Failed to parse config {path}: {err}. Using defaults."),
                },
                Err(err) => warn!("Failed to read config {path}: {err}. Using defaults."),
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, Self::commented_template(&text)) {
                    warn!("Failed to write default config to {path}: {err}");
                } else {
                    debug!("wrote default config to {path}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}; continuing with defaults"),
        }
        default_cfg
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        self.canvas.check()?;
        let style = &self.style;
        require_positive("style.path_width_pt", style.path_width_pt)?;
        require_positive("style.marker_size_pt", style.marker_size_pt)?;
        require_positive("style.state_label_pt", style.state_label_pt)?;
        require_positive("style.caption_pt", style.caption_pt)?;
        require_positive("style.frame_width_pt", style.frame_width_pt)?;
        self.marker.state_id().map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Every key commented out so the file documents the defaults without pinning them.
    fn commented_template(text: &str) -> String {
        text.lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || (trimmed.starts_with('[') && trimmed.ends_with(']')) {
                    format!("{line}\n")
                } else {
                    format!("# {}\n", Self::tidy_float(line))
                }
            })
            .collect()
    }

    /// f32 fields serialize through f64 (0.8 -> 0.800000011920929); print them short.
    fn tidy_float(line: &str) -> String {
        let Some((lhs, rhs)) = line.split_once('=') else {
            return line.to_string();
        };
        let rhs = rhs.trim();
        if !rhs.contains('.') {
            return line.to_string();
        }
        match rhs.parse::<f32>() {
            Ok(val) => {
                let mut short = val.to_string();
                if !short.contains('.') {
                    short.push_str(".0");
                }
                format!("{} = {}", lhs.trim(), short)
            }
            Err(_) => line.to_string(),
        }
    }
}
