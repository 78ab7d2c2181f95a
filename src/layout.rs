//! layout.rs — Declarative scene for the 3×3 grid-world figure.
//!
//! Cells are numbered row-major from the top-left (S0) to the bottom-right
//! (S8). Data coordinates put the origin at the bottom-left corner, one unit
//! per cell, so S0 is centered at (0.5, 2.5) and S8 at (2.5, 0.5).

use serde::Serialize;

use crate::config::FigureConfig;
use crate::error::{FigureError, Result};

pub const GRID_COLS: u8 = 3;
pub const GRID_ROWS: u8 = 3;

pub const STATE_LABEL_PT: f32 = 14.0;
pub const CAPTION_PT: f32 = 10.0;
pub const MARKER_PT: f32 = 60.0;

/// Captions sit this far below the center of the cell they annotate.
const CAPTION_DROP: f32 = 0.2;

const START_STATE: StateId = StateId(0);
const GOAL_STATE: StateId = StateId(8);

/// Hand-placed path strokes along cell borders, as (x0, y0, x1, y1).
const PATH_STROKES: [(f32, f32, f32, f32); 4] = [
    (1.0, 0.0, 1.0, 1.0),
    (1.0, 2.0, 2.0, 2.0),
    (2.0, 2.0, 2.0, 1.0),
    (2.0, 1.0, 3.0, 1.0),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct StateId(u8);

impl StateId {
    pub const COUNT: u8 = GRID_COLS * GRID_ROWS;

    pub fn new(index: u8) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(FigureError::InvalidState(format!("S{index}")))
        }
    }

    /// Accepts "S4", "s4" or a bare "4".
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('S')
            .or_else(|| trimmed.strip_prefix('s'))
            .unwrap_or(trimmed);
        digits
            .parse::<u8>()
            .map_err(|_| FigureError::InvalidState(s.to_string()))
            .and_then(Self::new)
    }

    pub fn all() -> impl Iterator<Item = StateId> {
        (0..Self::COUNT).map(StateId)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Row counted from the top.
    pub fn row(self) -> u8 {
        self.0 / GRID_COLS
    }

    pub fn col(self) -> u8 {
        self.0 % GRID_COLS
    }

    pub fn label(self) -> String {
        format!("S{}", self.0)
    }

    pub fn center(self) -> Point {
        Point {
            x: self.col() as f32 + 0.5,
            y: (GRID_ROWS - 1 - self.row()) as f32 + 0.5,
        }
    }
}

impl Default for StateId {
    fn default() -> Self {
        START_STATE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn xy(self) -> (f32, f32) {
        (self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRole {
    State(StateId),
    Start,
    Goal,
}

/// Text centered horizontally on `at`, bottom-anchored at `at.y`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub at: Point,
    pub size_pt: f32,
    pub role: LabelRole,
}

/// Filled circle; `size_pt` is the diameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub state: StateId,
    pub at: Point,
    pub size_pt: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
    pub path: Vec<Segment>,
    pub labels: Vec<Label>,
    pub marker: Marker,
}

impl Scene {
    /// The fixed grid-world figure with the marker on `marker_state`.
    pub fn maze(marker_state: StateId) -> Result<Self> {
        let path = PATH_STROKES
            .iter()
            .map(|&(x0, y0, x1, y1)| Segment {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
            })
            .collect();

        let mut labels: Vec<Label> = StateId::all()
            .map(|s| Label {
                text: s.label(),
                at: s.center(),
                size_pt: STATE_LABEL_PT,
                role: LabelRole::State(s),
            })
            .collect();
        labels.push(caption("START", START_STATE, LabelRole::Start));
        labels.push(caption("GOAL", GOAL_STATE, LabelRole::Goal));

        let scene = Self {
            x_range: (0.0, GRID_COLS as f32),
            y_range: (0.0, GRID_ROWS as f32),
            path,
            labels,
            marker: Marker {
                state: marker_state,
                at: marker_state.center(),
                size_pt: MARKER_PT,
            },
        };
        scene.validate()?;
        Ok(scene)
    }

    /// `maze` with the marker state and text/marker sizes taken from `cfg`.
    pub fn from_config(cfg: &FigureConfig) -> Result<Self> {
        let mut scene = Self::maze(cfg.marker.state_id()?)?;
        for label in &mut scene.labels {
            label.size_pt = match label.role {
                LabelRole::State(_) => cfg.style.state_label_pt,
                LabelRole::Start | LabelRole::Goal => cfg.style.caption_pt,
            };
        }
        scene.marker.size_pt = cfg.style.marker_size_pt;
        Ok(scene)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, seg) in self.path.iter().enumerate() {
            for p in [seg.from, seg.to] {
                self.check_inside(&format!("path segment {i}"), p)?;
                if p.x.fract() != 0.0 || p.y.fract() != 0.0 {
                    return Err(FigureError::OffGrid { x: p.x, y: p.y });
                }
            }
        }
        for label in &self.labels {
            self.check_inside(&format!("label {:?}", label.text), label.at)?;
        }
        self.check_inside("marker", self.marker.at)
    }

    /// Pretty JSON, as printed by `--dump-scene`.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn state_labels(&self) -> impl Iterator<Item = &Label> {
        self.labels
            .iter()
            .filter(|l| matches!(l.role, LabelRole::State(_)))
    }

    pub fn label_for(&self, role: LabelRole) -> Option<&Label> {
        self.labels.iter().find(|l| l.role == role)
    }

    fn check_inside(&self, what: &str, p: Point) -> Result<()> {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        if p.x < x0 || p.x > x1 || p.y < y0 || p.y > y1 {
            return Err(FigureError::OutOfBounds {
                what: what.to_string(),
                x: p.x,
                y: p.y,
            });
        }
        Ok(())
    }
}

fn caption(text: &str, state: StateId, role: LabelRole) -> Label {
    let c = state.center();
    Label {
        text: text.to_string(),
        at: Point::new(c.x, c.y - CAPTION_DROP),
        size_pt: CAPTION_PT,
        role,
    }
}
