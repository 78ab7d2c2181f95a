use thiserror::Error;

pub type Result<T> = std::result::Result<T, FigureError>;

#[derive(Debug, Error)]
pub enum FigureError {
    #[error("invalid state {0:?} (expected S0..S8)")]
    InvalidState(String),

    #[error("{what} at ({x}, {y}) lies outside the axis limits")]
    OutOfBounds { what: String, x: f32, y: f32 },

    #[error("path endpoint ({x}, {y}) is not on a grid line")]
    OffGrid { x: f32, y: f32 },

    #[error("unsupported output format {0:?} (expected png or svg)")]
    UnsupportedFormat(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
