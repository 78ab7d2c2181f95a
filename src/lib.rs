pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;

pub use error::{FigureError, Result};
