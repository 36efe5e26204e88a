//! Host configuration: canvas size, background, and grid.
//!
//! Every field is optional on the wire and falls back to the defaults in
//! [`crate::consts`]. Values that would make the geometry meaningless
//! (non-positive or non-finite sizes) are replaced by those defaults in
//! [`BoardConfig::sanitized`], with a warning, rather than rejected.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consts::{DEFAULT_BACKGROUND, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_GRID_SIZE};
use crate::geometry::Size;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Canvas and grid settings supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Canvas width in board units.
    pub board_width: f64,
    /// Canvas height in board units.
    pub board_height: f64,
    /// CSS colour painted behind the items and into exports.
    pub background_color: String,
    /// Whether drag and resize snap to the grid.
    pub grid_enabled: bool,
    /// Grid cell size.
    pub grid_size: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            background_color: DEFAULT_BACKGROUND.to_owned(),
            grid_enabled: false,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

fn positive_or(field: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(field, value, default, "invalid board config value; using default");
        default
    }
}

impl BoardConfig {
    /// Parse a JSON object of host settings. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if `json` is not a valid settings object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace unusable dimensions and grid size with defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.board_width = positive_or("boardWidth", self.board_width, DEFAULT_BOARD_WIDTH);
        self.board_height = positive_or("boardHeight", self.board_height, DEFAULT_BOARD_HEIGHT);
        self.grid_size = positive_or("gridSize", self.grid_size, DEFAULT_GRID_SIZE);
        if self.background_color.trim().is_empty() {
            warn!("empty background colour; using default");
            DEFAULT_BACKGROUND.clone_into(&mut self.background_color);
        }
        self
    }

    /// Canvas extent.
    #[must_use]
    pub fn board_size(&self) -> Size {
        Size::new(self.board_width, self.board_height)
    }
}
