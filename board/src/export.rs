//! Export: capture the visible scene and hand it to a renderer.
//!
//! Rasterizing is the host's business; this module only defines what a
//! renderer receives ([`Scene`]) and how its result travels back
//! ([`ExportJob::run`]). A job owns a copy of the scene taken when the export
//! was requested, so the board stays fully editable while the host awaits
//! the render.
//!
//! ERROR HANDLING
//! ==============
//! A failed render is logged and swallowed. The export callback only ever
//! sees a successful payload; nothing propagates back into the board.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use tracing::{error, info};

use crate::config::BoardConfig;
use crate::doc::{Item, ItemStore};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("render failed: {0}")]
    Failed(String),
    #[error("renderer returned an empty image")]
    Empty,
}

/// Everything a renderer needs to draw the board, detached from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    /// Visible items, bottom first.
    pub items: Vec<Item>,
}

impl Scene {
    /// Capture the visible items of `store` in draw order.
    #[must_use]
    pub fn capture(store: &ItemStore, config: &BoardConfig) -> Self {
        Self {
            width: config.board_width,
            height: config.board_height,
            background_color: config.background_color.clone(),
            items: store.sorted_items().into_iter().filter(|item| item.visible).cloned().collect(),
        }
    }
}

/// Turns a scene into an encoded image. Implemented by the host.
#[async_trait::async_trait]
pub trait SceneRenderer: Send + Sync {
    /// Render `scene` and return the image as a data URI.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if rasterization fails.
    async fn render(&self, scene: &Scene) -> Result<String, RenderError>;
}

/// One pending export, produced on the rising edge of the export trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    scene: Scene,
}

impl ExportJob {
    #[must_use]
    pub fn new(scene: Scene) -> Self {
        Self { scene }
    }

    /// The captured scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Render the scene and forward the data URI to `on_export` verbatim.
    ///
    /// Returns whether `on_export` was called. Render failures are logged,
    /// never returned.
    pub async fn run<R, F>(self, renderer: &R, on_export: F) -> bool
    where
        R: SceneRenderer + ?Sized,
        F: FnOnce(String),
    {
        match renderer.render(&self.scene).await {
            Ok(data_uri) if data_uri.is_empty() => {
                error!(error = %RenderError::Empty, "export failed");
                false
            }
            Ok(data_uri) => {
                info!(items = self.scene.items.len(), bytes = data_uri.len(), "export rendered");
                on_export(data_uri);
                true
            }
            Err(e) => {
                error!(error = %e, "export failed");
                false
            }
        }
    }
}
