//! Replay scripts: one JSON event per line, applied to a [`Board`] in order.
//!
//! ```text
//! # drag the first item right
//! {"event":"pointer_down","x":60,"y":60}
//! {"event":"pointer_move","x":160,"y":60}
//! {"event":"pointer_up"}
//! {"event":"command","command":"rotate","value":90}
//! {"event":"rename","name":"Weekend"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use outfit_board::doc::ItemId;
use outfit_board::engine::{Board, BoardHost, Command};
use outfit_board::geometry::Point;
use outfit_board::input::GestureMode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script line {line}: {source}")]
    Parse { line: usize, source: serde_json::Error },
}

/// One host event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Pointer pressed; the board decides what was hit.
    PointerDown { x: f64, y: f64 },
    /// Pointer pressed on a part the host already resolved.
    PointerDownOn { x: f64, y: f64, id: ItemId, mode: GestureMode },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Select { id: Option<ItemId> },
    Command {
        #[serde(flatten)]
        command: Command,
    },
    Rename { name: String },
    AddImage { image: Value },
}

impl Event {
    pub fn apply<H: BoardHost>(self, board: &mut Board<H>) {
        match self {
            Self::PointerDown { x, y } => board.on_pointer_down(Point::new(x, y)),
            Self::PointerDownOn { x, y, id, mode } => board.on_pointer_down_on(Point::new(x, y), &id, mode),
            Self::PointerMove { x, y } => board.on_pointer_move(Point::new(x, y)),
            Self::PointerUp => board.on_pointer_up(),
            Self::Select { id } => board.select(id),
            Self::Command { command } => board.execute(command),
            Self::Rename { name } => board.set_board_name(&name),
            Self::AddImage { image } => board.add_image(&image),
        }
    }
}

/// Parse a whole script. Fails on the first malformed line.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] with the 1-based line number.
pub fn parse(text: &str) -> Result<Vec<Event>, ScriptError> {
    let mut events = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| ScriptError::Parse { line: index + 1, source })?;
        events.push(event);
    }
    Ok(events)
}
