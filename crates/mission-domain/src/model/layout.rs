//! Layout sidecar - editor-only node positions
//!
//! Positions are visual metadata stored next to the logical spec. They never
//! influence mission semantics and are stripped for runtime consumers.

use std::collections::BTreeMap;

/// Canvas coordinates of a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Horizontal offset of a state created next to the selected one
const NEXT_TO_SELECTED_DX: f64 = 250.0;
/// Vertical gap below the lowest node for a new state
const BELOW_LOWEST_DY: f64 = 200.0;
const NEW_STATE_X: f64 = 100.0;
const FIRST_STATE: Position = Position { x: 100.0, y: 100.0 };

/// Stored positions keyed by node id (state or placeholder)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMetadata {
    positions: BTreeMap<String, Position>,
}

impl LayoutMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: impl IntoIterator<Item = (String, Position)>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn positions(&self) -> impl Iterator<Item = (&str, Position)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn set_position(&mut self, id: impl Into<String>, position: Position) {
        self.positions.insert(id.into(), position);
    }

    /// Forget the position of a node; returns whether one was stored
    pub fn remove(&mut self, id: &str) -> bool {
        self.positions.remove(id).is_some()
    }

    /// Drop every stored position (layout reset)
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Where a freshly created state should appear: right of the selected
    /// state, else below the lowest stored node, else at the origin slot.
    pub fn placement_for_new_state(&self, selected: Option<&str>) -> Position {
        if let Some(pos) = selected.and_then(|id| self.position(id)) {
            return Position::new(pos.x + NEXT_TO_SELECTED_DX, pos.y);
        }
        self.positions
            .values()
            .map(|p| p.y)
            .reduce(f64::max)
            .map(|max_y| Position::new(NEW_STATE_X, max_y + BELOW_LOWEST_DY))
            .unwrap_or(FIRST_STATE)
    }
}
