//! Deterministic placement for snapshot grids and expansion fan-outs

use super::node::Position;
use serde::{Deserialize, Serialize};

/// Layout constants. Every field has a default so a partial YAML file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Columns in the snapshot grid
    pub grid_columns: usize,
    /// Top-left cell of the snapshot grid
    pub grid_origin: Position,
    pub grid_column_spacing: f64,
    pub grid_row_spacing: f64,
    /// Horizontal distance from a parent to its expansion
    pub expansion_offset_x: f64,
    /// Vertical spacing between articles fanned out from a concept
    pub article_spacing: f64,
    /// Vertical spacing between candidates fanned out from an article
    pub candidate_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_columns: 3,
            grid_origin: Position::new(100.0, 150.0),
            grid_column_spacing: 250.0,
            grid_row_spacing: 150.0,
            expansion_offset_x: 250.0,
            article_spacing: 100.0,
            candidate_spacing: 80.0,
        }
    }
}

impl LayoutConfig {
    /// Position of the `index`-th cell, filled row by row.
    pub fn grid_position(&self, index: usize) -> Position {
        let columns = self.grid_columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        Position::new(
            self.grid_origin.x + col * self.grid_column_spacing,
            self.grid_origin.y + row * self.grid_row_spacing,
        )
    }

    /// Position of the `index`-th of `count` children placed to the right of
    /// `parent`, centered on the parent's y.
    pub fn fan_out(&self, parent: Position, index: usize, count: usize, spacing: f64) -> Position {
        let center = (count.saturating_sub(1)) as f64 / 2.0;
        Position::new(
            parent.x + self.expansion_offset_x,
            parent.y + (index as f64 - center) * spacing,
        )
    }
}
