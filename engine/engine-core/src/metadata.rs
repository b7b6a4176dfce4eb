//! Action layout metadata for external trainers and tools
//!
//! `LayoutMetadata` is the serialisable form of the action-id contract: id
//! ranges, sizes and the cell order behind the move ids. Anything that
//! consumes action ids outside this process (a trainer, a replay viewer)
//! should read it instead of hard-coding the layout.

use crate::codec::ActionLayout;
use serde::{Deserialize, Serialize};

/// Half-open id range `[start, end)`.
pub type IdRange = [u32; 2];

/// Metadata describing the action space of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMetadata {
    /// Environment identifier (e.g., "voyage")
    pub env_id: String,

    /// Human-readable display name
    pub display_name: String,

    /// Total number of action ids
    pub num_actions: usize,

    /// Number of board cells (size of the move range)
    pub board_cells: usize,

    pub hand_size: usize,

    /// Token options per card
    pub token_options: usize,

    pub move_range: IdRange,
    pub play_range: IdRange,
    pub draw_id: u32,
    pub draw_discard_range: IdRange,
    pub collect_range: IdRange,
    pub pass_id: u32,

    /// Cell names in move-id order
    pub cell_order: Vec<String>,

    /// Brief description for tooling
    pub description: String,
}

impl LayoutMetadata {
    /// Create metadata with required fields and an empty layout
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            num_actions: 0,
            board_cells: 0,
            hand_size: 0,
            token_options: 0,
            move_range: [0, 0],
            play_range: [0, 0],
            draw_id: 0,
            draw_discard_range: [0, 0],
            collect_range: [0, 0],
            pass_id: 0,
            cell_order: Vec::new(),
            description: String::new(),
        }
    }

    /// Builder method copying every range out of a layout
    pub fn with_layout(mut self, layout: &ActionLayout) -> Self {
        let range = |r: std::ops::Range<u32>| [r.start, r.end];
        self.num_actions = layout.len();
        self.board_cells = layout.cells();
        self.hand_size = layout.hand_size();
        self.token_options = layout.token_options();
        self.move_range = range(layout.moves());
        self.play_range = range(layout.plays());
        self.draw_id = layout.draw().0;
        self.draw_discard_range = range(layout.draw_discards());
        self.collect_range = range(layout.collects());
        self.pass_id = layout.pass().0;
        self
    }

    /// Builder method for the cell order
    pub fn with_cells(mut self, cell_order: Vec<String>) -> Self {
        self.cell_order = cell_order;
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether `id` lies inside the action space
    pub fn is_valid_action(&self, id: u32) -> bool {
        (id as usize) < self.num_actions
    }

    /// Name of the range `id` falls in.
    ///
    /// # Returns
    /// One of `"move"`, `"play"`, `"draw"`, `"draw_discard"`, `"collect"`,
    /// `"pass"`, or `None` when `id` is out of range.
    pub fn action_kind(&self, id: u32) -> Option<&'static str> {
        let within = |r: &IdRange| r[0] <= id && id < r[1];
        if !self.is_valid_action(id) {
            None
        } else if within(&self.move_range) {
            Some("move")
        } else if within(&self.play_range) {
            Some("play")
        } else if id == self.draw_id {
            Some("draw")
        } else if within(&self.draw_discard_range) {
            Some("draw_discard")
        } else if within(&self.collect_range) {
            Some("collect")
        } else if id == self.pass_id {
            Some("pass")
        } else {
            None
        }
    }

    /// Cell name targeted by a move id
    pub fn move_cell(&self, id: u32) -> Option<&str> {
        if self.action_kind(id) == Some("move") {
            self.cell_order.get(id as usize).map(String::as_str)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> LayoutMetadata {
        LayoutMetadata::new("voyage", "Voyage")
            .with_layout(&ActionLayout::for_cells(169))
            .with_description("Solo hex voyage")
    }

    #[test]
    fn test_metadata_builder() {
        let meta = standard();
        assert_eq!(meta.env_id, "voyage");
        assert_eq!(meta.display_name, "Voyage");
        assert_eq!(meta.num_actions, 198);
        assert_eq!(meta.board_cells, 169);
        assert_eq!(meta.hand_size, 5);
        assert_eq!(meta.token_options, 4);
        assert_eq!(meta.move_range, [0, 169]);
        assert_eq!(meta.play_range, [169, 189]);
        assert_eq!(meta.draw_id, 189);
        assert_eq!(meta.draw_discard_range, [190, 195]);
        assert_eq!(meta.collect_range, [195, 197]);
        assert_eq!(meta.pass_id, 197);
        assert_eq!(meta.description, "Solo hex voyage");
    }

    #[test]
    fn test_action_kind() {
        let meta = standard();
        assert_eq!(meta.action_kind(0), Some("move"));
        assert_eq!(meta.action_kind(175), Some("play"));
        assert_eq!(meta.action_kind(189), Some("draw"));
        assert_eq!(meta.action_kind(194), Some("draw_discard"));
        assert_eq!(meta.action_kind(196), Some("collect"));
        assert_eq!(meta.action_kind(197), Some("pass"));
        assert_eq!(meta.action_kind(198), None);
        assert!(!meta.is_valid_action(500));
    }

    #[test]
    fn test_move_cell() {
        let meta = standard().with_cells(vec!["A1-0".to_string(), "A2-0".to_string()]);
        assert_eq!(meta.move_cell(1), Some("A2-0"));
        assert_eq!(meta.move_cell(100), None);
        assert_eq!(meta.move_cell(197), None);
    }

    #[test]
    fn test_serialization() {
        let meta = standard().with_cells(vec!["HOME".to_string()]);

        let json = serde_json::to_string(&meta).unwrap();
        let parsed: LayoutMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(meta, parsed);
    }
}
