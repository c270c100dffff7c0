//! Block field: the fixed grid of destructible cells

use super::geometry::Rect;
use super::state::Block;
use crate::consts::*;

/// Fixed rows x cols grid. Destroyed blocks stay in place, hidden, so indices
/// are stable for the whole stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockField {
    pub blocks: Vec<Block>,
}

impl Default for BlockField {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockField {
    /// A freshly laid out, fully visible grid
    pub fn new() -> Self {
        let mut field = Self {
            blocks: Vec::with_capacity(BLOCK_ROWS * BLOCK_COLS),
        };
        field.reset();
        field
    }

    /// Horizontal margin that centres the grid in the field
    fn offset_left() -> f32 {
        let grid_width = BLOCK_COLS as f32 * BLOCK_WIDTH + (BLOCK_COLS - 1) as f32 * BLOCK_PADDING;
        (FIELD_WIDTH - grid_width) / 2.0
    }

    /// Regenerate every block, all visible, coloured by row
    pub fn reset(&mut self) {
        let left = Self::offset_left();
        self.blocks.clear();
        for row in 0..BLOCK_ROWS {
            let color = BLOCK_PALETTE[row % BLOCK_PALETTE.len()];
            for col in 0..BLOCK_COLS {
                self.blocks.push(Block {
                    rect: Rect::new(
                        left + col as f32 * (BLOCK_WIDTH + BLOCK_PADDING),
                        BLOCK_OFFSET_TOP + row as f32 * (BLOCK_HEIGHT + BLOCK_PADDING),
                        BLOCK_WIDTH,
                        BLOCK_HEIGHT,
                    ),
                    visible: true,
                    color,
                });
            }
        }
    }

    /// True iff no block is visible
    pub fn is_cleared(&self) -> bool {
        !self.blocks.iter().any(|b| b.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.visible).count()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.visible)
    }

    /// Hide a block; returns false if it was already gone
    pub fn destroy(&mut self, index: usize) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) if block.visible => {
                block.visible = false;
                true
            }
            _ => false,
        }
    }
}
