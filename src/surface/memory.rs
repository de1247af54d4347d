//! In-memory editing surface.

use super::{ChangeCallback, EditingSurface, SurfaceContent, SurfaceError};
use crate::assets::Asset;
use crate::document::Block;

/// An editing surface that keeps its blocks in memory.
///
/// The cursor is a block index; insertions land there and move it past the
/// new block, the way typing after an inserted image continues below it.
#[derive(Default)]
pub struct MemorySurface {
    blocks: Vec<Block>,
    cursor: usize,
    ready: bool,
    fail_next: Option<String>,
    callbacks: Vec<ChangeCallback>,
}

impl MemorySurface {
    /// A surface that is still initializing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ready, empty surface.
    pub fn ready() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// A ready surface showing `blocks`, with the cursor at the end.
    pub fn ready_with(blocks: Vec<Block>) -> Self {
        Self {
            cursor: blocks.len(),
            blocks,
            ready: true,
            ..Self::default()
        }
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor, clamped to the content.
    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.blocks.len());
    }

    /// Edit the content as a user would, then notify listeners.
    pub fn edit(&mut self, change: impl FnOnce(&mut Vec<Block>)) {
        change(&mut self.blocks);
        self.cursor = self.cursor.min(self.blocks.len());
        self.notify();
    }

    /// Make the next structural command fail with `reason`.
    pub fn fail_next_command(&mut self, reason: impl Into<String>) {
        self.fail_next = Some(reason.into());
    }

    fn check_command(&mut self) -> Result<(), SurfaceError> {
        match self.fail_next.take() {
            Some(reason) => Err(SurfaceError::Rejected(reason)),
            None if !self.ready => Err(SurfaceError::Rejected("editor is not ready".to_string())),
            None => Ok(()),
        }
    }

    fn notify(&mut self) {
        for callback in &mut self.callbacks {
            callback();
        }
    }
}

impl EditingSurface for MemorySurface {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn current_content(&self) -> SurfaceContent {
        SurfaceContent::Blocks(self.blocks.clone())
    }

    fn on_content_changed(&mut self, callback: ChangeCallback) {
        self.callbacks.push(callback);
    }

    fn insert_image_at_cursor(&mut self, asset: &Asset, alt: &str) -> Result<usize, SurfaceError> {
        self.check_command()?;
        let index = self.cursor.min(self.blocks.len());
        self.blocks.insert(index, Block::image(asset.clone(), alt));
        self.cursor = index + 1;
        self.notify();
        Ok(index)
    }

    fn replace_all_content(&mut self, blocks: &[Block]) -> Result<(), SurfaceError> {
        self.check_command()?;
        self.blocks = blocks.to_vec();
        self.cursor = self.blocks.len();
        self.notify();
        Ok(())
    }
}
