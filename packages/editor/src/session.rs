//! # Page Edit Session
//!
//! [`PageBlockStore`] owns the working draft of one page's blocks while it
//! is open in the editor. The committed page is only replaced when the
//! draft is saved; until then nothing the editor does is visible to the
//! live site.
//!
//! ```text
//! Closed ──open──▶ Open ──add/update/move/remove──▶ Open (dirty)
//!                   │
//!                   ├──save ok──────▶ Closed(Saved)
//!                   ├──save failed──▶ Open (draft kept, retry allowed)
//!                   └──discard──────▶ Closed(Discarded)
//! ```
//!
//! Lookups by an id that is not in the draft are silent no-ops.

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::media::{MediaSelection, MediaSender};
use crate::{
    BlockGroups, BlockId, BlockTemplate, BlockType, ContentBlock, EditorError, MetadataPatch,
    PageData, PageRepository, PageStatus,
};

/// Direction for [`PageBlockStore::move_block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0
    Up,
    /// Toward the end
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Saved,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed(CloseReason),
}

/// Editing session over one page's blocks
#[derive(Debug)]
pub struct PageBlockStore {
    /// Committed page the draft was opened from
    base: PageData,

    /// Working draft, in page order
    blocks: Vec<ContentBlock>,

    status: PageStatus,

    /// Block shown in the property editor
    selected: Option<BlockId>,

    /// Removal awaiting confirm/cancel
    pending_removal: Option<BlockId>,

    dirty: bool,

    state: SessionState,

    media_tx: mpsc::UnboundedSender<MediaSelection>,
    media_rx: mpsc::UnboundedReceiver<MediaSelection>,
}

impl PageBlockStore {
    /// Open a session with a deep copy of the page's blocks
    pub fn open(page: &PageData) -> Self {
        let (media_tx, media_rx) = mpsc::unbounded_channel();
        debug!(page = %page.id, blocks = page.blocks.len(), "Opened edit session");

        Self {
            base: page.clone(),
            blocks: page.blocks.clone(),
            status: page.status,
            selected: None,
            pending_removal: None,
            dirty: false,
            state: SessionState::Open,
            media_tx,
            media_rx,
        }
    }

    pub fn page_id(&self) -> &str {
        &self.base.id
    }

    /// Version of the committed page this draft started from
    pub fn base_version(&self) -> u64 {
        self.base.version
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn status(&self) -> PageStatus {
        self.status
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn selected_id(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn selected_block(&self) -> Option<&ContentBlock> {
        self.selected.as_ref().and_then(|id| self.block(id.as_str()))
    }

    pub fn pending_removal(&self) -> Option<&BlockId> {
        self.pending_removal.as_ref()
    }

    fn ensure_open(&self, operation: &str) -> bool {
        if !self.is_open() {
            debug!(
                page = %self.base.id,
                operation,
                state = ?self.state,
                "Ignoring edit on closed session"
            );
        }
        self.is_open()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    fn fresh_id(&self, block_type: BlockType) -> BlockId {
        loop {
            let id = BlockId::generate(block_type);
            if self.position(id.as_str()).is_none() {
                return id;
            }
            warn!(id = %id, "Generated block id collided, regenerating");
        }
    }

    /// Append a block of `block_type` with template defaults and select it
    pub fn add_block(&mut self, block_type: BlockType) -> Option<BlockId> {
        if !self.ensure_open("add_block") {
            return None;
        }

        let id = self.fresh_id(block_type);
        let block = BlockTemplate::for_type(block_type).instantiate(id.clone());
        self.blocks.push(block);
        self.selected = Some(id.clone());
        self.dirty = true;
        debug!(page = %self.base.id, block = %id, "Added block");
        Some(id)
    }

    /// Replace a block's value, merge a metadata patch and optionally relabel it.
    ///
    /// Returns false (and changes nothing) if the id is not in the draft.
    pub fn update_block_value(
        &mut self,
        id: &str,
        value: impl Into<String>,
        metadata: Option<MetadataPatch>,
        label: Option<String>,
    ) -> bool {
        if !self.ensure_open("update_block_value") {
            return false;
        }
        let Some(index) = self.position(id) else {
            debug!(page = %self.base.id, block = id, "Update of unknown block ignored");
            return false;
        };

        let block = &mut self.blocks[index];
        block.value = value.into();
        if let Some(patch) = metadata {
            block.metadata.apply(patch);
        }
        if let Some(label) = label {
            block.label = label;
        }
        self.dirty = true;
        true
    }

    /// Swap a block with its neighbour. No-op at the ends of the sequence.
    pub fn move_block(&mut self, id: &str, direction: Direction) -> bool {
        if !self.ensure_open("move_block") {
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };

        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < self.blocks.len()),
        };
        let Some(target) = target else {
            debug!(page = %self.base.id, block = id, ?direction, "Move past boundary ignored");
            return false;
        };

        self.blocks.swap(index, target);
        self.dirty = true;
        true
    }

    /// Remove a block immediately. Clears the selection if it pointed at it.
    pub fn remove_block(&mut self, id: &str) -> Option<ContentBlock> {
        if !self.ensure_open("remove_block") {
            return None;
        }
        let index = self.position(id)?;
        let removed = self.blocks.remove(index);

        if self.selected.as_ref().is_some_and(|s| *s == id) {
            self.selected = None;
        }
        if self.pending_removal.as_ref().is_some_and(|p| *p == id) {
            self.pending_removal = None;
        }
        self.dirty = true;
        debug!(page = %self.base.id, block = id, "Removed block");
        Some(removed)
    }

    /// Stage a removal; it takes effect only on [`confirm_removal`](Self::confirm_removal)
    pub fn request_removal(&mut self, id: &str) -> bool {
        if !self.ensure_open("request_removal") || self.position(id).is_none() {
            return false;
        }
        self.pending_removal = Some(BlockId::new(id));
        true
    }

    pub fn cancel_removal(&mut self) -> Option<BlockId> {
        self.pending_removal.take()
    }

    pub fn confirm_removal(&mut self) -> Option<ContentBlock> {
        let id = self.pending_removal.take()?;
        self.remove_block(id.as_str())
    }

    pub fn select(&mut self, id: &str) -> bool {
        if !self.ensure_open("select") || self.position(id).is_none() {
            return false;
        }
        self.selected = Some(BlockId::new(id));
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_status(&mut self, status: PageStatus) {
        if !self.ensure_open("set_status") || self.status == status {
            return;
        }
        self.status = status;
        self.dirty = true;
    }

    /// Sidebar grouping of the current draft
    pub fn group_blocks(&self) -> BlockGroups<'_> {
        BlockGroups::from_blocks(&self.blocks)
    }

    /// Handle for a media picker to post selections into this session
    pub fn media_sender(&self) -> MediaSender {
        MediaSender::new(self.media_tx.clone())
    }

    /// Apply queued media selections to the selected block.
    ///
    /// Rich text gets an `<img>` appended, an image block takes the URL and
    /// alt text. Selections with no suitable target are dropped. Returns the
    /// number applied.
    pub fn apply_media_selections(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(selection) = self.media_rx.try_recv() {
            if self.apply_media(selection) {
                applied += 1;
            }
        }
        applied
    }

    fn apply_media(&mut self, selection: MediaSelection) -> bool {
        let Some(block) = self.selected_block() else {
            debug!(url = %selection.url, "No block selected, dropping media selection");
            return false;
        };
        let id = block.id.as_str().to_string();

        match block.block_type() {
            BlockType::RichText => {
                let value = format!("{}{}", block.value, selection.to_html());
                self.update_block_value(&id, value, None, None)
            }
            BlockType::Image => {
                let patch = selection.alt.map(|alt| MetadataPatch::new().alt(alt));
                self.update_block_value(&id, selection.url, patch, None)
            }
            other => {
                debug!(block = %id, block_type = %other, "Selected block does not take media");
                false
            }
        }
    }

    /// Page record the draft would commit as
    fn next_page(&self) -> PageData {
        PageData {
            blocks: self.blocks.clone(),
            status: self.status,
            updated_at: Utc::now(),
            version: self.base.version + 1,
            ..self.base.clone()
        }
    }

    /// Commit the draft.
    ///
    /// On success the session closes and the committed page is returned. On
    /// failure the session stays open with the draft intact so the caller
    /// can retry or reload.
    pub async fn save(&mut self, repository: &PageRepository) -> Result<PageData, EditorError> {
        if !self.is_open() {
            return Err(EditorError::SessionClosed);
        }

        let next = self.next_page();
        match repository.replace_page(next, self.base.version).await {
            Ok(committed) => {
                info!(page = %committed.id, version = committed.version, "Committed draft");
                self.base = committed.clone();
                self.dirty = false;
                self.selected = None;
                self.pending_removal = None;
                self.state = SessionState::Closed(CloseReason::Saved);
                Ok(committed)
            }
            Err(e) => {
                warn!(page = %self.base.id, error = %e, "Save failed, draft kept open");
                Err(e)
            }
        }
    }

    /// Close without saving. The draft is dropped.
    pub fn discard(&mut self) {
        if !self.is_open() {
            return;
        }
        debug!(page = %self.base.id, dirty = self.dirty, "Discarded draft");
        self.blocks = self.base.blocks.clone();
        self.status = self.base.status;
        self.selected = None;
        self.pending_removal = None;
        self.dirty = false;
        self.state = SessionState::Closed(CloseReason::Discarded);
    }
}
