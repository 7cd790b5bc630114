//! # SprouX Editor
//!
//! Content-block editing core for the SprouX CMS.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ store: DocumentStore (memory / JSON files)  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ repository: pages collection                │
//! │  - Load / persist page lists                │
//! │  - Version-checked page replace             │
//! │  - Seed required pages                      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: PageBlockStore                     │
//! │  - Draft of one page's blocks               │
//! │  - Add / update / move / remove             │
//! │  - Sidebar grouping                         │
//! │  - Atomic save                              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Whole-draft saves**: the block list is the unit of persistence
//! 2. **Isolated drafts**: edits never touch the committed page until saved
//! 3. **Versioned writes**: a save based on a stale page is rejected
//! 4. **Lossless records**: metadata keys we don't model are carried through
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sproux_editor::{BlockType, JsonFileStore, PageBlockStore, PageRepository};
//!
//! let repo = PageRepository::new(Arc::new(JsonFileStore::new(".sproux/data")));
//! repo.seed_required_pages().await?;
//!
//! let home = repo.find_page("home").await?.expect("seeded");
//! let mut session = PageBlockStore::open(&home);
//! session.add_block(BlockType::RichText);
//! session.save(&repo).await?;
//! ```

mod block;
mod errors;
mod grouping;
mod media;
mod page;
mod repository;
mod session;
mod values;

pub mod store;

pub use block::{
    BlockId, BlockMetadata, BlockType, ContentBlock, KindMetadata, MetadataPatch, DEFAULT_GROUP,
};
pub use errors::EditorError;
pub use grouping::BlockGroups;
pub use media::{MediaSelection, MediaSender};
pub use page::{required_pages, PageData, PageStatus};
pub use repository::{PageRepository, PAGES_COLLECTION};
pub use session::{CloseReason, Direction, PageBlockStore, SessionState};
pub use values::{
    BlockTemplate, FaqItem, PricingPlan, CUSTOM_GROUP, DEFAULT_FAQ_VALUE, DEFAULT_IMAGE_VALUE,
    DEFAULT_PRICING_PLAN_VALUE, DEFAULT_RICH_TEXT_VALUE, DEFAULT_TEXT_VALUE,
};

// Re-export store types for convenience
pub use store::{Document, DocumentStore, JsonFileStore, MemoryStore, StoreError};
