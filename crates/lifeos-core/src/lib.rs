//! LifeOS Core Library
//!
//! This crate provides the core functionality for LifeOS, a gamified
//! personal productivity tracker: quests worth XP, leveling categories,
//! milestones, time blocks, calendar events, and kanban boards.
//!
//! # Architecture
//!
//! A single root document holds all user data. The `Store` is its sole
//! writer: every mutation replaces the in-memory snapshot atomically,
//! writes it through to a versioned JSON file on disk, and notifies
//! subscribers. Readers never mutate the document directly.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a quest
//! store.add_quest(draft)?;
//!
//! // Complete it and grant its XP
//! store.complete_quest(&quest_id)?;
//!
//! // Read the current snapshot
//! let doc = store.document();
//! ```
//!
//! # Modules
//!
//! - `store`: mutation API and snapshots (main entry point)
//! - `models`: domain entities and creation drafts
//! - `document`: the root document and seeded defaults
//! - `ids`: injectable entity id generation
//! - `storage`: versioned JSON persistence and migration
//! - `config`: application configuration

pub mod config;
pub mod document;
pub mod ids;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use document::{AppDocument, STORE_VERSION};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use models::{
    CalendarEvent, CalendarEventDraft, Category, EventKind, ItemKind, KanbanBoard,
    KanbanBoardDraft, KanbanBoardPatch, KanbanColumn, KanbanItem, Milestone, MilestoneDraft,
    Priority, Quest, QuestDraft, Streak, TimeBlock, TimeBlockDraft, User,
};
pub use storage::{JsonPersistence, StorageError, StorageResult, ENVELOPE_VERSION};
pub use store::{Store, SubscriptionId};
