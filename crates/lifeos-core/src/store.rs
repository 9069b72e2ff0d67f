//! Unified state store
//!
//! The `Store` owns the root document and is its sole writer. Every
//! mutation applies to the in-memory document as a single atomic step,
//! persists it (write-through), and notifies subscribers with the new
//! snapshot.
//!
//! ## Failure semantics
//!
//! Domain conditions never raise errors: an operation targeting a
//! missing id leaves the document unchanged and returns `Ok`. `Err` is
//! reserved for persistence I/O. Deletions never cascade; references
//! held by other entities go stale and readers must tolerate them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads or seeds the document
//!
//! store.add_quest(draft)?;
//! store.complete_quest(&quest_id)?;
//!
//! let doc = store.document();
//! ```

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Config;
use crate::document::AppDocument;
use crate::ids::{IdGenerator, UuidIds};
use crate::models::{
    CalendarEvent, CalendarEventDraft, KanbanBoardDraft, KanbanBoardPatch, Milestone,
    MilestoneDraft, QuestDraft, TimeBlock, TimeBlockDraft,
};
use crate::storage::JsonPersistence;

/// Handle identifying a registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&AppDocument) + Send>;

/// State store for LifeOS
///
/// Holds the root document, exposes the mutation API, and keeps the
/// persisted copy in sync after every change.
pub struct Store {
    /// The current document snapshot
    doc: AppDocument,
    /// JSON persistence handler
    persistence: JsonPersistence,
    /// Id source for newly created entities
    ids: Box<dyn IdGenerator>,
    /// Subscribers notified after each applied mutation
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Store {
    /// Open the store, seeding a default document if none exists
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        Self::open_with(config, Box::new(UuidIds))
    }

    /// Open the store with a specific configuration and id generator
    ///
    /// Injecting the generator makes entity ids deterministic in tests.
    pub fn open_with(config: Config, ids: Box<dyn IdGenerator>) -> Result<Self> {
        let persistence = JsonPersistence::new(config);
        let doc = persistence
            .load_or_seed(&*ids)
            .context("Failed to load or seed state document")?;

        Ok(Self {
            doc,
            persistence,
            ids,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Borrow the current document snapshot
    pub fn document(&self) -> &AppDocument {
        &self.doc
    }

    /// Get an owned copy of the current document for detached readers
    pub fn snapshot(&self) -> AppDocument {
        self.doc.clone()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        self.persistence.config()
    }

    /// Register a listener called with every new snapshot
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&AppDocument) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Persist the document and notify subscribers
    ///
    /// Called after every mutation that changed the document.
    fn commit(&mut self) -> Result<()> {
        self.persistence
            .save(&self.doc)
            .context("Failed to save state document")?;
        for (_, listener) in &self.listeners {
            listener(&self.doc);
        }
        Ok(())
    }

    // ==================== Quest Operations ====================

    /// Add a new quest
    ///
    /// The quest gets a fresh id, starts incomplete, and its due date
    /// defaults to today when the draft leaves it unset. No XP is
    /// granted at creation time.
    pub fn add_quest(&mut self, draft: QuestDraft) -> Result<()> {
        let quest = draft.into_quest(self.ids.generate());
        self.doc.quests.push(quest);
        self.commit()
    }

    /// Mark a quest completed and grant its XP
    ///
    /// Grants `quest.xp` to the owning category and to the user, and
    /// rederives both levels. The user's new level divides by the
    /// threshold in effect before this completion; the threshold is
    /// then rebased to `level * 1000`. Completing an already-completed
    /// quest grants its XP again; only the flag is idempotent.
    pub fn complete_quest(&mut self, quest_id: &str) -> Result<()> {
        let Some(quest) = self.doc.quests.iter_mut().find(|q| q.id == quest_id) else {
            debug!(quest_id, "complete_quest: no such quest");
            return Ok(());
        };
        quest.completed = true;
        let xp = quest.xp;
        let category_id = quest.category.clone();

        if let Some(cat) = self.doc.categories.iter_mut().find(|c| c.id == category_id) {
            cat.total_xp += xp;
            cat.level = (cat.total_xp / cat.max_xp + 1) as u32;
        }

        let user = &mut self.doc.user;
        user.total_xp += xp;
        let new_level = user.total_xp / user.next_level_xp + 1;
        user.level = new_level as u32;
        user.next_level_xp = new_level * 1000;
        user.available_xp += xp;

        self.commit()
    }

    /// Delete a quest
    ///
    /// XP already granted stays granted, and milestones or time blocks
    /// referencing the quest keep their now-dangling ids.
    pub fn delete_quest(&mut self, quest_id: &str) -> Result<()> {
        let before = self.doc.quests.len();
        self.doc.quests.retain(|q| q.id != quest_id);
        if self.doc.quests.len() == before {
            debug!(quest_id, "delete_quest: no such quest");
            return Ok(());
        }
        self.commit()
    }

    // ==================== Milestone Operations ====================

    /// Add a new milestone
    pub fn add_milestone(&mut self, draft: MilestoneDraft) -> Result<()> {
        let milestone = draft.into_milestone(self.ids.generate());
        self.doc.milestones.push(milestone);
        self.commit()
    }

    /// Mark a milestone completed
    ///
    /// Unlike quests, milestone completion grants no XP and does not
    /// touch `progress`.
    pub fn complete_milestone(&mut self, milestone_id: &str) -> Result<()> {
        let Some(milestone) = self
            .doc
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
        else {
            debug!(milestone_id, "complete_milestone: no such milestone");
            return Ok(());
        };
        milestone.completed = true;
        self.commit()
    }

    /// Replace a milestone wholesale, matched by id
    pub fn update_milestone(&mut self, milestone: Milestone) -> Result<()> {
        let Some(existing) = self
            .doc
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone.id)
        else {
            debug!(milestone_id = %milestone.id, "update_milestone: no such milestone");
            return Ok(());
        };
        *existing = milestone;
        self.commit()
    }

    /// Delete a milestone
    pub fn delete_milestone(&mut self, milestone_id: &str) -> Result<()> {
        let before = self.doc.milestones.len();
        self.doc.milestones.retain(|m| m.id != milestone_id);
        if self.doc.milestones.len() == before {
            debug!(milestone_id, "delete_milestone: no such milestone");
            return Ok(());
        }
        self.commit()
    }

    // ==================== Time Block Operations ====================

    /// Add a new time block
    pub fn add_time_block(&mut self, draft: TimeBlockDraft) -> Result<()> {
        let timeblock = draft.into_time_block(self.ids.generate());
        self.doc.timeblocks.push(timeblock);
        self.commit()
    }

    /// Replace a time block wholesale, matched by id
    pub fn update_time_block(&mut self, timeblock: TimeBlock) -> Result<()> {
        let Some(existing) = self
            .doc
            .timeblocks
            .iter_mut()
            .find(|tb| tb.id == timeblock.id)
        else {
            debug!(timeblock_id = %timeblock.id, "update_time_block: no such time block");
            return Ok(());
        };
        *existing = timeblock;
        self.commit()
    }

    /// Delete a time block
    pub fn delete_time_block(&mut self, timeblock_id: &str) -> Result<()> {
        let before = self.doc.timeblocks.len();
        self.doc.timeblocks.retain(|tb| tb.id != timeblock_id);
        if self.doc.timeblocks.len() == before {
            debug!(timeblock_id, "delete_time_block: no such time block");
            return Ok(());
        }
        self.commit()
    }

    // ==================== Calendar Operations ====================

    /// Add a new calendar event
    pub fn add_calendar_event(&mut self, draft: CalendarEventDraft) -> Result<()> {
        let event = draft.into_event(self.ids.generate());
        self.doc.calendar_events.push(event);
        self.commit()
    }

    /// Replace a calendar event wholesale, matched by id
    pub fn update_calendar_event(&mut self, event: CalendarEvent) -> Result<()> {
        let Some(existing) = self
            .doc
            .calendar_events
            .iter_mut()
            .find(|e| e.id == event.id)
        else {
            debug!(event_id = %event.id, "update_calendar_event: no such event");
            return Ok(());
        };
        *existing = event;
        self.commit()
    }

    /// Delete a calendar event
    pub fn delete_calendar_event(&mut self, event_id: &str) -> Result<()> {
        let before = self.doc.calendar_events.len();
        self.doc.calendar_events.retain(|e| e.id != event_id);
        if self.doc.calendar_events.len() == before {
            debug!(event_id, "delete_calendar_event: no such event");
            return Ok(());
        }
        self.commit()
    }

    // ==================== Kanban Operations ====================

    /// Add a new kanban board
    pub fn add_kanban_board(&mut self, draft: KanbanBoardDraft) -> Result<()> {
        let board = draft.into_board(self.ids.generate());
        self.doc.kanban_boards.push(board);
        self.commit()
    }

    /// Merge a partial update into a board, matched by id
    pub fn update_kanban_board(&mut self, board_id: &str, patch: KanbanBoardPatch) -> Result<()> {
        let Some(board) = self
            .doc
            .kanban_boards
            .iter_mut()
            .find(|b| b.id == board_id)
        else {
            debug!(board_id, "update_kanban_board: no such board");
            return Ok(());
        };
        board.apply(patch);
        self.commit()
    }

    /// Delete a kanban board
    pub fn delete_kanban_board(&mut self, board_id: &str) -> Result<()> {
        let before = self.doc.kanban_boards.len();
        self.doc.kanban_boards.retain(|b| b.id != board_id);
        if self.doc.kanban_boards.len() == before {
            debug!(board_id, "delete_kanban_board: no such board");
            return Ok(());
        }
        self.commit()
    }

    /// Move a kanban card between columns
    ///
    /// Applies to every board containing both the source and target
    /// columns; boards missing either column, or where the item is not
    /// in the source column, are left unchanged. The insert index
    /// clamps to the end of the target list. Identical source and
    /// target re-order within the one column.
    pub fn move_kanban_item(
        &mut self,
        item_id: &str,
        source_column_id: &str,
        target_column_id: &str,
        new_index: usize,
    ) -> Result<()> {
        let mut moved = false;

        for board in &mut self.doc.kanban_boards {
            let source = board.columns.iter().position(|c| c.id == source_column_id);
            let target = board.columns.iter().position(|c| c.id == target_column_id);
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };

            let Some(pos) = board.columns[source]
                .items
                .iter()
                .position(|i| i.id == item_id)
            else {
                continue;
            };

            let item = board.columns[source].items.remove(pos);
            let items = &mut board.columns[target].items;
            let at = new_index.min(items.len());
            items.insert(at, item);
            moved = true;
        }

        if !moved {
            debug!(
                item_id,
                source_column_id, target_column_id, "move_kanban_item: nothing to move"
            );
            return Ok(());
        }
        self.commit()
    }

    // ==================== User Operations ====================

    /// Adjust the user's spendable XP by a delta
    ///
    /// Touches `available_xp` only; total XP and level are unaffected.
    pub fn update_user_xp(&mut self, delta: i64) -> Result<()> {
        self.doc.user.available_xp += delta;
        self.commit()
    }
}
