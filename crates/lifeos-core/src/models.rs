//! Data models for LifeOS
//!
//! Defines the domain entities: the user profile, XP categories, quests,
//! milestones, time blocks, calendar events, and kanban boards.
//!
//! Serde renames keep the persisted JSON shape stable across versions
//! (`totalXP`, `dueDate`, `kanbanBoards`, ...), so documents written by
//! older builds load unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Daily completion streak tracked on the user profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    /// Consecutive days with at least one completion
    pub current: u32,
    /// Longest streak ever reached
    pub longest: u32,
    /// Date of the most recent completion, if any
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

/// The single user profile
///
/// `level` is derived from `total_xp` when a quest is completed; it is
/// never set independently outside of construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub level: u32,
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    /// XP threshold for the next level-up
    #[serde(rename = "nextLevelXP")]
    pub next_level_xp: i64,
    /// Spendable XP, tracked separately from `total_xp`
    #[serde(rename = "availableXP")]
    pub available_xp: i64,
    pub streak: Streak,
}

impl Default for User {
    fn default() -> Self {
        Self {
            level: 1,
            total_xp: 0,
            next_level_xp: 1000,
            available_xp: 0,
            streak: Streak {
                current: 0,
                longest: 0,
                last_completed: None,
            },
        }
    }
}

/// A domain area that quests and milestones belong to
///
/// Categories level up independently of the user: `level` is derived as
/// `total_xp / max_xp + 1` whenever a quest in the category completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Display token for the UI (icon markup)
    pub icon: String,
    pub color: String,
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    /// XP needed per category level
    #[serde(rename = "maxXP")]
    pub max_xp: i64,
    pub level: u32,
    pub skills: Vec<String>,
}

/// A task worth XP
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Category id (not validated against the category list)
    pub category: String,
    /// XP granted on completion
    pub xp: i64,
    pub completed: bool,
    pub due_date: NaiveDate,
    /// Back-reference to a milestone this quest is part of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,
    /// Time block ids associated with this quest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeblocks: Option<Vec<String>>,
}

/// Fields supplied when creating a quest
///
/// The id and `completed` flag are assigned by the store; a missing due
/// date defaults to the creation date.
#[derive(Debug, Clone)]
pub struct QuestDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub xp: i64,
    pub due_date: Option<NaiveDate>,
    pub milestone_id: Option<String>,
    pub timeblocks: Option<Vec<String>>,
}

impl QuestDraft {
    /// Build the quest with a freshly minted id
    pub fn into_quest(self, id: String) -> Quest {
        Quest {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            xp: self.xp,
            completed: false,
            due_date: self
                .due_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            milestone_id: self.milestone_id,
            timeblocks: self.timeblocks,
        }
    }
}

/// A larger goal that aggregates quests
///
/// `progress` and the `quests` list are stored but never recomputed by
/// any store operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub xp: i64,
    pub completed: bool,
    pub due_date: NaiveDate,
    /// Quest ids that make up this milestone
    pub quests: Vec<String>,
    /// Completion percentage, 0-100
    pub progress: u8,
}

/// Fields supplied when creating a milestone
///
/// New milestones always start incomplete with zero progress and no
/// linked quests.
#[derive(Debug, Clone)]
pub struct MilestoneDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub xp: i64,
    pub due_date: NaiveDate,
}

impl MilestoneDraft {
    pub fn into_milestone(self, id: String) -> Milestone {
        Milestone {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            xp: self.xp,
            completed: false,
            due_date: self.due_date,
            quests: Vec::new(),
            progress: 0,
        }
    }
}

/// A scheduled block of time, optionally tied to a quest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_id: Option<String>,
    pub category: String,
    pub completed: bool,
}

/// Fields supplied when creating a time block
#[derive(Debug, Clone)]
pub struct TimeBlockDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quest_id: Option<String>,
    pub category: String,
    pub completed: bool,
}

impl TimeBlockDraft {
    pub fn into_time_block(self, id: String) -> TimeBlock {
        TimeBlock {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            quest_id: self.quest_id,
            category: self.category,
            completed: self.completed,
        }
    }
}

/// What a calendar event represents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Event,
    Timeblock,
    Milestone,
}

/// An entry on the calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Id of the related quest or milestone, if applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Fields supplied when creating a calendar event
#[derive(Debug, Clone)]
pub struct CalendarEventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub category: String,
    pub kind: EventKind,
    pub related_id: Option<String>,
    pub completed: Option<bool>,
}

impl CalendarEventDraft {
    pub fn into_event(self, id: String) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            all_day: self.all_day,
            category: self.category,
            kind: self.kind,
            related_id: self.related_id,
            completed: self.completed,
        }
    }
}

/// What a kanban card points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Quest,
    Milestone,
}

/// Card priority
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A card on a kanban board, referencing a quest or milestone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KanbanItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub related_id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

/// An ordered column of kanban cards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KanbanColumn {
    pub id: String,
    pub title: String,
    pub items: Vec<KanbanItem>,
}

impl KanbanColumn {
    /// Create an empty column
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }
}

/// A kanban board scoped to a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KanbanBoard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub columns: Vec<KanbanColumn>,
}

/// Fields supplied when creating a kanban board
#[derive(Debug, Clone)]
pub struct KanbanBoardDraft {
    pub title: String,
    pub category: String,
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoardDraft {
    pub fn into_board(self, id: String) -> KanbanBoard {
        KanbanBoard {
            id,
            title: self.title,
            category: self.category,
            columns: self.columns,
        }
    }
}

/// Partial update for a kanban board: only supplied fields are applied
#[derive(Debug, Clone, Default)]
pub struct KanbanBoardPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub columns: Option<Vec<KanbanColumn>>,
}

impl KanbanBoard {
    /// Merge a patch into this board, leaving unset fields untouched
    pub fn apply(&mut self, patch: KanbanBoardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(columns) = patch.columns {
            self.columns = columns;
        }
    }
}
