//! Root document
//!
//! A single `AppDocument` holds all user data: the profile, categories,
//! quests, milestones, time blocks, calendar events, and kanban boards.
//! The store is its only writer; readers get immutable snapshots.

use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;
use crate::models::{
    CalendarEvent, Category, KanbanBoard, KanbanColumn, Milestone, Quest, TimeBlock, User,
};

/// Semantic version tag stored inside the document
///
/// Distinct from the persistence envelope version, which gates migration.
pub const STORE_VERSION: &str = "1.0.0";

/// The root document containing all domain data
///
/// Lists preserve insertion order; membership is by id equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppDocument {
    pub version: String,
    pub user: User,
    pub categories: Vec<Category>,
    pub quests: Vec<Quest>,
    pub milestones: Vec<Milestone>,
    pub timeblocks: Vec<TimeBlock>,
    pub calendar_events: Vec<CalendarEvent>,
    pub kanban_boards: Vec<KanbanBoard>,
}

impl AppDocument {
    /// Build the default seeded document
    ///
    /// Used on first run and whenever migration discards a legacy
    /// document: a fresh user, three seed categories, and one empty
    /// kanban board per category. Seed categories keep their fixed ids
    /// so existing quests referencing "1"/"2"/"3" stay meaningful.
    pub fn seeded(ids: &dyn IdGenerator) -> Self {
        let categories = seed_categories();
        let kanban_boards = categories
            .iter()
            .map(|cat| KanbanBoard {
                id: ids.generate(),
                title: format!("{} Board", cat.name),
                category: cat.id.clone(),
                columns: default_columns(),
            })
            .collect();

        Self {
            version: STORE_VERSION.to_string(),
            user: User::default(),
            categories,
            quests: Vec::new(),
            milestones: Vec::new(),
            timeblocks: Vec::new(),
            calendar_events: Vec::new(),
            kanban_boards,
        }
    }

    /// Find a quest by id
    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Find a milestone by id
    pub fn milestone(&self, id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Find a category by id
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a time block by id
    pub fn time_block(&self, id: &str) -> Option<&TimeBlock> {
        self.timeblocks.iter().find(|tb| tb.id == id)
    }

    /// Find a calendar event by id
    pub fn calendar_event(&self, id: &str) -> Option<&CalendarEvent> {
        self.calendar_events.iter().find(|e| e.id == id)
    }

    /// Find a kanban board by id
    pub fn kanban_board(&self, id: &str) -> Option<&KanbanBoard> {
        self.kanban_boards.iter().find(|b| b.id == id)
    }
}

/// The three seed categories every fresh document starts with
fn seed_categories() -> Vec<Category> {
    vec![
        Category {
            id: "1".to_string(),
            name: "Coding & GameDev".to_string(),
            icon: r#"<i class="fas fa-code"></i>"#.to_string(),
            color: "#FF6B6B".to_string(),
            total_xp: 0,
            max_xp: 1000,
            level: 1,
            skills: vec![
                "Programming".to_string(),
                "Game Development".to_string(),
                "Web Development".to_string(),
            ],
        },
        Category {
            id: "2".to_string(),
            name: "Azure Certification".to_string(),
            icon: r#"<i class="fas fa-cloud"></i>"#.to_string(),
            color: "#45B7D1".to_string(),
            total_xp: 0,
            max_xp: 1000,
            level: 1,
            skills: vec![
                "Cloud".to_string(),
                "DevOps".to_string(),
                "Architecture".to_string(),
            ],
        },
        Category {
            id: "3".to_string(),
            name: "Fitness".to_string(),
            icon: r#"<i class="fas fa-dumbbell"></i>"#.to_string(),
            color: "#4ECDC4".to_string(),
            total_xp: 0,
            max_xp: 1000,
            level: 1,
            skills: vec![
                "Strength".to_string(),
                "Cardio".to_string(),
                "Flexibility".to_string(),
            ],
        },
    ]
}

/// The four fixed columns every new board starts with
fn default_columns() -> Vec<KanbanColumn> {
    vec![
        KanbanColumn::new("backlog", "Backlog"),
        KanbanColumn::new("todo", "To Do"),
        KanbanColumn::new("in-progress", "In Progress"),
        KanbanColumn::new("done", "Done"),
    ]
}
