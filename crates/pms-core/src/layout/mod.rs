//! The two row layouts a stage sheet can use.

pub mod horizontal;
pub mod regular;

use serde::{Deserialize, Serialize};

use crate::row::RawRow;
use crate::status::{is_complete, progress_percent, StatusVocabulary};
use crate::task::{group_tasks, CategoryOrder, Task, TaskRow};

/// Stages known to lay their categories out horizontally.
pub const HORIZONTAL_STAGES: &[&str] = &[
    "Site Management",
    "CIVIL & FABRICATION",
    "SERVICES & Complete Stone Work",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageLayout {
    Regular,
    HorizontalCategory,
}

/// Task counts of one party inside one stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Completion {
    pub total_tasks: usize,
    pub completed: usize,
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        is_complete(self.total_tasks, self.completed)
    }

    pub fn progress(&self) -> f64 {
        progress_percent(self.total_tasks, self.completed)
    }
}

impl StageLayout {
    /// Fuzzy match against the known horizontal stages, in both directions.
    pub fn classify(stage_name: &str) -> Self {
        let stage = stage_name.trim().to_lowercase();
        if stage.is_empty() {
            return Self::Regular;
        }

        let horizontal = HORIZONTAL_STAGES.iter().any(|known| {
            let known = known.to_lowercase();
            stage.contains(&known) || known.contains(&stage)
        });

        if horizontal {
            Self::HorizontalCategory
        } else {
            Self::Regular
        }
    }

    pub fn completion(self, rows: &[RawRow], party: &str, vocabulary: StatusVocabulary) -> Completion {
        match self {
            Self::Regular => regular::completion(rows, party, vocabulary),
            Self::HorizontalCategory => horizontal::completion(rows, party, vocabulary),
        }
    }

    pub fn extract_tasks(self, rows: &[RawRow], party: &str) -> Vec<Task> {
        match self {
            Self::Regular => regular::extract_tasks(rows, party),
            Self::HorizontalCategory => horizontal::extract_tasks(rows, party),
        }
    }

    pub fn category_order(self) -> CategoryOrder {
        match self {
            Self::Regular => CategoryOrder::Alphabetical,
            Self::HorizontalCategory => CategoryOrder::Column,
        }
    }

    /// Extracted tasks grouped the way this layout presents them.
    pub fn task_rows(self, rows: &[RawRow], party: &str) -> Vec<TaskRow> {
        group_tasks(self.extract_tasks(rows, party), self.category_order())
    }
}
