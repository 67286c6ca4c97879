use serde::{Deserialize, Serialize};

use crate::layout::{Completion, StageLayout};
use crate::party::Party;
use crate::row::RawRow;
use crate::status::StatusVocabulary;

/// Completion of one party inside one stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub id: u32,
    pub name: String,
    pub layout: StageLayout,
    pub total_tasks: usize,
    pub completed: usize,
    pub progress: f64,
    #[serde(default)]
    pub party_tasks: Vec<RawRow>,
    /// Fetch failure that left this stage at zero tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageSummary {
    pub fn from_rows(
        id: u32,
        name: &str,
        rows: &[RawRow],
        party: &str,
        vocabulary: StatusVocabulary,
    ) -> Self {
        let layout = StageLayout::classify(name);
        let Completion {
            total_tasks,
            completed,
        } = layout.completion(rows, party, vocabulary);

        let party_tasks = match layout {
            StageLayout::Regular => crate::layout::regular::party_rows(rows, party),
            StageLayout::HorizontalCategory => crate::layout::horizontal::party_rows(rows, party),
        }
        .into_iter()
        .cloned()
        .collect();

        Self {
            id,
            name: name.to_string(),
            layout,
            total_tasks,
            completed,
            progress: Completion {
                total_tasks,
                completed,
            }
            .progress(),
            party_tasks,
            error: None,
        }
    }

    /// A stage whose rows could not be fetched counts as pending.
    pub fn unavailable(id: u32, name: &str, error: Option<String>) -> Self {
        Self {
            id,
            name: name.to_string(),
            layout: StageLayout::classify(name),
            total_tasks: 0,
            completed: 0,
            progress: 0.0,
            party_tasks: Vec::new(),
            error,
        }
    }

    pub fn is_complete(&self) -> bool {
        crate::status::is_complete(self.total_tasks, self.completed)
    }

    pub fn has_tasks(&self) -> bool {
        self.total_tasks > 0
    }
}

/// Names of the stages a party has not finished, in stage order.
pub fn pending_stages(summaries: &[StageSummary]) -> Vec<String> {
    summaries
        .iter()
        .filter(|summary| !summary.is_complete())
        .map(|summary| summary.name.clone())
        .collect()
}

pub fn apply_pending(party: &mut Party, summaries: &[StageSummary]) {
    party.set_pending(pending_stages(summaries));
}
