use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};
use tracing::debug;

use crate::resolver::{self, FieldResolver, FieldRule};
use crate::row::{present_text, rows_from_values, RawRow};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub total_projects: usize,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub stages_present: Vec<String>,
    #[serde(default)]
    pub pending_stages: Vec<String>,
    #[serde(default)]
    pub pending_stages_count: usize,
}

impl Party {
    pub fn new(id: u32, name: impl Into<String>, stages_present: Vec<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total_projects: stages_present.len(),
            stages_present,
            pending_stages: Vec::new(),
            pending_stages_count: 0,
        }
    }

    pub fn set_pending(&mut self, pending: Vec<String>) {
        self.pending_stages_count = pending.len();
        self.pending_stages = pending;
    }
}

/// One stage of a `getAllStageData` response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StageDump {
    pub name: String,
    pub rows: Vec<RawRow>,
}

pub const UNKNOWN_STAGE: &str = "Unknown Stage";

const STAGE_NAME: FieldResolver =
    FieldResolver::new(&[FieldRule::AnyKey(&["name", "Stage Name", "Stage"])]);

impl StageDump {
    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let rows = match object.remove("stageData") {
            Some(Value::Array(values)) => rows_from_values(values),
            _ => Vec::new(),
        };

        let header = RawRow::new(object);
        let name = STAGE_NAME
            .resolve(&header)
            .or_else(|| {
                header
                    .cells()
                    .find_map(|(_, value)| value.as_str().and_then(|_| present_text(value)))
            })
            .unwrap_or_else(|| UNKNOWN_STAGE.to_string());

        Self { name, rows }
    }
}

/// Derives the party list from every stage's rows.
///
/// The first row of each stage is its header. Names keep first-seen order and
/// so do the stages recorded for each name.
pub fn parties_from_stages(stages: &[StageDump]) -> Vec<Party> {
    let mut found: Vec<(String, Vec<String>)> = Vec::new();

    for stage in stages {
        for (idx, row) in stage.rows.iter().enumerate().skip(1) {
            let Some(name) = resolver::PARTY_SCAN.resolve(row) else {
                continue;
            };
            debug!(stage = %stage.name, row = idx + 1, party = %name, "party found in stage");

            let slot = match found.iter().position(|(existing, _)| *existing == name) {
                Some(pos) => pos,
                None => {
                    found.push((name, Vec::new()));
                    found.len() - 1
                }
            };
            let stages_seen = &mut found[slot].1;
            if !stages_seen.contains(&stage.name) {
                stages_seen.push(stage.name.clone());
            }
        }
    }

    found
        .into_iter()
        .enumerate()
        .map(|(idx, (name, stages))| Party::new(idx as u32 + 1, name, stages))
        .collect()
}
