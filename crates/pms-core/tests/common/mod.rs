#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use pms_core::row::column_key;
use pms_core::{Party, RawRow, SourceError, SourceResult, StageDump, StageSource};
use serde_json::{json, Map, Value};

/// Yields to the executor once, so concurrent fetches overlap.
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Sheets held in memory, with a log of what was asked for.
#[derive(Default)]
pub struct MemorySource {
    pub parties: Option<Vec<Party>>,
    pub stages: Vec<(String, Vec<RawRow>)>,
    pub failing: Vec<String>,
    pub stage_dump_fails: bool,
    pub events: RefCell<Vec<String>>,
    pub in_flight: Cell<usize>,
    pub max_in_flight: Cell<usize>,
}

impl MemorySource {
    pub fn with_stage(mut self, name: &str, rows: Vec<RawRow>) -> Self {
        self.stages.push((name.to_string(), rows));
        self
    }

    pub fn with_parties(mut self, parties: Vec<Party>) -> Self {
        self.parties = Some(parties);
        self
    }

    pub fn failing_stage(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| event.strip_prefix("fetch:").map(str::to_string))
            .collect()
    }
}

impl StageSource for MemorySource {
    async fn all_parties(&self) -> SourceResult<Vec<Party>> {
        self.events.borrow_mut().push("parties".into());
        self.parties
            .clone()
            .ok_or_else(|| SourceError::Api("Unknown action: getAllParties".into()))
    }

    async fn all_stage_data(&self) -> SourceResult<Vec<StageDump>> {
        self.events.borrow_mut().push("all_stage_data".into());
        if self.stage_dump_fails {
            return Err(SourceError::Http { status: 502 });
        }
        Ok(self
            .stages
            .iter()
            .map(|(name, rows)| StageDump {
                name: name.clone(),
                rows: rows.clone(),
            })
            .collect())
    }

    async fn stage_rows(&self, stage_name: &str) -> SourceResult<Vec<RawRow>> {
        self.events.borrow_mut().push(format!("fetch:{stage_name}"));
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));

        YieldNow(false).await;
        self.in_flight.set(self.in_flight.get() - 1);

        if self.failing.iter().any(|name| name == stage_name) {
            return Err(SourceError::Api(format!("Sheet {stage_name} not found")));
        }
        Ok(self
            .stages
            .iter()
            .find(|(name, _)| name == stage_name)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }

    async fn throttle(&self, delay: Duration) {
        self.events
            .borrow_mut()
            .push(format!("pause:{}", delay.as_millis()));
    }
}

pub fn rows(values: Vec<Value>) -> Vec<RawRow> {
    values.into_iter().filter_map(RawRow::from_value).collect()
}

/// Named-header row of a regular stage.
pub fn task_row(party: &str, category: &str, name: &str, status: &str) -> Value {
    json!({
        "Timestamp": "1/4/2024",
        "Project": "Villa",
        "PartyName": party,
        "Draft Category": category,
        "Draft Name": name,
        "Status": status,
    })
}

pub const SITE_CATEGORIES: [&str; 3] = ["Excavation", "Foundation", "Roofing"];

/// A horizontal sheet: title rows, header at index 4, then one row per party.
pub fn horizontal_sheet(categories: &[&str], party_rows: Vec<RawRow>) -> Vec<RawRow> {
    let mut sheet = vec![RawRow::default(); 4];

    let mut header = Map::new();
    header.insert(column_key(0), json!("S.No"));
    header.insert(column_key(2), json!("Party Name"));
    for (idx, category) in categories.iter().enumerate() {
        header.insert(column_key(5 + idx * 5), json!(category));
    }
    sheet.push(RawRow::new(header));
    sheet.extend(party_rows);
    sheet
}

/// One party row; each block is (name, planned, actual, delay, status).
pub fn horizontal_row(party: &str, blocks: &[[&str; 5]]) -> RawRow {
    let mut cells = Map::new();
    cells.insert(column_key(2), json!(party));
    for (idx, block) in blocks.iter().enumerate() {
        for (offset, value) in block.iter().enumerate() {
            cells.insert(column_key(5 + idx * 5 + offset), json!(value));
        }
    }
    RawRow::new(cells)
}
