//! Stages whose sheet lays categories side by side.
//!
//! Row 5 of the sheet (index 4) names the categories; party rows start at
//! index 5. Every category occupies a block of five columns starting at
//! column F: task name, planned date, actual date, delay, status.

use tracing::debug;

use crate::resolver::same_party;
use crate::row::{clean_cell, present_text, RawRow};
use crate::status::StatusVocabulary;
use crate::task::{Task, DEFAULT_DELAY, DEFAULT_STATUS};

use super::Completion;

pub const HEADER_ROW: usize = 4;
pub const FIRST_DATA_ROW: usize = 5;
/// Data rows considered after `FIRST_DATA_ROW`.
pub const ROW_WINDOW: usize = 500;
pub const PARTY_COLUMN: usize = 2;
pub const FIRST_CATEGORY_COLUMN: usize = 5;
pub const CATEGORY_STRIDE: usize = 5;
pub const LAST_CATEGORY_COLUMN: usize = 200;
/// Consecutive blank slots that end category discovery.
pub const EMPTY_SLOT_LIMIT: usize = 3;

const STATUS_OFFSET: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryColumn {
    pub name: String,
    pub column: usize,
}

fn category_slots() -> impl Iterator<Item = usize> {
    (FIRST_CATEGORY_COLUMN..=LAST_CATEGORY_COLUMN).step_by(CATEGORY_STRIDE)
}

fn is_placeholder(text: &str) -> bool {
    text == "-" || text == "N/A"
}

fn slot_is_blank(row: &RawRow, column: usize) -> bool {
    row.column(column).and_then(present_text).is_none()
}

/// Finds the category blocks named in the header row.
pub fn discover_categories(rows: &[RawRow]) -> Vec<CategoryColumn> {
    let Some(header) = rows.get(HEADER_ROW) else {
        return Vec::new();
    };

    let mut categories = Vec::new();
    for column in category_slots() {
        match header.column(column).and_then(present_text) {
            Some(name) => {
                if name.chars().count() > 1 && !is_placeholder(&name) {
                    categories.push(CategoryColumn { name, column });
                } else {
                    debug!(column, %name, "skipping placeholder category header");
                }
            }
            None => {
                let blank_run = (0..EMPTY_SLOT_LIMIT)
                    .map(|step| column + step * CATEGORY_STRIDE)
                    .filter(|&slot| slot <= LAST_CATEGORY_COLUMN)
                    .filter(|&slot| slot_is_blank(header, slot))
                    .count();
                if blank_run >= EMPTY_SLOT_LIMIT {
                    debug!(column, "blank category slots, stopping discovery");
                    break;
                }
            }
        }
    }
    categories
}

/// Party rows inside the data window, matched on column C.
pub fn party_rows<'a>(rows: &'a [RawRow], party: &str) -> Vec<&'a RawRow> {
    rows.iter()
        .skip(FIRST_DATA_ROW)
        .take(ROW_WINDOW)
        .filter(|row| {
            row.column(PARTY_COLUMN)
                .and_then(present_text)
                .is_some_and(|candidate| same_party(&candidate, party))
        })
        .collect()
}

pub fn completion(rows: &[RawRow], party: &str, vocabulary: StatusVocabulary) -> Completion {
    let mut stats = Completion::default();

    for row in party_rows(rows, party) {
        for column in category_slots() {
            let Some(name) = row.column(column).and_then(present_text) else {
                continue;
            };
            if name == "-" {
                continue;
            }
            stats.total_tasks += 1;

            let done = row
                .column(column + STATUS_OFFSET)
                .and_then(present_text)
                .is_some_and(|status| vocabulary.is_completed(&status));
            if done {
                stats.completed += 1;
            }
        }
    }

    debug!(party, total = stats.total_tasks, completed = stats.completed, "horizontal stage completion");
    stats
}

pub fn extract_tasks(rows: &[RawRow], party: &str) -> Vec<Task> {
    let categories = discover_categories(rows);
    if categories.is_empty() {
        debug!("no category headers found");
        return Vec::new();
    }

    let mut tasks = Vec::new();
    for (row_ordinal, row) in party_rows(rows, party).into_iter().enumerate() {
        for (category_ordinal, category) in categories.iter().enumerate() {
            let cell = |offset: usize| clean_cell(row.column(category.column + offset));

            let Some(name) = cell(0) else {
                continue;
            };
            let planned = cell(1);
            let actual = cell(2);
            let delay = cell(3);
            let status = cell(STATUS_OFFSET);

            if planned.is_none() && actual.is_none() && status.is_none() {
                continue;
            }

            tasks.push(Task {
                id: format!("{row_ordinal}-{category_ordinal}"),
                draft_category: category.name.clone(),
                name,
                status: status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                planned_date: planned,
                actual_date: actual,
                delay: delay.unwrap_or_else(|| DEFAULT_DELAY.to_string()),
                column_order: Some(category.column),
            });
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn header_with(columns: &[(usize, &str)]) -> Vec<RawRow> {
        let mut rows = vec![RawRow::default(); HEADER_ROW];
        let cells: Map<String, Value> = columns
            .iter()
            .map(|(column, name)| (crate::row::column_key(*column), json!(name)))
            .collect();
        rows.push(RawRow::new(cells));
        rows
    }

    fn names(categories: &[CategoryColumn]) -> Vec<(&str, usize)> {
        categories.iter().map(|c| (c.name.as_str(), c.column)).collect()
    }

    #[test]
    fn discovery_steps_by_five_columns() {
        let rows = header_with(&[(5, "Civil"), (7, "ignored"), (10, "Plumbing"), (15, "Paint")]);
        assert_eq!(
            names(&discover_categories(&rows)),
            vec![("Civil", 5), ("Plumbing", 10), ("Paint", 15)]
        );
    }

    #[test]
    fn discovery_skips_placeholders_without_stopping() {
        let rows = header_with(&[(5, "-"), (10, "N/A"), (15, "X"), (20, "Electrical")]);
        assert_eq!(names(&discover_categories(&rows)), vec![("Electrical", 20)]);
    }

    #[test]
    fn two_blank_slots_do_not_stop_discovery() {
        let rows = header_with(&[(5, "Civil"), (20, "Finishing")]);
        assert_eq!(
            names(&discover_categories(&rows)),
            vec![("Civil", 5), ("Finishing", 20)]
        );
    }

    #[test]
    fn three_blank_slots_stop_discovery() {
        let rows = header_with(&[(5, "Civil"), (25, "Finishing")]);
        assert_eq!(names(&discover_categories(&rows)), vec![("Civil", 5)]);
    }

    #[test]
    fn missing_header_row_means_no_categories() {
        assert!(discover_categories(&[RawRow::default()]).is_empty());
    }

    #[test]
    fn completion_ignores_rows_outside_the_window() {
        let mut rows = header_with(&[(5, "Civil")]);
        // row index 3 would match on col_2 but sits above the data window
        rows[3] = RawRow::from_value(json!({"col_2": "Acme", "col_5": "Slab", "col_9": "Done"})).unwrap();
        rows.push(RawRow::from_value(json!({"col_2": "acme", "col_5": "Slab", "col_9": "Done", "col_10": "Beam", "col_15": "-"})).unwrap());

        let stats = completion(&rows, "Acme", StatusVocabulary::Strict);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed, 1);
    }
}
