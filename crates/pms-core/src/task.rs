use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, UtcOffset};

use crate::row::clean_text;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_STATUS: &str = "Pending";
pub const DEFAULT_DELAY: &str = "0";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub draft_category: String,
    pub name: String,
    pub status: String,
    pub planned_date: Option<String>,
    pub actual_date: Option<String>,
    pub delay: String,
    /// Category column of a horizontal-layout task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<usize>,
}

/// A task positioned inside its category group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    pub display_category: Option<String>,
    pub is_first_in_category: bool,
    pub category_task_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Order of the category columns in the sheet.
    Column,
    Alphabetical,
}

/// Groups tasks by category and flags the first task of every group.
pub fn group_tasks(tasks: Vec<Task>, order: CategoryOrder) -> Vec<TaskRow> {
    let mut groups: Vec<(String, Vec<Task>)> = Vec::new();
    for task in tasks {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == task.draft_category)
        {
            Some((_, members)) => members.push(task),
            None => groups.push((task.draft_category.clone(), vec![task])),
        }
    }

    match order {
        CategoryOrder::Column => groups.sort_by(|(left_name, left), (right_name, right)| {
            match (left[0].column_order, right[0].column_order) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => left_name.cmp(right_name),
            }
        }),
        CategoryOrder::Alphabetical => groups.sort_by(|(a, _), (b, _)| a.cmp(b)),
    }

    let mut rows = Vec::new();
    for (category, members) in groups {
        let count = members.len();
        for (idx, task) in members.into_iter().enumerate() {
            rows.push(TaskRow {
                task,
                display_category: (idx == 0).then(|| category.clone()),
                is_first_in_category: idx == 0,
                category_task_count: count,
            });
        }
    }
    rows
}

/// Client-side filters of the task view; empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub category: String,
    pub name: String,
    pub status: String,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.name.is_empty() && self.status.is_empty()
    }

    pub fn clear(&mut self) {
        self.category.clear();
        self.name.clear();
        self.status.clear();
    }

    pub fn matches(&self, task: &Task) -> bool {
        contains_ignore_case(&task.draft_category, &self.category)
            && contains_ignore_case(&task.name, &self.name)
            && (self.status.is_empty() || task.status == self.status)
    }

    pub fn apply<'a>(&self, rows: &'a [TaskRow]) -> Vec<&'a TaskRow> {
        rows.iter().filter(|row| self.matches(&row.task)).collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sorted distinct values offered as filter suggestions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFacets {
    pub categories: Vec<String>,
    pub names: Vec<String>,
    pub statuses: Vec<String>,
}

impl TaskFacets {
    pub fn collect(rows: &[TaskRow]) -> Self {
        let mut categories = BTreeSet::new();
        let mut names = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        for row in rows {
            categories.insert(row.task.draft_category.clone());
            names.insert(row.task.name.clone());
            statuses.insert(row.task.status.clone());
        }
        Self {
            categories: categories.into_iter().collect(),
            names: names.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }
}

/// Suggestions narrowed by the text typed so far.
pub fn suggest<'a>(options: &'a [String], typed: &str) -> Vec<&'a String> {
    options
        .iter()
        .filter(|option| contains_ignore_case(option, typed))
        .collect()
}

/// Per-status task counts, used by the task view summary line.
pub fn status_counts(rows: &[TaskRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.task.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Renders a sheet date as `D/M/YYYY` in the viewer's local calendar;
/// unparsable text is shown verbatim.
pub fn format_date(value: Option<&str>) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_date_at(value, offset)
}

/// Same as [`format_date`] with an explicit viewer offset. Bare
/// `YYYY-MM-DD` dates count as UTC midnight.
pub fn format_date_at(value: Option<&str>, offset: UtcOffset) -> String {
    let Some(text) = value.and_then(clean_text) else {
        return "-".to_string();
    };

    let stamp = OffsetDateTime::parse(&text, &Rfc3339).or_else(|_| {
        Date::parse(&text, format_description!("[year]-[month]-[day]"))
            .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
    });

    match stamp {
        Ok(stamp) => {
            let date = stamp.to_offset(offset).date();
            format!("{}/{}/{}", date.day(), u8::from(date.month()), date.year())
        }
        Err(_) => text,
    }
}

/// Renders a delay in days; positive values carry a `+`.
pub fn format_delay(value: Option<&str>) -> String {
    let days = value.and_then(clean_text).map(|text| leading_number(&text)).unwrap_or(0.0);
    if days > 0.0 {
        format!("+{days}")
    } else {
        format!("{days}")
    }
}

fn leading_number(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }
    if !seen_digit {
        return 0.0;
    }
    let number = trimmed[..end].trim_end_matches('.');
    let value = number.parse::<f64>().unwrap_or(0.0);
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(id: &str, category: &str, name: &str, status: &str, column: Option<usize>) -> Task {
        Task {
            id: id.into(),
            draft_category: category.into(),
            name: name.into(),
            status: status.into(),
            planned_date: None,
            actual_date: None,
            delay: DEFAULT_DELAY.into(),
            column_order: column,
        }
    }

    #[test]
    fn alphabetical_groups_flag_first_member() {
        let rows = group_tasks(
            vec![
                task("1", "Walls", "Plaster", "Pending", None),
                task("2", "Floor", "Tiles", "Done", None),
                task("3", "Walls", "Paint", "Done", None),
            ],
            CategoryOrder::Alphabetical,
        );

        let layout: Vec<_> = rows
            .iter()
            .map(|row| (row.task.id.as_str(), row.display_category.as_deref(), row.category_task_count))
            .collect();
        assert_eq!(
            layout,
            vec![("2", Some("Floor"), 1), ("1", Some("Walls"), 2), ("3", None, 2)]
        );
    }

    #[test]
    fn column_groups_follow_sheet_order() {
        let rows = group_tasks(
            vec![
                task("0-0", "Zinc", "a", "Done", Some(5)),
                task("0-1", "Alpha", "b", "Done", Some(10)),
            ],
            CategoryOrder::Column,
        );
        assert_eq!(rows[0].task.draft_category, "Zinc");
        assert_eq!(rows[1].task.draft_category, "Alpha");
    }

    #[test]
    fn filters_combine_with_and() {
        let rows = group_tasks(
            vec![
                task("1", "Electrical", "Wiring", "Done", None),
                task("2", "Electrical", "Lighting", "Pending", None),
                task("3", "Plumbing", "Wiring check", "Done", None),
            ],
            CategoryOrder::Alphabetical,
        );

        let filter = TaskFilter {
            category: "elec".into(),
            name: "WIR".into(),
            status: "Done".into(),
        };
        let ids: Vec<_> = filter.apply(&rows).iter().map(|row| row.task.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let status_only = TaskFilter {
            status: "done".into(),
            ..TaskFilter::default()
        };
        assert!(status_only.apply(&rows).is_empty(), "status match is exact");
        assert_eq!(TaskFilter::default().apply(&rows).len(), 3);
    }

    #[test]
    fn facets_are_sorted_and_distinct() {
        let rows = group_tasks(
            vec![
                task("1", "B", "y", "Pending", None),
                task("2", "A", "x", "Done", None),
                task("3", "B", "x", "Done", None),
            ],
            CategoryOrder::Alphabetical,
        );
        let facets = TaskFacets::collect(&rows);
        assert_eq!(facets.categories, vec!["A", "B"]);
        assert_eq!(facets.names, vec!["x", "y"]);
        assert_eq!(facets.statuses, vec!["Done", "Pending"]);
        assert_eq!(suggest(&facets.categories, "b"), vec!["B"]);
        assert_eq!(status_counts(&rows).get("Done"), Some(&2));
    }

    #[test]
    fn dates_and_delays_render_for_display() {
        let ist = UtcOffset::from_hms(5, 30, 0).unwrap();
        // sheet dates arrive as local midnight expressed in UTC
        assert_eq!(format_date_at(Some("2024-04-30T18:30:00.000Z"), ist), "1/5/2024");
        assert_eq!(format_date_at(Some("2024-04-30T18:30:00.000Z"), UtcOffset::UTC), "30/4/2024");
        assert_eq!(format_date_at(Some("2024-12-09"), UtcOffset::UTC), "9/12/2024");
        assert_eq!(format_date_at(Some("2024-12-09"), ist), "9/12/2024");
        assert_eq!(format_date(Some("next week")), "next week");
        assert_eq!(format_date(Some("-")), "-");
        assert_eq!(format_date(None), "-");

        assert_eq!(format_delay(Some("3")), "+3");
        assert_eq!(format_delay(Some("2.5 days")), "+2.5");
        assert_eq!(format_delay(Some("-4")), "-4");
        assert_eq!(format_delay(Some("late")), "0");
        assert_eq!(format_delay(None), "0");
    }
}
