use tracing::debug;

use crate::resolver::{self, same_party};
use crate::row::{clean_text, RawRow};
use crate::status::StatusVocabulary;
use crate::task::{Task, DEFAULT_CATEGORY, DEFAULT_DELAY, DEFAULT_STATUS};

use super::Completion;

/// Rows of a named-header stage that belong to `party`.
pub fn party_rows<'a>(rows: &'a [RawRow], party: &str) -> Vec<&'a RawRow> {
    rows.iter()
        .filter(|row| {
            resolver::PARTY_FILTER
                .resolve(row)
                .is_some_and(|candidate| same_party(&candidate, party))
        })
        .collect()
}

pub fn completion(rows: &[RawRow], party: &str, vocabulary: StatusVocabulary) -> Completion {
    let matching = party_rows(rows, party);
    let status = vocabulary.resolver();
    let completed = matching
        .iter()
        .filter(|row| {
            status
                .resolve(row)
                .is_some_and(|value| vocabulary.is_completed(&value))
        })
        .count();

    debug!(party, total = matching.len(), completed, "regular stage completion");
    Completion {
        total_tasks: matching.len(),
        completed,
    }
}

pub fn extract_tasks(rows: &[RawRow], party: &str) -> Vec<Task> {
    party_rows(rows, party)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let field = |resolver: resolver::FieldResolver| {
                resolver.resolve(row).and_then(|value| clean_text(&value))
            };
            let ordinal = idx + 1;

            Task {
                id: ordinal.to_string(),
                draft_category: field(resolver::DRAFT_CATEGORY)
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                name: field(resolver::DRAFT_NAME).unwrap_or_else(|| format!("Task {ordinal}")),
                status: field(resolver::TASK_STATUS).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                planned_date: field(resolver::PLANNED),
                actual_date: field(resolver::ACTUAL),
                delay: field(resolver::DELAY).unwrap_or_else(|| DEFAULT_DELAY.to_string()),
                column_order: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn rows() -> Vec<RawRow> {
        [
            json!({"PartyName": "Acme", "Draft Category": "Design", "DraftName": "Layout", "Planned": "2024-01-02", "Status": "Completed"}),
            json!({"PartyName": " ACME ", "Draft Category": "-", "Status": "In Progress", "Delay": "2"}),
            json!({"PartyName": "Globex", "Status": "Done"}),
            json!({"Party Name": "acme", "Azure Status": "done"}),
        ]
        .into_iter()
        .filter_map(RawRow::from_value)
        .collect()
    }

    #[test]
    fn completion_counts_matching_rows_only() {
        let stats = completion(&rows(), "Acme", StatusVocabulary::Strict);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed, 2);
        assert!(!stats.is_complete());
    }

    #[test]
    fn tasks_get_defaults_for_missing_fields() {
        let tasks = extract_tasks(&rows(), "acme");
        let summary: Vec<_> = tasks
            .iter()
            .map(|t| (t.id.as_str(), t.draft_category.as_str(), t.name.as_str(), t.status.as_str(), t.delay.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1", "Design", "Layout", "Completed", "0"),
                ("2", "General", "Task 2", "In Progress", "2"),
                ("3", "General", "Task 3", "done", "0"),
            ]
        );
        assert_eq!(tasks[0].planned_date.as_deref(), Some("2024-01-02"));
        assert_eq!(tasks[1].planned_date, None);
    }

    #[test]
    fn positional_fallback_reads_fixed_columns() {
        let cells = json!([
            "1", "01/01/2024", "Initech", "x", "y", "Civil", "Footing", "2024-02-01", "", "", "Yes"
        ]);
        let row = RawRow::from_value(cells).unwrap();
        let tasks = extract_tasks(std::slice::from_ref(&row), "initech");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].draft_category, "Civil");
        assert_eq!(tasks[0].name, "Footing");
        assert_eq!(tasks[0].status, "Yes");
        assert_eq!(tasks[0].actual_date, None);

        let stats = completion(std::slice::from_ref(&row), "Initech", StatusVocabulary::Strict);
        assert!(stats.is_complete());
    }
}
