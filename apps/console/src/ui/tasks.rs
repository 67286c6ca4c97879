use dioxus::prelude::*;
use pms_core::task::{format_date, format_delay, status_counts, suggest};
use pms_core::StageLayout;

use crate::hooks::tasks::use_task_loader;
use crate::models::{TaskFacets, TaskFilter, TaskRow};
use crate::state::{use_app_actions, use_app_state};
use crate::ui::feedback::{Notice, NoticeKind, StatusBadge};

#[component]
pub fn TaskTable() -> Element {
    let actions = use_app_actions();
    let state = use_app_state();
    let loader = use_task_loader();

    let retry = move |_: MouseEvent| {
        let mut loader = loader;
        loader.restart();
    };

    let (party, stage, tasks, filter) = {
        let snapshot = state.read();
        let (Some(party), Some(stage)) = (&snapshot.selected_party, &snapshot.selected_stage)
        else {
            return rsx! {};
        };
        (
            party.name.clone(),
            stage.clone(),
            snapshot.tasks.clone(),
            snapshot.task_filter.clone(),
        )
    };

    if let Some(error) = tasks.error {
        return rsx! {
            Notice { kind: NoticeKind::Error, message: error, on_retry: retry }
        };
    }

    if tasks.is_loading {
        return rsx! {
            Notice { kind: NoticeKind::Loading, message: "Loading tasks..." }
        };
    }

    if tasks.items.is_empty() {
        return rsx! {
            Notice {
                kind: NoticeKind::Empty,
                message: "No tasks found",
                hint: "No tasks found for {party} in {stage}",
                on_retry: retry,
            }
        };
    }

    let facets = TaskFacets::collect(&tasks.items);
    let visible: Vec<TaskRow> = filter.apply(&tasks.items).into_iter().cloned().collect();
    let horizontal = StageLayout::classify(&stage) == StageLayout::HorizontalCategory;
    let shown = visible.len();
    let total = tasks.items.len();
    let counts = status_counts(&tasks.items);

    rsx! {
        div { class: "space-y-4",
            div { class: "mb-4",
                h3 { class: "text-lg font-semibold", "Tasks for {party} in {stage}" }
                p { class: "mt-1 text-sm text-gray-600",
                    "Showing {shown} of {total} tasks"
                    if horizontal {
                        span { class: "ml-2 text-blue-600", "(Horizontal Categories)" }
                    }
                }
                div { class: "mt-2 flex flex-wrap gap-2",
                    for (status, count) in counts {
                        span { key: "{status}", class: "flex items-center gap-1 text-xs text-gray-600",
                            StatusBadge { status: status.clone() }
                            "{count}"
                        }
                    }
                }
            }
            TaskFilters { filter: filter.clone(), facets }
            div { class: "overflow-x-auto",
                table { class: "w-full border-collapse border border-gray-300 bg-white shadow-sm",
                    thead {
                        tr { class: "bg-blue-50",
                            th { class: "border border-gray-300 px-4 py-3 text-left font-semibold text-gray-700", "Draft Category" }
                            th { class: "border border-gray-300 px-4 py-3 text-left font-semibold text-gray-700", "Task Name" }
                            th { class: "border border-gray-300 px-4 py-3 text-center font-semibold text-gray-700", "Status" }
                            th { class: "border border-gray-300 px-4 py-3 text-center font-semibold text-gray-700", "Planned Date" }
                            th { class: "border border-gray-300 px-4 py-3 text-center font-semibold text-gray-700", "Actual Date" }
                            th { class: "border border-gray-300 px-4 py-3 text-center font-semibold text-gray-700", "Delay (Days)" }
                        }
                    }
                    tbody {
                        for row in visible {
                            TaskLine { key: "{row.task.id}", row: row.clone() }
                        }
                    }
                }
                if shown == 0 {
                    div { class: "py-8 text-center text-gray-500",
                        div { class: "mb-2 text-lg", "No tasks match your filters" }
                        div { class: "text-sm",
                            "Try adjusting your filters or "
                            button {
                                class: "text-blue-600 underline hover:text-blue-800",
                                onclick: move |_| actions.clear_filter(),
                                "clear all filters"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn task_count_label(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}

#[component]
fn TaskLine(row: TaskRow) -> Element {
    let task = &row.task;
    let delay = format_delay(Some(task.delay.as_str()));
    let delay_class = if delay.starts_with('+') { "text-red-600" } else { "text-green-600" };
    let planned = format_date(task.planned_date.as_deref());
    let actual = format_date(task.actual_date.as_deref());
    let group_class = if row.is_first_in_category { "border-t-2 border-blue-200" } else { "" };
    let count_label = task_count_label(row.category_task_count);

    rsx! {
        tr { class: "hover:bg-gray-50 {group_class}",
            td { class: "border border-gray-300 bg-gray-50 px-4 py-2",
                if let Some(ref category) = row.display_category {
                    div {
                        div { class: "text-sm font-semibold text-gray-800", "{category}" }
                        div { class: "mt-1 text-xs text-gray-500", "{count_label}" }
                    }
                } else {
                    div { class: "ml-4 text-xs text-gray-400", "└ Subtask" }
                }
            }
            td { class: "border border-gray-300 px-4 py-2",
                div { class: "font-medium text-gray-900", "{task.name}" }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                StatusBadge { status: task.status.clone() }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center text-sm", "{planned}" }
            td { class: "border border-gray-300 px-4 py-2 text-center text-sm", "{actual}" }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                span { class: "font-semibold {delay_class}", "{delay}" }
            }
        }
    }
}

#[component]
fn TaskFilters(filter: TaskFilter, facets: TaskFacets) -> Element {
    let actions = use_app_actions();

    rsx! {
        div { class: "rounded-lg border bg-gray-50 p-4",
            div { class: "flex flex-wrap items-end gap-4",
                SuggestInput {
                    label: "Search Draft Category",
                    placeholder: "Search draft category...",
                    value: filter.category.clone(),
                    options: facets.categories.clone(),
                    on_change: move |value: String| actions.update_filter(|f| f.category = value),
                }
                SuggestInput {
                    label: "Search Task Name",
                    placeholder: "Search task name...",
                    value: filter.name.clone(),
                    options: facets.names.clone(),
                    on_change: move |value: String| actions.update_filter(|f| f.name = value),
                }
                div { class: "min-w-48 flex-1",
                    label { class: "mb-2 block text-sm font-medium text-gray-700", "Status" }
                    select {
                        class: "w-full rounded-md border border-gray-300 px-3 py-2",
                        value: "{filter.status}",
                        onchange: move |evt| actions.update_filter(|f| f.status = evt.value()),
                        option { value: "", "All Statuses" }
                        for status in facets.statuses.iter() {
                            option { key: "{status}", value: "{status}", "{status}" }
                        }
                    }
                }
                div {
                    button {
                        class: "rounded-md bg-gray-600 px-4 py-2 text-white transition-colors hover:bg-gray-700",
                        onclick: move |_| actions.clear_filter(),
                        "Clear Filters"
                    }
                }
            }
            if !filter.is_empty() {
                div { class: "mt-3 flex flex-wrap gap-2",
                    span { class: "text-sm text-gray-600", "Active filters:" }
                    if !filter.category.is_empty() {
                        FilterChip {
                            label: "Category: \"{filter.category}\"",
                            tone: "bg-blue-100 text-blue-800",
                            on_clear: move |_| actions.update_filter(|f| f.category.clear()),
                        }
                    }
                    if !filter.name.is_empty() {
                        FilterChip {
                            label: "Task: \"{filter.name}\"",
                            tone: "bg-green-100 text-green-800",
                            on_clear: move |_| actions.update_filter(|f| f.name.clear()),
                        }
                    }
                    if !filter.status.is_empty() {
                        FilterChip {
                            label: "Status: {filter.status}",
                            tone: "bg-purple-100 text-purple-800",
                            on_clear: move |_| actions.update_filter(|f| f.status.clear()),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FilterChip(label: String, tone: String, on_clear: EventHandler<MouseEvent>) -> Element {
    rsx! {
        span { class: "inline-flex items-center rounded-full px-2 py-1 text-xs font-medium {tone}",
            "{label}"
            button { class: "ml-1", onclick: move |evt| on_clear.call(evt), "×" }
        }
    }
}

/// Text filter with a dropdown of matching values.
#[component]
fn SuggestInput(
    label: String,
    placeholder: String,
    value: String,
    options: Vec<String>,
    on_change: EventHandler<String>,
) -> Element {
    let mut open = use_signal(|| false);
    let matches: Vec<String> = suggest(&options, &value).into_iter().cloned().collect();

    rsx! {
        div { class: "relative min-w-48 flex-1",
            label { class: "mb-2 block text-sm font-medium text-gray-700", "{label}" }
            input {
                class: "w-full rounded-md border border-gray-300 px-3 py-2",
                r#type: "text",
                placeholder: "{placeholder}",
                value: "{value}",
                onfocus: move |_| open.set(true),
                oninput: move |evt| {
                    open.set(true);
                    on_change.call(evt.value());
                },
            }
            if open() && !matches.is_empty() {
                div { class: "absolute z-10 mt-1 max-h-60 w-full overflow-y-auto rounded-md border border-gray-300 bg-white shadow-lg",
                    for option in matches {
                        div {
                            key: "{option}",
                            class: "cursor-pointer border-b border-gray-100 px-3 py-2 text-sm hover:bg-blue-50",
                            onclick: {
                                let picked = option.clone();
                                move |_| {
                                    open.set(false);
                                    on_change.call(picked.clone());
                                }
                            },
                            "{option}"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_counts_are_pluralised() {
        assert_eq!(task_count_label(1), "1 task");
        assert_eq!(task_count_label(0), "0 tasks");
        assert_eq!(task_count_label(4), "4 tasks");
    }
}
