use dioxus::prelude::*;

use crate::hooks::stages::use_stage_loader;
use crate::models::StageSummary;
use crate::state::{use_app_actions, use_app_state};
use crate::ui::feedback::{Notice, NoticeKind, ProgressBar};

#[component]
pub fn StageTable() -> Element {
    let actions = use_app_actions();
    let state = use_app_state();
    let loader = use_stage_loader();

    let refresh = move |_: MouseEvent| {
        let mut loader = loader;
        loader.restart();
    };

    let (party_name, stages) = {
        let snapshot = state.read();
        let Some(party) = snapshot.selected_party.as_ref() else {
            return rsx! {};
        };
        (party.name.clone(), snapshot.stages.clone())
    };

    if let Some(error) = stages.error {
        return rsx! {
            Notice { kind: NoticeKind::Error, message: error, on_retry: refresh }
        };
    }

    if stages.is_loading {
        return rsx! {
            Notice { kind: NoticeKind::Loading, message: "Loading stages for {party_name}..." }
        };
    }

    if stages.items.is_empty() {
        return rsx! {
            Notice {
                kind: NoticeKind::Empty,
                message: "No stages found for {party_name}",
                hint: "This party does not appear in any stage sheet",
            }
        };
    }

    rsx! {
        div { class: "space-y-4",
            div { class: "flex items-center justify-between",
                div {
                    h2 { class: "text-2xl font-bold", "Stages for {party_name}" }
                    p { class: "mt-1 text-sm text-gray-600",
                        "Task completion of {party_name} in each stage"
                    }
                }
                button {
                    class: "rounded border border-gray-300 px-3 py-1 text-sm hover:bg-gray-100",
                    onclick: refresh,
                    "Refresh Data"
                }
            }
            div { class: "overflow-x-auto",
                table { class: "w-full border-collapse border border-gray-300",
                    thead {
                        tr { class: "bg-blue-100",
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "S.No." }
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Stage Name" }
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Party Tasks" }
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Completed" }
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Progress" }
                            th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Action" }
                        }
                    }
                    tbody {
                        for stage in stages.items {
                            StageRow {
                                key: "{stage.id}-{stage.name}",
                                stage: stage.clone(),
                                on_open: move |name: String| actions.select_stage(name),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StageRow(stage: StageSummary, on_open: EventHandler<String>) -> Element {
    let name = stage.name.clone();
    let has_tasks = stage.has_tasks();
    let complete = stage.is_complete();
    let completed_class = if complete { "text-green-700" } else { "text-gray-700" };

    rsx! {
        tr { class: "hover:bg-gray-50",
            td { class: "border border-gray-300 px-4 py-2 text-center", "{stage.id}" }
            td { class: "border border-gray-300 px-4 py-2 font-medium",
                "{stage.name}"
                if let Some(ref error) = stage.error {
                    div { class: "mt-1 text-xs text-red-500", "Error: {error}" }
                }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                span { class: "rounded bg-blue-100 px-2 py-1 text-sm font-medium text-blue-800",
                    "{stage.total_tasks}"
                }
            }
            td { class: format!("border border-gray-300 px-4 py-2 text-center font-medium {completed_class}"),
                "{stage.completed}"
            }
            td { class: "border border-gray-300 px-4 py-2",
                ProgressBar { progress: stage.progress, complete }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                button {
                    class: "rounded bg-green-600 px-3 py-1 text-sm text-white hover:bg-green-700 disabled:cursor-not-allowed disabled:bg-gray-300",
                    disabled: !has_tasks,
                    onclick: move |_| on_open.call(name.clone()),
                    "View Tasks"
                }
            }
        }
    }
}
