use dioxus::prelude::*;

use crate::hooks::parties::PartyLoader;
use crate::models::Party;
use crate::state::{use_app_actions, use_app_state};
use crate::ui::feedback::{Notice, NoticeKind};

#[component]
pub fn PartyTable() -> Element {
    let actions = use_app_actions();
    let state = use_app_state();
    let loader = use_context::<PartyLoader>();

    let parties = state.read().parties.clone();

    if let Some(error) = parties.error {
        return rsx! {
            Notice {
                kind: NoticeKind::Error,
                message: error,
                on_retry: move |_| loader.retry(),
            }
        };
    }

    if parties.is_loading && parties.items.is_empty() {
        return rsx! {
            Notice { kind: NoticeKind::Loading, message: "Loading all parties..." }
        };
    }

    if parties.items.is_empty() {
        return rsx! {
            Notice {
                kind: NoticeKind::Empty,
                message: "No parties found",
                hint: "Make sure your sheets have data in Column C (Party Name)",
            }
        };
    }

    rsx! {
        div { class: "overflow-x-auto",
            div { class: "mb-4",
                h3 { class: "text-lg font-semibold", "All Parties" }
                p { class: "mt-1 text-sm text-gray-600", "Select a party to view stages where they appear" }
            }
            table { class: "w-full border-collapse border border-gray-300",
                thead {
                    tr { class: "bg-blue-100",
                        th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "S.No." }
                        th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Party Name" }
                        th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Total Stages" }
                        th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Pending Stages" }
                        th { class: "border border-gray-300 px-4 py-2 text-left font-semibold", "Action" }
                    }
                }
                tbody {
                    for party in parties.items {
                        PartyRow {
                            key: "{party.id}-{party.name}",
                            party: party.clone(),
                            on_select: move |party: Party| actions.select_party(party),
                        }
                    }
                }
            }
        }
    }
}

fn presence_hint(party: &Party) -> String {
    if party.stages_present.is_empty() {
        "No stage info".to_string()
    } else {
        format!("Present in: {}", party.stages_present.join(", "))
    }
}

#[component]
fn PartyRow(party: Party, on_select: EventHandler<Party>) -> Element {
    let hint = presence_hint(&party);
    let pending = party.pending_stages.join(", ");
    let selected = party.clone();

    rsx! {
        tr { class: "hover:bg-gray-50",
            td { class: "border border-gray-300 px-4 py-2 text-center", "{party.id}" }
            td { class: "border border-gray-300 px-4 py-2 font-medium", "{party.name}" }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                span {
                    class: "cursor-help rounded bg-blue-100 px-2 py-1 text-sm font-medium text-blue-800",
                    title: "{hint}",
                    "{party.total_projects}"
                }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                if party.pending_stages_count > 0 {
                    span {
                        class: "cursor-help rounded bg-yellow-100 px-2 py-1 text-sm font-medium text-yellow-800",
                        title: "{pending}",
                        "{party.pending_stages_count}"
                    }
                } else {
                    span { class: "text-sm text-gray-400", "0" }
                }
            }
            td { class: "border border-gray-300 px-4 py-2 text-center",
                button {
                    class: "rounded bg-green-600 px-3 py-1 text-sm text-white hover:bg-green-700",
                    onclick: move |_| on_select.call(selected.clone()),
                    "View Stages"
                }
            }
        }
    }
}
