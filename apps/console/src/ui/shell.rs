use dioxus::prelude::*;
use tracing::info;

use crate::models::View;
use crate::state::{use_app_actions, use_app_state};

#[component]
pub fn Header() -> Element {
    let actions = use_app_actions();
    let state = use_app_state();
    let snapshot = state.read();

    let breadcrumb = snapshot.breadcrumb();
    let can_go_back = snapshot.view != View::Parties;
    let username = snapshot
        .session
        .as_ref()
        .map(|session| session.username.clone())
        .unwrap_or_default();

    rsx! {
        header { class: "flex flex-wrap items-center justify-between gap-4 border-b border-gray-200 bg-white px-6 py-4",
            div { class: "flex items-center gap-4",
                if can_go_back {
                    button {
                        class: "rounded border border-gray-300 px-3 py-1 text-sm hover:bg-gray-100",
                        onclick: move |_| actions.back(),
                        "Back"
                    }
                }
                div {
                    h1 { class: "text-xl font-bold text-gray-900", "Project Management System" }
                    nav { class: "text-sm text-gray-600", "{breadcrumb}" }
                }
            }
            div { class: "flex items-center gap-3 text-sm text-gray-600",
                span { "{username}" }
                button {
                    class: "rounded bg-red-600 px-3 py-1 text-white hover:bg-red-700",
                    onclick: move |_| {
                        info!("signed out");
                        actions.sign_out();
                    },
                    "Logout"
                }
            }
        }
    }
}

#[component]
pub fn Footer() -> Element {
    rsx! {
        footer { class: "border-t border-gray-200 py-3 text-center text-sm text-gray-500",
            "Powered by "
            a {
                class: "text-blue-600 hover:underline",
                href: "https://www.botivate.in",
                target: "_blank",
                rel: "noopener noreferrer",
                "Botivate"
            }
        }
    }
}
