#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod state;
mod ui;

use api::ScriptClient;
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use hooks::parties::use_party_loader;
use models::View;
use once_cell::sync::OnceCell;
use pms_core::StageCache;
use state::{use_app_state, AppState};
use tracing::{error, info};
use ui::login::LoginForm;
use ui::parties::PartyTable;
use ui::shell::{Footer, Header};
use ui::stages::StageTable;
use ui::tasks::TaskTable;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static API_CLIENT: OnceCell<ScriptClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::from_env();
    init_logging(config.profile.log_level());
    bootstrap_infrastructure(config);
    launch(App);
}

fn init_logging(level: tracing::Level) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(level);
    });
}

fn bootstrap_infrastructure(config: AppConfig) {
    let _ = APP_CONFIG.set(config.clone());

    match ScriptClient::new(config) {
        Ok(client) => {
            info!(url = %client.config().script_url, "script client initialized");
            let _ = API_CLIENT.set(client);
        }
        Err(err) => {
            error!("failed to initialize script client: {err:#}");
        }
    }
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::default);
    use_context_provider(|| app_state);
    use_context_provider(StageCache::new);

    rsx! {
        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Dashboard {},
    #[route("/:..segments")]
    PageNotFound { segments: Vec<String> },
}

#[component]
fn Dashboard() -> Element {
    let signed_in = use_app_state().read().session.is_some();

    if signed_in {
        rsx! { Workspace {} }
    } else {
        rsx! { LoginForm {} }
    }
}

/// Signed-in shell; owns the party load so it survives view changes.
#[component]
fn Workspace() -> Element {
    let loader = use_party_loader();
    use_context_provider(|| loader);
    let view = use_app_state().read().view;

    rsx! {
        div { class: "flex min-h-screen flex-col bg-gray-50",
            Header {}
            main { class: "mx-auto w-full max-w-7xl flex-1 p-6",
                match view {
                    View::Parties => rsx! { PartyTable {} },
                    View::Stages => rsx! { StageTable {} },
                    View::Tasks => rsx! { TaskTable {} },
                }
            }
            Footer {}
        }
    }
}

#[component]
fn PageNotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "p-6 text-center text-gray-600",
            p { "Nothing at /{path}" }
            Link { class: "text-blue-600 underline", to: Route::Dashboard {}, "Back to the dashboard" }
        }
    }
}
