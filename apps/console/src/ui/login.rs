use dioxus::prelude::*;
use tracing::{info, warn};

use crate::state::use_app_actions;
use crate::APP_CONFIG;

const INVALID_LOGIN: &str = "Invalid username or password";

#[component]
pub fn LoginForm() -> Element {
    let actions = use_app_actions();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(config) = APP_CONFIG.get() else {
            error.set(Some("Configuration is not loaded".into()));
            return;
        };

        let user = username.read().clone();
        if config.credentials.verify(&user, &password.read()) {
            info!(user = %user.trim(), "signed in");
            error.set(None);
            password.set(String::new());
            actions.sign_in(user.trim().to_string());
        } else {
            warn!("rejected sign-in attempt");
            error.set(Some(INVALID_LOGIN.into()));
        }
    };

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-gray-50",
            form {
                class: "w-full max-w-sm space-y-4 rounded-lg border border-gray-200 bg-white p-6 shadow-sm",
                onsubmit: submit,
                h1 { class: "text-xl font-semibold text-gray-900", "Project Management System" }
                p { class: "text-sm text-gray-600", "Sign in to continue" }
                label { class: "block text-sm font-medium text-gray-700",
                    "Username"
                    input {
                        class: "mt-1 w-full rounded border border-gray-300 px-3 py-2",
                        r#type: "text",
                        autocomplete: "username",
                        value: "{username}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                label { class: "block text-sm font-medium text-gray-700",
                    "Password"
                    input {
                        class: "mt-1 w-full rounded border border-gray-300 px-3 py-2",
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "text-sm text-red-600", "{message}" }
                }
                button {
                    class: "w-full rounded bg-blue-600 px-4 py-2 text-white transition hover:bg-blue-700",
                    r#type: "submit",
                    "Sign In"
                }
            }
        }
    }
}
