use dioxus::prelude::*;

use crate::models::StatusTone;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Loading,
    Empty,
}

impl NoticeKind {
    fn accent_classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Error => ("border-red-500 bg-red-50", "text-red-600"),
            Self::Loading => ("border-blue-400 bg-blue-50", "text-slate-700"),
            Self::Empty => ("border-slate-300 bg-slate-50", "text-slate-500"),
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct NoticeProps {
    pub kind: NoticeKind,
    pub message: String,
    #[props(optional)]
    pub hint: Option<String>,
    #[props(optional)]
    pub on_retry: Option<EventHandler<MouseEvent>>,
}

/// Full-width message shown in place of a table.
#[component]
pub fn Notice(props: NoticeProps) -> Element {
    let (container_class, accent_text) = props.kind.accent_classes();
    let message = match props.kind {
        NoticeKind::Error => format!("Error: {}", props.message),
        _ => props.message.clone(),
    };

    rsx! {
        div { class: format!("rounded-lg border-l-4 p-6 text-center {}", container_class),
            p { class: format!("text-lg mb-2 {}", accent_text), "{message}" }
            if let Some(ref hint) = props.hint {
                p { class: "text-sm text-slate-500", "{hint}" }
            }
            if let Some(handler) = props.on_retry {
                button {
                    class: "mt-2 rounded bg-blue-600 px-4 py-2 text-sm text-white transition hover:bg-blue-700",
                    onclick: move |evt| handler.call(evt),
                    "Retry"
                }
            }
        }
    }
}

fn tone_classes(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Done => "bg-green-100 text-green-800",
        StatusTone::Active => "bg-blue-100 text-blue-800",
        StatusTone::Waiting => "bg-yellow-100 text-yellow-800",
        StatusTone::Neutral => "bg-gray-100 text-gray-800",
    }
}

#[component]
pub fn StatusBadge(status: String) -> Element {
    let classes = tone_classes(StatusTone::of(&status));
    rsx! {
        span { class: format!("rounded px-2 py-1 text-xs font-medium {classes}"), "{status}" }
    }
}

#[component]
pub fn ProgressBar(progress: f64, complete: bool) -> Element {
    let fill = if complete { "bg-green-600" } else { "bg-blue-600" };
    let width = progress.clamp(0.0, 100.0);
    rsx! {
        div { class: "flex items-center gap-2",
            div { class: "h-2 w-24 rounded-full bg-gray-200",
                div {
                    class: format!("h-2 rounded-full {fill}"),
                    style: "width: {width}%",
                }
            }
            span { class: "text-sm font-medium", "{progress}%" }
        }
    }
}
