use dioxus::prelude::*;
use pms_core::pipeline::load_task_rows;
use tracing::{debug, error};

use super::{script_client, CLIENT_MISSING};
use crate::state::{use_app_actions, use_app_state, AppActions, AppSignal};

/// Task rows of the selected (party, stage), fetched fresh on every open.
pub fn use_task_loader() -> UseFuture {
    let actions = use_app_actions();
    let state = use_app_state();

    use_future(move || async move {
        load_tasks(actions, state).await;
    })
}

async fn load_tasks(actions: AppActions, state: AppSignal) {
    let (party, stage) = {
        let snapshot = state.peek();
        match (&snapshot.selected_party, &snapshot.selected_stage) {
            (Some(party), Some(stage)) => (party.name.clone(), stage.clone()),
            _ => return,
        }
    };
    let Some(client) = script_client() else {
        actions.set_tasks_error(&party, &stage, CLIENT_MISSING.into());
        return;
    };

    actions.start_tasks();

    match load_task_rows(&client, &party, &stage).await {
        Ok(rows) => {
            if !actions.set_tasks(&party, &stage, rows) {
                debug!(%party, %stage, "dropping tasks for a stage no longer open");
            }
        }
        Err(err) => {
            error!(%party, %stage, "task load failed: {err}");
            actions.set_tasks_error(&party, &stage, err.to_string());
        }
    }
}
