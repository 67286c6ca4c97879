use dioxus::prelude::*;
use pms_core::pipeline::summarize_party;
use pms_core::StageCache;
use tracing::{debug, error};

use super::{script_client, CLIENT_MISSING};
use crate::state::{use_app_actions, use_app_state, AppActions, AppSignal};
use crate::APP_CONFIG;

/// Stage summaries of the selected party.
///
/// The loader belongs to the stage view, so leaving the view cancels it;
/// results for a party that is no longer selected are discarded.
pub fn use_stage_loader() -> UseFuture {
    let actions = use_app_actions();
    let state = use_app_state();
    let cache = use_context::<StageCache>();

    use_future(move || {
        let cache = cache.clone();
        async move {
            load_stage_summaries(actions, state, cache).await;
        }
    })
}

async fn load_stage_summaries(actions: AppActions, state: AppSignal, cache: StageCache) {
    let Some(party) = state.peek().selected_party.clone() else {
        return;
    };
    let Some(client) = script_client() else {
        actions.set_stages_error(&party.name, CLIENT_MISSING.into());
        return;
    };
    let options = APP_CONFIG
        .get()
        .map(|config| config.load_options())
        .unwrap_or_default();

    actions.start_stages();
    let summaries = summarize_party(&client, &cache, &party, options).await;

    let failed = summaries.iter().filter(|s| s.error.is_some()).count();
    if failed > 0 && failed == summaries.len() {
        error!(party = %party.name, "every stage failed to load");
    }

    if !actions.set_stages(&party.name, summaries) {
        debug!(party = %party.name, "dropping stage summaries for a deselected party");
    }
}
