use dioxus::prelude::*;
use pms_core::pipeline::{annotate_pending, load_parties};
use pms_core::StageCache;
use tracing::{error, info};

use super::{script_client, CLIENT_MISSING};
use crate::state::{use_app_actions, AppActions};
use crate::APP_CONFIG;

/// Handle on the party list load, shared with the party table for Retry.
#[derive(Clone, Copy)]
pub struct PartyLoader(UseFuture);

impl PartyLoader {
    pub fn retry(&self) {
        let mut loader = self.0;
        loader.restart();
    }
}

/// Loads the party list once per sign-in.
pub fn use_party_loader() -> PartyLoader {
    let actions = use_app_actions();
    let cache = use_context::<StageCache>();

    let loader = use_future(move || {
        let cache = cache.clone();
        async move {
            load_party_list(actions, cache).await;
        }
    });
    PartyLoader(loader)
}

async fn load_party_list(actions: AppActions, cache: StageCache) {
    let Some(client) = script_client() else {
        actions.set_parties_error(CLIENT_MISSING.into());
        return;
    };
    let options = APP_CONFIG
        .get()
        .map(|config| config.load_options())
        .unwrap_or_default();

    actions.start_parties();

    let mut parties = match load_parties(&client).await {
        Ok(parties) => parties,
        Err(err) => {
            error!("party load failed: {err}");
            actions.set_parties_error(err.to_string());
            return;
        }
    };

    // show the list right away; pending counts fill in after the prefetch
    actions.set_parties(parties.clone());

    let report = annotate_pending(&client, &cache, &mut parties, options).await;
    info!(
        parties = parties.len(),
        cached = cache.len(),
        failed = report.failed.len(),
        "party progress ready"
    );
    actions.set_parties(parties);
}
