use dioxus::prelude::*;

use crate::models::{Party, Session, StageSummary, TaskFilter, TaskRow, View};

pub type AppSignal = Signal<AppState>;

/// One fetched list with its loading flag and last error.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

impl<T> LoadState<T> {
    pub fn start(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn finish(&mut self, items: Vec<T>) {
        self.items = items;
        self.is_loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.items.clear();
        self.is_loading = false;
        self.error = Some(message);
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub session: Option<Session>,
    pub view: View,
    pub selected_party: Option<Party>,
    pub selected_stage: Option<String>,
    pub parties: LoadState<Party>,
    pub stages: LoadState<StageSummary>,
    pub tasks: LoadState<TaskRow>,
    pub task_filter: TaskFilter,
}

impl AppState {
    pub fn select_party(&mut self, party: Party) {
        self.selected_party = Some(party);
        self.selected_stage = None;
        self.stages = LoadState::default();
        self.clear_tasks();
        self.view = View::Stages;
    }

    pub fn select_stage(&mut self, stage_name: String) {
        if self.selected_party.is_none() {
            return;
        }
        self.selected_stage = Some(stage_name);
        self.clear_tasks();
        self.view = View::Tasks;
    }

    pub fn back(&mut self) {
        match self.view {
            View::Tasks => {
                self.selected_stage = None;
                self.clear_tasks();
                self.view = View::Stages;
            }
            View::Stages => {
                self.selected_party = None;
                self.stages = LoadState::default();
                self.view = View::Parties;
            }
            View::Parties => {}
        }
    }

    pub fn breadcrumb(&self) -> String {
        let party = self.selected_party.as_ref().map(|p| p.name.as_str());
        match (self.view, party, self.selected_stage.as_deref()) {
            (View::Tasks, Some(party), Some(stage)) => format!("{party} > {stage} > Tasks"),
            (View::Stages, Some(party), _) | (View::Tasks, Some(party), None) => {
                format!("{party} > Stages")
            }
            _ => "All Parties".to_string(),
        }
    }

    /// True while `party` is still the one whose stages are on screen.
    pub fn is_current_party(&self, party: &str) -> bool {
        self.selected_party
            .as_ref()
            .is_some_and(|selected| selected.name == party)
    }

    pub fn is_current_stage(&self, party: &str, stage: &str) -> bool {
        self.is_current_party(party) && self.selected_stage.as_deref() == Some(stage)
    }

    fn clear_tasks(&mut self) {
        self.tasks = LoadState::default();
        self.task_filter.clear();
    }
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    pub fn sign_in(&self, username: String) {
        let mut state = self.state;
        *state.write() = AppState {
            session: Some(Session { username }),
            ..AppState::default()
        };
    }

    pub fn sign_out(&self) {
        let mut state = self.state;
        *state.write() = AppState::default();
    }

    pub fn select_party(&self, party: Party) {
        let mut state = self.state;
        state.write().select_party(party);
    }

    pub fn select_stage(&self, stage_name: String) {
        let mut state = self.state;
        state.write().select_stage(stage_name);
    }

    pub fn back(&self) {
        let mut state = self.state;
        state.write().back();
    }

    pub fn start_parties(&self) {
        let mut state = self.state;
        state.write().parties.start();
    }

    pub fn set_parties(&self, parties: Vec<Party>) {
        let mut state = self.state;
        state.write().parties.finish(parties);
    }

    pub fn set_parties_error(&self, message: String) {
        let mut state = self.state;
        state.write().parties.fail(message);
    }

    pub fn start_stages(&self) {
        let mut state = self.state;
        state.write().stages.start();
    }

    /// Stores stage summaries unless the user has moved on to another party.
    pub fn set_stages(&self, party: &str, summaries: Vec<StageSummary>) -> bool {
        let mut signal = self.state;
        let mut state = signal.write();
        if !state.is_current_party(party) {
            return false;
        }
        state.stages.finish(summaries);
        true
    }

    pub fn set_stages_error(&self, party: &str, message: String) {
        let mut signal = self.state;
        let mut state = signal.write();
        if state.is_current_party(party) {
            state.stages.fail(message);
        }
    }

    pub fn start_tasks(&self) {
        let mut state = self.state;
        state.write().tasks.start();
    }

    pub fn set_tasks(&self, party: &str, stage: &str, rows: Vec<TaskRow>) -> bool {
        let mut signal = self.state;
        let mut state = signal.write();
        if !state.is_current_stage(party, stage) {
            return false;
        }
        state.tasks.finish(rows);
        true
    }

    pub fn set_tasks_error(&self, party: &str, stage: &str, message: String) {
        let mut signal = self.state;
        let mut state = signal.write();
        if state.is_current_stage(party, stage) {
            state.tasks.fail(message);
        }
    }

    pub fn update_filter(&self, update: impl FnOnce(&mut TaskFilter)) {
        let mut state = self.state;
        update(&mut state.write().task_filter);
    }

    pub fn clear_filter(&self) {
        let mut state = self.state;
        state.write().task_filter.clear();
    }
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_app_actions() -> AppActions {
    let state = use_app_state();
    AppActions { state }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Party {
        Party::new(1, "Acme", vec!["Design".into(), "Civil".into()])
    }

    #[test]
    fn selecting_a_party_clears_the_stage() {
        let mut state = AppState::default();
        state.select_party(acme());
        state.select_stage("Design".into());
        state.task_filter.category = "draw".into();

        state.select_party(Party::new(2, "Globex", Vec::new()));
        assert_eq!(state.view, View::Stages);
        assert_eq!(state.selected_stage, None);
        assert!(state.task_filter.is_empty());
        assert_eq!(state.breadcrumb(), "Globex > Stages");
    }

    #[test]
    fn back_walks_up_one_view_at_a_time() {
        let mut state = AppState::default();
        assert_eq!(state.breadcrumb(), "All Parties");

        state.select_party(acme());
        state.select_stage("Design".into());
        assert_eq!(state.breadcrumb(), "Acme > Design > Tasks");

        state.back();
        assert_eq!(state.view, View::Stages);
        assert!(state.is_current_party("Acme"));
        assert!(!state.is_current_stage("Acme", "Design"));

        state.back();
        assert_eq!(state.view, View::Parties);
        assert_eq!(state.selected_party, None);

        state.back();
        assert_eq!(state.view, View::Parties);
    }

    #[test]
    fn stage_selection_needs_a_party() {
        let mut state = AppState::default();
        state.select_stage("Design".into());
        assert_eq!(state.view, View::Parties);
        assert_eq!(state.selected_stage, None);
    }

    #[test]
    fn failed_load_drops_stale_items() {
        let mut load = LoadState::<u32>::default();
        load.start();
        load.finish(vec![1, 2]);
        load.start();
        assert!(load.is_loading);
        load.fail("HTTP error! status: 500".into());
        assert!(load.items.is_empty());
        assert!(!load.is_loading);
        assert_eq!(load.error.as_deref(), Some("HTTP error! status: 500"));
    }
}
