pub use pms_core::{Party, StageSummary, StatusTone, TaskFacets, TaskFilter, TaskRow};

/// Which table the dashboard shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Parties,
    Stages,
    Tasks,
}

/// Signed-in user of the single shared login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}
