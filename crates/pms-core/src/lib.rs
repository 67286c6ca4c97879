//! Domain logic of the PMS console.
//!
//! Stage sheets come back from the script endpoint as loosely shaped rows.
//! This crate finds parties in them, measures how far each party got in each
//! stage, and turns a stage's rows into the task list shown to the user.

pub mod cache;
pub mod layout;
pub mod party;
pub mod pipeline;
pub mod resolver;
pub mod row;
pub mod source;
pub mod stage;
pub mod status;
pub mod task;

pub use cache::StageCache;
pub use layout::{Completion, StageLayout};
pub use party::{Party, StageDump};
pub use pipeline::LoadOptions;
pub use row::RawRow;
pub use source::{Action, SourceError, SourceResult, StageSource};
pub use stage::StageSummary;
pub use status::{StatusTone, StatusVocabulary};
pub use task::{Task, TaskFacets, TaskFilter, TaskRow};
