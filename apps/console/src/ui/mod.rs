pub mod feedback;
pub mod login;
pub mod parties;
pub mod shell;
pub mod stages;
pub mod tasks;
