pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod debug;
pub mod progress;
pub mod settings;
pub mod tab_bar;
pub mod task_form;
