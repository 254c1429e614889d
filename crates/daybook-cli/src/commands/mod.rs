pub mod auth_cmd;
pub mod calendar;
pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod list;
pub mod new;
pub mod open;
pub mod write;
