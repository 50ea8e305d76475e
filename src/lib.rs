pub mod app;
pub mod budget;
pub mod checklist;
pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod guests;
pub mod llm;
pub mod logging;
pub mod menu;
pub mod plan;
pub mod planner;
pub mod prompt;
pub mod recommend;
pub mod store;
pub mod subprocess;
pub mod timeline;
