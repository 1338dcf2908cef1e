pub mod config;
pub mod control;
pub mod engine;
pub mod logging;
pub mod ui;
