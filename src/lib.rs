pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod runtime;
pub mod system;
pub mod ui;
