pub mod action;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config;
pub mod errors;
pub mod form_view;
pub mod logging;
pub mod records_view;
pub mod render;
pub mod tui;
