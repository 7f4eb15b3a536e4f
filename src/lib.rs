// Crate root library declaration and module exports.
pub mod autoscroll;
pub mod cli;
pub mod color_utils;
pub mod config;
pub mod context;
pub mod demo;
pub mod import;
pub mod model;
pub mod sheet;
pub mod storage;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;
