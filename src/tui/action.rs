// Defines actions and events exchanged between the UI loop and the import actor.
use crate::import::ImportReport;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Import(PathBuf),
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    ImportFinished(PathBuf, ImportReport),
    Status(String),
}
