// Background sheet loading for the TUI. File IO happens here so the UI loop never blocks.
use crate::import;
use crate::model::ParseOptions;
use crate::tui::action::{Action, AppEvent};
use tokio::sync::mpsc::{Receiver, Sender};

pub async fn run_import_actor(
    mut action_rx: Receiver<Action>,
    event_tx: Sender<AppEvent>,
    default_duration_mins: i64,
) {
    while let Some(action) = action_rx.recv().await {
        match action {
            Action::Quit => break,
            Action::Import(path) => {
                let _ = event_tx
                    .send(AppEvent::Status(format!("Importing {}...", path.display())))
                    .await;
                // The run-down belongs to the day it is loaded on.
                let options = ParseOptions::today().with_default_duration(default_duration_mins);
                let report = import::import_file(&path, &options).await;
                let _ = event_tx.send(AppEvent::ImportFinished(path, report)).await;
            }
        }
    }
}
