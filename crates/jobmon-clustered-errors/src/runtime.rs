/*
[INPUT]:  PanelCommand values issued by ClusteredErrorsPanel, an ErrorLogSource
[OUTPUT]: FetchOutcome values delivered back to the panel owner
[POS]:    Panel runtime - executes fetch commands against the data source
[UPDATE]: When adding commands or changing how fetches are scheduled
*/

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::panel::{FetchOutcome, PanelCommand};
use crate::source::ErrorLogSource;

/// Run one command to completion.
pub async fn execute(source: &dyn ErrorLogSource, command: PanelCommand) -> FetchOutcome {
    match command {
        PanelCommand::FetchGroups(key) => FetchOutcome::Groups {
            key,
            result: source
                .error_groups(key.workflow_id, key.task_template_id)
                .await,
        },
        PanelCommand::FetchDetail(key) => FetchOutcome::Detail {
            key,
            result: source
                .error_detail(key.workflow_id, key.task_template_id, key.task_instance_id)
                .await,
        },
        PanelCommand::FetchWorkflow(workflow_id) => FetchOutcome::Workflow {
            workflow_id,
            result: source.workflow_details(workflow_id).await,
        },
    }
}

/// Run `command` in the background; the outcome is sent on `outcomes`.
///
/// Outcomes may arrive in any order. The panel drops the ones whose key is
/// no longer active.
pub fn spawn_command(
    source: Arc<dyn ErrorLogSource>,
    command: PanelCommand,
    outcomes: mpsc::UnboundedSender<FetchOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = execute(source.as_ref(), command).await;
        if outcomes.send(outcome).is_err() {
            debug!(?command, "outcome receiver dropped");
        }
    })
}

/// Spawn every command in `commands`.
pub fn spawn_all(
    source: &Arc<dyn ErrorLogSource>,
    commands: Vec<PanelCommand>,
    outcomes: &mpsc::UnboundedSender<FetchOutcome>,
) {
    for command in commands {
        spawn_command(source.clone(), command, outcomes.clone());
    }
}
