//! Data bridge: forwards store snapshots and command progress from the
//! [`Controller`] into the TUI action channel.

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use lorasim_core::{Controller, CoreError, RefreshReport};

use crate::action::{Action, ConnectionStatus, Notification};

/// Run one refresh and report it as actions.
pub async fn refresh(controller: &Controller, action_tx: &mpsc::UnboundedSender<Action>) {
    let _ = action_tx.send(Action::RefreshStarted);
    let result = controller.refresh().await;
    for action in refresh_actions(&result) {
        let _ = action_tx.send(action);
    }
}

/// Status change plus any toast for a finished refresh.
pub fn refresh_actions(result: &Result<RefreshReport, CoreError>) -> Vec<Action> {
    match result {
        Ok(report) => {
            let mut actions = vec![Action::RefreshFinished(ConnectionStatus::Connected)];
            if report.is_partial() {
                let names: Vec<&str> = report.failures.iter().map(|f| f.server.as_str()).collect();
                actions.push(Action::Notify(Notification::warning(format!(
                    "Could not load {}",
                    names.join(", ")
                ))));
            }
            actions
        }
        Err(err) => {
            warn!(error = %err, "refresh failed");
            vec![
                Action::RefreshFinished(ConnectionStatus::Unreachable(err.user_message())),
                Action::Notify(Notification::error(err.user_message())),
            ]
        }
    }
}

/// Load the fleet once, then forward every applied snapshot and command
/// event until cancelled.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut fleet = controller.subscribe();
    let mut commands = controller.command_events();

    let _ = action_tx.send(Action::FleetUpdated(fleet.current().clone()));
    refresh(&controller, &action_tx).await;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = fleet.changed() => {
                debug!(generation = snapshot.generation(), "dispatching FleetUpdated");
                let _ = action_tx.send(Action::FleetUpdated(snapshot));
            }
            event = commands.recv() => match event {
                Ok(event) => {
                    let _ = action_tx.send(Action::CommandProgress(event));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "command event receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    debug!("data bridge shut down");
}

#[cfg(test)]
mod tests {
    use lorasim_core::RefreshFailure;

    use super::*;

    #[test]
    fn partial_refresh_names_failed_servers() {
        let report = RefreshReport {
            failures: vec![RefreshFailure {
                server: "cs".into(),
                message: "server unavailable".into(),
            }],
            ..RefreshReport::default()
        };
        let actions = refresh_actions(&Ok(report));
        assert!(matches!(
            actions[0],
            Action::RefreshFinished(ConnectionStatus::Connected)
        ));
        assert!(
            matches!(&actions[1], Action::Notify(n) if n.message == "Could not load cs")
        );
    }

    #[test]
    fn failed_refresh_marks_backend_unreachable() {
        let err = CoreError::NetworkFailure {
            url: "http://localhost:2208/network-servers".into(),
            reason: "connection refused".into(),
        };
        let actions = refresh_actions(&Err(err));
        assert!(matches!(
            &actions[0],
            Action::RefreshFinished(ConnectionStatus::Unreachable(msg)) if msg.contains("connection refused")
        ));
        assert_eq!(actions.len(), 2);
    }
}
