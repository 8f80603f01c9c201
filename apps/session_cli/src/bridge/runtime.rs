//! UI loop: consumes script steps in order, drives the session controller, and emits a view after each step.

use std::io::Write;

use serde::Serialize;
use session_core::{ActionOutcome, CredentialStore, HostSignal, SessionFlowController, SessionView};
use shared::protocol::HostEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    bridge::{orchestration::ChannelCollaborators, script::ScriptStep},
    config::{OutputFormat, Settings},
};

#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Every signal the host sink received, in order.
    pub signals: Vec<HostSignal>,
    pub rejected: usize,
    pub dropped_signals: usize,
    /// Transitions into a status that no longer awaits an answer.
    pub sessions_finished: usize,
    pub views_written: usize,
}

pub async fn run_script(
    steps: Vec<ScriptStep>,
    settings: &Settings,
    store: &CredentialStore,
    out: &mut impl Write,
) -> anyhow::Result<RunSummary> {
    let capacity = settings.event_queue_capacity.max(1);
    let (step_tx, mut step_rx) = mpsc::channel::<ScriptStep>(capacity);
    let (signal_tx, signal_rx) = mpsc::channel::<HostSignal>(capacity);

    let feeder = tokio::spawn(async move {
        for step in steps {
            if step_tx.send(step).await.is_err() {
                warn!("ui loop stopped before the script was fully fed");
                break;
            }
        }
    });
    let sink = tokio::spawn(host_sink(signal_rx, settings.mail_recipient.clone()));

    let mut host = ChannelCollaborators::new(signal_tx);
    let mut controller: Option<SessionFlowController> = None;
    let mut summary = RunSummary::default();

    while let Some(step) = step_rx.recv().await {
        debug!(step = step.name(), "processing script step");
        let before = controller.as_ref().map(SessionFlowController::current_status);
        if !apply_step(&mut controller, step, store, &mut host) {
            summary.rejected += 1;
        }

        if let Some(controller) = controller.as_ref() {
            let status = controller.current_status();
            if status.is_terminal() && before != Some(status) {
                info!(%status, "session finished");
                summary.sessions_finished += 1;
            }
            write_view(out, &SessionView::build(controller, store), settings.output)?;
            summary.views_written += 1;
        }

        // Let the sink drain between steps so the signal queue never backs up.
        tokio::task::yield_now().await;
    }

    summary.dropped_signals = host.dropped();
    drop(host);
    feeder.await?;
    summary.signals = sink.await?;
    Ok(summary)
}

/// Returns `false` when the step was rejected.
fn apply_step(
    controller: &mut Option<SessionFlowController>,
    step: ScriptStep,
    store: &CredentialStore,
    host: &mut ChannelCollaborators,
) -> bool {
    match step {
        ScriptStep::Host(HostEvent::CredentialsLoaded { credentials }) => {
            store.load(credentials);
            true
        }
        ScriptStep::Host(event) => {
            let result = match controller.as_mut() {
                Some(active) => active.apply_event(&event),
                None => SessionFlowController::from_event(&event).map(|created| {
                    *controller = created;
                }),
            };
            if let Err(err) = result {
                if err.is_malformed_facts() {
                    warn!(
                        event = event.kind(),
                        %err,
                        "host broke the session contract; ignoring event"
                    );
                } else {
                    info!(event = event.kind(), %err, "ignoring host event");
                }
                return false;
            }
            true
        }
        ScriptStep::Act(action) => {
            let Some(active) = controller.as_mut() else {
                warn!(action = action.name(), "no active session; ignoring action");
                return false;
            };
            match active.act(&action, host) {
                ActionOutcome::Accepted { .. } => true,
                ActionOutcome::Rejected { reason } => {
                    info!(action = action.name(), ?reason, "action rejected");
                    false
                }
            }
        }
        ScriptStep::Choose { group, attribute } => {
            let Some(active) = controller.as_mut() else {
                warn!(group, "no active session; ignoring disclosure choice");
                return false;
            };
            if let Err(err) = active.choose_disclosure(group, attribute) {
                warn!(group, %err, "disclosure choice rejected");
                return false;
            }
            true
        }
    }
}

async fn host_sink(
    mut signal_rx: mpsc::Receiver<HostSignal>,
    mail_recipient: Option<String>,
) -> Vec<HostSignal> {
    let mut received = Vec::new();
    while let Some(signal) = signal_rx.recv().await {
        match &signal {
            HostSignal::Protocol(action) => info!(?action, "answering protocol engine"),
            HostSignal::SendMail { result } => info!(
                recipient = mail_recipient.as_deref().unwrap_or("<unset>"),
                has_result = result.is_some(),
                "composing result mail"
            ),
            HostSignal::NavigateBack => info!("navigating back"),
            HostSignal::NavigateToEnrollment => info!("navigating to keyshare enrollment"),
        }
        received.push(signal);
    }
    received
}

fn write_view(
    out: &mut impl Write,
    view: &impl Serialize,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => serde_json::to_writer(&mut *out, view)?,
        OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, view)?,
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
