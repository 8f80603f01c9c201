//! Forwards session effects from the UI loop to the host sink without blocking.

use session_core::{Collaborators, HostSignal};
use shared::{domain::AttributeIdentifier, protocol::OutgoingAction};
use tokio::sync::mpsc::{error::TrySendError, Sender};

pub struct ChannelCollaborators {
    signal_tx: Sender<HostSignal>,
    dropped: usize,
}

impl ChannelCollaborators {
    pub fn new(signal_tx: Sender<HostSignal>) -> Self {
        Self {
            signal_tx,
            dropped: 0,
        }
    }

    /// Signals that never reached the host because the queue was full or closed.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn forward(&mut self, signal: HostSignal) {
        let signal_name = signal_name(&signal);
        match self.signal_tx.try_send(signal) {
            Ok(()) => tracing::debug!(signal = signal_name, "queued ui->host signal"),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                tracing::warn!(signal = signal_name, "host signal queue is full; dropping");
            }
            Err(TrySendError::Closed(_)) => {
                self.dropped += 1;
                tracing::warn!(signal = signal_name, "host sink disconnected; dropping");
            }
        }
    }
}

pub fn signal_name(signal: &HostSignal) -> &'static str {
    match signal {
        HostSignal::Protocol(OutgoingAction::RespondPermission { .. }) => "respond_permission",
        HostSignal::Protocol(OutgoingAction::RespondPin { .. }) => "respond_pin",
        HostSignal::SendMail { .. } => "send_mail",
        HostSignal::NavigateBack => "navigate_back",
        HostSignal::NavigateToEnrollment => "navigate_to_enrollment",
    }
}

impl Collaborators for ChannelCollaborators {
    fn respond_permission(&mut self, proceed: bool, disclosure_choices: Vec<AttributeIdentifier>) {
        self.forward(HostSignal::Protocol(OutgoingAction::RespondPermission {
            proceed,
            disclosure_choices,
        }));
    }

    fn respond_pin(&mut self, proceed: bool, pin: Option<String>) {
        self.forward(HostSignal::Protocol(OutgoingAction::RespondPin { proceed, pin }));
    }

    fn send_mail(&mut self, result: Option<&str>) {
        self.forward(HostSignal::SendMail {
            result: result.map(str::to_string),
        });
    }

    fn navigate_back(&mut self) {
        self.forward(HostSignal::NavigateBack);
    }

    fn navigate_to_enrollment(&mut self) {
        self.forward(HostSignal::NavigateToEnrollment);
    }
}
