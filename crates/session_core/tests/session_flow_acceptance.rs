use serde_json::json;
use session_core::{
    Action, ActionOutcome, CredentialStore, HostSignal, RecordingCollaborators, RejectReason,
    SessionFlowController, SessionView,
};
use shared::{
    domain::{AttributeIdentifier, SessionStatus},
    protocol::{HostEvent, OutgoingAction},
};

fn event(value: serde_json::Value) -> HostEvent {
    serde_json::from_value(value).expect("host event")
}

#[test]
fn manual_signing_session_acceptance() {
    let store = CredentialStore::new();
    store.load(
        serde_json::from_value(json!([{
            "id": "email-1",
            "credentialType": "pbdf.pbdf.email",
            "attributes": { "email": "alice@example.com" }
        }]))
        .expect("credentials"),
    );

    let mut host = RecordingCollaborators::new();
    let mut controller = SessionFlowController::from_event(&event(json!({
        "type": "SessionHandler.RequestSignaturePermission",
        "sessionId": "manual",
        "requesterName": "Demo Notary",
        "toDisclose": [[{ "type": "pbdf.pbdf.email.email" }]],
        "message": "I agree to the terms",
        "messageType": "text"
    })))
    .expect("reduce")
    .expect("session event");

    assert_eq!(controller.current_status(), SessionStatus::RequestPermission);
    let view = SessionView::build(&controller, &store);
    assert_eq!(view.footer.len(), 2);

    assert!(controller.act(&Action::accept(), &mut host).is_accepted());
    assert_eq!(
        controller.act(&Action::accept(), &mut host),
        ActionOutcome::Rejected {
            reason: RejectReason::DuplicateResponse
        }
    );

    controller
        .apply_event(&event(json!({
            "type": "SessionHandler.RequestPin",
            "sessionId": "manual",
            "remainingAttempts": 3
        })))
        .expect("pin request");
    assert!(controller.act(&Action::submit_pin("12345"), &mut host).is_accepted());

    controller
        .apply_event(&event(json!({
            "type": "SessionHandler.Success",
            "sessionId": "manual",
            "irmaAction": "signing",
            "result": "{\"signature\":[]}"
        })))
        .expect("success");
    assert_eq!(controller.current_status(), SessionStatus::Success);
    assert!(controller.act(&Action::RequestMail, &mut host).is_accepted());

    assert_eq!(
        host.drain(),
        vec![
            HostSignal::Protocol(OutgoingAction::RespondPermission {
                proceed: true,
                disclosure_choices: vec![AttributeIdentifier::new("pbdf.pbdf.email.email")],
            }),
            HostSignal::Protocol(OutgoingAction::RespondPin {
                proceed: true,
                pin: Some("12345".into()),
            }),
            HostSignal::SendMail {
                result: Some("{\"signature\":[]}".into()),
            },
            HostSignal::NavigateBack,
        ]
    );
}

#[test]
fn missing_enrollment_session_acceptance() {
    let mut host = RecordingCollaborators::new();
    let mut controller = SessionFlowController::from_event(&event(json!({
        "type": "SessionHandler.MissingKeyshareEnrollment",
        "sessionId": "manual",
        "schemeManagerId": "pbdf"
    })))
    .expect("reduce")
    .expect("session event");

    assert!(!controller.is_action_available(&Action::accept()));
    assert!(controller.act(&Action::GoToEnrollment, &mut host).is_accepted());
    assert!(controller.act(&Action::Dismiss, &mut host).is_accepted());
    assert_eq!(
        host.drain(),
        vec![HostSignal::NavigateToEnrollment, HostSignal::NavigateBack]
    );
}
