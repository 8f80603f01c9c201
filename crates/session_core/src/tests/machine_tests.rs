use super::*;
use shared::domain::{AttributeIdentifier, DisclosureGroup, IrmaAction, SessionStatus};

fn bsn_group() -> DisclosureGroup {
    DisclosureGroup(vec![AttributeIdentifier::new(
        "irma-demo.MijnOverheid.root.BSN",
    )])
}

#[test]
fn respond_is_illegal_outside_permission_and_pin_statuses() {
    let facts = SessionFacts::default().with_result("signed");
    for status in SessionStatus::ALL {
        let accept = decide(status, &facts, &Action::accept());
        let decline = decide(status, &facts, &Action::decline());
        if status.awaits_response() {
            assert!(decline.allowed, "decline should be legal in {status}");
        } else {
            assert_eq!(accept, Decision::default(), "accept legal in {status}");
            assert_eq!(decline, Decision::default(), "decline legal in {status}");
        }
    }
}

#[test]
fn accept_forwards_chosen_disclosures() {
    let facts = SessionFacts::new(IrmaAction::Disclosing).with_to_disclose(vec![bsn_group()]);
    let decision = decide(SessionStatus::RequestDisclosurePermission, &facts, &Action::accept());

    assert!(decision.allowed);
    assert_eq!(
        decision.effects,
        vec![Effect::Proceed {
            disclosure_choices: vec![AttributeIdentifier::new("irma-demo.MijnOverheid.root.BSN")],
        }]
    );
}

#[test]
fn pin_status_takes_code_or_cancel_but_not_plain_accept() {
    let facts = SessionFacts::default();

    let submit = decide(SessionStatus::RequestPin, &facts, &Action::submit_pin("12345"));
    assert_eq!(
        submit.effects,
        vec![Effect::SubmitPin {
            code: "12345".into()
        }]
    );

    let cancel = decide(SessionStatus::RequestPin, &facts, &Action::decline());
    assert_eq!(cancel.effects, vec![Effect::CancelPin]);

    assert!(!decide(SessionStatus::RequestPin, &facts, &Action::accept()).allowed);
    assert!(!decide(SessionStatus::RequestPermission, &facts, &Action::submit_pin("1")).allowed);
}

#[test]
fn success_without_result_only_allows_dismiss() {
    let facts = SessionFacts::default();

    assert!(!decide(SessionStatus::Success, &facts, &Action::RequestMail).allowed);
    assert_eq!(
        decide(SessionStatus::Success, &facts, &Action::Dismiss).effects,
        vec![Effect::NavigateBack]
    );
}

#[test]
fn success_with_result_sends_mail_before_navigating_back() {
    let facts = SessionFacts::default().with_result("{\"signature\":\"...\"}");

    assert!(is_legal(SessionStatus::Success, &facts, &Action::Dismiss));
    assert_eq!(
        decide(SessionStatus::Success, &facts, &Action::RequestMail).effects,
        vec![Effect::SendMail, Effect::NavigateBack]
    );
}

#[test]
fn empty_result_still_counts_as_present() {
    let facts = SessionFacts::default().with_result("");
    assert!(is_legal(SessionStatus::Success, &facts, &Action::RequestMail));
}

#[test]
fn terminal_statuses_only_dismiss() {
    let facts = SessionFacts::default().with_result("ignored");
    for status in [
        SessionStatus::Failure,
        SessionStatus::Cancelled,
        SessionStatus::UnsatisfiableRequest,
    ] {
        assert_eq!(
            decide(status, &facts, &Action::Dismiss).effects,
            vec![Effect::NavigateBack]
        );
        assert!(!is_legal(status, &facts, &Action::RequestMail));
        assert!(!is_legal(status, &facts, &Action::GoToEnrollment));
    }
}

#[test]
fn missing_enrollment_offers_dismiss_and_enrollment() {
    let facts = SessionFacts::default();
    let status = SessionStatus::MissingKeyshareEnrollment;

    assert_eq!(
        decide(status, &facts, &Action::GoToEnrollment).effects,
        vec![Effect::NavigateToEnrollment]
    );
    assert_eq!(
        decide(status, &facts, &Action::Dismiss).effects,
        vec![Effect::NavigateBack]
    );
    assert!(!is_legal(SessionStatus::Failure, &facts, &Action::GoToEnrollment));
}

#[test]
fn issuance_with_disclosures_uses_next_label() {
    let labels = labels(
        SessionStatus::RequestPermission,
        IrmaAction::Issuing,
        &[bsn_group()],
    )
    .expect("labels");
    assert_eq!(labels.yes, LABEL_NEXT);
    assert_eq!(labels.no, LABEL_DECLINE);
}

#[test]
fn plain_permission_uses_accept_label() {
    let disclosing = labels(SessionStatus::RequestPermission, IrmaAction::Disclosing, &[])
        .expect("labels");
    assert_eq!(disclosing.yes, LABEL_ACCEPT);

    let issuing_without_disclosures =
        labels(SessionStatus::RequestPermission, IrmaAction::Issuing, &[]).expect("labels");
    assert_eq!(issuing_without_disclosures.yes, LABEL_ACCEPT);

    let signing_with_disclosures =
        labels(SessionStatus::RequestPermission, IrmaAction::Signing, &[bsn_group()])
            .expect("labels");
    assert_eq!(signing_with_disclosures.yes, LABEL_ACCEPT);

    let verification = labels(
        SessionStatus::RequestDisclosurePermission,
        IrmaAction::Issuing,
        &[bsn_group()],
    )
    .expect("labels");
    assert_eq!(verification.yes, LABEL_ACCEPT);
}

#[test]
fn pin_labels_ignore_session_facts() {
    for action in [IrmaAction::Disclosing, IrmaAction::Issuing, IrmaAction::Signing] {
        let labels = labels(SessionStatus::RequestPin, action, &[bsn_group()]).expect("labels");
        assert_eq!((labels.yes, labels.no), (LABEL_SUBMIT, LABEL_CANCEL));
    }
}

#[test]
fn terminal_statuses_have_no_response_labels() {
    for status in SessionStatus::ALL.into_iter().filter(|s| s.is_terminal()) {
        assert_eq!(labels(status, IrmaAction::Issuing, &[bsn_group()]), None);
    }
}

#[test]
fn only_answers_are_response_actions() {
    assert!(Action::accept().is_response());
    assert!(Action::decline().is_response());
    assert!(Action::submit_pin("0000").is_response());
    assert!(!Action::Dismiss.is_response());
    assert!(!Action::RequestMail.is_response());
    assert!(!Action::GoToEnrollment.is_response());
}
