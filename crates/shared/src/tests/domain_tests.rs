use super::*;

#[test]
fn parses_every_status_from_its_wire_name() {
    for status in SessionStatus::ALL {
        assert_eq!(status.as_str().parse::<SessionStatus>(), Ok(status));
        let json = serde_json::to_string(&status).expect("serialize status");
        assert_eq!(json, format!("\"{}\"", status.as_str()));
    }
}

#[test]
fn rejects_status_outside_the_enumeration() {
    assert_eq!(
        "bogus".parse::<SessionStatus>(),
        Err(SessionError::UnknownStatus("bogus".to_string()))
    );
    assert!(serde_json::from_str::<SessionStatus>("\"RequestPin\"").is_err());
}

#[test]
fn only_permission_and_pin_statuses_await_a_response() {
    let awaiting: Vec<_> = SessionStatus::ALL
        .into_iter()
        .filter(|status| status.awaits_response())
        .collect();
    assert_eq!(
        awaiting,
        vec![
            SessionStatus::RequestPermission,
            SessionStatus::RequestDisclosurePermission,
            SessionStatus::RequestPin,
        ]
    );
}

#[test]
fn jpg_message_type_is_an_image() {
    let parsed: MessageType = serde_json::from_str("\"jpg\"").expect("jpg alias");
    assert_eq!(parsed, MessageType::Image);
    assert_eq!(MessageType::default(), MessageType::Text);
}

#[test]
fn attribute_credential_type_strips_attribute_name() {
    let attribute = AttributeIdentifier::new("irma-demo.MijnOverheid.root.BSN");
    assert_eq!(attribute.credential_type(), "irma-demo.MijnOverheid.root");
}

#[test]
fn credential_provides_matching_attribute() {
    let record = CredentialRecord {
        id: CredentialId("cred-1".into()),
        credential_type: "irma-demo.MijnOverheid.root".into(),
        hash: Some("abc".into()),
        attributes: BTreeMap::from([("BSN".to_string(), "999999990".to_string())]),
        metadata: serde_json::Value::Null,
    };

    assert!(record.provides(&AttributeIdentifier::new("irma-demo.MijnOverheid.root.BSN")));
    assert!(record.provides(
        &AttributeIdentifier::new("irma-demo.MijnOverheid.root.BSN").with_credential_hash("abc")
    ));
    assert!(!record.provides(
        &AttributeIdentifier::new("irma-demo.MijnOverheid.root.BSN").with_credential_hash("def")
    ));
    assert!(!record.provides(&AttributeIdentifier::new("pbdf.pbdf.email.email")));
}
