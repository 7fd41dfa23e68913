#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::webhook::{
        compute_signature, construct_event, parse_signature_header, verify_signature_at,
        ERR_HEADER_FORMAT, ERR_NO_MATCH, ERR_NO_SCHEME, ERR_TOLERANCE,
    };
    use chrono::Utc;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &[u8] =
        br#"{"id":"evt_1","type":"charge.succeeded","data":{"object":{"id":"ch_1"}}}"#;

    fn header_for(payload: &[u8], timestamp: i64, secret: &str) -> String {
        let sig = compute_signature(payload, &timestamp.to_string(), secret).unwrap();
        format!("t={},v1={}", timestamp, sig)
    }

    fn signature_message(err: StripeError) -> String {
        match err {
            StripeError::WebhookSignatureError(msg) => msg,
            other => panic!("expected a signature error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_signature_header() {
        let parsed = parse_signature_header("t=1700000000,v1=abc,v0=old,v1=def").unwrap();
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.timestamp_raw, "1700000000");
        assert_eq!(parsed.signatures, vec!["abc", "def"]);
    }

    #[test]
    fn test_parse_signature_header_rejects_malformed() {
        for header in ["", "garbage", "v1=abc", "t=notanumber,v1=abc"] {
            let err = parse_signature_header(header).unwrap_err();
            assert_eq!(signature_message(err), ERR_HEADER_FORMAT, "header {:?}", header);
        }

        for header in ["t=1700000000", "t=1700000000,v0=abc"] {
            let err = parse_signature_header(header).unwrap_err();
            assert_eq!(signature_message(err), ERR_NO_SCHEME, "header {:?}", header);
        }
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let now = 1_700_000_000;
        let header = header_for(PAYLOAD, now, SECRET);
        assert!(verify_signature_at(PAYLOAD, &header, SECRET, 300, now).is_ok());
    }

    #[test]
    fn test_any_matching_v1_signature_is_enough() {
        let now = 1_700_000_000;
        let good = compute_signature(PAYLOAD, &now.to_string(), SECRET).unwrap();
        let header = format!("t={},v1={},v1={}", now, "00".repeat(32), good);
        assert!(verify_signature_at(PAYLOAD, &header, SECRET, 300, now).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let now = 1_700_000_000;
        let header = header_for(PAYLOAD, now, "whsec_other");
        let err = verify_signature_at(PAYLOAD, &header, SECRET, 300, now).unwrap_err();
        assert_eq!(signature_message(err), ERR_NO_MATCH);
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let now = 1_700_000_000;
        let header = header_for(PAYLOAD, now, SECRET);
        let tampered = br#"{"id":"evt_1","type":"charge.succeeded","data":{"object":{"id":"ch_2"}}}"#;
        let err = verify_signature_at(tampered, &header, SECRET, 300, now).unwrap_err();
        assert_eq!(signature_message(err), ERR_NO_MATCH);
    }

    #[test]
    fn test_non_hex_signature_is_rejected() {
        let header = "t=1700000000,v1=zz-not-hex";
        let err = verify_signature_at(PAYLOAD, header, SECRET, 300, 1_700_000_000).unwrap_err();
        assert_eq!(signature_message(err), ERR_NO_MATCH);
    }

    #[test]
    fn test_tolerance_window() {
        let signed_at = 1_700_000_000;
        let header = header_for(PAYLOAD, signed_at, SECRET);

        assert!(verify_signature_at(PAYLOAD, &header, SECRET, 300, signed_at + 300).is_ok());

        let err = verify_signature_at(PAYLOAD, &header, SECRET, 300, signed_at + 301).unwrap_err();
        assert_eq!(signature_message(err), ERR_TOLERANCE);

        // Clock skew the other way is tolerated.
        assert!(verify_signature_at(PAYLOAD, &header, SECRET, 300, signed_at - 3600).is_ok());
    }

    #[test]
    fn test_extreme_timestamp_is_outside_tolerance() {
        let header = header_for(b"{}", i64::MIN, SECRET);
        let err = verify_signature_at(b"{}", &header, SECRET, 300, 1_700_000_000).unwrap_err();
        assert_eq!(signature_message(err), ERR_TOLERANCE);
    }

    #[test]
    fn test_signature_is_checked_before_tolerance() {
        let signed_at = 1_700_000_000;
        let header = header_for(PAYLOAD, signed_at, "whsec_other");
        let err = verify_signature_at(PAYLOAD, &header, SECRET, 300, signed_at + 10_000).unwrap_err();
        assert_eq!(signature_message(err), ERR_NO_MATCH);
    }

    #[test]
    fn test_construct_event_parses_verified_payload() {
        let header = header_for(PAYLOAD, Utc::now().timestamp(), SECRET);
        let event = construct_event(PAYLOAD, &header, SECRET, 300).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "charge.succeeded");
        assert_eq!(event.data.object["id"], "ch_1");
        assert!(!event.livemode);
    }

    #[test]
    fn test_construct_event_reads_livemode() {
        let body = br#"{"id":"evt_live","type":"charge.succeeded","livemode":true,"created":1700000000,"data":{"object":{"id":"ch_1"}}}"#;
        let header = header_for(body, Utc::now().timestamp(), SECRET);
        let event = construct_event(body, &header, SECRET, 300).unwrap();
        assert!(event.livemode);
    }

    #[test]
    fn test_construct_event_reports_unparseable_body() {
        let body = b"not json";
        let header = header_for(body, Utc::now().timestamp(), SECRET);
        let err = construct_event(body, &header, SECRET, 300).unwrap_err();
        assert!(matches!(err, StripeError::WebhookPayloadError(_)));
        assert!(err.to_string().starts_with("Invalid event payload"));
    }
}
