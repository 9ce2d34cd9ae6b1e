//! Decoding of service envelopes against arbitrary payloads.

use proptest::prelude::*;
use rigidlabel_client::wire::decode_response;
use rigidlabel_client::{ErrorCode, HealthInfo, Label, LabelListItem, ServiceError};

fn code() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("INVALID_INPUT"),
        Just("NOT_ENOUGH_POINTS"),
        Just("SINGULAR_TRANSFORM"),
        Just("LABEL_NOT_FOUND"),
        Just("IO_ERROR"),
        Just("INTERNAL_ERROR"),
    ]
}

proptest! {
    #[test]
    fn error_envelopes_keep_code_and_message(
        code in code(),
        message in "[a-zA-Z0-9 .,]{0,40}",
        status in prop_oneof![Just(200u16), Just(400u16), Just(422u16), Just(500u16)],
    ) {
        let body = serde_json::json!({
            "status": "error",
            "error_code": code,
            "message": message,
            "data": null,
        })
        .to_string();
        let error = decode_response::<HealthInfo>("/health", status, &body).expect_err("error");
        match error {
            ServiceError::Api { code: got, message: text } => {
                prop_assert_eq!(got, ErrorCode::from(code));
                prop_assert_eq!(text, message);
            }
            other => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn arbitrary_text_never_panics(body in ".{0,200}", status in 100u16..600) {
        let _ = decode_response::<HealthInfo>("/health", status, &body);
    }
}

#[test]
fn full_label_decodes() {
    let body = r#"{
        "status": "ok",
        "data": {
            "image_fixed": "fixed/001.png",
            "image_moving": "moving/001.png",
            "rigid": {"theta_deg": -2.5, "tx": 10.0, "ty": -4.0, "scale_x": 1.01, "scale_y": 0.99, "shear": 0.001},
            "matrix_3x3": [[0.99, 0.04, 10.0], [-0.04, 0.99, -4.0], [0.0, 0.0, 1.0]],
            "tie_points": [
                {"fixed": {"x": 1.0, "y": 2.0}, "moving": {"x": 3.0, "y": 4.0}}
            ],
            "meta": {"comment": "checked", "timestamp": "2025-01-01T00:00:00"}
        }
    }"#;
    let label: Label = decode_response("/labels/load", 200, body).expect("label");
    assert_eq!(label.tie_points.len(), 1);
    assert_eq!(label.rigid.shear, 0.001);
    assert_eq!(
        label.meta.and_then(|m| m.comment).as_deref(),
        Some("checked")
    );
}

#[test]
fn label_list_decodes() {
    let body = r#"{"status":"ok","data":[
        {"label_id":"a__b","label_path":"data/labels/a__b.json","image_fixed":"a","image_moving":"b"}
    ]}"#;
    let items: Vec<LabelListItem> = decode_response("/labels/list", 200, body).expect("list");
    assert_eq!(items[0].label_id, "a__b");
}
