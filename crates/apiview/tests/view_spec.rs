use apiview::*;
use serde_json::{json, Value};

#[test]
fn given_empty_view_when_rendering_json_then_only_success_is_emitted() {
    let view = View::new();

    let rendered = view.render("json").expect("Should render");

    assert_eq!(rendered, r#"{"success":false}"#);
    assert_eq!(view.to_string(), rendered);
}

#[test]
fn given_any_other_format_when_rendering_then_fails_with_unsupported_format() {
    let mut view = View::new();
    view.mark_successful();

    for format in ["xml", "JSON", "", "yaml"] {
        let err = view.render(format).unwrap_err();
        assert_eq!(
            err,
            ViewError::UnsupportedFormat {
                format: format.to_string()
            }
        );
    }
}

#[test]
fn given_collection_with_two_records_when_rendering_then_preserves_insertion_order() {
    let mut view = View::new();
    view.mark_successful();

    let mut users = view.new_collection();
    users.add_record().set("id", 1).unwrap().set("name", "Ada").unwrap();
    users.add_record().set("id", 2).unwrap().set("name", "Grace").unwrap();
    view.attach_resource("users", users)
        .expect("Should attach collection");

    let rendered = view.render("json").expect("Should render");

    assert_eq!(
        rendered,
        r#"{"success":true,"resources":{"users":{"data":[{"id":1,"name":"Ada"},{"id":2,"name":"Grace"}]}}}"#
    );
}

#[test]
fn given_attached_collection_when_mutating_returned_handle_then_render_reflects_changes() {
    let mut view = View::new();

    let users = view
        .attach_collection("users", view.new_collection())
        .expect("Should attach collection");
    users.add_record().set("id", 1).unwrap();
    users.set_pagination(1, 3, 1).unwrap();

    let value: Value = serde_json::from_str(&view.render("json").unwrap()).unwrap();
    assert_eq!(value["resources"]["users"]["data"], json!([{ "id": 1 }]));
    assert_eq!(
        value["resources"]["users"]["pagination"],
        json!({ "page": 1, "pages": 3, "per_page": 1 })
    );
}

#[test]
fn given_duplicate_resource_name_when_attaching_then_second_call_fails_and_first_is_kept() {
    let mut view = View::new();

    let first = view.attach_record("user", view.new_record()).unwrap();
    first.set("id", 1).unwrap();

    let mut second = view.new_record();
    second.set("id", 2).unwrap();
    let err = view.attach_record("user", second).unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(err, ViewError::DuplicateResource { ref name } if name == "user"));
    assert_eq!(
        view.to_value().unwrap()["resources"]["user"],
        json!({ "data": { "id": 1 } })
    );
}

#[test]
fn given_plain_list_when_attaching_then_renders_as_array() {
    let mut view = View::new();

    let tags = view
        .attach_list("tags", vec!["rust", "json"])
        .expect("Should attach list");
    tags.push(json!("api"));

    assert_eq!(
        view.to_value().unwrap(),
        json!({ "success": false, "resources": { "tags": ["rust", "json", "api"] } })
    );
}

#[test]
fn given_non_finite_list_item_when_attaching_then_nothing_is_attached() {
    let mut view = View::new();

    assert!(view.attach_list("ratios", vec![0.5, f64::NAN]).is_err());
    assert!(view.resource("ratios").is_none());
    assert_eq!(view.render("json").unwrap(), r#"{"success":false}"#);
}

#[test]
fn given_scalar_json_when_attaching_dynamically_then_fails_with_invalid_resource() {
    let mut view = View::new();

    let err = view.attach_json("answer", json!("forty-two")).unwrap_err();

    assert!(matches!(err, ViewError::InvalidResource { .. }));
    assert!(!err.is_validation());
}

#[test]
fn given_notices_when_adding_then_renders_in_call_order_with_optional_fields_omitted() {
    let mut view = View::new();

    view.add_notice(
        NoticeType::Error,
        Some("Invalid Field"),
        Some("username"),
        Some("Already taken"),
    )
    .unwrap();
    view.add_notice(NoticeType::Ok, None, None, None)
        .unwrap()
        .set_message("Saved")
        .unwrap();

    assert_eq!(
        view.to_value().unwrap()["notices"],
        json!([
            { "type": "Error", "subtype": "Invalid Field", "context": "username", "message": "Already taken" },
            { "type": "OK", "message": "Saved" }
        ])
    );
    assert!(view.to_value().unwrap().get("resources").is_none());
}

#[test]
fn given_message_at_and_over_limit_when_adding_notice_then_only_limit_succeeds() {
    let mut view = View::new();
    let at_limit = "x".repeat(MAX_MESSAGE_CHARS);
    let over_limit = "x".repeat(MAX_MESSAGE_CHARS + 1);

    assert!(view
        .add_notice(NoticeType::Info, None, None, Some(&at_limit))
        .is_ok());
    let err = view
        .add_notice(NoticeType::Info, None, None, Some(&over_limit))
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(view.notices().len(), 1);
}

#[test]
fn given_empty_message_when_adding_notice_then_fails() {
    let mut view = View::new();

    assert!(view
        .add_notice(NoticeType::Warning, None, None, Some(""))
        .is_err());
    assert!(view
        .add_notice(NoticeType::Warning, Some(""), None, None)
        .is_err());
    assert!(view.notices().is_empty());
}

#[test]
fn given_notice_type_string_when_parsing_then_only_four_values_are_accepted() {
    for value in ["OK", "Warning", "Error", "Info"] {
        let notice_type: NoticeType = value.parse().expect("Should parse");
        assert_eq!(notice_type.to_string(), value);
    }
    assert!("Fatal".parse::<NoticeType>().is_err());
    assert!("error".parse::<NoticeType>().is_err());
}

#[test]
fn given_pretty_config_when_rendering_then_output_is_indented() {
    let mut view = View::new();
    view.mark_successful();

    let rendered = view.render_with(&RenderConfig::pretty()).unwrap();

    assert_eq!(rendered, "{\n  \"success\": true\n}");
}
