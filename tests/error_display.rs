use fcg_lib::{ErrorCategory, FcgError};

#[test]
fn config_error_display_includes_message() {
    let err = FcgError::Config("missing framework".to_string());

    assert_eq!(format!("{}", err), "Configuration error: missing framework");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: FcgError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn figma_api_helper_includes_status_and_message() {
    let err = FcgError::figma_api(Some(reqwest::StatusCode::NOT_FOUND), "not found");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: Some(404)): not found"
    );
}

#[test]
fn figma_api_helper_handles_missing_status() {
    let err = FcgError::figma_api(None, "missing token");

    assert_eq!(
        format!("{}", err),
        "Figma API error (status: None): missing token"
    );
}

#[test]
fn rules_helper_uses_message() {
    let err = FcgError::rules("selector must be an object");

    assert_eq!(format!("{}", err), "Rule error: selector must be an object");
    assert_eq!(err.to_payload().category, ErrorCategory::Rules);
}

#[test]
fn yaml_errors_convert() {
    let yaml_err = serde_yaml::from_str::<Vec<String>>("[unclosed").expect_err("invalid yaml");
    let err: FcgError = yaml_err.into();

    assert!(format!("{}", err).starts_with("YAML error: "));
}
