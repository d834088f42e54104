//! Tests for logging initialization and instrumented operations

use archview::core::logging::{init_logging, LogFormat};
use archview::prelude::*;
use std::str::FromStr;
use tracing_subscriber::util::SubscriberInitExt;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("PRETTY").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("Json").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
    assert_eq!(LogFormat::variants(), &["compact", "pretty", "json"]);
}

#[test]
fn test_init_logging_invalid_format() {
    assert!(init_logging(Some("info"), Some("invalid_format")).is_err());
}

#[test]
fn test_init_logging_formats() {
    // Only the first initialization in a process can succeed
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("off"), Some("json"));
    let _ = init_logging(None, None);
}

#[test]
fn test_operations_under_trace_subscriber() {
    let _guard = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .set_default();

    let mut workspace = Workspace::new("Traced", "");
    let user = workspace.model.add_person("User", "").unwrap();
    let system = workspace.model.add_software_system("System", "").unwrap();
    let api = workspace.model.add_container(&system, "API", "", "").unwrap();
    workspace
        .model
        .add_relationship_between(&user, &api, "Calls", None)
        .unwrap();

    workspace.create_default_views().unwrap();
    let previous = workspace.clone();
    for view in workspace.views.model_views_mut() {
        view.disable_automatic_layout();
    }
    workspace.copy_layout_information_from(&previous);
    workspace.hydrate().unwrap();

    assert_eq!(workspace.views.len(), 3);
}
