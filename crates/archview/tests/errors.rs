//! Tests for error reporting across the public API

use archview::prelude::*;

#[test]
fn test_error_messages() {
    let error = ViewError::invalid_argument("A key must be specified.");
    assert_eq!(error.to_string(), "Invalid argument: A key must be specified.");

    let error = ViewError::containment_rejected("API", "Landscape", "containers are not allowed");
    assert_eq!(
        error.to_string(),
        "API is not permitted in view Landscape: containers are not allowed"
    );

    let error = ViewError::workspace_validation("element 7 does not exist");
    assert_eq!(
        error.to_string(),
        "Workspace validation failed: element 7 does not exist"
    );
}

#[test]
fn test_rejection_names_element_and_view() {
    let mut model = Model::new();
    let system = model.add_software_system("Banking", "").unwrap();
    let api = model.add_container(&system, "API Application", "", "").unwrap();

    let mut views = ViewSet::new();
    let view = views.create_system_landscape_view("Everything", "").unwrap();
    let error = view.add_element(&model, &api, true).unwrap_err();

    match error {
        ViewError::ContainmentRejected { element, view, .. } => {
            assert_eq!(element, "API Application");
            assert_eq!(view, "Everything");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_invalid_arguments() {
    let mut model = Model::new();
    let user = model.add_person("User", "").unwrap();
    let system = model.add_software_system("Banking", "").unwrap();

    let mut views = ViewSet::new();
    assert!(matches!(
        views.create_system_context_view(&model, &user, "Context", ""),
        Err(ViewError::InvalidArgument { .. })
    ));
    assert!(matches!(
        views.create_container_view(&model, "404", "Containers", ""),
        Err(ViewError::InvalidArgument { .. })
    ));
    assert!(matches!(
        views.create_deployment_view(&model, Some(system.as_str()), "Live", " ", ""),
        Err(ViewError::InvalidArgument { .. })
    ));
    assert!(views.is_empty());

    let view = views.create_system_landscape_view("Landscape", "").unwrap();
    assert!(matches!(
        view.add_element(&model, "", true),
        Err(ViewError::InvalidArgument { .. })
    ));
    assert!(matches!(
        view.add_nearest_neighbours(&model, "404", ElementKind::Person),
        Err(ViewError::InvalidArgument { .. })
    ));
    assert!(matches!(
        view.start_parallel_sequence(),
        Err(ViewError::InvalidArgument { .. })
    ));
}

#[test]
fn test_model_builder_errors() {
    let mut model = Model::new();
    let user = model.add_person("User", "").unwrap();

    assert!(model.add_person("  ", "").is_err());
    assert!(model.add_container(&user, "API", "", "").is_err());
    assert!(model.add_deployment_node(None, "", "Server", "", "").is_err());
    assert!(model
        .add_relationship_between(&user, "404", "Uses", None)
        .is_err());
    assert!(model.add_tags("404", &["External"]).is_err());
    assert_eq!(model.element_count(), 1);
    assert_eq!(model.relationship_count(), 0);
}
