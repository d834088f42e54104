//! Tests for the view set: keys, default views, persistence and hydration

use archview::prelude::*;
use serde_json::Value;

fn workspace() -> Workspace {
    let mut workspace = Workspace::new("Banking", "An internet banking system");
    let model = &mut workspace.model;
    let customer = model.add_person("Customer", "").unwrap();
    let bank = model.add_software_system("Internet Banking", "").unwrap();
    let mainframe = model.add_software_system("Mainframe", "").unwrap();
    let web = model.add_container(&bank, "Web Application", "", "Rust").unwrap();
    let api = model.add_container(&bank, "API", "", "Rust").unwrap();
    let signin = model.add_component(&api, "Sign In", "", "axum").unwrap();
    model.add_relationship_between(&customer, &bank, "Uses", None).unwrap();
    model.add_relationship_between(&bank, &mainframe, "Reads from", None).unwrap();
    model.add_relationship_between(&customer, &web, "Visits", None).unwrap();
    model.add_relationship_between(&web, &signin, "Calls", None).unwrap();
    model.add_relationship_between(&signin, &mainframe, "Checks credentials", None).unwrap();

    let live = model.add_deployment_node(None, "Live", "Server", "", "").unwrap();
    model.add_container_instance(&live, &api).unwrap();
    let test = model.add_deployment_node(None, "Test", "Laptop", "", "").unwrap();
    model.add_container_instance(&test, &web).unwrap();
    workspace
}

fn round_trip(workspace: &Workspace) -> Workspace {
    let json = serde_json::to_string(workspace).unwrap();
    let mut loaded: Workspace = serde_json::from_str(&json).unwrap();
    loaded.hydrate().unwrap();
    loaded
}

fn find(workspace: &Workspace, name: &str) -> String {
    workspace
        .model
        .elements()
        .find(|e| e.name == name)
        .map(|e| e.id.clone())
        .unwrap()
}

#[test]
fn test_create_default_views() {
    let mut workspace = workspace();
    workspace.create_default_views().unwrap();

    let summary: Vec<(String, ViewType)> = workspace
        .views
        .all_views()
        .iter()
        .map(|v| (v.key().to_string(), v.view_type()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("SystemLandscape-001".to_string(), ViewType::SystemLandscape),
            ("SystemContext-001".to_string(), ViewType::SystemContext),
            ("SystemContext-002".to_string(), ViewType::SystemContext),
            ("Container-001".to_string(), ViewType::Container),
            ("Component-001".to_string(), ViewType::Component),
            ("Deployment-001".to_string(), ViewType::Deployment),
            ("Deployment-002".to_string(), ViewType::Deployment),
        ]
    );
    for view in workspace.views.model_views() {
        assert!(view.has_automatic_layout(), "{} has no automatic layout", view.key());
        assert!(view.is_generated_key());
    }

    let live = workspace.views.model_view("Deployment-001").unwrap();
    assert_eq!(live.kind().environment(), Some("Live"));
    assert_eq!(live.element_count(), 2);
}

#[test]
fn test_round_trip_preserves_views() {
    let mut original = workspace();
    original.create_default_views().unwrap();
    let customer = find(&original, "Customer");
    original
        .views
        .model_view_mut("SystemLandscape-001")
        .unwrap()
        .element_view_mut(&customer)
        .unwrap()
        .set_position(120, 340);
    original.views.set_default_view("Container-001").unwrap();

    let loaded = round_trip(&original);
    assert_eq!(loaded.views.len(), original.views.len());
    assert_eq!(loaded.model, original.model);

    let landscape = loaded.views.model_view("SystemLandscape-001").unwrap();
    let element = landscape.element_view(&customer).unwrap();
    assert_eq!((element.x(), element.y()), (120, 340));
    assert_eq!(
        loaded.views.default_view().map(|v| v.key().to_string()),
        Some("Container-001".to_string())
    );
}

#[test]
fn test_hydrate_resumes_numbering() {
    let mut original = workspace();
    let customer = find(&original, "Customer");
    let bank = find(&original, "Internet Banking");
    let mainframe = find(&original, "Mainframe");
    {
        let view = original
            .views
            .create_dynamic_view(&original.model, None, "Flow", "")
            .unwrap();
        view.add_dynamic_relationship(&original.model, &customer, "Uses", None, &bank)
            .unwrap();
        view.add_dynamic_relationship(&original.model, &bank, "Reads from", None, &mainframe)
            .unwrap();
    }

    let mut loaded = round_trip(&original);
    let step = loaded
        .views
        .model_view_mut("Flow")
        .unwrap()
        .add_dynamic_relationship(&loaded.model, &customer, "Uses again", None, &bank)
        .unwrap();
    assert_eq!(step.order(), "3");

    let view = loaded.views.create_custom_view("", "", "").unwrap();
    assert_eq!(view.order(), 2);
}

#[test]
fn test_hydrate_rejects_missing_element() {
    let mut original = workspace();
    original.create_default_views().unwrap();
    let customer = find(&original, "Customer");

    let mut json: Value = serde_json::to_value(&original).unwrap();
    json["model"]["elements"]
        .as_object_mut()
        .unwrap()
        .remove(&customer);
    let mut loaded: Workspace = serde_json::from_value(json).unwrap();

    let error = loaded.hydrate().unwrap_err();
    assert!(matches!(error, ViewError::WorkspaceValidation { .. }));
    assert!(error.to_string().contains(&customer));
}

#[test]
fn test_hydrate_rejects_missing_relationship() {
    let mut original = workspace();
    original.create_default_views().unwrap();
    let relationship = original.model.relationships().next().unwrap().id.clone();

    let mut json: Value = serde_json::to_value(&original).unwrap();
    json["model"]["relationships"]
        .as_object_mut()
        .unwrap()
        .remove(&relationship);
    let mut loaded: Workspace = serde_json::from_value(json).unwrap();

    let error = loaded.hydrate().unwrap_err();
    assert!(matches!(error, ViewError::WorkspaceValidation { .. }));
}

#[test]
fn test_hydrate_rejects_filtered_view_without_base() {
    let mut original = workspace();
    original.create_default_views().unwrap();
    original
        .views
        .create_filtered_view("SystemLandscape-001", "Filtered", "", FilterMode::Include, &["Person"])
        .unwrap();

    let mut json: Value = serde_json::to_value(&original).unwrap();
    json["views"]["filteredViews"][0]["baseViewKey"] = Value::from("Missing");
    let mut loaded: Workspace = serde_json::from_value(json).unwrap();

    let error = loaded.hydrate().unwrap_err();
    assert!(matches!(error, ViewError::WorkspaceValidation { .. }));
    assert!(error.to_string().contains("Missing"));
}

#[test]
fn test_hydrate_rejects_duplicate_keys() {
    let mut original = workspace();
    original.views.create_custom_view("A", "", "").unwrap();
    original.views.create_custom_view("B", "", "").unwrap();

    let mut json: Value = serde_json::to_value(&original).unwrap();
    json["views"]["views"][1]["key"] = Value::from("A");
    let mut loaded: Workspace = serde_json::from_value(json).unwrap();

    assert!(matches!(
        loaded.hydrate().unwrap_err(),
        ViewError::WorkspaceValidation { .. }
    ));
}

#[test]
fn test_filtered_view_requires_static_base() {
    let mut original = workspace();
    original
        .views
        .create_dynamic_view(&original.model, None, "Flow", "")
        .unwrap();
    assert!(original
        .views
        .create_filtered_view("Flow", "", "", FilterMode::Include, &["Person"])
        .is_err());
    assert!(original
        .views
        .create_filtered_view("Nope", "", "", FilterMode::Include, &["Person"])
        .is_err());
}

#[test]
fn test_remove_view_drops_dependent_filtered_views() {
    let mut original = workspace();
    original.create_default_views().unwrap();
    original
        .views
        .create_filtered_view("SystemLandscape-001", "People", "", FilterMode::Include, &["Person"])
        .unwrap();
    original.views.set_default_view("SystemLandscape-001").unwrap();

    assert!(original.views.remove_view("SystemLandscape-001"));
    assert!(!original.views.contains_key("People"));
    assert!(original.views.default_view().is_none());
    assert!(!original.views.remove_view("SystemLandscape-001"));
}

#[test]
fn test_key_validation() {
    let mut views = ViewSet::new();
    let view = views.create_custom_view("team/overview", "", "").unwrap();
    assert_eq!(view.key(), "team-overview");
    assert!(views.create_custom_view("has space", "", "").is_err());
    assert!(views.create_custom_view("team\\overview", "", "").is_err());
    assert!(views.set_default_view("unknown").is_err());
}

#[test]
fn test_image_views() {
    let mut original = workspace();
    let bank = find(&original, "Internet Banking");
    let image = original
        .views
        .create_image_view(&original.model, Some(bank.as_str()), "Screenshot")
        .unwrap();
    image.set_content("https://example.com/screenshot.png").unwrap();
    assert_eq!(image.content_type(), Some("image/png"));

    let loaded = round_trip(&original);
    let image = loaded.views.image_view("Screenshot").unwrap();
    assert_eq!(image.element_id(), Some(bank.as_str()));
    assert_eq!(
        loaded.views.view("Screenshot").map(|v| v.view_type()),
        Some(ViewType::Image)
    );
}
