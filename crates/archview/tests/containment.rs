//! Tests for the rules deciding which elements each view type accepts

use archview::prelude::*;

fn assert_rejected(result: ViewResult<()>) {
    match result {
        Err(error) => assert!(error.is_containment_rejected(), "unexpected error: {}", error),
        Ok(()) => panic!("expected a containment rejection"),
    }
}

#[test]
fn test_landscape_rejects_containers() {
    let mut model = Model::new();
    let system = model.add_software_system("Banking", "").unwrap();
    let web = model.add_container(&system, "Web", "", "").unwrap();
    let printer = model.add_custom_element("Printer", "").unwrap();

    let mut views = ViewSet::new();
    let view = views.create_system_landscape_view("Landscape", "").unwrap();
    assert_rejected(view.add_element(&model, &web, true));
    view.add_element(&model, &printer, true).unwrap();
    assert_eq!(view.element_count(), 1);
}

#[test]
fn test_container_view_rejects_scope_and_foreign_containers() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let crm = model.add_software_system("CRM", "").unwrap();
    let web = model.add_container(&banking, "Web", "", "").unwrap();
    let crm_db = model.add_container(&crm, "CRM Database", "", "").unwrap();
    let component = model.add_component(&web, "Controller", "", "").unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_container_view(&model, &banking, "Containers", "")
        .unwrap();

    assert_rejected(view.add_element(&model, &banking, true));
    assert_rejected(view.add_element(&model, &crm_db, true));
    assert_rejected(view.add_element(&model, &component, true));
    view.add_element(&model, &web, true).unwrap();
    view.add_element(&model, &crm, true).unwrap();
}

#[test]
fn test_component_view_ancestor_exclusivity() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let crm = model.add_software_system("CRM", "").unwrap();
    let api = model.add_container(&banking, "API", "", "").unwrap();
    let crm_api = model.add_container(&crm, "CRM API", "", "").unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_component_view(&model, &api, "Components", "")
        .unwrap();

    view.add_element(&model, &crm, true).unwrap();
    let error = view.add_element(&model, &crm_api, true).unwrap_err();
    assert!(error.is_containment_rejected());
    assert!(error.to_string().contains("CRM"));

    view.remove_element(&model, &crm).unwrap();
    view.add_element(&model, &crm_api, true).unwrap();
    assert_rejected(view.add_element(&model, &crm, true));
}

#[test]
fn test_component_view_rejects_scope_container_and_its_system() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let api = model.add_container(&banking, "API", "", "").unwrap();
    let web = model.add_container(&banking, "Web", "", "").unwrap();
    let web_controller = model.add_component(&web, "Web Controller", "", "").unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_component_view(&model, &api, "Components", "")
        .unwrap();
    assert_rejected(view.add_element(&model, &api, true));
    assert_rejected(view.add_element(&model, &banking, true));
    assert_rejected(view.add_element(&model, &web_controller, true));
    view.add_element(&model, &web, true).unwrap();
}

#[test]
fn test_context_view_scope_is_pinned() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let user = model.add_person("User", "").unwrap();
    model
        .add_relationship_between(&user, &banking, "Uses", None)
        .unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_system_context_view(&model, &banking, "Context", "")
        .unwrap();
    view.add_default_elements(&model).unwrap();

    assert_rejected(view.remove_element(&model, &banking));
    assert!(view.is_element_in_view(&banking));
    view.remove_element(&model, &user).unwrap();
    assert_eq!(view.relationship_count(), 0);
}

#[test]
fn test_pruning_keeps_pinned_scope() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let auditor = model.add_person("Auditor", "").unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_system_context_view(&model, &banking, "Context", "")
        .unwrap();
    view.add_element(&model, &banking, true).unwrap();
    view.add_element(&model, &auditor, true).unwrap();
    assert_eq!(view.relationship_count(), 0);

    view.remove_elements_with_no_relationships(&model).unwrap();
    assert!(view.is_element_in_view(&banking));
    assert!(!view.is_element_in_view(&auditor));
    assert_eq!(view.element_count(), 1);
}

#[test]
fn test_dynamic_view_scopes() {
    let mut model = Model::new();
    let user = model.add_person("User", "").unwrap();
    let banking = model.add_software_system("Banking", "").unwrap();
    let api = model.add_container(&banking, "API", "", "").unwrap();
    let database = model.add_container(&banking, "Database", "", "").unwrap();
    let controller = model.add_component(&api, "Controller", "", "").unwrap();

    let mut views = ViewSet::new();

    let unscoped = views.create_dynamic_view(&model, None, "Unscoped", "").unwrap();
    unscoped.add_element(&model, &user, false).unwrap();
    unscoped.add_element(&model, &banking, false).unwrap();
    assert_rejected(unscoped.add_element(&model, &api, false));

    let system_scoped = views
        .create_dynamic_view(&model, Some(banking.as_str()), "SystemScoped", "")
        .unwrap();
    system_scoped.add_element(&model, &api, false).unwrap();
    assert_rejected(system_scoped.add_element(&model, &banking, false));
    assert_rejected(system_scoped.add_element(&model, &controller, false));

    let container_scoped = views
        .create_dynamic_view(&model, Some(api.as_str()), "ContainerScoped", "")
        .unwrap();
    container_scoped.add_element(&model, &controller, false).unwrap();
    container_scoped.add_element(&model, &database, false).unwrap();
    assert_rejected(container_scoped.add_element(&model, &api, false));
    assert_rejected(container_scoped.add_element(&model, &banking, false));
}

#[test]
fn test_dynamic_view_cannot_be_scoped_to_a_person() {
    let mut model = Model::new();
    let user = model.add_person("User", "").unwrap();
    let mut views = ViewSet::new();
    let error = views
        .create_dynamic_view(&model, Some(user.as_str()), "Dynamic", "")
        .unwrap_err();
    assert!(matches!(error, ViewError::InvalidArgument { .. }));
}

#[test]
fn test_nearest_neighbours_skips_rejected_candidates() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let crm = model.add_software_system("CRM", "").unwrap();
    let mail = model.add_software_system("Mail", "").unwrap();
    let api = model.add_container(&banking, "API", "", "").unwrap();
    model.add_relationship_between(&api, &crm, "Syncs with", None).unwrap();
    model.add_relationship_between(&api, &mail, "Sends mail using", None).unwrap();
    model.add_relationship_between(&api, &banking, "Reports to", None).unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_container_view(&model, &banking, "Containers", "")
        .unwrap();

    view.add_nearest_neighbours(&model, &api, ElementKind::SoftwareSystem)
        .unwrap();

    assert!(view.is_element_in_view(&api));
    assert!(view.is_element_in_view(&crm));
    assert!(view.is_element_in_view(&mail));
    assert!(!view.is_element_in_view(&banking));
    assert_eq!(view.relationship_count(), 2);
}
