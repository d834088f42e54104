//! Tests for deployment views

use archview::prelude::*;

struct Estate {
    model: Model,
    banking: String,
    api: String,
    crm: String,
    aws: String,
    region: String,
    server: String,
    api_instance: String,
    load_balancer: String,
    spare: String,
}

fn estate() -> Estate {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let api = model.add_container(&banking, "API", "", "Rust").unwrap();
    let crm = model.add_software_system("CRM", "").unwrap();

    let aws = model
        .add_deployment_node(None, "Live", "Amazon Web Services", "", "")
        .unwrap();
    let region = model
        .add_deployment_node(Some(aws.as_str()), "Live", "eu-west-1", "", "")
        .unwrap();
    let server = model
        .add_deployment_node(Some(region.as_str()), "Live", "App Server", "", "EC2")
        .unwrap();
    let api_instance = model.add_container_instance(&server, &api).unwrap();
    let load_balancer = model
        .add_infrastructure_node(&region, "Load Balancer", "", "ELB")
        .unwrap();
    let spare = model
        .add_deployment_node(Some(aws.as_str()), "Live", "us-east-1", "", "")
        .unwrap();
    model
        .add_relationship_between(&load_balancer, &api_instance, "Forwards requests to", Some("HTTPS"))
        .unwrap();

    Estate {
        model,
        banking,
        api,
        crm,
        aws,
        region,
        server,
        api_instance,
        load_balancer,
        spare,
    }
}

#[test]
fn test_node_without_direct_instances_is_included() {
    let mut model = Model::new();
    let banking = model.add_software_system("Banking", "").unwrap();
    let api = model.add_container(&banking, "API", "", "").unwrap();
    let root = model.add_deployment_node(None, "Live", "Data Centre", "", "").unwrap();
    let child = model
        .add_deployment_node(Some(root.as_str()), "Live", "Server", "", "")
        .unwrap();
    let instance = model.add_container_instance(&child, &api).unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&model, Some(banking.as_str()), "Live", "Live", "")
        .unwrap();
    view.add_default_elements(&model).unwrap();

    assert!(view.is_element_in_view(&root));
    assert!(view.is_element_in_view(&child));
    assert!(view.is_element_in_view(&instance));
    assert_eq!(view.element_count(), 3);
}

#[test]
fn test_empty_branches_are_not_materialized() {
    let e = estate();
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, Some(e.banking.as_str()), "Live", "Live", "")
        .unwrap();
    view.add_all_deployment_nodes(&e.model).unwrap();

    for id in [&e.aws, &e.region, &e.server, &e.api_instance, &e.load_balancer] {
        assert!(view.is_element_in_view(id), "{} missing", id);
    }
    assert!(!view.is_element_in_view(&e.spare));
    assert_eq!(view.relationship_count(), 1);
}

#[test]
fn test_environment_must_match() {
    let mut e = estate();
    let staging = e
        .model
        .add_deployment_node(None, "Staging", "Staging Server", "", "")
        .unwrap();
    let staging_api = e.model.add_container_instance(&staging, &e.api).unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, None, "Live", "Live", "")
        .unwrap();
    let error = view.add_element(&e.model, &staging_api, true).unwrap_err();
    assert!(error.is_containment_rejected());
    assert!(!view.add_deployment_node(&e.model, &staging, true).unwrap_or(false));
    assert!(!view.is_element_in_view(&staging));
}

#[test]
fn test_scoped_view_rejects_own_system_instance() {
    let mut e = estate();
    let banking_instance = e
        .model
        .add_software_system_instance(&e.server, &e.banking)
        .unwrap();
    let crm_instance = e.model.add_software_system_instance(&e.server, &e.crm).unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, Some(e.banking.as_str()), "Live", "Live", "")
        .unwrap();
    view.add_all_deployment_nodes(&e.model).unwrap();

    assert!(!view.is_element_in_view(&banking_instance));
    assert!(view.is_element_in_view(&crm_instance));
    assert!(view.is_element_in_view(&e.api_instance));
}

#[test]
fn test_system_and_container_instances_of_same_system_exclusive() {
    let mut e = estate();
    let banking_instance = e
        .model
        .add_software_system_instance(&e.server, &e.banking)
        .unwrap();

    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, None, "Live", "Live", "")
        .unwrap();
    view.add_deployment_element(&e.model, &e.api_instance, true)
        .unwrap();
    let error = view
        .add_element(&e.model, &banking_instance, true)
        .unwrap_err();
    assert!(error.is_containment_rejected());

    view.remove_element(&e.model, &e.api_instance).unwrap();
    view.add_element(&e.model, &banking_instance, true).unwrap();
    assert!(view
        .add_element(&e.model, &e.api_instance, true)
        .unwrap_err()
        .is_containment_rejected());
}

#[test]
fn test_add_deployment_element_adds_enclosing_nodes() {
    let e = estate();
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, None, "Live", "Live", "")
        .unwrap();
    view.add_deployment_element(&e.model, &e.api_instance, true)
        .unwrap();

    let mut members: Vec<&str> = view.element_ids().collect();
    members.sort();
    let mut expected = vec![
        e.aws.as_str(),
        e.region.as_str(),
        e.server.as_str(),
        e.api_instance.as_str(),
    ];
    expected.sort();
    assert_eq!(members, expected);
}

#[test]
fn test_removing_node_removes_contents() {
    let e = estate();
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, None, "Live", "Live", "")
        .unwrap();
    view.add_all_deployment_nodes(&e.model).unwrap();

    view.remove_element(&e.model, &e.region).unwrap();
    assert_eq!(view.element_ids().collect::<Vec<_>>(), vec![e.aws.as_str()]);
    assert_eq!(view.relationship_count(), 0);
}

#[test]
fn test_animation_reveals_enclosing_nodes() {
    let e = estate();
    let mut views = ViewSet::new();
    let view = views
        .create_deployment_view(&e.model, None, "Live", "Live", "")
        .unwrap();
    view.add_all_deployment_nodes(&e.model).unwrap();

    let first = view.add_animation(&e.model, &[&e.load_balancer]).unwrap();
    assert!(first.contains_element(&e.load_balancer));
    assert!(first.contains_element(&e.region));
    assert!(first.contains_element(&e.aws));
    assert!(!first.contains_element(&e.server));

    let second = view.add_animation(&e.model, &[&e.api_instance]).unwrap();
    assert_eq!(second.elements().len(), 2);
    assert!(second.contains_element(&e.server));
    assert_eq!(second.relationships().len(), 1);
}

#[test]
fn test_deployment_operations_require_deployment_view() {
    let e = estate();
    let mut views = ViewSet::new();
    let view = views.create_system_landscape_view("Landscape", "").unwrap();
    assert!(view.add_all_deployment_nodes(&e.model).is_err());
    assert!(view.add_deployment_node(&e.model, &e.aws, true).is_err());
}
