//! Which elements each kind of view accepts
//!
//! One policy function keyed on [`ViewKind`]. A rejection is reported as
//! [`ViewError::ContainmentRejected`] so that best-effort population can skip
//! the candidate; a malformed view (for example a dynamic view scoped to a
//! person) is an `InvalidArgument`.

use crate::core::{Element, ElementKind, Model, ViewError, ViewResult};
use crate::views::{ModelView, ViewKind};

/// Check whether `element` may join `view`
pub(crate) fn check_element_can_be_added(
    view: &ModelView,
    model: &Model,
    element: &Element,
) -> ViewResult<()> {
    let reject = |reason: String| -> ViewResult<()> {
        Err(ViewError::containment_rejected(
            &element.name,
            view.key(),
            reason,
        ))
    };

    match view.kind() {
        ViewKind::Custom => match element.kind {
            ElementKind::CustomElement => Ok(()),
            _ => reject("only custom elements can be added to custom views".to_string()),
        },

        ViewKind::SystemLandscape { .. } | ViewKind::SystemContext { .. } => match element.kind {
            ElementKind::Person | ElementKind::SoftwareSystem | ElementKind::CustomElement => Ok(()),
            _ => reject(format!(
                "only people, software systems and custom elements can be added to {} views",
                view.view_type()
            )),
        },

        ViewKind::Container {
            software_system_id, ..
        } => match element.kind {
            ElementKind::SoftwareSystem if element.id == *software_system_id => {
                reject("it is the software system in scope of this container view".to_string())
            }
            ElementKind::Container if element.parent_id.as_deref() != Some(software_system_id.as_str()) => {
                reject(format!(
                    "only containers of {} can be added to this container view",
                    scope_name(model, software_system_id)
                ))
            }
            ElementKind::Person | ElementKind::SoftwareSystem | ElementKind::Container => {
                view.check_parent_and_children_have_not_already_been_added(model, element)
            }
            ElementKind::CustomElement => Ok(()),
            _ => reject(
                "only people, software systems, containers and custom elements can be added to container views"
                    .to_string(),
            ),
        },

        ViewKind::Component { container_id, .. } => {
            let scope_system = model.parent_of(container_id).map(|s| s.id.as_str());
            match element.kind {
                ElementKind::SoftwareSystem if Some(element.id.as_str()) == scope_system => reject(
                    "it is the software system containing the container in scope".to_string(),
                ),
                ElementKind::Container if element.id == *container_id => {
                    reject("it is the container in scope of this component view".to_string())
                }
                ElementKind::Component if element.parent_id.as_deref() != Some(container_id.as_str()) => {
                    reject(format!(
                        "only components of {} can be added to this component view",
                        scope_name(model, container_id)
                    ))
                }
                ElementKind::Person
                | ElementKind::SoftwareSystem
                | ElementKind::Container
                | ElementKind::Component => {
                    view.check_parent_and_children_have_not_already_been_added(model, element)
                }
                ElementKind::CustomElement => Ok(()),
                _ => reject(
                    "only people, software systems, containers, components and custom elements can be added to component views"
                        .to_string(),
                ),
            }
        }

        ViewKind::Dynamic { element_id, .. } => {
            check_dynamic(view, model, element, element_id.as_deref())
        }

        ViewKind::Deployment {
            software_system_id,
            environment,
        } => check_deployment(
            view,
            model,
            element,
            software_system_id.as_deref(),
            environment,
        ),
    }
}

/// Whether `element` may be taken out of `view`
///
/// Only the scope of a system context view is pinned.
pub(crate) fn can_be_removed(view: &ModelView, element: &Element) -> bool {
    match view.kind() {
        ViewKind::SystemContext {
            software_system_id, ..
        } => element.id != *software_system_id,
        _ => true,
    }
}

fn scope_name<'a>(model: &'a Model, id: &'a str) -> &'a str {
    model.element(id).map_or(id, |e| e.name.as_str())
}

fn check_dynamic(
    view: &ModelView,
    model: &Model,
    element: &Element,
    scope_id: Option<&str>,
) -> ViewResult<()> {
    let reject = |reason: String| -> ViewResult<()> {
        Err(ViewError::containment_rejected(
            &element.name,
            view.key(),
            reason,
        ))
    };

    let Some(scope_id) = scope_id else {
        return match element.kind {
            ElementKind::Person | ElementKind::SoftwareSystem | ElementKind::CustomElement => Ok(()),
            _ => reject(
                "only people, software systems and custom elements can be added to an unscoped dynamic view"
                    .to_string(),
            ),
        };
    };

    let scope = model.element(scope_id).ok_or_else(|| {
        ViewError::invalid_argument(format!(
            "The scope {} of dynamic view {} does not exist in the model.",
            scope_id,
            view.key()
        ))
    })?;

    match scope.kind {
        ElementKind::SoftwareSystem => {
            if element.id == scope.id {
                return reject(format!("{} is already the scope of this view", scope.name));
            }
            match element.kind {
                ElementKind::Person
                | ElementKind::SoftwareSystem
                | ElementKind::Container
                | ElementKind::CustomElement => Ok(()),
                ElementKind::Component => reject(
                    "components cannot be added to a dynamic view scoped to a software system"
                        .to_string(),
                ),
                _ => reject(
                    "only people, software systems, containers and custom elements can be added to this dynamic view"
                        .to_string(),
                ),
            }
        }
        ElementKind::Container => {
            if element.id == scope.id {
                return reject(format!("{} is already the scope of this view", scope.name));
            }
            if scope.parent_id.as_deref() == Some(element.id.as_str()) {
                return reject(format!("it contains {}, the scope of this view", scope.name));
            }
            match element.kind {
                ElementKind::Person
                | ElementKind::SoftwareSystem
                | ElementKind::Container
                | ElementKind::Component => {
                    view.check_parent_and_children_have_not_already_been_added(model, element)
                }
                ElementKind::CustomElement => Ok(()),
                _ => reject(
                    "only people, software systems, containers, components and custom elements can be added to this dynamic view"
                        .to_string(),
                ),
            }
        }
        _ => Err(ViewError::invalid_argument(
            "The scope of a dynamic view must be a software system or a container.",
        )),
    }
}

fn check_deployment(
    view: &ModelView,
    model: &Model,
    element: &Element,
    scope_id: Option<&str>,
    environment: &str,
) -> ViewResult<()> {
    let reject = |reason: String| -> ViewResult<()> {
        Err(ViewError::containment_rejected(
            &element.name,
            view.key(),
            reason,
        ))
    };

    if element.kind == ElementKind::CustomElement {
        return Ok(());
    }
    if !element.kind.is_deployment_element() {
        return reject(
            "only deployment nodes, infrastructure nodes, instances and custom elements can be added to deployment views"
                .to_string(),
        );
    }
    if element.environment.as_deref() != Some(environment) {
        return reject(format!(
            "it is not in the {} deployment environment",
            environment
        ));
    }

    let members = || view.element_ids().filter_map(|id| model.element(id));
    match element.kind {
        ElementKind::SoftwareSystemInstance => {
            let system_id = element.instance_of.as_deref();
            if scope_id.is_some() && system_id == scope_id {
                return reject(
                    "it is an instance of the software system in scope of this view".to_string(),
                );
            }
            let clash = members().find(|member| {
                member.kind == ElementKind::ContainerInstance
                    && model
                        .software_system_of(&member.id)
                        .map(|s| s.id.as_str())
                        == system_id
            });
            match clash {
                Some(member) => reject(format!(
                    "the container instance {} of the same software system is already in this view",
                    member.name
                )),
                None => Ok(()),
            }
        }
        ElementKind::ContainerInstance => {
            let system_id = model.software_system_of(&element.id).map(|s| s.id.as_str());
            let clash = members().find(|member| {
                member.kind == ElementKind::SoftwareSystemInstance
                    && member.instance_of.as_deref() == system_id
            });
            match clash {
                Some(member) => reject(format!(
                    "an instance of its software system ({}) is already in this view",
                    member.name
                )),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}
