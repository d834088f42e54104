//! Deployment-node inclusion for deployment views
//!
//! A deployment node joins a view only when something inside it does: an
//! in-scope instance, an infrastructure node, or a nested node that was
//! itself included. Including a node also includes its enclosing nodes.

use tracing::debug;

use crate::core::{ElementKind, Model, ViewError, ViewResult};
use crate::views::{ModelView, ViewKind};

impl ModelView {
    /// Add a deployment node and whatever it contains that this view accepts
    ///
    /// Returns whether the node was included.
    pub fn add_deployment_node(
        &mut self,
        model: &Model,
        node_id: &str,
        add_relationships: bool,
    ) -> ViewResult<bool> {
        let scope = self.deployment_scope()?;
        let node = model.element(node_id).ok_or_else(|| {
            ViewError::invalid_argument(format!(
                "The deployment node {} does not exist in the model.",
                node_id
            ))
        })?;
        if node.kind != ElementKind::DeploymentNode {
            return Err(ViewError::invalid_argument(format!(
                "{} is not a deployment node.",
                node.name
            )));
        }

        let included =
            self.include_deployment_subtree(model, node_id, scope.as_deref(), add_relationships)?;
        if included {
            let ancestors: Vec<String> =
                model.ancestors(node_id).iter().map(|a| a.id.clone()).collect();
            for ancestor in ancestors {
                self.add_element(model, &ancestor, add_relationships)?;
            }
        } else {
            debug!(view_key = %self.key(), node_id = %node_id, "Deployment node has nothing to show");
        }
        Ok(included)
    }

    /// Add every top-level deployment node of the view's environment
    pub fn add_all_deployment_nodes(&mut self, model: &Model) -> ViewResult<()> {
        let environment = self
            .kind()
            .environment()
            .ok_or_else(not_a_deployment_view)?
            .to_string();
        let roots: Vec<String> = model
            .elements_of_kind(ElementKind::DeploymentNode)
            .filter(|e| e.parent_id.is_none() && e.environment.as_deref() == Some(environment.as_str()))
            .map(|e| e.id.clone())
            .collect();
        for root in roots {
            self.add_deployment_node(model, &root, true)?;
        }
        Ok(())
    }

    /// Add a single deployment element together with its enclosing nodes
    pub fn add_deployment_element(
        &mut self,
        model: &Model,
        element_id: &str,
        add_relationships: bool,
    ) -> ViewResult<()> {
        self.deployment_scope()?;
        self.add_element(model, element_id, add_relationships)?;
        let ancestors: Vec<String> = model
            .ancestors(element_id)
            .iter()
            .map(|a| a.id.clone())
            .collect();
        for ancestor in ancestors {
            self.add_element(model, &ancestor, add_relationships)?;
        }
        Ok(())
    }

    fn deployment_scope(&self) -> ViewResult<Option<String>> {
        match self.kind() {
            ViewKind::Deployment {
                software_system_id, ..
            } => Ok(software_system_id.clone()),
            _ => Err(not_a_deployment_view()),
        }
    }

    /// Post-order inclusion; a node is added after its contents
    fn include_deployment_subtree(
        &mut self,
        model: &Model,
        node_id: &str,
        scope: Option<&str>,
        add_relationships: bool,
    ) -> ViewResult<bool> {
        let children: Vec<(String, ElementKind)> = model
            .children(node_id)
            .map(|c| (c.id.clone(), c.kind))
            .collect();

        let mut included = false;
        for (child_id, kind) in children {
            match kind {
                ElementKind::SoftwareSystemInstance => {
                    included |= self.try_add_element(model, &child_id, add_relationships)?;
                }
                ElementKind::ContainerInstance => {
                    let in_scope = match scope {
                        None => true,
                        Some(scope) => model
                            .software_system_of(&child_id)
                            .map_or(false, |system| system.id == scope),
                    };
                    if in_scope {
                        included |= self.try_add_element(model, &child_id, add_relationships)?;
                    }
                }
                ElementKind::InfrastructureNode => {
                    self.add_element(model, &child_id, add_relationships)?;
                    included = true;
                }
                ElementKind::DeploymentNode => {
                    included |=
                        self.include_deployment_subtree(model, &child_id, scope, add_relationships)?;
                }
                _ => {}
            }
        }

        if included {
            self.add_element(model, node_id, add_relationships)?;
        }
        Ok(included)
    }
}

fn not_a_deployment_view() -> ViewError {
    ViewError::invalid_argument("This operation is only supported by deployment views.")
}
