//! Bulk population of model views
//!
//! Every operation here is best-effort: candidates the view's containment
//! policy rejects are skipped, any other error propagates.

use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::core::{ElementKind, Model, ViewError, ViewResult};
use crate::views::containment;
use crate::views::{ModelView, ViewKind};

impl ModelView {
    pub fn add_all_people(&mut self, model: &Model) -> ViewResult<()> {
        self.add_all_of_kind(model, ElementKind::Person)
    }

    pub fn add_all_software_systems(&mut self, model: &Model) -> ViewResult<()> {
        self.add_all_of_kind(model, ElementKind::SoftwareSystem)
    }

    pub fn add_all_custom_elements(&mut self, model: &Model) -> ViewResult<()> {
        self.add_all_of_kind(model, ElementKind::CustomElement)
    }

    /// Add containers: those of the scope in a container view, siblings of
    /// the scope in a component view, every container otherwise
    pub fn add_all_containers(&mut self, model: &Model) -> ViewResult<()> {
        let candidates: Vec<String> = match self.kind() {
            ViewKind::Container {
                software_system_id, ..
            } => children_of_kind(model, software_system_id, ElementKind::Container),
            ViewKind::Component { container_id, .. } => match model.parent_of(container_id) {
                Some(system) => children_of_kind(model, &system.id, ElementKind::Container)
                    .into_iter()
                    .filter(|id| id != container_id)
                    .collect(),
                None => Vec::new(),
            },
            _ => ids_of_kind(model, ElementKind::Container),
        };
        self.add_candidates(model, candidates)
    }

    /// Add components: those of the scope in a component view, every
    /// component otherwise
    pub fn add_all_components(&mut self, model: &Model) -> ViewResult<()> {
        let candidates = match self.kind() {
            ViewKind::Component { container_id, .. } => {
                children_of_kind(model, container_id, ElementKind::Component)
            }
            _ => ids_of_kind(model, ElementKind::Component),
        };
        self.add_candidates(model, candidates)
    }

    /// Add every element this kind of view can hold
    pub fn add_all_elements(&mut self, model: &Model) -> ViewResult<()> {
        match self.kind().clone() {
            ViewKind::Custom => self.add_all_custom_elements(model),
            ViewKind::SystemLandscape { .. } | ViewKind::SystemContext { .. } => {
                self.add_all_software_systems(model)?;
                self.add_all_people(model)?;
                self.add_all_custom_elements(model)
            }
            ViewKind::Container { .. } => {
                self.add_all_software_systems(model)?;
                self.add_all_people(model)?;
                self.add_all_containers(model)?;
                self.add_all_custom_elements(model)
            }
            ViewKind::Component { .. } => {
                self.add_all_software_systems(model)?;
                self.add_all_people(model)?;
                self.add_all_containers(model)?;
                self.add_all_components(model)?;
                self.add_all_custom_elements(model)
            }
            ViewKind::Deployment { .. } => {
                self.add_all_deployment_nodes(model)?;
                self.add_all_custom_elements(model)
            }
            ViewKind::Dynamic { .. } => Err(ViewError::invalid_argument(
                "Dynamic views are populated one relationship at a time.",
            )),
        }
    }

    /// Add the elements a freshly created view of this kind usually shows
    pub fn add_default_elements(&mut self, model: &Model) -> ViewResult<()> {
        debug!(view_key = %self.key(), view_type = %self.view_type(), "Adding default elements");
        match self.kind().clone() {
            ViewKind::Custom | ViewKind::SystemLandscape { .. } => self.add_all_elements(model),
            ViewKind::SystemContext {
                software_system_id, ..
            } => {
                self.add_nearest_neighbours(model, &software_system_id, ElementKind::CustomElement)?;
                self.add_nearest_neighbours(model, &software_system_id, ElementKind::Person)?;
                self.add_nearest_neighbours(model, &software_system_id, ElementKind::SoftwareSystem)
            }
            ViewKind::Container {
                software_system_id, ..
            } => {
                let containers =
                    children_of_kind(model, &software_system_id, ElementKind::Container);
                for container in containers {
                    self.try_add_element(model, &container, true)?;
                    for kind in [
                        ElementKind::CustomElement,
                        ElementKind::Person,
                        ElementKind::SoftwareSystem,
                        ElementKind::Container,
                    ] {
                        self.add_nearest_neighbours(model, &container, kind)?;
                    }
                }
                Ok(())
            }
            ViewKind::Component { container_id, .. } => {
                let components = children_of_kind(model, &container_id, ElementKind::Component);
                for component in components {
                    self.try_add_element(model, &component, true)?;
                    for kind in [
                        ElementKind::CustomElement,
                        ElementKind::Person,
                        ElementKind::SoftwareSystem,
                        ElementKind::Container,
                        ElementKind::Component,
                    ] {
                        self.add_nearest_neighbours(model, &component, kind)?;
                    }
                }
                Ok(())
            }
            ViewKind::Deployment { .. } => self.add_all_deployment_nodes(model),
            ViewKind::Dynamic { .. } => Err(ViewError::invalid_argument(
                "Dynamic views have no default elements.",
            )),
        }
    }

    /// Remove every element that cannot be reached from `element_id` by
    /// following relationship views from source to destination
    ///
    /// In deployment views the deployment nodes enclosing a reachable element
    /// are kept as well. Elements the view pins in place are never removed.
    pub fn remove_elements_that_cannot_be_reached_from(
        &mut self,
        model: &Model,
        element_id: &str,
    ) -> ViewResult<()> {
        if !self.is_element_in_view(element_id) {
            return Ok(());
        }

        let mut reachable: HashSet<String> = HashSet::from([element_id.to_string()]);
        let mut queue: VecDeque<String> = VecDeque::from([element_id.to_string()]);
        while let Some(current) = queue.pop_front() {
            for relationship in self
                .relationship_views_raw()
                .iter()
                .filter_map(|rv| model.relationship(rv.relationship_id()))
                .filter(|r| r.source_id == current)
            {
                if reachable.insert(relationship.destination_id.clone()) {
                    queue.push_back(relationship.destination_id.clone());
                }
            }
        }

        if self.kind().is_deployment() {
            let enclosing: Vec<String> = reachable
                .iter()
                .flat_map(|id| model.ancestors(id))
                .map(|a| a.id.clone())
                .collect();
            reachable.extend(enclosing);
        }

        let unreachable: Vec<String> = self
            .element_ids()
            .filter(|id| !reachable.contains(*id))
            .map(str::to_string)
            .collect();
        for id in unreachable {
            if let Some(element) = model.element(&id) {
                if !containment::can_be_removed(self, element) {
                    continue;
                }
            }
            self.remove_element(model, &id)?;
        }
        Ok(())
    }

    fn add_all_of_kind(&mut self, model: &Model, kind: ElementKind) -> ViewResult<()> {
        let candidates = ids_of_kind(model, kind);
        self.add_candidates(model, candidates)
    }

    fn add_candidates(&mut self, model: &Model, candidates: Vec<String>) -> ViewResult<()> {
        for id in candidates {
            self.try_add_element(model, &id, true)?;
        }
        Ok(())
    }
}

fn ids_of_kind(model: &Model, kind: ElementKind) -> Vec<String> {
    model.elements_of_kind(kind).map(|e| e.id.clone()).collect()
}

fn children_of_kind(model: &Model, parent_id: &str, kind: ElementKind) -> Vec<String> {
    model
        .children(parent_id)
        .filter(|e| e.kind == kind)
        .map(|e| e.id.clone())
        .collect()
}
