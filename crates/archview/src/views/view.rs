//! Membership engine shared by every model-backed view
//!
//! A [`ModelView`] is a named selection of elements and relationships from a
//! [`Model`]. What may be selected depends on the view's [`ViewKind`]; the
//! rules live in [`containment`](super::containment) as one function keyed on
//! the kind. Views hold ids only, so every operation that needs the graph
//! takes the model as an argument.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::core::{
    AutomaticLayout, Dimensions, Element, ElementKind, Model, PaperSize, SequenceNumber,
    ViewError, ViewResult, ViewType,
};
use crate::views::containment;
use crate::views::{
    Animation, DefaultLayoutMergeStrategy, ElementView, LayoutMergeStrategy, RelationshipView,
};

/// The type of a model view, with its per-type data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewKind {
    /// Custom elements only
    Custom,
    SystemLandscape {
        #[serde(default)]
        enterprise_boundary_visible: bool,
    },
    SystemContext {
        software_system_id: String,
        #[serde(default)]
        enterprise_boundary_visible: bool,
    },
    Container {
        software_system_id: String,
        #[serde(default)]
        external_software_system_boundary_visible: bool,
    },
    Component {
        container_id: String,
        #[serde(default)]
        external_container_boundary_visible: bool,
    },
    /// Scope is none, a software system or a container
    Dynamic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        element_id: Option<String>,
        #[serde(default)]
        external_boundaries_visible: bool,
    },
    Deployment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        software_system_id: Option<String>,
        environment: String,
    },
}

impl ViewKind {
    pub fn view_type(&self) -> ViewType {
        match self {
            ViewKind::Custom => ViewType::Custom,
            ViewKind::SystemLandscape { .. } => ViewType::SystemLandscape,
            ViewKind::SystemContext { .. } => ViewType::SystemContext,
            ViewKind::Container { .. } => ViewType::Container,
            ViewKind::Component { .. } => ViewType::Component,
            ViewKind::Dynamic { .. } => ViewType::Dynamic,
            ViewKind::Deployment { .. } => ViewType::Deployment,
        }
    }

    /// Id of the element this view is scoped to, if any
    pub fn scope_id(&self) -> Option<&str> {
        match self {
            ViewKind::Custom | ViewKind::SystemLandscape { .. } => None,
            ViewKind::SystemContext {
                software_system_id, ..
            }
            | ViewKind::Container {
                software_system_id, ..
            } => Some(software_system_id),
            ViewKind::Component { container_id, .. } => Some(container_id),
            ViewKind::Dynamic { element_id, .. } => element_id.as_deref(),
            ViewKind::Deployment {
                software_system_id, ..
            } => software_system_id.as_deref(),
        }
    }

    /// Deployment environment (deployment views only)
    pub fn environment(&self) -> Option<&str> {
        match self {
            ViewKind::Deployment { environment, .. } => Some(environment),
            _ => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ViewKind::Dynamic { .. })
    }

    pub fn is_deployment(&self) -> bool {
        matches!(self, ViewKind::Deployment { .. })
    }
}

fn default_merge_from_remote() -> bool {
    true
}

fn default_layout_merge_strategy() -> Arc<dyn LayoutMergeStrategy> {
    Arc::new(DefaultLayoutMergeStrategy)
}

/// A view backed directly by the architecture graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelView {
    key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    generated_key: bool,
    order: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    kind: ViewKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    paper_size: Option<PaperSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    automatic_layout: Option<AutomaticLayout>,
    #[serde(default = "default_merge_from_remote")]
    merge_from_remote: bool,
    /// Element views keyed by element id, in insertion order
    #[serde(default)]
    elements: IndexMap<String, ElementView>,
    /// Relationship views in insertion order
    #[serde(default)]
    relationships: Vec<RelationshipView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    animations: Vec<Animation>,
    #[serde(skip)]
    sequence: SequenceNumber,
    #[serde(skip, default = "default_layout_merge_strategy")]
    layout_merge_strategy: Arc<dyn LayoutMergeStrategy>,
}

impl ModelView {
    /// Create an empty view; the [`ViewSet`](crate::views::ViewSet) factories
    /// assign key and order
    pub(crate) fn new(
        key: String,
        generated_key: bool,
        order: u32,
        kind: ViewKind,
        description: &str,
    ) -> Self {
        Self {
            key,
            generated_key,
            order,
            title: String::new(),
            description: description.to_string(),
            kind,
            properties: BTreeMap::new(),
            paper_size: None,
            dimensions: None,
            automatic_layout: None,
            merge_from_remote: true,
            elements: IndexMap::new(),
            relationships: Vec::new(),
            animations: Vec::new(),
            sequence: SequenceNumber::new(),
            layout_merge_strategy: default_layout_merge_strategy(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_generated_key(&self) -> bool {
        self.generated_key
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ViewKind {
        &mut self.kind
    }

    pub fn view_type(&self) -> ViewType {
        self.kind.view_type()
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn paper_size(&self) -> Option<PaperSize> {
        self.paper_size
    }

    pub fn set_paper_size(&mut self, paper_size: Option<PaperSize>) {
        self.paper_size = paper_size;
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn set_dimensions(&mut self, dimensions: Option<Dimensions>) {
        self.dimensions = dimensions;
    }

    pub fn automatic_layout(&self) -> Option<&AutomaticLayout> {
        self.automatic_layout.as_ref()
    }

    pub fn has_automatic_layout(&self) -> bool {
        self.automatic_layout.is_some()
    }

    pub fn enable_automatic_layout(&mut self, layout: AutomaticLayout) {
        self.automatic_layout = Some(layout);
    }

    pub fn disable_automatic_layout(&mut self) {
        self.automatic_layout = None;
    }

    /// Whether layout from a prior revision may be merged into this view
    pub fn is_merge_from_remote(&self) -> bool {
        self.merge_from_remote
    }

    pub fn set_merge_from_remote(&mut self, merge_from_remote: bool) {
        self.merge_from_remote = merge_from_remote;
    }

    pub fn layout_merge_strategy(&self) -> &Arc<dyn LayoutMergeStrategy> {
        &self.layout_merge_strategy
    }

    pub fn set_layout_merge_strategy(&mut self, strategy: Arc<dyn LayoutMergeStrategy>) {
        self.layout_merge_strategy = strategy;
    }

    /// Iterate over element views in insertion order
    pub fn element_views(&self) -> impl Iterator<Item = &ElementView> {
        self.elements.values()
    }

    pub fn element_view(&self, element_id: &str) -> Option<&ElementView> {
        self.elements.get(element_id)
    }

    pub fn element_view_mut(&mut self, element_id: &str) -> Option<&mut ElementView> {
        self.elements.get_mut(element_id)
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_element_in_view(&self, element_id: &str) -> bool {
        self.elements.contains_key(element_id)
    }

    /// Relationship views, ordered by step label in dynamic views and by
    /// insertion order otherwise
    pub fn relationship_views(&self) -> Vec<&RelationshipView> {
        let mut views: Vec<&RelationshipView> = self.relationships.iter().collect();
        if self.kind.is_dynamic() {
            super::dynamic::sort_by_order(&mut views);
        }
        views
    }

    /// Relationship views in insertion order
    pub(crate) fn relationship_views_raw(&self) -> &[RelationshipView] {
        &self.relationships
    }

    pub(crate) fn relationship_views_raw_mut(&mut self) -> &mut [RelationshipView] {
        &mut self.relationships
    }

    /// First view of the given relationship
    pub fn relationship_view(&self, relationship_id: &str) -> Option<&RelationshipView> {
        self.relationships
            .iter()
            .find(|rv| rv.relationship_id() == relationship_id)
    }

    pub fn relationship_view_mut(&mut self, relationship_id: &str) -> Option<&mut RelationshipView> {
        self.relationships
            .iter_mut()
            .find(|rv| rv.relationship_id() == relationship_id)
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_relationship_in_view(&self, relationship_id: &str) -> bool {
        self.relationship_view(relationship_id).is_some()
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub(crate) fn sequence_mut(&mut self) -> &mut SequenceNumber {
        &mut self.sequence
    }

    pub(crate) fn set_sequence(&mut self, sequence: SequenceNumber) {
        self.sequence = sequence;
    }

    /// Add an element, optionally with every relationship connecting it to
    /// elements already in the view
    ///
    /// Fails with `InvalidArgument` if the element is not in the model and
    /// with `ContainmentRejected` if this kind of view does not accept it.
    /// Dynamic views never add relationships implicitly.
    pub fn add_element(
        &mut self,
        model: &Model,
        element_id: &str,
        add_relationships: bool,
    ) -> ViewResult<()> {
        if element_id.trim().is_empty() {
            return Err(ViewError::invalid_argument("An element must be specified."));
        }
        let element = model.element(element_id).ok_or_else(|| {
            ViewError::invalid_argument(format!(
                "The element {} does not exist in the model associated with view {}.",
                element_id, self.key
            ))
        })?;
        containment::check_element_can_be_added(self, model, element)?;

        if !self.elements.contains_key(element_id) {
            trace!(view_key = %self.key, element_id = %element_id, element_name = %element.name, "Adding element to view");
            self.elements
                .insert(element_id.to_string(), ElementView::new(element_id));
        }
        if add_relationships && !self.kind.is_dynamic() {
            self.add_relationships_for(model, element_id);
        }
        Ok(())
    }

    /// Add an element, treating a containment rejection as a skip
    ///
    /// Returns whether the element is now in the view.
    pub(crate) fn try_add_element(
        &mut self,
        model: &Model,
        element_id: &str,
        add_relationships: bool,
    ) -> ViewResult<bool> {
        match self.add_element(model, element_id, add_relationships) {
            Ok(()) => Ok(true),
            Err(error) if error.is_containment_rejected() => {
                debug!(view_key = %self.key, element_id = %element_id, %error, "Skipping element");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }

    fn add_relationships_for(&mut self, model: &Model, element_id: &str) {
        let connecting: Vec<String> = model
            .relationships()
            .filter(|r| {
                (r.source_id == element_id && self.elements.contains_key(&r.destination_id))
                    || (r.destination_id == element_id && self.elements.contains_key(&r.source_id))
            })
            .map(|r| r.id.clone())
            .collect();
        for relationship_id in connecting {
            self.insert_relationship_view(RelationshipView::new(relationship_id));
        }
    }

    /// Insert unless an equal view exists; returns the index of the view
    pub(crate) fn insert_relationship_view(&mut self, view: RelationshipView) -> usize {
        let dynamic = self.kind.is_dynamic();
        let existing = self.relationships.iter().position(|rv| {
            if dynamic {
                rv.same_step(&view)
            } else {
                rv.relationship_id() == view.relationship_id()
            }
        });
        match existing {
            Some(index) => index,
            None => {
                trace!(view_key = %self.key, relationship_id = %view.relationship_id(), order = %view.order(), "Adding relationship to view");
                self.relationships.push(view);
                self.relationships.len() - 1
            }
        }
    }

    /// Remove an element and every relationship view touching it
    ///
    /// Removing a deployment node from a deployment view removes its
    /// contents first.
    pub fn remove_element(&mut self, model: &Model, element_id: &str) -> ViewResult<()> {
        if let Some(element) = model.element(element_id) {
            if !containment::can_be_removed(self, element) {
                return Err(ViewError::containment_rejected(
                    &element.name,
                    &self.key,
                    "it is the scope of this view and cannot be removed",
                ));
            }
            if self.kind.is_deployment() && element.kind == ElementKind::DeploymentNode {
                let children: Vec<String> =
                    model.children(element_id).map(|c| c.id.clone()).collect();
                for child in children {
                    self.remove_element(model, &child)?;
                }
            }
        }

        if self.elements.shift_remove(element_id).is_some() {
            trace!(view_key = %self.key, element_id = %element_id, "Removed element from view");
        }
        self.relationships.retain(|rv| {
            model
                .relationship(rv.relationship_id())
                .map_or(true, |r| !r.touches(element_id))
        });
        Ok(())
    }

    /// Add a relationship if both of its endpoints are already in the view
    ///
    /// Returns the relationship view, or `None` when an endpoint is missing.
    pub fn add_relationship(
        &mut self,
        model: &Model,
        relationship_id: &str,
    ) -> ViewResult<Option<&RelationshipView>> {
        let relationship = model.relationship(relationship_id).ok_or_else(|| {
            ViewError::invalid_argument(format!(
                "The relationship {} does not exist in the model.",
                relationship_id
            ))
        })?;
        if self.is_element_in_view(&relationship.source_id)
            && self.is_element_in_view(&relationship.destination_id)
        {
            let index = self.insert_relationship_view(RelationshipView::new(relationship_id));
            Ok(Some(&self.relationships[index]))
        } else {
            Ok(None)
        }
    }

    /// Remove every view of a relationship; returns whether any was removed
    pub fn remove_relationship(&mut self, relationship_id: &str) -> bool {
        let before = self.relationships.len();
        self.relationships
            .retain(|rv| rv.relationship_id() != relationship_id);
        before != self.relationships.len()
    }

    /// Keep only relationship views that touch the given element
    pub fn remove_relationships_not_connected_to_element(&mut self, model: &Model, element_id: &str) {
        self.remove_relationships_not_connected_to_elements(model, &[element_id]);
    }

    /// Keep only relationship views that touch at least one of the elements
    pub fn remove_relationships_not_connected_to_elements(
        &mut self,
        model: &Model,
        element_ids: &[&str],
    ) {
        self.relationships.retain(|rv| {
            model
                .relationship(rv.relationship_id())
                .map_or(false, |r| element_ids.iter().any(|id| r.touches(id)))
        });
    }

    /// Remove element views that no relationship view touches
    ///
    /// Elements this view pins, such as the scope of a system context view,
    /// stay.
    pub fn remove_elements_with_no_relationships(&mut self, model: &Model) -> ViewResult<()> {
        let connected: HashSet<&str> = self
            .relationships
            .iter()
            .filter_map(|rv| model.relationship(rv.relationship_id()))
            .flat_map(|r| [r.source_id.as_str(), r.destination_id.as_str()])
            .collect();
        let unconnected: Vec<String> = self
            .element_ids()
            .filter(|id| !connected.contains(id))
            .map(str::to_string)
            .collect();

        for id in unconnected {
            if let Some(element) = model.element(&id) {
                if !containment::can_be_removed(self, element) {
                    trace!(view_key = %self.key, element_id = %id, "Keeping pinned element");
                    continue;
                }
            }
            self.remove_element(model, &id)?;
        }
        Ok(())
    }

    /// Add an element and every directly connected element of one kind
    ///
    /// Best-effort: the element itself and each neighbour are added
    /// independently, and a containment rejection only skips that candidate.
    pub fn add_nearest_neighbours(
        &mut self,
        model: &Model,
        element_id: &str,
        kind: ElementKind,
    ) -> ViewResult<()> {
        if model.element(element_id).is_none() {
            return Err(ViewError::invalid_argument(format!(
                "The element {} does not exist in the model.",
                element_id
            )));
        }
        self.try_add_element(model, element_id, true)?;

        let neighbours: Vec<String> = model
            .relationships()
            .filter_map(|r| {
                if r.source_id == element_id {
                    Some(&r.destination_id)
                } else if r.destination_id == element_id {
                    Some(&r.source_id)
                } else {
                    None
                }
            })
            .filter(|id| model.element(id).map_or(false, |e| e.kind == kind))
            .cloned()
            .collect();

        for neighbour in neighbours {
            self.try_add_element(model, &neighbour, true)?;
        }
        Ok(())
    }

    /// Reject `element` if one of its ancestors or descendants is a member
    pub fn check_parent_and_children_have_not_already_been_added(
        &self,
        model: &Model,
        element: &Element,
    ) -> ViewResult<()> {
        for ancestor in model.ancestors(&element.id) {
            if self.is_element_in_view(&ancestor.id) {
                return Err(ViewError::containment_rejected(
                    &element.name,
                    &self.key,
                    format!("its ancestor {} is already in this view", ancestor.name),
                ));
            }
        }
        for member_id in self.elements.keys() {
            if model.is_descendant_of(member_id, &element.id) {
                let member_name = model
                    .element(member_id)
                    .map_or(member_id.as_str(), |m| m.name.as_str());
                return Err(ViewError::containment_rejected(
                    &element.name,
                    &self.key,
                    format!("its descendant {} is already in this view", member_name),
                ));
            }
        }
        Ok(())
    }

    /// Append an animation step revealing the given elements
    ///
    /// Elements already revealed or not in the view are dropped. In
    /// deployment views each element also reveals its enclosing deployment
    /// nodes. A relationship joins the step when one endpoint is in this
    /// step and the other is in this or an earlier step.
    pub fn add_animation(&mut self, model: &Model, element_ids: &[&str]) -> ViewResult<&Animation> {
        if self.kind.is_dynamic() {
            return Err(ViewError::invalid_argument(
                "Dynamic views are animated by their step order, not by animation steps.",
            ));
        }
        if element_ids.is_empty() {
            return Err(ViewError::invalid_argument(
                "One or more elements must be specified.",
            ));
        }

        let revealed: HashSet<&str> = self
            .animations
            .iter()
            .flat_map(|a| a.elements().iter().map(String::as_str))
            .collect();

        let mut step: BTreeSet<String> = BTreeSet::new();
        for &element_id in element_ids {
            if !self.is_element_in_view(element_id) || revealed.contains(element_id) {
                continue;
            }
            step.insert(element_id.to_string());
            if self.kind.is_deployment() {
                for ancestor in model.ancestors(element_id) {
                    if ancestor.kind == ElementKind::DeploymentNode
                        && self.is_element_in_view(&ancestor.id)
                        && !revealed.contains(ancestor.id.as_str())
                    {
                        step.insert(ancestor.id.clone());
                    }
                }
            }
        }

        if step.is_empty() {
            return Err(ViewError::invalid_argument(format!(
                "None of the specified elements are in view {} without having been revealed already.",
                self.key
            )));
        }

        let shown = |id: &str| step.contains(id) || revealed.contains(id);
        let relationships: BTreeSet<String> = self
            .relationships
            .iter()
            .filter_map(|rv| model.relationship(rv.relationship_id()))
            .filter(|r| {
                let (source, destination) = (r.source_id.as_str(), r.destination_id.as_str());
                (step.contains(source) && shown(destination))
                    || (step.contains(destination) && shown(source))
            })
            .map(|r| r.id.clone())
            .collect();

        let order = self.animations.len() as u32 + 1;
        debug!(view_key = %self.key, order, element_count = step.len(), relationship_count = relationships.len(), "Added animation step");
        self.animations
            .push(Animation::new(order, step, relationships));
        Ok(&self.animations[self.animations.len() - 1])
    }

    /// Copy layout from a prior revision of this view using the configured
    /// merge strategy
    ///
    /// Views with automatic layout, or with `merge_from_remote` turned off,
    /// keep their layout. Returns whether the strategy ran.
    pub fn copy_layout_information_from(
        &mut self,
        model: &Model,
        source: &ModelView,
        source_model: &Model,
    ) -> bool {
        if self.has_automatic_layout() || !self.merge_from_remote {
            debug!(view_key = %self.key, "Keeping layout");
            return false;
        }
        let strategy = Arc::clone(&self.layout_merge_strategy);
        strategy.copy_layout_information(source, source_model, self, model);
        true
    }
}
