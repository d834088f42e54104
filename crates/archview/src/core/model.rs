//! Architecture graph storage
//!
//! The model is an arena of elements and relationships addressed by stable
//! string ids. Parents are stored as ids, and children are computed on
//! demand, so the graph has no reference cycles. The view engine only reads
//! from it; the builder methods exist so callers can assemble a graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::core::{ElementKind, ViewError, ViewResult};

/// Tag carried by every element
pub const ELEMENT_TAG: &str = "Element";

/// Tag carried by every relationship
pub const RELATIONSHIP_TAG: &str = "Relationship";

/// A node in the architecture graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Stable identifier
    pub id: String,
    /// Runtime kind of the element
    pub kind: ElementKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    /// Id of the enclosing element, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Deployment environment (deployment elements only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Id of the software system or container an instance refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_of: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Element {
    /// Create a new element carrying its default tags
    pub fn new(
        id: impl Into<String>,
        kind: ElementKind,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: description.into(),
            technology: None,
            parent_id: None,
            tags: vec![ELEMENT_TAG.to_string(), kind.default_tag().to_string()],
            environment: None,
            instance_of: None,
            properties: BTreeMap::new(),
        }
    }

    /// Check if the element carries a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Add tags, ignoring blanks and duplicates
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.has_tag(tag) {
                self.tags.push(tag.to_string());
            }
        }
    }
}

/// An edge in the architecture graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source_id: String,
    pub destination_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Id of the relationship this one was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_relationship_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        destination_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            destination_id: destination_id.into(),
            description: description.into(),
            technology: None,
            tags: vec![RELATIONSHIP_TAG.to_string()],
            linked_relationship_id: None,
            url: None,
        }
    }

    pub fn with_technology(mut self, technology: impl Into<String>) -> Self {
        self.technology = Some(technology.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true if either end of the relationship is the given element
    pub fn touches(&self, element_id: &str) -> bool {
        self.source_id == element_id || self.destination_id == element_id
    }
}

/// The architecture graph
///
/// Elements and relationships are kept in insertion order for deterministic
/// iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    elements: IndexMap<String, Element>,
    #[serde(default)]
    relationships: IndexMap<String, Relationship>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an element by id
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Check if an element exists
    pub fn contains_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Get a relationship by id
    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Iterate over all elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterate over all relationships
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Iterate over elements of one kind
    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(move |e| e.kind == kind)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Get the parent of an element
    pub fn parent_of(&self, id: &str) -> Option<&Element> {
        self.elements
            .get(id)
            .and_then(|e| e.parent_id.as_deref())
            .and_then(|parent_id| self.elements.get(parent_id))
    }

    /// Get the ancestors of an element, nearest first
    pub fn ancestors(&self, id: &str) -> Vec<&Element> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_of(&parent.id);
        }
        ancestors
    }

    /// Iterate over the direct children of an element
    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .values()
            .filter(move |e| e.parent_id.as_deref() == Some(id))
    }

    /// Returns true if `ancestor_id` is somewhere on the parent chain of `id`
    pub fn is_descendant_of(&self, id: &str, ancestor_id: &str) -> bool {
        self.ancestors(id).iter().any(|a| a.id == ancestor_id)
    }

    /// Resolve the software system an element belongs to
    ///
    /// Software systems resolve to themselves, containers and components to
    /// their enclosing system, instances to the system of what they instantiate.
    pub fn software_system_of(&self, id: &str) -> Option<&Element> {
        let element = self.elements.get(id)?;
        match element.kind {
            ElementKind::SoftwareSystem => Some(element),
            ElementKind::Container | ElementKind::Component => self
                .ancestors(id)
                .into_iter()
                .find(|a| a.kind == ElementKind::SoftwareSystem),
            ElementKind::SoftwareSystemInstance | ElementKind::ContainerInstance => element
                .instance_of
                .as_deref()
                .and_then(|target| self.software_system_of(target)),
            _ => None,
        }
    }

    /// Iterate over relationships whose source is the given element
    pub fn efferent_relationships<'a>(
        &'a self,
        id: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.values().filter(move |r| r.source_id == id)
    }

    /// Iterate over relationships from `source_id` to `destination_id`
    pub fn relationships_between<'a>(
        &'a self,
        source_id: &'a str,
        destination_id: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships
            .values()
            .filter(move |r| r.source_id == source_id && r.destination_id == destination_id)
    }

    /// Deployment environment names, in first-seen order
    pub fn environments(&self) -> Vec<&str> {
        let mut environments: Vec<&str> = Vec::new();
        for element in self.elements_of_kind(ElementKind::DeploymentNode) {
            if let Some(environment) = element.environment.as_deref() {
                if !environments.contains(&environment) {
                    environments.push(environment);
                }
            }
        }
        environments
    }

    fn contains_id(&self, id: &str) -> bool {
        self.elements.contains_key(id) || self.relationships.contains_key(id)
    }

    /// Next free sequential id, shared between elements and relationships
    fn next_id(&self) -> String {
        let mut candidate = self.elements.len() + self.relationships.len() + 1;
        loop {
            let id = candidate.to_string();
            if !self.contains_id(&id) {
                return id;
            }
            candidate += 1;
        }
    }

    /// Insert a fully formed element
    ///
    /// The id must be unused and the parent, if any, must already exist.
    pub fn add_element(&mut self, element: Element) -> ViewResult<&Element> {
        if element.id.trim().is_empty() {
            return Err(ViewError::invalid_argument("An element id must be specified."));
        }
        if element.name.trim().is_empty() {
            return Err(ViewError::invalid_argument(format!(
                "A name must be specified for element {}.",
                element.id
            )));
        }
        if self.contains_id(&element.id) {
            return Err(ViewError::invalid_argument(format!(
                "The id {} is already in use.",
                element.id
            )));
        }
        if let Some(parent_id) = element.parent_id.as_deref() {
            if !self.elements.contains_key(parent_id) {
                return Err(ViewError::invalid_argument(format!(
                    "The parent {} of {} does not exist.",
                    parent_id, element.name
                )));
            }
        }

        trace!(element_id = %element.id, element_name = %element.name, kind = ?element.kind, "Adding element to model");
        let id = element.id.clone();
        self.elements.insert(id.clone(), element);
        debug!(element_count = self.element_count(), "Element added");
        Ok(&self.elements[&id])
    }

    /// Insert a fully formed relationship
    pub fn add_relationship(&mut self, relationship: Relationship) -> ViewResult<&Relationship> {
        if self.contains_id(&relationship.id) {
            return Err(ViewError::invalid_argument(format!(
                "The id {} is already in use.",
                relationship.id
            )));
        }
        for endpoint in [&relationship.source_id, &relationship.destination_id] {
            if !self.elements.contains_key(endpoint) {
                return Err(ViewError::invalid_argument(format!(
                    "The element {} does not exist in the model.",
                    endpoint
                )));
            }
        }

        trace!(
            relationship_id = %relationship.id,
            source_id = %relationship.source_id,
            destination_id = %relationship.destination_id,
            "Adding relationship to model"
        );
        let id = relationship.id.clone();
        self.relationships.insert(id.clone(), relationship);
        Ok(&self.relationships[&id])
    }

    fn require_kind(&self, id: &str, kinds: &[ElementKind]) -> ViewResult<&Element> {
        let element = self.elements.get(id).ok_or_else(|| {
            ViewError::invalid_argument(format!("The element {} does not exist in the model.", id))
        })?;
        if kinds.contains(&element.kind) {
            Ok(element)
        } else {
            Err(ViewError::invalid_argument(format!(
                "{} is a {}, expected one of {:?}.",
                element.name, element.kind, kinds
            )))
        }
    }

    fn add_child(
        &mut self,
        kind: ElementKind,
        parent_id: Option<&str>,
        name: &str,
        description: &str,
        technology: Option<&str>,
    ) -> ViewResult<String> {
        let mut element = Element::new(self.next_id(), kind, name, description);
        element.parent_id = parent_id.map(str::to_string);
        element.technology = technology.map(str::to_string);
        Ok(self.add_element(element)?.id.clone())
    }
}

// Convenience builders for assembling a graph with less boilerplate
impl Model {
    /// Add a person and return its id
    pub fn add_person(&mut self, name: &str, description: &str) -> ViewResult<String> {
        self.add_child(ElementKind::Person, None, name, description, None)
    }

    /// Add a software system and return its id
    pub fn add_software_system(&mut self, name: &str, description: &str) -> ViewResult<String> {
        self.add_child(ElementKind::SoftwareSystem, None, name, description, None)
    }

    /// Add a container to a software system
    pub fn add_container(
        &mut self,
        software_system_id: &str,
        name: &str,
        description: &str,
        technology: &str,
    ) -> ViewResult<String> {
        self.require_kind(software_system_id, &[ElementKind::SoftwareSystem])?;
        self.add_child(
            ElementKind::Container,
            Some(software_system_id),
            name,
            description,
            Some(technology),
        )
    }

    /// Add a component to a container
    pub fn add_component(
        &mut self,
        container_id: &str,
        name: &str,
        description: &str,
        technology: &str,
    ) -> ViewResult<String> {
        self.require_kind(container_id, &[ElementKind::Container])?;
        self.add_child(
            ElementKind::Component,
            Some(container_id),
            name,
            description,
            Some(technology),
        )
    }

    /// Add a custom element
    pub fn add_custom_element(&mut self, name: &str, description: &str) -> ViewResult<String> {
        self.add_child(ElementKind::CustomElement, None, name, description, None)
    }

    /// Add a deployment node, top-level or nested in another node
    ///
    /// A nested node inherits the environment of its parent.
    pub fn add_deployment_node(
        &mut self,
        parent_id: Option<&str>,
        environment: &str,
        name: &str,
        description: &str,
        technology: &str,
    ) -> ViewResult<String> {
        let environment = match parent_id {
            Some(parent_id) => self
                .require_kind(parent_id, &[ElementKind::DeploymentNode])?
                .environment
                .clone()
                .unwrap_or_else(|| environment.to_string()),
            None => environment.to_string(),
        };
        if environment.trim().is_empty() {
            return Err(ViewError::invalid_argument(
                "A deployment environment must be specified.",
            ));
        }
        let id = self.add_child(
            ElementKind::DeploymentNode,
            parent_id,
            name,
            description,
            Some(technology),
        )?;
        self.set_environment(&id, environment);
        Ok(id)
    }

    /// Add an infrastructure node to a deployment node
    pub fn add_infrastructure_node(
        &mut self,
        deployment_node_id: &str,
        name: &str,
        description: &str,
        technology: &str,
    ) -> ViewResult<String> {
        let environment = self
            .require_kind(deployment_node_id, &[ElementKind::DeploymentNode])?
            .environment
            .clone();
        let id = self.add_child(
            ElementKind::InfrastructureNode,
            Some(deployment_node_id),
            name,
            description,
            Some(technology),
        )?;
        if let Some(environment) = environment {
            self.set_environment(&id, environment);
        }
        Ok(id)
    }

    /// Deploy an instance of a software system onto a deployment node
    pub fn add_software_system_instance(
        &mut self,
        deployment_node_id: &str,
        software_system_id: &str,
    ) -> ViewResult<String> {
        self.add_instance(
            ElementKind::SoftwareSystemInstance,
            deployment_node_id,
            software_system_id,
            ElementKind::SoftwareSystem,
        )
    }

    /// Deploy an instance of a container onto a deployment node
    pub fn add_container_instance(
        &mut self,
        deployment_node_id: &str,
        container_id: &str,
    ) -> ViewResult<String> {
        self.add_instance(
            ElementKind::ContainerInstance,
            deployment_node_id,
            container_id,
            ElementKind::Container,
        )
    }

    fn add_instance(
        &mut self,
        kind: ElementKind,
        deployment_node_id: &str,
        target_id: &str,
        target_kind: ElementKind,
    ) -> ViewResult<String> {
        let environment = self
            .require_kind(deployment_node_id, &[ElementKind::DeploymentNode])?
            .environment
            .clone();
        let target = self.require_kind(target_id, &[target_kind])?;
        let (name, description) = (target.name.clone(), target.description.clone());

        let mut element = Element::new(self.next_id(), kind, name, description);
        element.parent_id = Some(deployment_node_id.to_string());
        element.environment = environment;
        element.instance_of = Some(target_id.to_string());
        Ok(self.add_element(element)?.id.clone())
    }

    /// Add a relationship between two existing elements and return its id
    pub fn add_relationship_between(
        &mut self,
        source_id: &str,
        destination_id: &str,
        description: &str,
        technology: Option<&str>,
    ) -> ViewResult<String> {
        let mut relationship =
            Relationship::new(self.next_id(), source_id, destination_id, description);
        relationship.technology = technology.map(str::to_string);
        Ok(self.add_relationship(relationship)?.id.clone())
    }

    /// Add tags to an element or relationship
    pub fn add_tags(&mut self, id: &str, tags: &[&str]) -> ViewResult<()> {
        if let Some(element) = self.elements.get_mut(id) {
            element.add_tags(tags);
            return Ok(());
        }
        if let Some(relationship) = self.relationships.get_mut(id) {
            for tag in tags {
                let tag = tag.trim();
                if !tag.is_empty() && !relationship.has_tag(tag) {
                    relationship.tags.push(tag.to_string());
                }
            }
            return Ok(());
        }
        Err(ViewError::invalid_argument(format!(
            "Nothing with the id {} exists in the model.",
            id
        )))
    }

    fn set_environment(&mut self, id: &str, environment: String) {
        if let Some(element) = self.elements.get_mut(id) {
            element.environment = Some(environment);
        }
    }
}
