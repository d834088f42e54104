//! Per-view decoration of a relationship

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{Routing, Vertex};

/// A relationship's membership in one view
///
/// Outside dynamic views a relationship appears at most once per view. In a
/// dynamic view the same relationship may appear once per step, told apart
/// by its description and order label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipView {
    /// Id of the wrapped relationship
    id: String,
    /// Overrides the relationship's description when non-empty
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    technology: Option<String>,
    /// Step label in dynamic views
    #[serde(default)]
    order: String,
    /// Drawn as a response (destination back to source); dynamic views only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    response: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    vertices: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    routing: Option<Routing>,
    /// Label position along the line, as a percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl RelationshipView {
    pub fn new(relationship_id: impl Into<String>) -> Self {
        Self {
            id: relationship_id.into(),
            description: String::new(),
            technology: None,
            order: String::new(),
            response: false,
            vertices: Vec::new(),
            routing: None,
            position: None,
            url: None,
            properties: BTreeMap::new(),
        }
    }

    /// A dynamic-view step with its description override and order label
    pub fn step(
        relationship_id: impl Into<String>,
        description: impl Into<String>,
        technology: Option<String>,
        order: impl Into<String>,
        response: bool,
    ) -> Self {
        Self {
            description: description.into(),
            technology,
            order: order.into(),
            response,
            ..Self::new(relationship_id)
        }
    }

    pub fn relationship_id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn set_order(&mut self, order: impl Into<String>) {
        self.order = order.into();
    }

    pub fn is_response(&self) -> bool {
        self.response
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
    }

    pub fn routing(&self) -> Option<Routing> {
        self.routing
    }

    pub fn set_routing(&mut self, routing: Option<Routing>) {
        self.routing = routing;
    }

    pub fn position(&self) -> Option<u8> {
        self.position
    }

    /// Set the label position, clamped to 0..=100
    pub fn set_position(&mut self, position: Option<u8>) {
        self.position = position.map(|p| p.min(100));
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Identity within a view: relationship id plus description and order
    pub(crate) fn same_step(&self, other: &RelationshipView) -> bool {
        self.id == other.id && self.description == other.description && self.order == other.order
    }

    /// Copy layout-only fields from another relationship view
    pub fn copy_layout_information_from(&mut self, source: &RelationshipView) {
        self.vertices = source.vertices.clone();
        self.routing = source.routing;
        self.position = source.position;
    }
}
