//! Reveal steps for animated diagrams

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One reveal step: the elements and relationships that appear together
///
/// Steps are appended by [`ModelView::add_animation`](crate::views::ModelView::add_animation)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    order: u32,
    elements: BTreeSet<String>,
    relationships: BTreeSet<String>,
}

impl Animation {
    pub(crate) fn new(
        order: u32,
        elements: BTreeSet<String>,
        relationships: BTreeSet<String>,
    ) -> Self {
        Self {
            order,
            elements,
            relationships,
        }
    }

    /// Step number, starting at 1
    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn elements(&self) -> &BTreeSet<String> {
        &self.elements
    }

    pub fn relationships(&self) -> &BTreeSet<String> {
        &self.relationships
    }

    pub fn contains_element(&self, element_id: &str) -> bool {
        self.elements.contains(element_id)
    }
}
