//! Per-view placement of an element

use serde::{Deserialize, Serialize};

/// An element's membership in one view, with its coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    /// Id of the wrapped element
    id: String,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

impl ElementView {
    /// Create an element view at the origin
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            id: element_id.into(),
            x: 0,
            y: 0,
        }
    }

    pub fn element_id(&self) -> &str {
        &self.id
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Copy layout-only fields from another element view
    pub fn copy_layout_information_from(&mut self, source: &ElementView) {
        self.x = source.x;
        self.y = source.y;
    }
}
