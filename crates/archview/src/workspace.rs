//! A model together with its views

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Model, ViewResult};
use crate::views::ViewSet;

/// The document that is saved and loaded as a unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub views: ViewSet,
}

impl Workspace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model: Model::new(),
            views: ViewSet::new(),
        }
    }

    /// Validate the views against the model after deserializing
    pub fn hydrate(&mut self) -> ViewResult<()> {
        self.views.hydrate(&self.model)
    }

    /// Create the standard views for the model
    pub fn create_default_views(&mut self) -> ViewResult<()> {
        self.views.create_default_views(&self.model)
    }

    /// Copy layout from an earlier revision of this workspace
    pub fn copy_layout_information_from(&mut self, previous: &Workspace) {
        info!(workspace = %self.name, previous = %previous.name, "Merging layout from previous revision");
        self.views
            .copy_layout_information_from(&self.model, &previous.views, &previous.model);
    }
}
