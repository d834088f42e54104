//! View set configuration
//!
//! Styles and themes are resolved by the rendering collaborator; the engine
//! only carries them and validates the keys that point at views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration owned by a [`ViewSet`](crate::views::ViewSet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Key of the view shown first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_view: Option<String>,
    /// Key of the view that was open when the workspace was last saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_saved_view: Option<String>,
    /// Theme URLs, applied in order by the renderer
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    themes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_view(&self) -> Option<&str> {
        self.default_view.as_deref()
    }

    /// Set without validation; use `ViewSet::set_default_view` to check the key
    pub(crate) fn set_default_view_unchecked(&mut self, key: Option<String>) {
        self.default_view = key;
    }

    pub fn last_saved_view(&self) -> Option<&str> {
        self.last_saved_view.as_deref()
    }

    pub fn set_last_saved_view(&mut self, key: impl Into<String>) {
        self.last_saved_view = Some(key.into());
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }

    pub fn add_theme(&mut self, url: impl Into<String>) {
        let url = url.into();
        if !url.trim().is_empty() && !self.themes.contains(&url) {
            self.themes.push(url);
        }
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }
}
