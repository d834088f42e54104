//! Tag-filtered projections of static views

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{Element, FilterMode, Model, Relationship};
use crate::views::{ElementView, ModelView, RelationshipView};

/// A view that shows a static base view through a tag filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredView {
    key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    generated_key: bool,
    order: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    base_view_key: String,
    #[serde(default)]
    mode: FilterMode,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, String>,
}

impl FilteredView {
    pub(crate) fn new(
        key: String,
        generated_key: bool,
        order: u32,
        base_view_key: &str,
        description: &str,
        mode: FilterMode,
        tags: &[&str],
    ) -> Self {
        Self {
            key,
            generated_key,
            order,
            title: String::new(),
            description: description.to_string(),
            base_view_key: base_view_key.to_string(),
            mode,
            tags: tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            properties: BTreeMap::new(),
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

    pub fn base_view_key(&self) -> &str {
        &self.base_view_key
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    fn passes(&self, tagged: bool) -> bool {
        match self.mode {
            FilterMode::Include => tagged,
            FilterMode::Exclude => !tagged,
        }
    }

    pub fn is_element_visible(&self, element: &Element) -> bool {
        self.passes(self.tags.iter().any(|t| element.has_tag(t)))
    }

    pub fn is_relationship_visible(&self, relationship: &Relationship) -> bool {
        self.passes(self.tags.iter().any(|t| relationship.has_tag(t)))
    }

    /// Element views of `base` that pass the filter
    pub fn element_views<'a>(&self, base: &'a ModelView, model: &Model) -> Vec<&'a ElementView> {
        base.element_views()
            .filter(|ev| {
                model
                    .element(ev.element_id())
                    .map_or(false, |e| self.is_element_visible(e))
            })
            .collect()
    }

    /// Relationship views of `base` that pass the filter and whose endpoints
    /// are both visible
    pub fn relationship_views<'a>(
        &self,
        base: &'a ModelView,
        model: &Model,
    ) -> Vec<&'a RelationshipView> {
        let endpoint_visible = |id: &str| {
            base.is_element_in_view(id) && model.element(id).map_or(false, |e| self.is_element_visible(e))
        };
        base.relationship_views()
            .into_iter()
            .filter(|rv| {
                model.relationship(rv.relationship_id()).map_or(false, |r| {
                    self.is_relationship_visible(r)
                        && endpoint_visible(&r.source_id)
                        && endpoint_visible(&r.destination_id)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ELEMENT_TAG, RELATIONSHIP_TAG};
    use crate::views::ViewSet;

    #[test]
    fn test_include_and_exclude() {
        let mut model = Model::new();
        let user = model.add_person("User", "").unwrap();
        let system = model.add_software_system("Banking", "").unwrap();
        let legacy = model.add_software_system("Legacy", "").unwrap();
        model.add_tags(&legacy, &["Legacy"]).unwrap();
        model.add_relationship_between(&user, &system, "Uses", None).unwrap();
        model.add_relationship_between(&user, &legacy, "Uses", None).unwrap();

        let mut views = ViewSet::new();
        views
            .create_system_landscape_view("Landscape", "")
            .unwrap()
            .add_all_elements(&model)
            .unwrap();
        views
            .create_filtered_view("Landscape", "Modern", "", FilterMode::Exclude, &["Legacy"])
            .unwrap();
        views
            .create_filtered_view(
                "Landscape",
                "Everything",
                "",
                FilterMode::Include,
                &[ELEMENT_TAG, RELATIONSHIP_TAG],
            )
            .unwrap();

        let base = views.model_view("Landscape").unwrap();
        let modern = views.filtered_view("Modern").unwrap();
        assert_eq!(modern.element_views(base, &model).len(), 2);
        assert_eq!(modern.relationship_views(base, &model).len(), 1);

        let everything = views.filtered_view("Everything").unwrap();
        assert_eq!(everything.element_views(base, &model).len(), 3);
        assert_eq!(everything.relationship_views(base, &model).len(), 2);
    }
}
