//! The collection of every view in a workspace
//!
//! The [`ViewSet`] owns all views, hands out keys and order numbers, builds
//! default views from a model, re-validates references after loading and
//! drives layout copy between revisions.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info, info_span};

use crate::core::{
    AutomaticLayout, Configuration, ElementKind, FilterMode, Model, ViewError, ViewResult,
    ViewType,
};
use crate::views::{FilteredView, ImageView, ModelView, ViewKind};

/// A borrowed view of any type
#[derive(Debug, Clone, Copy)]
pub enum ViewRef<'a> {
    Model(&'a ModelView),
    Filtered(&'a FilteredView),
    Image(&'a ImageView),
}

impl<'a> ViewRef<'a> {
    pub fn key(&self) -> &'a str {
        match *self {
            ViewRef::Model(view) => view.key(),
            ViewRef::Filtered(view) => view.key(),
            ViewRef::Image(view) => view.key(),
        }
    }

    pub fn order(&self) -> u32 {
        match *self {
            ViewRef::Model(view) => view.order(),
            ViewRef::Filtered(view) => view.order(),
            ViewRef::Image(view) => view.order(),
        }
    }

    pub fn view_type(&self) -> ViewType {
        match *self {
            ViewRef::Model(view) => view.view_type(),
            ViewRef::Filtered(_) => ViewType::Filtered,
            ViewRef::Image(_) => ViewType::Image,
        }
    }

    pub fn title(&self) -> &'a str {
        match *self {
            ViewRef::Model(view) => view.title(),
            ViewRef::Filtered(view) => view.title(),
            ViewRef::Image(view) => view.title(),
        }
    }

    pub fn as_model_view(&self) -> Option<&'a ModelView> {
        match *self {
            ViewRef::Model(view) => Some(view),
            _ => None,
        }
    }
}

/// Every view in a workspace, with its configuration
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSet {
    #[serde(default)]
    views: Vec<ModelView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filtered_views: Vec<FilteredView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    image_views: Vec<ImageView>,
    #[serde(default)]
    configuration: Configuration,
    /// Highest order handed out so far
    #[serde(skip)]
    order_counter: AtomicU32,
}

impl Clone for ViewSet {
    fn clone(&self) -> Self {
        Self {
            views: self.views.clone(),
            filtered_views: self.filtered_views.clone(),
            image_views: self.image_views.clone(),
            configuration: self.configuration.clone(),
            order_counter: AtomicU32::new(self.order_counter.load(Ordering::SeqCst)),
        }
    }
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn configuration_mut(&mut self) -> &mut Configuration {
        &mut self.configuration
    }

    /// Make the view with `key` the one shown first
    pub fn set_default_view(&mut self, key: &str) -> ViewResult<()> {
        if !self.contains_key(key) {
            return Err(ViewError::invalid_argument(format!(
                "A view with the key {} does not exist.",
                key
            )));
        }
        self.configuration
            .set_default_view_unchecked(Some(key.to_string()));
        Ok(())
    }

    pub fn default_view(&self) -> Option<ViewRef<'_>> {
        self.configuration
            .default_view()
            .and_then(|key| self.view(key))
    }

    /// Total number of views of every type
    pub fn len(&self) -> usize {
        self.views.len() + self.filtered_views.len() + self.image_views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.view(key).is_some()
    }

    pub fn view(&self, key: &str) -> Option<ViewRef<'_>> {
        if let Some(view) = self.model_view(key) {
            return Some(ViewRef::Model(view));
        }
        if let Some(view) = self.filtered_view(key) {
            return Some(ViewRef::Filtered(view));
        }
        self.image_view(key).map(ViewRef::Image)
    }

    /// Every view, ordered by creation order
    pub fn all_views(&self) -> Vec<ViewRef<'_>> {
        let mut views: Vec<ViewRef<'_>> = self
            .views
            .iter()
            .map(ViewRef::Model)
            .chain(self.filtered_views.iter().map(ViewRef::Filtered))
            .chain(self.image_views.iter().map(ViewRef::Image))
            .collect();
        views.sort_by_key(|v| v.order());
        views
    }

    pub fn model_views(&self) -> &[ModelView] {
        &self.views
    }

    pub fn model_views_mut(&mut self) -> impl Iterator<Item = &mut ModelView> {
        self.views.iter_mut()
    }

    /// Model views of one type
    pub fn views_of_type(&self, view_type: ViewType) -> impl Iterator<Item = &ModelView> {
        self.views
            .iter()
            .filter(move |v| v.view_type() == view_type)
    }

    pub fn model_view(&self, key: &str) -> Option<&ModelView> {
        self.views.iter().find(|v| v.key() == key)
    }

    pub fn model_view_mut(&mut self, key: &str) -> Option<&mut ModelView> {
        self.views.iter_mut().find(|v| v.key() == key)
    }

    pub fn filtered_views(&self) -> &[FilteredView] {
        &self.filtered_views
    }

    pub fn filtered_view(&self, key: &str) -> Option<&FilteredView> {
        self.filtered_views.iter().find(|v| v.key() == key)
    }

    pub fn filtered_view_mut(&mut self, key: &str) -> Option<&mut FilteredView> {
        self.filtered_views.iter_mut().find(|v| v.key() == key)
    }

    pub fn image_views(&self) -> &[ImageView] {
        &self.image_views
    }

    pub fn image_view(&self, key: &str) -> Option<&ImageView> {
        self.image_views.iter().find(|v| v.key() == key)
    }

    pub fn image_view_mut(&mut self, key: &str) -> Option<&mut ImageView> {
        self.image_views.iter_mut().find(|v| v.key() == key)
    }

    /// Remove a view by key; removing a model view also removes the
    /// filtered views based on it
    pub fn remove_view(&mut self, key: &str) -> bool {
        let before = self.len();
        self.views.retain(|v| v.key() != key);
        self.filtered_views
            .retain(|v| v.key() != key && v.base_view_key() != key);
        self.image_views.retain(|v| v.key() != key);

        let removed = before != self.len();
        if removed {
            if let Some(default_view) = self.configuration.default_view() {
                if !self.contains_key(default_view) {
                    self.configuration.set_default_view_unchecked(None);
                }
            }
            debug!(view_key = %key, "Removed view");
        }
        removed
    }

    pub fn create_custom_view(
        &mut self,
        key: &str,
        title: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        let view = self.new_model_view(key, ViewKind::Custom, description)?;
        view.set_title(title);
        Ok(view)
    }

    pub fn create_system_landscape_view(
        &mut self,
        key: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        self.new_model_view(
            key,
            ViewKind::SystemLandscape {
                enterprise_boundary_visible: true,
            },
            description,
        )
    }

    /// Create a context view; the scope software system is added immediately
    pub fn create_system_context_view(
        &mut self,
        model: &Model,
        software_system_id: &str,
        key: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        require_kind(model, software_system_id, &[ElementKind::SoftwareSystem])?;
        let view = self.new_model_view(
            key,
            ViewKind::SystemContext {
                software_system_id: software_system_id.to_string(),
                enterprise_boundary_visible: true,
            },
            description,
        )?;
        view.add_element(model, software_system_id, true)?;
        Ok(view)
    }

    pub fn create_container_view(
        &mut self,
        model: &Model,
        software_system_id: &str,
        key: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        require_kind(model, software_system_id, &[ElementKind::SoftwareSystem])?;
        self.new_model_view(
            key,
            ViewKind::Container {
                software_system_id: software_system_id.to_string(),
                external_software_system_boundary_visible: true,
            },
            description,
        )
    }

    pub fn create_component_view(
        &mut self,
        model: &Model,
        container_id: &str,
        key: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        require_kind(model, container_id, &[ElementKind::Container])?;
        self.new_model_view(
            key,
            ViewKind::Component {
                container_id: container_id.to_string(),
                external_container_boundary_visible: true,
            },
            description,
        )
    }

    /// Create a dynamic view scoped to nothing, a software system or a container
    pub fn create_dynamic_view(
        &mut self,
        model: &Model,
        scope_id: Option<&str>,
        key: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        if let Some(scope_id) = scope_id {
            require_kind(
                model,
                scope_id,
                &[ElementKind::SoftwareSystem, ElementKind::Container],
            )?;
        }
        self.new_model_view(
            key,
            ViewKind::Dynamic {
                element_id: scope_id.map(str::to_string),
                external_boundaries_visible: true,
            },
            description,
        )
    }

    /// Create a deployment view of one environment, optionally scoped to a
    /// software system
    pub fn create_deployment_view(
        &mut self,
        model: &Model,
        software_system_id: Option<&str>,
        key: &str,
        environment: &str,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        if let Some(software_system_id) = software_system_id {
            require_kind(model, software_system_id, &[ElementKind::SoftwareSystem])?;
        }
        if environment.trim().is_empty() {
            return Err(ViewError::invalid_argument(
                "A deployment environment must be specified.",
            ));
        }
        self.new_model_view(
            key,
            ViewKind::Deployment {
                software_system_id: software_system_id.map(str::to_string),
                environment: environment.to_string(),
            },
            description,
        )
    }

    /// Create a tag-filtered view over an existing static view
    pub fn create_filtered_view(
        &mut self,
        base_view_key: &str,
        key: &str,
        description: &str,
        mode: FilterMode,
        tags: &[&str],
    ) -> ViewResult<&mut FilteredView> {
        match self.model_view(base_view_key) {
            Some(base) if base.view_type().is_static() => {}
            Some(base) => {
                return Err(ViewError::invalid_argument(format!(
                    "Filtered views can only be based on static views; {} is a {} view.",
                    base_view_key,
                    base.view_type()
                )))
            }
            None => {
                return Err(ViewError::invalid_argument(format!(
                    "A view with the key {} does not exist.",
                    base_view_key
                )))
            }
        }

        let (key, generated) = self.claim_key(key, ViewType::Filtered)?;
        let order = self.next_order();
        debug!(view_key = %key, base_view_key = %base_view_key, order, "Created filtered view");
        self.filtered_views.push(FilteredView::new(
            key,
            generated,
            order,
            base_view_key,
            description,
            mode,
            tags,
        ));
        let index = self.filtered_views.len() - 1;
        Ok(&mut self.filtered_views[index])
    }

    /// Create an image view, optionally about one element
    pub fn create_image_view(
        &mut self,
        model: &Model,
        element_id: Option<&str>,
        key: &str,
    ) -> ViewResult<&mut ImageView> {
        if let Some(element_id) = element_id {
            if !model.contains_element(element_id) {
                return Err(ViewError::invalid_argument(format!(
                    "The element {} does not exist in the model.",
                    element_id
                )));
            }
        }
        let (key, generated) = self.claim_key(key, ViewType::Image)?;
        let order = self.next_order();
        debug!(view_key = %key, order, "Created image view");
        self.image_views
            .push(ImageView::new(key, generated, order, element_id));
        let index = self.image_views.len() - 1;
        Ok(&mut self.image_views[index])
    }

    /// Create and populate the standard set of views for a model
    ///
    /// One landscape view, a context view per software system, a container
    /// view per system with containers, a component view per container with
    /// components and a deployment view per system and environment with
    /// container instances of that system. All use automatic layout.
    pub fn create_default_views(&mut self, model: &Model) -> ViewResult<()> {
        let span = info_span!("create_default_views", elements = model.element_count());
        let _enter = span.enter();
        let before = self.len();

        let systems: Vec<String> = model
            .elements_of_kind(ElementKind::SoftwareSystem)
            .map(|e| e.id.clone())
            .collect();
        let has_static_elements = model.elements().any(|e| {
            matches!(
                e.kind,
                ElementKind::Person | ElementKind::SoftwareSystem | ElementKind::CustomElement
            )
        });

        if has_static_elements {
            let view = self.create_system_landscape_view("", "")?;
            populate_with_automatic_layout(view, model)?;
        }

        for system in &systems {
            let view = self.create_system_context_view(model, system, "", "")?;
            populate_with_automatic_layout(view, model)?;
        }

        for system in &systems {
            if model
                .children(system)
                .any(|c| c.kind == ElementKind::Container)
            {
                let view = self.create_container_view(model, system, "", "")?;
                populate_with_automatic_layout(view, model)?;
            }
        }

        let containers: Vec<String> = model
            .elements_of_kind(ElementKind::Container)
            .filter(|c| {
                model
                    .children(&c.id)
                    .any(|child| child.kind == ElementKind::Component)
            })
            .map(|c| c.id.clone())
            .collect();
        for container in &containers {
            let view = self.create_component_view(model, container, "", "")?;
            populate_with_automatic_layout(view, model)?;
        }

        for system in &systems {
            for environment in model.environments() {
                let deployed = model.elements().any(|e| {
                    e.kind == ElementKind::ContainerInstance
                        && e.environment.as_deref() == Some(environment)
                        && model
                            .software_system_of(&e.id)
                            .map_or(false, |s| s.id == *system)
                });
                if deployed {
                    let view =
                        self.create_deployment_view(model, Some(system.as_str()), "", environment, "")?;
                    populate_with_automatic_layout(view, model)?;
                }
            }
        }

        info!(created = self.len() - before, "Created default views");
        Ok(())
    }

    /// Check every persisted reference against `model` and rebuild
    /// transient state after loading
    ///
    /// Fails with `WorkspaceValidation` on the first unresolvable id, scope of
    /// the wrong kind, duplicate key, or filtered view without a static base.
    pub fn hydrate(&mut self, model: &Model) -> ViewResult<()> {
        let span = info_span!("hydrate", views = self.len());
        let _enter = span.enter();

        let mut keys: HashSet<&str> = HashSet::new();
        for view in self.all_views() {
            if !keys.insert(view.key()) {
                return Err(ViewError::workspace_validation(format!(
                    "A view with the key {} already exists.",
                    view.key()
                )));
            }
        }

        for view in &mut self.views {
            hydrate_model_view(view, model)?;
        }

        for filtered in &self.filtered_views {
            match self.model_view(filtered.base_view_key()) {
                Some(base) if base.view_type().is_static() => {}
                _ => {
                    return Err(ViewError::workspace_validation(format!(
                        "The filtered view {} is based on {}, which is not a static view in this workspace.",
                        filtered.key(),
                        filtered.base_view_key()
                    )))
                }
            }
        }

        for image in &self.image_views {
            if let Some(element_id) = image.element_id() {
                if !model.contains_element(element_id) {
                    return Err(missing_element(image.key(), element_id));
                }
            }
        }

        if let Some(default_view) = self.configuration.default_view() {
            if !self.contains_key(default_view) {
                return Err(ViewError::workspace_validation(format!(
                    "The default view {} does not exist.",
                    default_view
                )));
            }
        }

        let highest = self.all_views().iter().map(|v| v.order()).max().unwrap_or(0);
        self.order_counter.store(highest, Ordering::SeqCst);
        info!(views = self.len(), "Hydrated view set");
        Ok(())
    }

    /// Copy layout from the views of a prior revision, matched by key and type
    ///
    /// Views with automatic layout, or with `merge_from_remote` turned off,
    /// keep their layout.
    pub fn copy_layout_information_from(
        &mut self,
        model: &Model,
        source: &ViewSet,
        source_model: &Model,
    ) {
        let span = info_span!("copy_layout_information", views = self.views.len());
        let _enter = span.enter();

        let mut merged = 0usize;
        for view in &mut self.views {
            match source
                .model_view(view.key())
                .filter(|s| s.view_type() == view.view_type())
            {
                Some(source_view) => {
                    if view.copy_layout_information_from(model, source_view, source_model) {
                        merged += 1;
                    }
                }
                None => debug!(view_key = %view.key(), "No prior revision of view"),
            }
        }
        info!(merged, "Copied layout information");
    }

    fn new_model_view(
        &mut self,
        key: &str,
        kind: ViewKind,
        description: &str,
    ) -> ViewResult<&mut ModelView> {
        let (key, generated) = self.claim_key(key, kind.view_type())?;
        let order = self.next_order();
        debug!(view_key = %key, view_type = %kind.view_type(), order, "Created view");
        self.views
            .push(ModelView::new(key, generated, order, kind, description));
        let index = self.views.len() - 1;
        Ok(&mut self.views[index])
    }

    /// Normalize and validate a key, or generate one when it is blank
    fn claim_key(&self, key: &str, view_type: ViewType) -> ViewResult<(String, bool)> {
        let key = key.trim().replace(['/', '\\'], "-");
        if key.is_empty() {
            return Ok((self.generate_key(view_type), true));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ViewError::invalid_argument(format!(
                "View keys can only contain letters, digits, '-', '_' and '.': {}",
                key
            )));
        }
        if self.contains_key(&key) {
            return Err(ViewError::invalid_argument(format!(
                "A view with the key {} already exists.",
                key
            )));
        }
        Ok((key, false))
    }

    fn generate_key(&self, view_type: ViewType) -> String {
        let mut number = 1;
        loop {
            let candidate = format!("{}-{:03}", view_type.key_prefix(), number);
            if !self.contains_key(&candidate) {
                return candidate;
            }
            number += 1;
        }
    }

    fn next_order(&self) -> u32 {
        self.order_counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn populate_with_automatic_layout(view: &mut ModelView, model: &Model) -> ViewResult<()> {
    view.add_default_elements(model)?;
    view.enable_automatic_layout(AutomaticLayout::default());
    Ok(())
}

fn require_kind(model: &Model, id: &str, kinds: &[ElementKind]) -> ViewResult<()> {
    let element = model.element(id).ok_or_else(|| {
        ViewError::invalid_argument(format!("The element {} does not exist in the model.", id))
    })?;
    if kinds.contains(&element.kind) {
        Ok(())
    } else {
        Err(ViewError::invalid_argument(format!(
            "{} is a {}, which cannot be the scope of this view.",
            element.name, element.kind
        )))
    }
}

fn missing_element(view_key: &str, element_id: &str) -> ViewError {
    ViewError::workspace_validation(format!(
        "The view {} refers to the element {}, which does not exist in the model.",
        view_key, element_id
    ))
}

fn hydrate_model_view(view: &mut ModelView, model: &Model) -> ViewResult<()> {
    let scope_kinds: &[ElementKind] = match view.kind() {
        ViewKind::SystemContext { .. } | ViewKind::Container { .. } => {
            &[ElementKind::SoftwareSystem]
        }
        ViewKind::Component { .. } => &[ElementKind::Container],
        ViewKind::Dynamic { .. } => &[ElementKind::SoftwareSystem, ElementKind::Container],
        ViewKind::Deployment { .. } => &[ElementKind::SoftwareSystem],
        ViewKind::Custom | ViewKind::SystemLandscape { .. } => &[],
    };
    if let Some(scope_id) = view.kind().scope_id() {
        let scope = model
            .element(scope_id)
            .ok_or_else(|| missing_element(view.key(), scope_id))?;
        if !scope_kinds.contains(&scope.kind) {
            return Err(ViewError::workspace_validation(format!(
                "The view {} is scoped to {}, a {}, which is not allowed for {} views.",
                view.key(),
                scope.name,
                scope.kind,
                view.view_type()
            )));
        }
    }
    if let Some(environment) = view.kind().environment() {
        if environment.trim().is_empty() {
            return Err(ViewError::workspace_validation(format!(
                "The deployment view {} has no environment.",
                view.key()
            )));
        }
    }

    if let Some(element_id) = view.element_ids().find(|id| !model.contains_element(id)) {
        return Err(missing_element(view.key(), element_id));
    }
    if let Some(rv) = view
        .relationship_views_raw()
        .iter()
        .find(|rv| model.relationship(rv.relationship_id()).is_none())
    {
        return Err(ViewError::workspace_validation(format!(
            "The view {} refers to the relationship {}, which does not exist in the model.",
            view.key(),
            rv.relationship_id()
        )));
    }
    for animation in view.animations() {
        if let Some(element_id) = animation
            .elements()
            .iter()
            .find(|id| !view.is_element_in_view(id))
        {
            return Err(ViewError::workspace_validation(format!(
                "Animation step {} of view {} refers to the element {}, which is not in the view.",
                animation.order(),
                view.key(),
                element_id
            )));
        }
        if let Some(relationship_id) = animation
            .relationships()
            .iter()
            .find(|id| model.relationship(id).is_none())
        {
            return Err(ViewError::workspace_validation(format!(
                "Animation step {} of view {} refers to the relationship {}, which does not exist in the model.",
                animation.order(),
                view.key(),
                relationship_id
            )));
        }
    }

    if view.kind().is_dynamic() {
        view.resume_sequence();
    }
    Ok(())
}
