//! Carrying hand-made layout across model revisions
//!
//! When a workspace is regenerated, element and relationship ids may change.
//! The default strategy matches every destination element against the source
//! view in two tiers: exact id first, then name plus description. Relationships
//! match by id (and order, in dynamic views), then by matched endpoints plus
//! description. Anything without a counterpart keeps its current layout.

use std::fmt;
use tracing::{debug, info_span, warn};

use crate::core::Model;
use crate::views::{ElementView, ModelView, RelationshipView};

/// Pluggable policy for copying layout from a prior revision of a view
pub trait LayoutMergeStrategy: fmt::Debug + Send + Sync {
    /// Copy paper size, dimensions, element positions and relationship
    /// routing from `source` into `destination`
    fn copy_layout_information(
        &self,
        source: &ModelView,
        source_model: &Model,
        destination: &mut ModelView,
        destination_model: &Model,
    );
}

/// Two-tier matching on ids, then on names and descriptions
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayoutMergeStrategy;

impl LayoutMergeStrategy for DefaultLayoutMergeStrategy {
    fn copy_layout_information(
        &self,
        source: &ModelView,
        source_model: &Model,
        destination: &mut ModelView,
        destination_model: &Model,
    ) {
        let span = info_span!("copy_layout", view_key = %destination.key());
        let _enter = span.enter();

        if destination.paper_size().is_none() {
            destination.set_paper_size(source.paper_size());
        }
        if destination.dimensions().is_none() {
            destination.set_dimensions(source.dimensions());
        }

        let element_matches: Vec<(String, Option<ElementView>)> = destination
            .element_views()
            .map(|ev| {
                let matched =
                    find_element_view(source, source_model, destination_model, ev.element_id());
                (ev.element_id().to_string(), matched.cloned())
            })
            .collect();

        let mut copied = 0usize;
        for (element_id, matched) in element_matches {
            match matched {
                Some(source_view) => {
                    if let Some(target) = destination.element_view_mut(&element_id) {
                        target.copy_layout_information_from(&source_view);
                        copied += 1;
                    }
                }
                None => {
                    let name = destination_model
                        .element(&element_id)
                        .map_or("", |e| e.name.as_str());
                    warn!(element_id = %element_id, element_name = %name, "No layout found for element");
                }
            }
        }

        let dynamic = destination.kind().is_dynamic();
        let relationship_matches: Vec<Option<RelationshipView>> = destination
            .relationship_views_raw()
            .iter()
            .map(|rv| {
                find_relationship_view(source, source_model, destination_model, rv, dynamic)
                    .cloned()
            })
            .collect();

        for (target, matched) in destination
            .relationship_views_raw_mut()
            .iter_mut()
            .zip(relationship_matches)
        {
            match matched {
                Some(source_view) => {
                    target.copy_layout_information_from(&source_view);
                    copied += 1;
                }
                None => {
                    warn!(relationship_id = %target.relationship_id(), order = %target.order(), "No layout found for relationship");
                }
            }
        }

        debug!(copied, "Copied layout information");
    }
}

/// Find the source element view that corresponds to a destination element
pub fn find_element_view<'a>(
    source: &'a ModelView,
    source_model: &Model,
    destination_model: &Model,
    element_id: &str,
) -> Option<&'a ElementView> {
    if let Some(element_view) = source.element_view(element_id) {
        return Some(element_view);
    }

    let element = destination_model.element(element_id)?;
    source.element_views().find(|candidate| {
        source_model
            .element(candidate.element_id())
            .map_or(false, |e| {
                e.name == element.name && e.description == element.description
            })
    })
}

/// Find the source relationship view that corresponds to a destination one
pub fn find_relationship_view<'a>(
    source: &'a ModelView,
    source_model: &Model,
    destination_model: &Model,
    destination_view: &RelationshipView,
    dynamic: bool,
) -> Option<&'a RelationshipView> {
    let same_step = |candidate: &RelationshipView| {
        !dynamic
            || (candidate.order() == destination_view.order()
                && candidate.description() == destination_view.description())
    };

    let by_id = source.relationship_views_raw().iter().find(|candidate| {
        candidate.relationship_id() == destination_view.relationship_id() && same_step(candidate)
    });
    if by_id.is_some() {
        return by_id;
    }

    let relationship = destination_model.relationship(destination_view.relationship_id())?;
    let source_endpoint = find_element_view(
        source,
        source_model,
        destination_model,
        &relationship.source_id,
    )?
    .element_id();
    let destination_endpoint = find_element_view(
        source,
        source_model,
        destination_model,
        &relationship.destination_id,
    )?
    .element_id();

    source.relationship_views_raw().iter().find(|candidate| {
        same_step(candidate)
            && source_model
                .relationship(candidate.relationship_id())
                .map_or(false, |r| {
                    r.source_id == source_endpoint
                        && r.destination_id == destination_endpoint
                        && r.description == relationship.description
                })
    })
}
