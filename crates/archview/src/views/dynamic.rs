//! Ordered interaction steps in dynamic views

use tracing::debug;

use crate::core::{Element, Model, Relationship, SequenceNumber, ViewError, ViewResult};
use crate::views::{containment, ModelView, RelationshipView};

impl ModelView {
    /// Add a step from `source_id` to `destination_id`
    ///
    /// The step resolves to a relationship in the model: a forward
    /// relationship whose description matches, else the first forward one
    /// when no technology is given, else one whose technology matches; failing
    /// that the same search runs in reverse and the step becomes a response.
    /// The step receives the next order label from this view's sequence.
    pub fn add_dynamic_relationship(
        &mut self,
        model: &Model,
        source_id: &str,
        description: &str,
        technology: Option<&str>,
        destination_id: &str,
    ) -> ViewResult<&RelationshipView> {
        self.require_dynamic()?;
        let source = lookup(model, source_id)?;
        let destination = lookup(model, destination_id)?;
        containment::check_element_can_be_added(self, model, source)?;
        containment::check_element_can_be_added(self, model, destination)?;

        let (relationship, response) =
            match resolve(model, source_id, destination_id, description, technology) {
                Some(relationship) => (relationship, false),
                None => match resolve(model, destination_id, source_id, description, technology) {
                    Some(relationship) => (relationship, true),
                    None => {
                        return Err(ViewError::invalid_argument(format!(
                            "A relationship between {} and {} does not exist in the model.",
                            source.name, destination.name
                        )))
                    }
                },
            };
        let relationship_id = relationship.id.clone();

        self.push_step(
            model,
            (source_id, destination_id),
            relationship_id,
            description,
            technology,
            response,
        )
    }

    /// Add a step using the relationship's own description
    pub fn add_dynamic_relationship_between(
        &mut self,
        model: &Model,
        source_id: &str,
        destination_id: &str,
    ) -> ViewResult<&RelationshipView> {
        self.add_dynamic_relationship(model, source_id, "", None, destination_id)
    }

    /// Add a step for a specific relationship
    ///
    /// The step always refers to `relationship_id`, even when other
    /// relationships share its endpoints and description. An empty
    /// `description` falls back to the relationship's own.
    pub fn add_dynamic_relationship_by_id(
        &mut self,
        model: &Model,
        relationship_id: &str,
        description: &str,
    ) -> ViewResult<&RelationshipView> {
        self.require_dynamic()?;
        let relationship = model.relationship(relationship_id).ok_or_else(|| {
            ViewError::invalid_argument(format!(
                "The relationship {} does not exist in the model.",
                relationship_id
            ))
        })?;
        let (source_id, destination_id) = (
            relationship.source_id.clone(),
            relationship.destination_id.clone(),
        );
        let description = if description.is_empty() {
            relationship.description.clone()
        } else {
            description.to_string()
        };
        let source = lookup(model, &source_id)?;
        let destination = lookup(model, &destination_id)?;
        containment::check_element_can_be_added(self, model, source)?;
        containment::check_element_can_be_added(self, model, destination)?;

        self.push_step(
            model,
            (&source_id, &destination_id),
            relationship_id.to_string(),
            &description,
            None,
            false,
        )
    }

    /// Add both endpoints and insert the step under the next order label
    fn push_step(
        &mut self,
        model: &Model,
        (source_id, destination_id): (&str, &str),
        relationship_id: String,
        description: &str,
        technology: Option<&str>,
        response: bool,
    ) -> ViewResult<&RelationshipView> {
        self.add_element(model, source_id, false)?;
        self.add_element(model, destination_id, false)?;

        let order = self.sequence_mut().get_next();
        debug!(view_key = %self.key(), relationship_id = %relationship_id, order = %order, response, "Added dynamic step");
        let step = RelationshipView::step(
            relationship_id,
            description,
            technology.map(str::to_string),
            order,
            response,
        );
        let index = self.insert_relationship_view(step);
        Ok(&self.relationship_views_raw()[index])
    }

    pub fn start_parallel_sequence(&mut self) -> ViewResult<()> {
        self.require_dynamic()?;
        self.sequence_mut().start_parallel_sequence();
        Ok(())
    }

    /// Close the current parallel branch, optionally continuing its numbering
    pub fn end_parallel_sequence(&mut self, continue_numbering: bool) -> ViewResult<()> {
        self.require_dynamic()?;
        self.sequence_mut().end_parallel_sequence(continue_numbering)
    }

    pub fn start_subsequence(&mut self) -> ViewResult<()> {
        self.require_dynamic()?;
        self.sequence_mut().start_subsequence();
        Ok(())
    }

    pub fn end_subsequence(&mut self) -> ViewResult<()> {
        self.require_dynamic()?;
        self.sequence_mut().end_subsequence()
    }

    /// Continue numbering after the highest top-level label already present
    pub(crate) fn resume_sequence(&mut self) {
        let highest = self
            .relationship_views_raw()
            .iter()
            .filter_map(|rv| rv.order().split('.').next())
            .filter_map(|segment| segment.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        self.set_sequence(SequenceNumber::resume_from(highest));
    }

    fn require_dynamic(&self) -> ViewResult<()> {
        if self.kind().is_dynamic() {
            Ok(())
        } else {
            Err(ViewError::invalid_argument(format!(
                "View {} is not a dynamic view.",
                self.key()
            )))
        }
    }
}

fn lookup<'a>(model: &'a Model, id: &str) -> ViewResult<&'a Element> {
    model.element(id).ok_or_else(|| {
        ViewError::invalid_argument(format!(
            "The element {} does not exist in the model.",
            id
        ))
    })
}

fn resolve<'a>(
    model: &'a Model,
    source_id: &'a str,
    destination_id: &'a str,
    description: &str,
    technology: Option<&str>,
) -> Option<&'a Relationship> {
    let candidates: Vec<&Relationship> = model
        .relationships_between(source_id, destination_id)
        .collect();
    if let Some(relationship) = candidates.iter().find(|r| r.description == description) {
        return Some(*relationship);
    }
    match technology {
        None => candidates.first().copied(),
        Some(technology) => candidates
            .iter()
            .find(|r| r.technology.as_deref() == Some(technology))
            .copied(),
    }
}

/// Sort steps by their order label
///
/// When every label is a dotted run of integers ("2", "1.10") the labels
/// compare segment by segment, so "10" follows "9" and "1.10" follows "1.9";
/// otherwise labels compare as strings. The sort is stable.
pub(crate) fn sort_by_order(views: &mut [&RelationshipView]) {
    let numeric: Option<Vec<Vec<u32>>> = views.iter().map(|rv| segments(rv.order())).collect();
    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(Vec<u32>, &RelationshipView)> =
                keys.into_iter().zip(views.iter().copied()).collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            for (slot, (_, view)) in views.iter_mut().zip(keyed) {
                *slot = view;
            }
        }
        None => views.sort_by(|a, b| a.order().cmp(b.order())),
    }
}

fn segments(label: &str) -> Option<Vec<u32>> {
    label
        .split('.')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                segment.parse().ok()
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::ViewSet;

    fn labels(views: &[&RelationshipView]) -> Vec<String> {
        views.iter().map(|rv| rv.order().to_string()).collect()
    }

    #[test]
    fn test_numeric_sort() {
        let steps: Vec<RelationshipView> = ["10", "2", "1"]
            .iter()
            .map(|o| RelationshipView::step("r", "", None, *o, false))
            .collect();
        let mut refs: Vec<&RelationshipView> = steps.iter().collect();
        sort_by_order(&mut refs);
        assert_eq!(labels(&refs), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_dotted_labels_sort_by_segment() {
        let steps: Vec<RelationshipView> = ["2", "1.10", "1.9", "1.1.1", "1"]
            .iter()
            .map(|o| RelationshipView::step("r", "", None, *o, false))
            .collect();
        let mut refs: Vec<&RelationshipView> = steps.iter().collect();
        sort_by_order(&mut refs);
        assert_eq!(labels(&refs), vec!["1", "1.1.1", "1.9", "1.10", "2"]);
    }

    #[test]
    fn test_lexicographic_sort_when_not_numeric() {
        let steps: Vec<RelationshipView> = ["2", "10", "1e3", "NaN"]
            .iter()
            .map(|o| RelationshipView::step("r", "", None, *o, false))
            .collect();
        let mut refs: Vec<&RelationshipView> = steps.iter().collect();
        sort_by_order(&mut refs);
        assert_eq!(labels(&refs), vec!["10", "1e3", "2", "NaN"]);
    }

    #[test]
    fn test_response_step() {
        let mut model = Model::new();
        let user = model.add_person("User", "").unwrap();
        let system = model.add_software_system("Banking", "").unwrap();
        model
            .add_relationship_between(&user, &system, "Requests balance", None)
            .unwrap();

        let mut views = ViewSet::new();
        let view = views.create_dynamic_view(&model, None, "Dynamic", "").unwrap();
        let first = view
            .add_dynamic_relationship(&model, &user, "Requests balance", None, &system)
            .unwrap();
        assert!(!first.is_response());
        assert_eq!(first.order(), "1");

        let second = view
            .add_dynamic_relationship(&model, &system, "Returns balance", None, &user)
            .unwrap();
        assert!(second.is_response());
        assert_eq!(second.order(), "2");
        assert_eq!(second.description(), "Returns balance");
    }

    #[test]
    fn test_missing_relationship() {
        let mut model = Model::new();
        let user = model.add_person("User", "").unwrap();
        let system = model.add_software_system("Banking", "").unwrap();

        let mut views = ViewSet::new();
        let view = views.create_dynamic_view(&model, None, "Dynamic", "").unwrap();
        let error = view
            .add_dynamic_relationship(&model, &user, "", None, &system)
            .unwrap_err();
        assert_eq!(
            error,
            ViewError::invalid_argument(
                "A relationship between User and Banking does not exist in the model."
            )
        );
        assert_eq!(view.element_count(), 0);
    }

    #[test]
    fn test_technology_selects_relationship() {
        let mut model = Model::new();
        let api = model.add_software_system("API", "").unwrap();
        let db = model.add_software_system("Database", "").unwrap();
        model
            .add_relationship_between(&api, &db, "Reads", Some("JDBC"))
            .unwrap();
        let https = model
            .add_relationship_between(&api, &db, "Writes", Some("HTTPS"))
            .unwrap();

        let mut views = ViewSet::new();
        let view = views.create_dynamic_view(&model, None, "Dynamic", "").unwrap();
        let step = view
            .add_dynamic_relationship(&model, &api, "Stores", Some("HTTPS"), &db)
            .unwrap();
        assert_eq!(step.relationship_id(), https);
        assert_eq!(step.technology(), Some("HTTPS"));
    }

    #[test]
    fn test_sequencing_requires_dynamic_view() {
        let mut views = ViewSet::new();
        let view = views.create_system_landscape_view("Landscape", "").unwrap();
        assert!(view.start_parallel_sequence().is_err());
        assert!(view.end_subsequence().is_err());
    }
}
