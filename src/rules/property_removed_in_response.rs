// Copyright 2025 Oxide Computer Company

use crate::{Diagnostic, DiffVisitor, Location, visitor::Property};

use super::{Rule, RuleKind};

#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyRemovedInResponse;

impl Rule for PropertyRemovedInResponse {
    fn kind(&self) -> RuleKind {
        RuleKind::PropertyRemovedInResponse
    }
}

impl DiffVisitor for PropertyRemovedInResponse {
    fn accept_property(
        &self,
        location: &Location,
        name: &str,
        old: Option<Property<'_>>,
        new: Option<Property<'_>>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (Some(_), None) if location.is_response() => vec![Diagnostic::new(
                self.kind(),
                location,
                format!("The property '{name}' has been removed in the new spec."),
            )],
            _ => Vec::new(),
        }
    }
}
