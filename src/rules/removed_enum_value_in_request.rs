// Copyright 2025 Oxide Computer Company

use crate::{Diagnostic, DiffVisitor, EnumValue, Location};

use super::{Rule, RuleKind};

/// Input that used to be valid is now rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemovedEnumValueInRequest;

impl Rule for RemovedEnumValueInRequest {
    fn kind(&self) -> RuleKind {
        RuleKind::RemovedEnumValueInRequest
    }
}

impl DiffVisitor for RemovedEnumValueInRequest {
    fn accept_enum_value(
        &self,
        location: &Location,
        old: Option<&EnumValue>,
        new: Option<&EnumValue>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (Some(value), None) if location.is_request() => vec![Diagnostic::new(
                self.kind(),
                location,
                format!("The enum value '{value}' has been removed in the new spec."),
            )],
            _ => Vec::new(),
        }
    }
}
