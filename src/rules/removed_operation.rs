// Copyright 2025 Oxide Computer Company

use openapiv3::{Operation, PathItem};

use crate::{Diagnostic, DiffVisitor, Location};

use super::{Rule, RuleKind};

/// An endpoint disappeared, either with its whole path or on its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemovedOperation;

impl Rule for RemovedOperation {
    fn kind(&self) -> RuleKind {
        RuleKind::RemovedOperation
    }
}

impl DiffVisitor for RemovedOperation {
    fn accept_path(
        &self,
        location: &Location,
        _key: &str,
        old: Option<&PathItem>,
        new: Option<&PathItem>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (Some(_), None) => vec![Diagnostic::new(
                self.kind(),
                location,
                "The path was removed in the new spec.",
            )],
            _ => Vec::new(),
        }
    }

    fn accept_operation(
        &self,
        location: &Location,
        _method: &str,
        old: Option<&Operation>,
        new: Option<&Operation>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (Some(_), None) => vec![Diagnostic::new(
                self.kind(),
                location,
                "The operation was removed in the new spec.",
            )],
            _ => Vec::new(),
        }
    }
}
