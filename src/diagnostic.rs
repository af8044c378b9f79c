// Copyright 2025 Oxide Computer Company

use std::fmt;

use serde::Serialize;

use crate::{Location, RuleKind};

/// A backward-incompatible change found between two OpenAPI documents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The rule that reported the change.
    pub rule: RuleKind,
    /// Where the change was found, e.g. `Path /pets, Operation GET`.
    pub location: Location,
    /// Which part of the exchange is affected.
    pub comparison: ChangeComparison,
    /// Human-readable message describing the nature of the change.
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: RuleKind, location: &Location, message: impl ToString) -> Self {
        Self {
            rule,
            location: location.clone(),
            comparison: ChangeComparison::of(location),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.location, self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeComparison {
    // Inputs such as operation parameters and request bodies.
    Input,
    // Outputs such as operation responses.
    Output,
    // Other structures within an OpenAPI document such as paths or
    // operations.
    Structural,
}

impl ChangeComparison {
    fn of(location: &Location) -> Self {
        if location.is_request() {
            ChangeComparison::Input
        } else if location.is_response() {
            ChangeComparison::Output
        } else {
            ChangeComparison::Structural
        }
    }
}
