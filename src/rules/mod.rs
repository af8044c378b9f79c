// Copyright 2025 Oxide Computer Company

//! Backward-compatibility policies.
//!
//! Each rule answers one narrow question about a pair of nodes and reports
//! its findings as [`crate::Diagnostic`]s. Rules hold no state, so one instance can
//! serve any number of comparisons.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::DiffVisitor;

mod added_enum_value_in_response;
mod added_required_request_parameter;
mod composite;
mod parameter_location_changed;
mod property_removed_in_response;
mod property_type_changed;
mod removed_enum_value_in_request;
mod removed_operation;

pub use added_enum_value_in_response::AddedEnumValueInResponse;
pub use added_required_request_parameter::AddedRequiredRequestParameter;
pub use composite::CompositeRule;
pub use parameter_location_changed::ParameterLocationChanged;
pub use property_removed_in_response::PropertyRemovedInResponse;
pub use property_type_changed::PropertyTypeChanged;
pub use removed_enum_value_in_request::RemovedEnumValueInRequest;
pub use removed_operation::RemovedOperation;

/// A compatibility policy that can be run by the walker.
pub trait Rule: DiffVisitor + Send + Sync {
    fn kind(&self) -> RuleKind;
}

/// Identifies a rule in diagnostics and on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    AddedEnumValueInResponse,
    AddedRequiredRequestParameter,
    ParameterLocationChanged,
    PropertyRemovedInResponse,
    PropertyTypeChanged,
    RemovedEnumValueInRequest,
    RemovedOperation,
}

impl RuleKind {
    /// Every rule, in the order the default rule set runs them.
    pub const ALL: [RuleKind; 7] = [
        RuleKind::AddedEnumValueInResponse,
        RuleKind::AddedRequiredRequestParameter,
        RuleKind::ParameterLocationChanged,
        RuleKind::PropertyRemovedInResponse,
        RuleKind::PropertyTypeChanged,
        RuleKind::RemovedEnumValueInRequest,
        RuleKind::RemovedOperation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::AddedEnumValueInResponse => "added-enum-value-in-response",
            RuleKind::AddedRequiredRequestParameter => "added-required-request-parameter",
            RuleKind::ParameterLocationChanged => "parameter-location-changed",
            RuleKind::PropertyRemovedInResponse => "property-removed-in-response",
            RuleKind::PropertyTypeChanged => "property-type-changed",
            RuleKind::RemovedEnumValueInRequest => "removed-enum-value-in-request",
            RuleKind::RemovedOperation => "removed-operation",
        }
    }

    /// A fresh instance of the rule.
    pub fn rule(&self) -> Box<dyn Rule> {
        match self {
            RuleKind::AddedEnumValueInResponse => Box::new(AddedEnumValueInResponse),
            RuleKind::AddedRequiredRequestParameter => Box::new(AddedRequiredRequestParameter),
            RuleKind::ParameterLocationChanged => Box::new(ParameterLocationChanged),
            RuleKind::PropertyRemovedInResponse => Box::new(PropertyRemovedInResponse),
            RuleKind::PropertyTypeChanged => Box::new(PropertyTypeChanged),
            RuleKind::RemovedEnumValueInRequest => Box::new(RemovedEnumValueInRequest),
            RuleKind::RemovedOperation => Box::new(RemovedOperation),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown rule '{0}'")]
pub struct UnknownRule(pub String);

impl FromStr for RuleKind {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}
