// Copyright 2025 Oxide Computer Company

//! apicompat
//!
//! Detect backward-incompatible changes between two versions of an OpenAPI
//! document.
//!
//! A single [`walk`] pairs the nodes of both documents by key and hands each
//! pair to a [`DiffVisitor`]. The [`rules`] are visitors that each look for one
//! kind of breaking change, and [`CompositeRule`] runs any number of them in
//! one walk.

use anyhow::Context as _;
use openapiv3::OpenAPI;
use serde::Deserialize;

pub mod baseline;
mod context;
mod diagnostic;
mod location;
mod operations;
mod path;
mod resolve;
pub mod rules;
mod schema;
mod setops;
mod shape;
mod visitor;
mod walker;

pub use context::DocumentSide;
pub use diagnostic::{ChangeComparison, Diagnostic};
pub use location::{Location, Segment};
pub use operations::ParameterKind;
pub use path::JsonPointer;
pub use resolve::StructuralError;
pub use rules::{CompositeRule, Rule, RuleKind, UnknownRule};
pub use shape::{EnumValue, SchemaShape};
pub use visitor::{DiffVisitor, Property};
pub use walker::walk;

/// Check `new` for backward-incompatible changes against `old` using every
/// rule.
pub fn check(old: &serde_json::Value, new: &serde_json::Value) -> anyhow::Result<Vec<Diagnostic>> {
    check_with(&CompositeRule::backward_compatibility(), old, new)
}

/// Check `new` against `old` using the given rules.
pub fn check_with(
    rules: &CompositeRule,
    old: &serde_json::Value,
    new: &serde_json::Value,
) -> anyhow::Result<Vec<Diagnostic>> {
    let old = OpenAPI::deserialize(old).context("failed to parse the old document")?;
    let new = OpenAPI::deserialize(new).context("failed to parse the new document")?;

    Ok(rules.check(&old, &new)?)
}
