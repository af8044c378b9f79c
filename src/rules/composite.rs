// Copyright 2025 Oxide Computer Company

use openapiv3::{MediaType, OpenAPI, Operation, Parameter, PathItem, RequestBody, Response, Schema};
use tracing::debug;

use crate::{
    Diagnostic, DiffVisitor, EnumValue, Location, StructuralError, visitor::Property, walk,
};

use super::{Rule, RuleKind};

/// Runs several rules over a single walk of the two documents.
///
/// Every callback is forwarded to each child in order. [`CompositeRule::check`]
/// returns the findings grouped by child, in child order, and in walk order
/// within each child.
pub struct CompositeRule {
    rules: Vec<Box<dyn Rule>>,
}

impl CompositeRule {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Every rule.
    pub fn backward_compatibility() -> Self {
        Self::from_kinds(RuleKind::ALL)
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = RuleKind>) -> Self {
        Self::new(kinds.into_iter().map(|kind| kind.rule()).collect())
    }

    /// The same rule set minus the given kinds.
    pub fn without(self, skipped: &[RuleKind]) -> Self {
        Self {
            rules: self
                .rules
                .into_iter()
                .filter(|rule| !skipped.contains(&rule.kind()))
                .collect(),
        }
    }

    pub fn kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Walk both documents once and collect every child's findings.
    pub fn check(&self, old: &OpenAPI, new: &OpenAPI) -> Result<Vec<Diagnostic>, StructuralError> {
        debug!(rules = ?self.kinds(), "checking compatibility");
        let diagnostics = walk(self, old, new)?;
        Ok(self.collate(diagnostics))
    }

    /// Stable-sort diagnostics by the position of the rule that produced them.
    pub fn collate(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        let kinds = self.kinds();
        diagnostics.sort_by_key(|diagnostic| {
            kinds
                .iter()
                .position(|kind| *kind == diagnostic.rule)
                .unwrap_or(kinds.len())
        });
        diagnostics
    }

    fn each(&self, f: impl Fn(&dyn Rule) -> Vec<Diagnostic>) -> Vec<Diagnostic> {
        self.rules.iter().flat_map(|rule| f(rule.as_ref())).collect()
    }
}

impl Default for CompositeRule {
    fn default() -> Self {
        Self::backward_compatibility()
    }
}

impl DiffVisitor for CompositeRule {
    fn accept_path(
        &self,
        location: &Location,
        key: &str,
        old: Option<&PathItem>,
        new: Option<&PathItem>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_path(location, key, old, new))
    }

    fn accept_operation(
        &self,
        location: &Location,
        method: &str,
        old: Option<&Operation>,
        new: Option<&Operation>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_operation(location, method, old, new))
    }

    fn accept_parameter(
        &self,
        location: &Location,
        old: Option<&Parameter>,
        new: Option<&Parameter>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_parameter(location, old, new))
    }

    fn accept_request_body(
        &self,
        location: &Location,
        old: Option<&RequestBody>,
        new: Option<&RequestBody>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_request_body(location, old, new))
    }

    fn accept_response(
        &self,
        location: &Location,
        status: &str,
        old: Option<&Response>,
        new: Option<&Response>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_response(location, status, old, new))
    }

    fn accept_media_type(
        &self,
        location: &Location,
        key: &str,
        old: Option<&MediaType>,
        new: Option<&MediaType>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_media_type(location, key, old, new))
    }

    fn accept_schema(
        &self,
        location: &Location,
        old: Option<&Schema>,
        new: Option<&Schema>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_schema(location, old, new))
    }

    fn accept_property(
        &self,
        location: &Location,
        name: &str,
        old: Option<Property<'_>>,
        new: Option<Property<'_>>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_property(location, name, old, new))
    }

    fn accept_enum_value(
        &self,
        location: &Location,
        old: Option<&EnumValue>,
        new: Option<&EnumValue>,
    ) -> Vec<Diagnostic> {
        self.each(|rule| rule.accept_enum_value(location, old, new))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn document(paths: Value) -> OpenAPI {
        serde_json::from_value(json!({
            "openapi": "3.0.3",
            "info": { "title": "test", "version": "1.0.0" },
            "paths": paths,
        }))
        .unwrap()
    }

    /// Old has `/gone` and an optional query param; new drops `/gone`, adds a
    /// required header and moves the query param to a header.
    fn pair() -> (OpenAPI, OpenAPI) {
        let old = document(json!({
            "/gone": { "get": { "responses": {} } },
            "/items": {
                "get": {
                    "parameters": [
                        { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                    ],
                    "responses": {}
                }
            }
        }));
        let new = document(json!({
            "/items": {
                "get": {
                    "parameters": [
                        { "name": "limit", "in": "header", "schema": { "type": "integer" } },
                        { "name": "token", "in": "header", "required": true, "schema": { "type": "string" } }
                    ],
                    "responses": {}
                }
            }
        }));
        (old, new)
    }

    fn rendered(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn collated_by_child_order() {
        let (old, new) = pair();
        let diagnostics = CompositeRule::backward_compatibility()
            .check(&old, &new)
            .unwrap();

        assert_eq!(
            rendered(&diagnostics),
            vec![
                "Path /items, Operation GET, Parameter token : \
                 The required parameter 'token' has been added in the new spec.",
                "Path /items, Operation GET, Parameter limit : \
                 The location of parameter 'limit' has changed in the new spec: \
                 'header' previously was 'query'.",
                "Path /gone : The path was removed in the new spec.",
            ]
        );
    }

    #[test]
    fn order_independent_set() {
        let (old, new) = pair();
        let forward = CompositeRule::backward_compatibility()
            .check(&old, &new)
            .unwrap();
        let reversed = CompositeRule::from_kinds(RuleKind::ALL.into_iter().rev())
            .check(&old, &new)
            .unwrap();

        let mut forward = rendered(&forward);
        let mut reversed_rendered = rendered(&reversed);
        assert_ne!(forward, reversed_rendered);

        forward.sort();
        reversed_rendered.sort();
        assert_eq!(forward, reversed_rendered);

        assert_eq!(reversed[0].rule, RuleKind::RemovedOperation);
    }

    #[test]
    fn swapping_sides() {
        let (old, new) = pair();
        let diagnostics = CompositeRule::backward_compatibility()
            .check(&new, &old)
            .unwrap();

        // Removing the required header is not an addition, and `/gone` now
        // reads as an added path.
        assert_eq!(
            rendered(&diagnostics),
            vec![
                "Path /items, Operation GET, Parameter limit : \
                 The location of parameter 'limit' has changed in the new spec: \
                 'query' previously was 'header'.",
            ]
        );
    }

    #[test]
    fn reflexive() {
        let (old, new) = pair();
        let rule = CompositeRule::default();
        assert!(rule.check(&old, &old).unwrap().is_empty());
        assert!(rule.check(&new, &new).unwrap().is_empty());
    }

    #[test]
    fn skipped_rules() {
        let (old, new) = pair();
        let rule = CompositeRule::backward_compatibility()
            .without(&[RuleKind::RemovedOperation, RuleKind::ParameterLocationChanged]);

        assert_eq!(rule.kinds().len(), 5);
        let diagnostics = rule.check(&old, &new).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, RuleKind::AddedRequiredRequestParameter);

        let none = CompositeRule::new(Vec::new());
        assert!(none.is_empty());
        assert!(none.check(&old, &new).unwrap().is_empty());
    }
}
