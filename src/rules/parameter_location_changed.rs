// Copyright 2025 Oxide Computer Company

use openapiv3::Parameter;

use crate::{Diagnostic, DiffVisitor, Location, operations::ParameterKind};

use super::{Rule, RuleKind};

/// A parameter moved between query, header, path and cookie.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParameterLocationChanged;

impl Rule for ParameterLocationChanged {
    fn kind(&self) -> RuleKind {
        RuleKind::ParameterLocationChanged
    }
}

impl DiffVisitor for ParameterLocationChanged {
    fn accept_parameter(
        &self,
        location: &Location,
        old: Option<&Parameter>,
        new: Option<&Parameter>,
    ) -> Vec<Diagnostic> {
        // Additions and removals belong to other rules.
        let (Some(old), Some(new)) = (old, new) else {
            return Vec::new();
        };

        let old_kind = ParameterKind::of(old);
        let new_kind = ParameterKind::of(new);
        if old_kind == new_kind {
            return Vec::new();
        }

        vec![Diagnostic::new(
            self.kind(),
            location,
            format!(
                "The location of parameter '{}' has changed in the new spec: \
                 '{new_kind}' previously was '{old_kind}'.",
                old.parameter_data_ref().name,
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{location::Segment, rules::test_support::parameter};

    fn location() -> Location {
        Location::new()
            .push(Segment::Path("/estimates/price".to_string()))
            .push(Segment::Operation("get".to_string()))
            .push(Segment::Parameter("latitude".to_string()))
            .within_request()
    }

    #[test]
    fn query_to_header() {
        let old = parameter(json!({
            "name": "latitude", "in": "query", "required": true, "schema": { "type": "number" }
        }));
        let new = parameter(json!({
            "name": "latitude", "in": "header", "required": true, "schema": { "type": "number" }
        }));

        let diagnostics = ParameterLocationChanged.accept_parameter(&location(), Some(&old), Some(&new));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "The location of parameter 'latitude' has changed in the new spec: \
             'header' previously was 'query'."
        );
    }

    #[test]
    fn same_location() {
        let param = parameter(json!({
            "name": "latitude", "in": "query", "schema": { "type": "number" }
        }));
        assert!(
            ParameterLocationChanged
                .accept_parameter(&location(), Some(&param), Some(&param))
                .is_empty()
        );
    }

    #[test]
    fn one_sided() {
        let param = parameter(json!({
            "name": "latitude", "in": "query", "schema": { "type": "number" }
        }));
        let rule = ParameterLocationChanged;
        assert!(rule.accept_parameter(&location(), None, Some(&param)).is_empty());
        assert!(rule.accept_parameter(&location(), Some(&param), None).is_empty());
    }
}
