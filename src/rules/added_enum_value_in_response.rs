// Copyright 2025 Oxide Computer Company

use crate::{Diagnostic, DiffVisitor, EnumValue, Location};

use super::{Rule, RuleKind};

/// A client validating responses against the old enum rejects a value it has
/// never seen.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddedEnumValueInResponse;

impl Rule for AddedEnumValueInResponse {
    fn kind(&self) -> RuleKind {
        RuleKind::AddedEnumValueInResponse
    }
}

impl DiffVisitor for AddedEnumValueInResponse {
    fn accept_enum_value(
        &self,
        location: &Location,
        old: Option<&EnumValue>,
        new: Option<&EnumValue>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (None, Some(value)) if location.is_response() => vec![Diagnostic::new(
                self.kind(),
                location,
                format!("The enum value '{value}' has been added in the new spec."),
            )],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::rules::test_support::{request, response};

    #[test]
    fn added_in_response() {
        let value = EnumValue(json!("PENDING"));
        let diagnostics =
            AddedEnumValueInResponse.accept_enum_value(&response(), None, Some(&value));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "Path /pets, Operation GET, Response 200, MediaType application/json : \
             The enum value 'PENDING' has been added in the new spec."
        );
    }

    #[test]
    fn added_in_request_is_compatible() {
        let value = EnumValue(json!("PENDING"));
        assert!(
            AddedEnumValueInResponse
                .accept_enum_value(&request(), None, Some(&value))
                .is_empty()
        );
    }

    #[test]
    fn removed_or_kept_ignored() {
        let value = EnumValue(json!(7));
        let rule = AddedEnumValueInResponse;
        assert!(rule.accept_enum_value(&response(), Some(&value), None).is_empty());
        assert!(
            rule.accept_enum_value(&response(), Some(&value), Some(&value))
                .is_empty()
        );
    }
}
