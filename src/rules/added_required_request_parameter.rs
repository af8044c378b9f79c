// Copyright 2025 Oxide Computer Company

use openapiv3::Parameter;

use crate::{Diagnostic, DiffVisitor, Location, visitor::Property};

use super::{Rule, RuleKind};

/// Old clients never send an input that has just become mandatory, whether a
/// parameter or a property of a request body.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddedRequiredRequestParameter;

impl Rule for AddedRequiredRequestParameter {
    fn kind(&self) -> RuleKind {
        RuleKind::AddedRequiredRequestParameter
    }
}

impl DiffVisitor for AddedRequiredRequestParameter {
    fn accept_parameter(
        &self,
        location: &Location,
        old: Option<&Parameter>,
        new: Option<&Parameter>,
    ) -> Vec<Diagnostic> {
        let (None, Some(new)) = (old, new) else {
            return Vec::new();
        };

        let data = new.parameter_data_ref();
        if !data.required {
            return Vec::new();
        }

        vec![Diagnostic::new(
            self.kind(),
            location,
            format!(
                "The required parameter '{}' has been added in the new spec.",
                data.name
            ),
        )]
    }

    fn accept_property(
        &self,
        location: &Location,
        name: &str,
        old: Option<Property<'_>>,
        new: Option<Property<'_>>,
    ) -> Vec<Diagnostic> {
        match (old, new) {
            (None, Some(new)) if new.required && location.is_request() => {
                vec![Diagnostic::new(
                    self.kind(),
                    location,
                    format!("The required property '{name}' has been added in the new spec."),
                )]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        location::Segment,
        rules::test_support::{parameter, request, response, schema},
    };

    fn parameter_location() -> Location {
        Location::new()
            .push(Segment::Path("/store/order/{orderId}".to_string()))
            .push(Segment::Operation("get".to_string()))
            .push(Segment::Parameter("newParam".to_string()))
            .within_request()
    }

    #[test]
    fn required_parameter_added() {
        let new = parameter(json!({
            "name": "newParam", "in": "query", "required": true, "schema": { "type": "string" }
        }));

        let diagnostics =
            AddedRequiredRequestParameter.accept_parameter(&parameter_location(), None, Some(&new));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "Path /store/order/{orderId}, Operation GET, Parameter newParam : \
             The required parameter 'newParam' has been added in the new spec."
        );
    }

    #[test]
    fn optional_parameter_added() {
        let new = parameter(json!({
            "name": "newParam", "in": "query", "schema": { "type": "string" }
        }));
        assert!(
            AddedRequiredRequestParameter
                .accept_parameter(&parameter_location(), None, Some(&new))
                .is_empty()
        );
    }

    #[test]
    fn removal_is_not_addition() {
        let param = parameter(json!({
            "name": "newParam", "in": "query", "required": true, "schema": { "type": "string" }
        }));
        let rule = AddedRequiredRequestParameter;
        assert!(rule.accept_parameter(&parameter_location(), Some(&param), None).is_empty());
        assert!(
            rule.accept_parameter(&parameter_location(), Some(&param), Some(&param))
                .is_empty()
        );
    }

    #[test]
    fn required_property_added_to_request() {
        let schema = schema(json!({ "type": "string" }));
        let location = request().push(Segment::Property("nickname".to_string()));
        let property = Property {
            schema: &schema,
            required: true,
        };

        let diagnostics = AddedRequiredRequestParameter.accept_property(
            &location,
            "nickname",
            None,
            Some(property),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "The required property 'nickname' has been added in the new spec."
        );

        let optional = Property {
            required: false,
            ..property
        };
        assert!(
            AddedRequiredRequestParameter
                .accept_property(&location, "nickname", None, Some(optional))
                .is_empty()
        );
    }

    #[test]
    fn required_property_added_to_response() {
        let schema = schema(json!({ "type": "string" }));
        let location = response().push(Segment::Property("nickname".to_string()));
        let property = Property {
            schema: &schema,
            required: true,
        };

        assert!(
            AddedRequiredRequestParameter
                .accept_property(&location, "nickname", None, Some(property))
                .is_empty()
        );
    }
}
