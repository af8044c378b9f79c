// Copyright 2025 Oxide Computer Company

use crate::{Diagnostic, DiffVisitor, Location, shape::SchemaShape, visitor::Property};

use super::{Rule, RuleKind};

/// A property present on both sides changed its scalar type or its format.
/// Both are checked, so one property can produce two diagnostics.
#[derive(Clone, Copy, Debug, Default)]
pub struct PropertyTypeChanged;

impl Rule for PropertyTypeChanged {
    fn kind(&self) -> RuleKind {
        RuleKind::PropertyTypeChanged
    }
}

impl DiffVisitor for PropertyTypeChanged {
    fn accept_property(
        &self,
        location: &Location,
        name: &str,
        old: Option<Property<'_>>,
        new: Option<Property<'_>>,
    ) -> Vec<Diagnostic> {
        let (Some(old), Some(new)) = (old, new) else {
            return Vec::new();
        };

        let old = SchemaShape::new(old.schema);
        let new = SchemaShape::new(new.schema);
        let mut diagnostics = Vec::new();

        if old.type_name != new.type_name {
            diagnostics.push(Diagnostic::new(
                self.kind(),
                location,
                format!(
                    "The type of property '{name}' has changed in the new spec: \
                     '{}' was previously '{}'.",
                    display(&new.type_name),
                    display(&old.type_name),
                ),
            ));
        }

        if old.format != new.format {
            diagnostics.push(Diagnostic::new(
                self.kind(),
                location,
                format!(
                    "The format of property '{name}' has changed in the new spec: \
                     '{}' was previously '{}'.",
                    display(&new.format),
                    display(&old.format),
                ),
            ));
        }

        diagnostics
    }
}

fn display(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("unspecified")
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        location::Segment,
        rules::test_support::{response, schema},
    };

    fn check(old: Value, new: Value) -> Vec<String> {
        let old = schema(old);
        let new = schema(new);
        let location = response().push(Segment::Property("id".to_string()));

        PropertyTypeChanged
            .accept_property(
                &location,
                "id",
                Some(Property {
                    schema: &old,
                    required: false,
                }),
                Some(Property {
                    schema: &new,
                    required: false,
                }),
            )
            .into_iter()
            .map(|diagnostic| diagnostic.message)
            .collect()
    }

    #[test]
    fn type_changed() {
        assert_eq!(
            check(json!({ "type": "string" }), json!({ "type": "integer" })),
            vec!["The type of property 'id' has changed in the new spec: 'integer' was previously 'string'."]
        );
    }

    #[test]
    fn format_changed() {
        assert_eq!(
            check(
                json!({ "type": "integer", "format": "int32" }),
                json!({ "type": "integer", "format": "int64" })
            ),
            vec!["The format of property 'id' has changed in the new spec: 'int64' was previously 'int32'."]
        );
    }

    #[test]
    fn type_and_format_changed() {
        assert_eq!(
            check(
                json!({ "type": "string", "format": "uuid" }),
                json!({ "type": "integer" })
            ),
            vec![
                "The type of property 'id' has changed in the new spec: 'integer' was previously 'string'.",
                "The format of property 'id' has changed in the new spec: 'unspecified' was previously 'uuid'.",
            ]
        );
    }

    #[test]
    fn unchanged() {
        assert!(check(
            json!({ "type": "string", "format": "date-time" }),
            json!({ "type": "string", "format": "date-time", "description": "when" })
        )
        .is_empty());
    }

    #[test]
    fn one_sided() {
        let schema = schema(json!({ "type": "string" }));
        let property = Property {
            schema: &schema,
            required: false,
        };
        let rule = PropertyTypeChanged;
        assert!(rule.accept_property(&response(), "id", None, Some(property)).is_empty());
        assert!(rule.accept_property(&response(), "id", Some(property), None).is_empty());
    }
}
