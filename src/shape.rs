// Copyright 2025 Oxide Computer Company

//! A uniform view over the parts of a schema that the compatibility rules
//! look at.
//!
//! `openapiv3` splits schemas by `type` into distinct structs, and parses
//! schemas without a `type` into a catch-all. [`SchemaShape`] flattens both
//! into the same handful of fields.

use std::fmt;

use indexmap::IndexMap;
use openapiv3::{ReferenceOr, Schema, SchemaKind, Type, VariantOrUnknownOrEmpty};
use serde::Serialize;
use serde_json::Value;

/// One member of an `enum` list.
///
/// Values compare structurally, so the string `"1"` and the number `1` are
/// distinct members.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumValue(pub Value);

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for EnumValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

pub(crate) type Properties = IndexMap<String, ReferenceOr<Box<Schema>>>;

#[derive(Debug)]
pub struct SchemaShape<'a> {
    /// The scalar type, e.g. `string`, `object`.
    pub type_name: Option<String>,
    pub format: Option<String>,
    /// Present for object-like schemas, even if empty.
    pub(crate) properties: Option<&'a Properties>,
    pub required: &'a [String],
    pub(crate) items: Option<&'a ReferenceOr<Box<Schema>>>,
    pub enumeration: Vec<EnumValue>,
}

impl<'a> SchemaShape<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let mut shape = Self {
            type_name: None,
            format: None,
            properties: None,
            required: &[],
            items: None,
            enumeration: Vec::new(),
        };

        match &schema.schema_kind {
            SchemaKind::Type(Type::String(string)) => {
                shape.type_name = Some("string".to_string());
                shape.format = format_name(&string.format);
                shape.enumeration = collect_enum(&string.enumeration);
            }
            SchemaKind::Type(Type::Number(number)) => {
                shape.type_name = Some("number".to_string());
                shape.format = format_name(&number.format);
                shape.enumeration = collect_enum(&number.enumeration);
            }
            SchemaKind::Type(Type::Integer(integer)) => {
                shape.type_name = Some("integer".to_string());
                shape.format = format_name(&integer.format);
                shape.enumeration = collect_enum(&integer.enumeration);
            }
            SchemaKind::Type(Type::Boolean(boolean)) => {
                shape.type_name = Some("boolean".to_string());
                shape.enumeration = collect_enum(&boolean.enumeration);
            }
            SchemaKind::Type(Type::Object(object)) => {
                shape.type_name = Some("object".to_string());
                shape.properties = Some(&object.properties);
                shape.required = &object.required;
            }
            SchemaKind::Type(Type::Array(array)) => {
                shape.type_name = Some("array".to_string());
                shape.items = array.items.as_ref();
            }
            SchemaKind::Any(any) => {
                shape.type_name = any.typ.clone();
                shape.format = any.format.clone();
                if !any.properties.is_empty() || any.typ.as_deref() == Some("object") {
                    shape.properties = Some(&any.properties);
                }
                shape.required = &any.required;
                shape.items = any.items.as_ref();
                shape.enumeration = any.enumeration.iter().cloned().map(EnumValue).collect();
            }
            SchemaKind::OneOf { .. }
            | SchemaKind::AllOf { .. }
            | SchemaKind::AnyOf { .. }
            | SchemaKind::Not { .. } => {}
        }

        shape
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|name| name == property)
    }
}

fn format_name<T: Serialize>(format: &VariantOrUnknownOrEmpty<T>) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(known) => serde_json::to_value(known)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string)),
        VariantOrUnknownOrEmpty::Unknown(name) => Some(name.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

/// `null` members appear as `None`.
fn collect_enum<T>(values: &[Option<T>]) -> Vec<EnumValue>
where
    T: Clone + Into<Value>,
{
    values
        .iter()
        .map(|value| EnumValue(value.clone().map_or(Value::Null, Into::into)))
        .collect()
}

/// Union of two enum lists: members of `old` in order, then members only in
/// `new`. Each member is paired with its presence on either side.
pub(crate) fn pair_enum_values<'a>(
    old: &'a [EnumValue],
    new: &'a [EnumValue],
) -> Vec<(Option<&'a EnumValue>, Option<&'a EnumValue>)> {
    let mut union: Vec<&EnumValue> = Vec::new();
    for value in old.iter().chain(new) {
        if !union.contains(&value) {
            union.push(value);
        }
    }

    union
        .into_iter()
        .map(|value| {
            (
                old.contains(value).then_some(value),
                new.contains(value).then_some(value),
            )
        })
        .collect()
}
