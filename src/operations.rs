// Copyright 2026 Oxide Computer Company

use std::fmt;

use openapiv3::{Operation, Parameter, PathItem};

use crate::{
    context::Contextual,
    resolve::{ReferenceOrResolver, StructuralError},
};

/// Where a parameter is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParameterKind {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterKind {
    pub fn of(parameter: &Parameter) -> Self {
        match parameter {
            Parameter::Query { .. } => ParameterKind::Query,
            Parameter::Header { .. } => ParameterKind::Header,
            Parameter::Path { .. } => ParameterKind::Path,
            Parameter::Cookie { .. } => ParameterKind::Cookie,
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Query => write!(f, "query"),
            ParameterKind::Header => write!(f, "header"),
            ParameterKind::Path => write!(f, "path"),
            ParameterKind::Cookie => write!(f, "cookie"),
        }
    }
}

/// The operations of a path item keyed by lower-case HTTP method, in the
/// order `get, put, post, delete, options, head, patch, trace`.
pub(crate) fn operations<'a>(
    path_item: &Contextual<'a, &'a PathItem>,
) -> Vec<(&'a str, Contextual<'a, &'a Operation>)> {
    let item: &'a PathItem = *path_item.as_ref();
    item.iter()
        .map(|(method, operation)| {
            (
                method,
                Contextual::new(path_item.context().append(method), operation),
            )
        })
        .collect()
}

/// All parameters that apply to an operation, keyed by name.
///
/// Operation parameters come first so that, when paired by name, they
/// override parameters shared by the whole path item.
pub(crate) fn all_params<'a>(
    path_item: &Contextual<'a, &'a PathItem>,
    operation: &Contextual<'a, &'a Operation>,
) -> Result<Vec<(&'a str, Contextual<'a, &'a Parameter>)>, StructuralError> {
    let item: &'a PathItem = *path_item.as_ref();
    let op: &'a Operation = *operation.as_ref();

    let local_context = operation.context().append("parameters");
    let local = op
        .parameters
        .iter()
        .enumerate()
        .map(|(idx, ref_or_param)| ref_or_param.resolve(&local_context.append(&idx.to_string())));

    let shared_context = path_item.context().append("parameters");
    let shared = item
        .parameters
        .iter()
        .enumerate()
        .map(|(idx, ref_or_param)| ref_or_param.resolve(&shared_context.append(&idx.to_string())));

    local
        .chain(shared)
        .map(|param| {
            let param = param?;
            let param_ref: &'a Parameter = *param.as_ref();
            Ok((param_ref.parameter_data_ref().name.as_str(), param))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use openapiv3::OpenAPI;
    use serde_json::json;

    use super::*;
    use crate::{
        context::{Context, DocumentSide},
        resolve::resolve_path_item,
    };

    fn document() -> OpenAPI {
        serde_json::from_value(json!({
            "openapi": "3.0.3",
            "info": { "title": "test", "version": "1.0.0" },
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true, "schema": { "type": "string" } },
                        { "name": "trace", "in": "header", "schema": { "type": "string" } }
                    ],
                    "get": {
                        "parameters": [
                            { "$ref": "#/components/parameters/trace" },
                            { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
                        ],
                        "responses": { "200": { "description": "ok" } }
                    },
                    "delete": {
                        "responses": { "204": { "description": "gone" } }
                    }
                }
            },
            "components": {
                "parameters": {
                    "trace": { "name": "trace", "in": "query", "schema": { "type": "string" } }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn operations_in_method_order() {
        let api = document();
        let context = Context::new(DocumentSide::Old, &api)
            .append("paths")
            .append("/pets/{petId}");
        let path_item = resolve_path_item(&api.paths.paths["/pets/{petId}"], &context).unwrap();

        let operations = operations(&path_item);
        let methods = operations.iter().map(|(m, _)| *m).collect::<Vec<_>>();
        assert_eq!(methods, vec!["get", "delete"]);
        assert_eq!(
            operations[0].1.context().pointer().as_str(),
            "#/paths/~1pets~1{petId}/get"
        );
    }

    #[test]
    fn operation_parameters_precede_shared() {
        let api = document();
        let context = Context::new(DocumentSide::Old, &api)
            .append("paths")
            .append("/pets/{petId}");
        let path_item = resolve_path_item(&api.paths.paths["/pets/{petId}"], &context).unwrap();
        let operations = operations(&path_item);

        let params = all_params(&path_item, &operations[0].1).unwrap();
        let described = params
            .iter()
            .map(|(name, param)| (*name, ParameterKind::of(param)))
            .collect::<Vec<_>>();
        assert_eq!(
            described,
            vec![
                ("trace", ParameterKind::Query),
                ("verbose", ParameterKind::Query),
                ("petId", ParameterKind::Path),
                ("trace", ParameterKind::Header),
            ]
        );

        let params = all_params(&path_item, &operations[1].1).unwrap();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ParameterKind::Query.to_string(), "query");
        assert_eq!(ParameterKind::Cookie.to_string(), "cookie");
    }
}
