// Copyright 2025 Oxide Computer Company

use openapiv3::{MediaType, Operation, Parameter, PathItem, RequestBody, Response, Schema};

use crate::{Diagnostic, EnumValue, Location};

/// One side of a property pair.
#[derive(Clone, Copy, Debug)]
pub struct Property<'a> {
    /// The property schema, with any `$ref` already resolved.
    pub schema: &'a Schema,
    /// Whether the enclosing schema lists the property as required.
    pub required: bool,
}

/// Callbacks invoked by [`crate::walk`] for each node present in at least one
/// of the two documents.
///
/// When a node exists in only one document, the argument for the other side
/// is `None`. Every callback returns the diagnostics it wants to report and
/// defaults to reporting nothing, so implementations only override the nodes
/// they care about.
pub trait DiffVisitor {
    fn accept_path(
        &self,
        _location: &Location,
        _key: &str,
        _old: Option<&PathItem>,
        _new: Option<&PathItem>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// `method` is lower case, as it appears in the document.
    fn accept_operation(
        &self,
        _location: &Location,
        _method: &str,
        _old: Option<&Operation>,
        _new: Option<&Operation>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_parameter(
        &self,
        _location: &Location,
        _old: Option<&Parameter>,
        _new: Option<&Parameter>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_request_body(
        &self,
        _location: &Location,
        _old: Option<&RequestBody>,
        _new: Option<&RequestBody>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_response(
        &self,
        _location: &Location,
        _status: &str,
        _old: Option<&Response>,
        _new: Option<&Response>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_media_type(
        &self,
        _location: &Location,
        _key: &str,
        _old: Option<&MediaType>,
        _new: Option<&MediaType>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Schemas are passed with any `$ref` already resolved.
    fn accept_schema(
        &self,
        _location: &Location,
        _old: Option<&Schema>,
        _new: Option<&Schema>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_property(
        &self,
        _location: &Location,
        _name: &str,
        _old: Option<Property<'_>>,
        _new: Option<Property<'_>>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn accept_enum_value(
        &self,
        _location: &Location,
        _old: Option<&EnumValue>,
        _new: Option<&EnumValue>,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }
}
