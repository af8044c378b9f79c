// Copyright 2025 Oxide Computer Company

use std::collections::BTreeSet;

use indexmap::IndexMap;
use openapiv3::{
    MediaType, OpenAPI, Operation, PathItem, ReferenceOr, RequestBody, Response, Schema,
};
use tracing::{debug, trace};

use crate::{
    Diagnostic, DiffVisitor, Location,
    context::{Context, Contextual, DocumentSide},
    location::Segment,
    operations::{all_params, operations},
    path::JsonPointer,
    resolve::{ReferenceOrResolver, StructuralError, resolve_path_item},
    setops::Paired,
};

/// One side of a pair of nodes; `None` when the node only exists in the other
/// document.
pub(crate) type Side<'a, T> = Option<Contextual<'a, &'a T>>;

/// Walk two OpenAPI documents in parallel, invoking `visitor` for every node
/// present in at least one of them.
///
/// Returns the diagnostics reported by the visitor in the order they were
/// encountered, or the first structural problem that made one of the
/// documents impossible to walk.
pub fn walk(
    visitor: &dyn DiffVisitor,
    old: &OpenAPI,
    new: &OpenAPI,
) -> Result<Vec<Diagnostic>, StructuralError> {
    let mut walker = DiffWalker::new(visitor);
    walker.walk(old, new)?;

    debug!(diagnostics = walker.diagnostics.len(), "walk complete");
    Ok(walker.diagnostics)
}

/// State for a single walk. Not reusable across walks.
pub(crate) struct DiffWalker<'v> {
    pub visitor: &'v dyn DiffVisitor,
    /// (old, new) pointers of schema pairs already visited in the current
    /// parameter, request body or response.
    pub visited: BTreeSet<(JsonPointer, JsonPointer)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'v> DiffWalker<'v> {
    fn new(visitor: &'v dyn DiffVisitor) -> Self {
        Self {
            visitor,
            visited: BTreeSet::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in &diagnostics {
            trace!(rule = %diagnostic.rule, %diagnostic, "reported");
        }
        self.diagnostics.extend(diagnostics);
    }

    fn walk(&mut self, old: &OpenAPI, new: &OpenAPI) -> Result<(), StructuralError> {
        let old_paths = Context::new(DocumentSide::Old, old).append("paths");
        let new_paths = Context::new(DocumentSide::New, new).append("paths");
        let location = Location::new();

        let paths = Paired::new(old.paths.paths.iter(), new.paths.paths.iter());
        debug!(paths = paths.len(), "walking paths");

        for (key, (old_item, new_item)) in paths {
            let old_item = old_item
                .map(|item| resolve_path_item(item, &old_paths.append(key)))
                .transpose()?;
            let new_item = new_item
                .map(|item| resolve_path_item(item, &new_paths.append(key)))
                .transpose()?;

            self.walk_path(&location, key, old_item, new_item)?;
        }

        Ok(())
    }

    fn walk_path<'a>(
        &mut self,
        location: &Location,
        key: &str,
        old: Side<'a, PathItem>,
        new: Side<'a, PathItem>,
    ) -> Result<(), StructuralError> {
        let location = location.push(Segment::Path(key.to_string()));

        let diagnostics = self.visitor.accept_path(
            &location,
            key,
            old.as_deref().copied(),
            new.as_deref().copied(),
        );
        self.report(diagnostics);

        // Adding or removing the whole path is all there is to say.
        let (Some(old), Some(new)) = (old, new) else {
            return Ok(());
        };

        let old_operations = operations(&old);
        let new_operations = operations(&new);

        for (method, (old_op, new_op)) in Paired::new(old_operations, new_operations) {
            self.walk_operation(&location, method, (&old, old_op), (&new, new_op))?;
        }

        Ok(())
    }

    fn walk_operation<'a>(
        &mut self,
        location: &Location,
        method: &str,
        (old_path, old): (&Contextual<'a, &'a PathItem>, Side<'a, Operation>),
        (new_path, new): (&Contextual<'a, &'a PathItem>, Side<'a, Operation>),
    ) -> Result<(), StructuralError> {
        let location = location.push(Segment::Operation(method.to_string()));

        let diagnostics = self.visitor.accept_operation(
            &location,
            method,
            old.as_deref().copied(),
            new.as_deref().copied(),
        );
        self.report(diagnostics);

        let (Some(old), Some(new)) = (old, new) else {
            return Ok(());
        };

        let old_params = all_params(old_path, &old)?;
        let new_params = all_params(new_path, &new)?;
        for (name, (old_param, new_param)) in Paired::new(old_params, new_params) {
            let location = location
                .push(Segment::Parameter(name.to_string()))
                .within_request();
            self.visited.clear();

            let diagnostics = self.visitor.accept_parameter(
                &location,
                old_param.as_deref().copied(),
                new_param.as_deref().copied(),
            );
            self.report(diagnostics);
        }

        self.walk_request_body(&location, &old, &new)?;
        self.walk_responses(&location, &old, &new)?;

        Ok(())
    }

    fn walk_request_body<'a>(
        &mut self,
        location: &Location,
        old_operation: &Contextual<'a, &'a Operation>,
        new_operation: &Contextual<'a, &'a Operation>,
    ) -> Result<(), StructuralError> {
        let old_op: &'a Operation = **old_operation;
        let new_op: &'a Operation = **new_operation;
        let old_body: Side<'a, RequestBody> = resolve_side(
            old_op.request_body.as_ref(),
            &old_operation.context().append("requestBody"),
        )?;
        let new_body: Side<'a, RequestBody> = resolve_side(
            new_op.request_body.as_ref(),
            &new_operation.context().append("requestBody"),
        )?;

        let location = location.push(Segment::RequestBody).within_request();
        self.visited.clear();

        let diagnostics = self.visitor.accept_request_body(
            &location,
            old_body.as_deref().copied(),
            new_body.as_deref().copied(),
        );
        self.report(diagnostics);

        let (Some(old_body), Some(new_body)) = (old_body, new_body) else {
            return Ok(());
        };

        let old: &'a RequestBody = *old_body;
        let new: &'a RequestBody = *new_body;
        self.walk_content(
            &location,
            Contextual::new(old_body.context().append("content"), &old.content),
            Contextual::new(new_body.context().append("content"), &new.content),
        )
    }

    fn walk_responses<'a>(
        &mut self,
        location: &Location,
        old_operation: &Contextual<'a, &'a Operation>,
        new_operation: &Contextual<'a, &'a Operation>,
    ) -> Result<(), StructuralError> {
        let old_op: &'a Operation = **old_operation;
        let new_op: &'a Operation = **new_operation;
        let old_context = old_operation.context().append("responses");
        let new_context = new_operation.context().append("responses");

        let responses = Paired::new(response_entries(old_op), response_entries(new_op));

        for (status, (old, new)) in responses {
            let old: Side<'a, Response> = resolve_side(old, &old_context.append(&status))?;
            let new: Side<'a, Response> = resolve_side(new, &new_context.append(&status))?;
            self.walk_response(location, &status, old, new)?;
        }

        Ok(())
    }

    fn walk_response<'a>(
        &mut self,
        location: &Location,
        status: &str,
        old: Side<'a, Response>,
        new: Side<'a, Response>,
    ) -> Result<(), StructuralError> {
        let location = location
            .push(Segment::Response(status.to_string()))
            .within_response();
        self.visited.clear();

        let diagnostics = self.visitor.accept_response(
            &location,
            status,
            old.as_deref().copied(),
            new.as_deref().copied(),
        );
        self.report(diagnostics);

        let (Some(old), Some(new)) = (old, new) else {
            return Ok(());
        };

        let old_response: &'a Response = *old;
        let new_response: &'a Response = *new;
        self.walk_content(
            &location,
            Contextual::new(old.context().append("content"), &old_response.content),
            Contextual::new(new.context().append("content"), &new_response.content),
        )
    }

    fn walk_content<'a>(
        &mut self,
        location: &Location,
        old_content: Contextual<'a, &'a IndexMap<String, MediaType>>,
        new_content: Contextual<'a, &'a IndexMap<String, MediaType>>,
    ) -> Result<(), StructuralError> {
        let old_map: &'a IndexMap<String, MediaType> = *old_content;
        let new_map: &'a IndexMap<String, MediaType> = *new_content;

        for (key, (old, new)) in Paired::new(old_map.iter(), new_map.iter()) {
            let old = old.map(|media| Contextual::new(old_content.context().append(key), media));
            let new = new.map(|media| Contextual::new(new_content.context().append(key), media));
            self.walk_media_type(location, key, old, new)?;
        }

        Ok(())
    }

    fn walk_media_type<'a>(
        &mut self,
        location: &Location,
        key: &str,
        old: Side<'a, MediaType>,
        new: Side<'a, MediaType>,
    ) -> Result<(), StructuralError> {
        let location = location.push(Segment::MediaType(key.to_string()));

        let diagnostics = self.visitor.accept_media_type(
            &location,
            key,
            old.as_deref().copied(),
            new.as_deref().copied(),
        );
        self.report(diagnostics);

        let (Some(old), Some(new)) = (old, new) else {
            return Ok(());
        };

        let old_media: &'a MediaType = *old;
        let new_media: &'a MediaType = *new;
        if old_media.schema.is_none() && new_media.schema.is_none() {
            return Ok(());
        }

        let old_schema: Side<'a, Schema> =
            resolve_side(old_media.schema.as_ref(), &old.context().append("schema"))?;
        let new_schema: Side<'a, Schema> =
            resolve_side(new_media.schema.as_ref(), &new.context().append("schema"))?;

        self.walk_schema(&location, old_schema, new_schema)
    }
}

/// Responses keyed by status code, with `default` last.
fn response_entries(operation: &Operation) -> Vec<(String, &ReferenceOr<Response>)> {
    operation
        .responses
        .responses
        .iter()
        .map(|(status, response)| (status.to_string(), response))
        .chain(
            operation
                .responses
                .default
                .as_ref()
                .map(|response| ("default".to_string(), response)),
        )
        .collect()
}

/// Resolve a node that may be absent.
pub(crate) fn resolve_side<'a, R, T>(
    value: Option<&'a R>,
    context: &Context<'a>,
) -> Result<Side<'a, T>, StructuralError>
where
    R: ReferenceOrResolver<'a, T>,
{
    value.map(|value| value.resolve(context)).transpose()
}
