// Copyright 2025 Oxide Computer Company

use indexmap::IndexMap;
use openapiv3::{Components, Parameter, PathItem, ReferenceOr, RequestBody, Response, Schema};
use thiserror::Error;

use crate::{
    context::{Context, Contextual, DocumentSide},
    path::JsonPointer,
};

/// A document is malformed in a way that makes comparison meaningless.
///
/// These abort the walk and are never reported as diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("unable to resolve reference {reference} in the {side} document (referenced at {at})")]
    UnresolvedReference {
        reference: String,
        side: DocumentSide,
        at: JsonPointer,
    },
    #[error("unsupported reference {reference} in the {side} document (referenced at {at})")]
    UnsupportedReference {
        reference: String,
        side: DocumentSide,
        at: JsonPointer,
    },
    #[error("reference {reference} in the {side} document refers back to itself (referenced at {at})")]
    ReferenceCycle {
        reference: String,
        side: DocumentSide,
        at: JsonPointer,
    },
}

/// Something that lives in one of the `components` tables.
pub(crate) trait Component: Sized {
    /// The key of the table under `#/components`.
    const TABLE: &'static str;

    fn table(components: &Components) -> &IndexMap<String, ReferenceOr<Self>>;
}

impl Component for Schema {
    const TABLE: &'static str = "schemas";

    fn table(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.schemas
    }
}

impl Component for Parameter {
    const TABLE: &'static str = "parameters";

    fn table(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.parameters
    }
}

impl Component for RequestBody {
    const TABLE: &'static str = "requestBodies";

    fn table(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.request_bodies
    }
}

impl Component for Response {
    const TABLE: &'static str = "responses";

    fn table(components: &Components) -> &IndexMap<String, ReferenceOr<Self>> {
        &components.responses
    }
}

pub(crate) trait ReferenceOrResolver<'a, T> {
    /// Produce the materialized item along with a context positioned at it.
    ///
    /// For references the context jumps to the component, otherwise it is the
    /// context given.
    fn resolve(
        &'a self,
        context: &Context<'a>,
    ) -> Result<Contextual<'a, &'a T>, StructuralError>;
}

impl<'a, T> ReferenceOrResolver<'a, T> for ReferenceOr<T>
where
    T: Component,
{
    fn resolve(
        &'a self,
        context: &Context<'a>,
    ) -> Result<Contextual<'a, &'a T>, StructuralError> {
        match self {
            ReferenceOr::Item(item) => Ok(Contextual::new(context.clone(), item)),
            ReferenceOr::Reference { reference } => follow(reference, context),
        }
    }
}

impl<'a> ReferenceOrResolver<'a, Schema> for ReferenceOr<Box<Schema>> {
    fn resolve(
        &'a self,
        context: &Context<'a>,
    ) -> Result<Contextual<'a, &'a Schema>, StructuralError> {
        match self {
            ReferenceOr::Item(item) => Ok(Contextual::new(context.clone(), item.as_ref())),
            ReferenceOr::Reference { reference } => follow(reference, context),
        }
    }
}

/// Path items have no component table, so a referenced path item cannot be
/// resolved.
pub(crate) fn resolve_path_item<'a>(
    path_item: &'a ReferenceOr<PathItem>,
    context: &Context<'a>,
) -> Result<Contextual<'a, &'a PathItem>, StructuralError> {
    match path_item {
        ReferenceOr::Item(item) => Ok(Contextual::new(context.clone(), item)),
        ReferenceOr::Reference { reference } => Err(StructuralError::UnsupportedReference {
            reference: reference.clone(),
            side: context.side,
            at: context.pointer().clone(),
        }),
    }
}

fn follow<'a, T>(
    reference: &'a str,
    context: &Context<'a>,
) -> Result<Contextual<'a, &'a T>, StructuralError>
where
    T: Component,
{
    let at = context.pointer().clone();
    let mut target = reference;
    let mut seen = Vec::new();

    loop {
        let pointer = component_pointer::<T>(target).ok_or_else(|| {
            StructuralError::UnsupportedReference {
                reference: target.to_string(),
                side: context.side,
                at: at.clone(),
            }
        })?;

        if seen.contains(&pointer) {
            return Err(StructuralError::ReferenceCycle {
                reference: reference.to_string(),
                side: context.side,
                at,
            });
        }

        let item = context
            .document
            .components
            .as_ref()
            .and_then(|components| {
                let name = pointer.segments().nth(2)?;
                T::table(components).get(name.as_ref())
            })
            .ok_or_else(|| StructuralError::UnresolvedReference {
                reference: target.to_string(),
                side: context.side,
                at: at.clone(),
            })?;

        match item {
            ReferenceOr::Item(item) => return Ok(Contextual::new(context.jump(pointer), item)),
            ReferenceOr::Reference { reference: next } => {
                seen.push(pointer);
                target = next;
            }
        }
    }
}

/// Parse `#/components/<table>/<name>` for the table `T` lives in.
fn component_pointer<T: Component>(reference: &str) -> Option<JsonPointer> {
    let pointer = JsonPointer::parse(reference)?;
    let segments = pointer.segments().collect::<Vec<_>>();
    match segments.as_slice() {
        [components, table, _name] if components == "components" && table == T::TABLE => {
            Some(pointer.clone())
        }
        _ => None,
    }
}
