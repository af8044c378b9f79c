// Copyright 2025 Oxide Computer Company

use openapiv3::{ReferenceOr, Schema};
use tracing::trace;

use crate::{
    Location,
    context::Contextual,
    location::Segment,
    resolve::StructuralError,
    setops::Paired,
    shape::{SchemaShape, pair_enum_values},
    visitor::Property,
    walker::{DiffWalker, Side, resolve_side},
};

impl DiffWalker<'_> {
    /// Visit a pair of already-resolved schemas, then their items, enum values
    /// and properties.
    pub(crate) fn walk_schema<'a>(
        &mut self,
        location: &Location,
        old: Side<'a, Schema>,
        new: Side<'a, Schema>,
    ) -> Result<(), StructuralError> {
        if let (Some(old), Some(new)) = (&old, &new) {
            let key = (old.context().pointer().clone(), new.context().pointer().clone());
            if !self.visited.insert(key) {
                trace!(
                    old = %old.context().pointer(),
                    new = %new.context().pointer(),
                    "schema pair already visited"
                );
                return Ok(());
            }
        }

        let diagnostics = self.visitor.accept_schema(
            location,
            old.as_deref().copied(),
            new.as_deref().copied(),
        );
        self.report(diagnostics);

        let (Some(old), Some(new)) = (old, new) else {
            return Ok(());
        };

        let old_shape = SchemaShape::new(*old);
        let new_shape = SchemaShape::new(*new);

        if let (Some(old_items), Some(new_items)) = (old_shape.items, new_shape.items) {
            return self.walk_property(
                location,
                "items",
                (&old, old_items, false),
                (&new, new_items, false),
            );
        }

        for (old_value, new_value) in
            pair_enum_values(&old_shape.enumeration, &new_shape.enumeration)
        {
            let diagnostics = self
                .visitor
                .accept_enum_value(location, old_value, new_value);
            self.report(diagnostics);
        }

        let (Some(old_properties), Some(new_properties)) =
            (old_shape.properties, new_shape.properties)
        else {
            return Ok(());
        };

        let old_context = old.context().append("properties");
        let new_context = new.context().append("properties");

        for (name, (old_property, new_property)) in
            Paired::new(old_properties.iter(), new_properties.iter())
        {
            let location = location.push(Segment::Property(name.clone()));

            let old_property: Side<'a, Schema> =
                resolve_side(old_property, &old_context.append(name))?;
            let new_property: Side<'a, Schema> =
                resolve_side(new_property, &new_context.append(name))?;

            let diagnostics = self.visitor.accept_property(
                &location,
                name,
                old_property.as_ref().map(|schema| Property {
                    schema: **schema,
                    required: old_shape.is_required(name),
                }),
                new_property.as_ref().map(|schema| Property {
                    schema: **schema,
                    required: new_shape.is_required(name),
                }),
            );
            self.report(diagnostics);

            self.walk_schema(&location, old_property, new_property)?;
        }

        Ok(())
    }

    /// Visit a named sub-schema that is present on both sides.
    fn walk_property<'a>(
        &mut self,
        location: &Location,
        name: &str,
        (old_parent, old, old_required): (
            &Contextual<'a, &'a Schema>,
            &'a ReferenceOr<Box<Schema>>,
            bool,
        ),
        (new_parent, new, new_required): (
            &Contextual<'a, &'a Schema>,
            &'a ReferenceOr<Box<Schema>>,
            bool,
        ),
    ) -> Result<(), StructuralError> {
        let location = location.push(Segment::Property(name.to_string()));

        let old: Side<'a, Schema> = resolve_side(Some(old), &old_parent.context().append(name))?;
        let new: Side<'a, Schema> = resolve_side(Some(new), &new_parent.context().append(name))?;

        let diagnostics = self.visitor.accept_property(
            &location,
            name,
            old.as_ref().map(|schema| Property {
                schema: **schema,
                required: old_required,
            }),
            new.as_ref().map(|schema| Property {
                schema: **schema,
                required: new_required,
            }),
        );
        self.report(diagnostics);

        self.walk_schema(&location, old, new)
    }
}
