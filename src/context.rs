// Copyright 2025 Oxide Computer Company

use std::{fmt, ops::Deref};

use openapiv3::OpenAPI;

use crate::path::JsonPointer;

/// Which of the two documents a node was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentSide {
    Old,
    New,
}

impl fmt::Display for DocumentSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSide::Old => write!(f, "old"),
            DocumentSide::New => write!(f, "new"),
        }
    }
}

/// One side of the comparison: the document being walked and the position of
/// the current node within it.
#[derive(Clone, Debug)]
pub(crate) struct Context<'a> {
    pub side: DocumentSide,
    pub document: &'a OpenAPI,
    pub pointer: JsonPointer,
}

impl<'a> Context<'a> {
    pub fn new(side: DocumentSide, document: &'a OpenAPI) -> Self {
        Self {
            side,
            document,
            pointer: JsonPointer::root(),
        }
    }

    pub fn append(&self, segment: &str) -> Context<'a> {
        Self {
            side: self.side,
            document: self.document,
            pointer: self.pointer.append(segment),
        }
    }

    /// Jump to the target of a reference.
    pub(crate) fn jump(&self, pointer: JsonPointer) -> Context<'a> {
        Self {
            side: self.side,
            document: self.document,
            pointer,
        }
    }

    pub fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A value paired with the context it was found in.
#[derive(Clone)]
pub(crate) struct Contextual<'a, T> {
    context: Context<'a>,
    value: T,
}

impl<'a, T> Contextual<'a, T> {
    pub fn new(context: Context<'a>, value: T) -> Self {
        Self { context, value }
    }

    pub fn context(&self) -> &Context<'a> {
        &self.context
    }
}

impl<T> Deref for Contextual<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> AsRef<T> for Contextual<'_, T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
