// Copyright 2025 Oxide Computer Company

//! Human-readable breadcrumbs for diagnostics.
//!
//! A [`Location`] is an immutable value: [`Location::push`] returns a new,
//! deeper location and leaves the original untouched. The walker hands each
//! recursion frame its own location, so whatever a frame pushed is gone as
//! soon as the frame returns, early returns and `?` included. The same holds
//! for the request and response flags.

use std::fmt;

use serde::{Serialize, Serializer};

/// One level of the traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Path(String),
    Operation(String),
    Parameter(String),
    RequestBody,
    Response(String),
    MediaType(String),
    Property(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Path(key) => write!(f, "Path {key}"),
            Segment::Operation(method) => write!(f, "Operation {}", method.to_uppercase()),
            Segment::Parameter(name) => write!(f, "Parameter {name}"),
            Segment::RequestBody => write!(f, "RequestBody"),
            Segment::Response(status) => write!(f, "Response {status}"),
            Segment::MediaType(key) => write!(f, "MediaType {key}"),
            Segment::Property(name) => write!(f, "Property {name}"),
        }
    }
}

/// Where the walker currently is, from the document root down.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    segments: Vec<Segment>,
    request: bool,
    response: bool,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// A location one level deeper.
    pub fn push(&self, segment: Segment) -> Location {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            segments,
            request: self.request,
            response: self.response,
        }
    }

    /// The same location, inside a request (parameters or request body).
    pub fn within_request(&self) -> Location {
        Self {
            request: true,
            ..self.clone()
        }
    }

    /// The same location, inside a response.
    pub fn within_response(&self) -> Location {
        Self {
            response: true,
            ..self.clone()
        }
    }

    pub fn is_request(&self) -> bool {
        self.request
    }

    pub fn is_response(&self) -> bool {
        self.response
    }

    /// Labels joined in traversal order, e.g.
    /// `Path /foo, Operation GET, Parameter bar`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
