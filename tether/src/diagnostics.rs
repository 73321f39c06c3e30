//! Reporting hook for silent degradations.
//!
//! Geometry never fails loudly on bad domain data; every substitution or
//! skipped frame is described by a [`Diagnostic`] and handed to the engine's
//! sink so hosts can log or count them.

use crate::model::Side;
use serde::Serialize;
use std::cell::RefCell;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    InvalidBoardOrigin,
    /// Bounds provider returned nothing for an attached item.
    BoundsUnavailable { side: Side },
    /// Bounds provider returned a rectangle that cannot anchor a connector.
    InvalidBounds { side: Side },
    InvalidControlPoint,
    NonFiniteEndpoint { side: Side },
    OutOfRange,
    NonFiniteGeometry,
    /// Snapshot record that could not be read as a connector.
    Malformed { message: String },
}

impl DiagnosticKind {
    /// True when the connector was dropped from the frame.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::NonFiniteEndpoint { .. }
                | DiagnosticKind::OutOfRange
                | DiagnosticKind::NonFiniteGeometry
                | DiagnosticKind::Malformed { .. }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub connector_id: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, d: &Diagnostic) {
        if d.kind.is_skip() {
            tracing::warn!(connector = %d.connector_id, kind = ?d.kind, "connector skipped for this frame");
        } else {
            tracing::debug!(connector = %d.connector_id, kind = ?d.kind, "substituted safe default");
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.seen.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.seen.borrow_mut().push(diagnostic.clone());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::rc::Rc<S> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}
