pub mod model;
pub mod geometry {
    pub mod cubic;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod anchor;
pub mod bounds;
pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod handles;
pub mod json;
pub mod marker;
pub mod path;
pub mod plan;
pub mod svg;

pub use anchor::resolve_edge_point;
pub use config::{ConfigError, EngineConfig};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use endpoint::{BoundsProvider, ItemBoundsMap, ResolvedEndpoint, ResolvedEndpoints};
pub use handles::{Handle, HandleKind};
pub use marker::{MarkerCatalog, MarkerDef, MarkerShape};
pub use model::{ArrowHead, AttachedEnd, Connector, Endpoint, ItemRef, RectBounds, Side, Vec2};
pub use path::{MarkerOrient, PathKind, PathSegment};
pub use plan::{ConnectorEngine, ConnectorRecord, PlanOutcome, RenderPlan, SkipReason};
