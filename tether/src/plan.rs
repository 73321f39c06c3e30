//! Render-plan assembly: the engine's single entry point.

use crate::bounds::{container_for, ContainerRect};
use crate::config::{ConfigError, EngineConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use crate::endpoint::{resolve_endpoints, BoundsProvider};
use crate::geometry::limits;
use crate::handles::{control_handle_point, layout_handles, Handle};
use crate::marker::{MarkerCatalog, MarkerDef, MarkerKey};
use crate::model::{Connector, Side, Vec2};
use crate::path::{build_path, MarkerOrient, PathKind, PathSegment, PathShape};
use crate::svg::path_data;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    NonFiniteEndpoint { side: Side },
    NonFiniteGeometry,
    OutOfRange,
    /// The record itself could not be parsed.
    Malformed,
}

impl SkipReason {
    fn diagnostic(self) -> DiagnosticKind {
        match self {
            SkipReason::NonFiniteEndpoint { side } => DiagnosticKind::NonFiniteEndpoint { side },
            SkipReason::NonFiniteGeometry => DiagnosticKind::NonFiniteGeometry,
            SkipReason::OutOfRange => DiagnosticKind::OutOfRange,
            SkipReason::Malformed => DiagnosticKind::Malformed { message: "malformed connector record".into() },
        }
    }
}

/// One entry of a render pass as delivered by the host. A record that failed
/// to parse stays in the pass and is skipped on its own.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectorRecord {
    Valid(Connector),
    /// `id` is the record's id when it had a usable one, else `#<index>`.
    Malformed { id: String, message: String },
}

impl ConnectorRecord {
    pub fn id(&self) -> &str {
        match self {
            ConnectorRecord::Valid(c) => &c.id,
            ConnectorRecord::Malformed { id, .. } => id,
        }
    }
}

/// Draw-ready description of one connector for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub connector_id: String,
    pub z_index: i32,
    pub path_kind: PathKind,
    pub is_self_connection: bool,
    /// Relative to the board origin.
    pub container: ContainerRect,
    pub padding: f32,
    /// Path ends, container-local.
    pub start: Vec2,
    pub end: Vec2,
    pub segments: Vec<PathSegment>,
    /// `segments` as an SVG path string.
    pub path_data: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub marker_id: String,
    pub marker: MarkerDef,
    pub marker_orient: MarkerOrient,
    pub handles: Vec<Handle>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlanOutcome {
    Ready(RenderPlan),
    /// Leave this connector out of the current frame.
    Skip { reason: SkipReason },
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&RenderPlan> {
        match self {
            PlanOutcome::Ready(p) => Some(p),
            PlanOutcome::Skip { .. } => None,
        }
    }

    pub fn into_plan(self) -> Option<RenderPlan> {
        match self {
            PlanOutcome::Ready(p) => Some(p),
            PlanOutcome::Skip { .. } => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, PlanOutcome::Skip { .. })
    }
}

/// Everything but the marker; no caching involved.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanGeometry {
    pub shape: PathShape,
    pub is_self_connection: bool,
    pub container: ContainerRect,
    pub padding: f32,
    pub handles: Vec<Handle>,
}

fn in_range(p: Vec2) -> bool {
    limits::point_in_coord_bounds(p.x, p.y)
}

/// Resolve endpoints, build the path, size the container and lay out handles.
pub fn plan_geometry(
    connector: &Connector,
    board_origin: Vec2,
    bounds: &dyn BoundsProvider,
    config: &EngineConfig,
    report: &mut dyn FnMut(DiagnosticKind),
) -> Result<PlanGeometry, SkipReason> {
    let resolved = resolve_endpoints(connector, board_origin, bounds, report)?;

    let shape = build_path(&resolved, config.curve_tolerance);
    if !shape.is_finite() {
        return Err(SkipReason::NonFiniteGeometry);
    }
    let mut extent = shape.extent_points();
    extent.extend(resolved.control);
    if !extent.into_iter().all(in_range) {
        return Err(SkipReason::OutOfRange);
    }

    let handle_point = control_handle_point(&resolved, &shape);
    let (container, padding) = container_for(&shape, resolved.control, Some(handle_point), config);
    let corners = [container.top_left(), Vec2::new(container.x + container.width, container.y + container.height)];
    if !corners.iter().all(|p| p.is_finite()) {
        return Err(SkipReason::NonFiniteGeometry);
    }

    let handles = layout_handles(&resolved, &shape, &container, config.handle_size);
    Ok(PlanGeometry {
        shape,
        is_self_connection: resolved.is_self_connection,
        container,
        padding,
        handles,
    })
}

/// Connector geometry engine for one board.
///
/// Stateless apart from the marker catalog, which is owned here so two boards
/// never share marker ids.
pub struct ConnectorEngine {
    config: EngineConfig,
    markers: MarkerCatalog,
    sink: Box<dyn DiagnosticSink>,
}

impl Default for ConnectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorEngine {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            markers: MarkerCatalog::new(),
            sink: Box::new(TracingSink),
        }
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ..Self::new() })
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration. Cached markers are dropped since their
    /// paint may depend on the old selection color.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.markers.clear();
        Ok(())
    }

    pub fn markers(&self) -> &MarkerCatalog {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerCatalog {
        &mut self.markers
    }

    pub fn compute_render_plan(
        &mut self,
        connector: &Connector,
        board_origin: Vec2,
        is_selected: bool,
        bounds: &dyn BoundsProvider,
    ) -> PlanOutcome {
        let sink = &*self.sink;
        let mut report = |kind: DiagnosticKind| {
            sink.report(&Diagnostic { connector_id: connector.id.clone(), kind });
        };

        let geom = match plan_geometry(connector, board_origin, bounds, &self.config, &mut report) {
            Ok(g) => g,
            Err(reason) => {
                report(reason.diagnostic());
                return PlanOutcome::Skip { reason };
            }
        };

        let key = MarkerKey {
            connector_id: connector.id.clone(),
            arrow_head: connector.arrow_head,
            selected: is_selected,
            color: connector.color.clone(),
        };
        let marker = self.markers.lookup(key, &self.config.selection_color).clone();

        let local_origin = geom.container.top_left();
        let segments = geom.shape.segments(local_origin);
        let stroke = if is_selected { self.config.selection_color.clone() } else { connector.color.clone() };

        PlanOutcome::Ready(RenderPlan {
            connector_id: connector.id.clone(),
            z_index: connector.z_index,
            path_kind: geom.shape.kind(),
            is_self_connection: geom.is_self_connection,
            container: geom.container,
            padding: geom.padding,
            start: geom.container.to_local(geom.shape.start()),
            end: geom.container.to_local(geom.shape.end()),
            path_data: path_data(&segments),
            segments,
            stroke,
            stroke_width: self.config.stroke_width,
            marker_id: marker.id.clone(),
            marker,
            marker_orient: geom.shape.marker_orient(),
            handles: geom.handles,
        })
    }

    /// One render pass over a board's connectors. Outcomes are returned in
    /// input order; marker entries of connectors not in the pass are dropped.
    pub fn compute_render_plans(
        &mut self,
        connectors: &[Connector],
        board_origin: Vec2,
        is_selected: &dyn Fn(&str) -> bool,
        bounds: &dyn BoundsProvider,
    ) -> Vec<PlanOutcome> {
        let out: Vec<PlanOutcome> = connectors
            .iter()
            .map(|c| self.compute_render_plan(c, board_origin, is_selected(&c.id), bounds))
            .collect();
        self.prune_markers(connectors.iter().map(|c| c.id.as_str()));
        out
    }

    /// Render pass over raw snapshot records. Malformed records come back as
    /// `Skip { Malformed }` in their slot; the rest plan as usual.
    pub fn compute_render_records(
        &mut self,
        records: &[ConnectorRecord],
        board_origin: Vec2,
        is_selected: &dyn Fn(&str) -> bool,
        bounds: &dyn BoundsProvider,
    ) -> Vec<PlanOutcome> {
        let out: Vec<PlanOutcome> = records
            .iter()
            .map(|r| match r {
                ConnectorRecord::Valid(c) => self.compute_render_plan(c, board_origin, is_selected(&c.id), bounds),
                ConnectorRecord::Malformed { id, message } => {
                    self.sink.report(&Diagnostic {
                        connector_id: id.clone(),
                        kind: DiagnosticKind::Malformed { message: message.clone() },
                    });
                    PlanOutcome::Skip { reason: SkipReason::Malformed }
                }
            })
            .collect();
        self.prune_markers(records.iter().map(ConnectorRecord::id));
        out
    }

    fn prune_markers<'a>(&mut self, ids: impl Iterator<Item = &'a str>) {
        let live: HashSet<&str> = ids.collect();
        self.markers.retain_connectors(&live);
    }
}
