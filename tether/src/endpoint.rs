//! Turns a connector's origin/destination descriptors into anchor points.

use crate::anchor::edge_point_toward;
use crate::diagnostics::DiagnosticKind;
use crate::model::{Connector, Endpoint, ItemRef, RectBounds, Side, Vec2};
use crate::plan::SkipReason;
use serde::Serialize;
use std::collections::HashMap;

/// Item geometry lookup supplied by the host's item system.
///
/// Implementations must tolerate stale ids and answer `None` for them.
pub trait BoundsProvider {
    /// Bounds of `item` relative to `board_origin`.
    fn resolve_bounds(&self, item: &ItemRef, board_origin: Vec2) -> Option<RectBounds>;
}

impl<F> BoundsProvider for F
where
    F: Fn(&ItemRef, Vec2) -> Option<RectBounds>,
{
    fn resolve_bounds(&self, item: &ItemRef, board_origin: Vec2) -> Option<RectBounds> {
        self(item, board_origin)
    }
}

/// Item rectangles stored in board space.
#[derive(Clone, Debug, Default)]
pub struct ItemBoundsMap {
    items: HashMap<ItemRef, RectBounds>,
}

impl ItemBoundsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ItemRef, bounds: RectBounds) -> Option<RectBounds> {
        self.items.insert(item, bounds)
    }

    pub fn with_item(
        mut self,
        item_id: &str,
        item_type: &str,
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        self.insert(ItemRef::new(item_id, item_type), RectBounds::new(center_x, center_y, width, height));
        self
    }

    pub fn remove(&mut self, item: &ItemRef) -> Option<RectBounds> {
        self.items.remove(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BoundsProvider for ItemBoundsMap {
    fn resolve_bounds(&self, item: &ItemRef, board_origin: Vec2) -> Option<RectBounds> {
        self.items.get(item).map(|b| RectBounds {
            center_x: b.center_x - board_origin.x,
            center_y: b.center_y - board_origin.y,
            ..*b
        })
    }
}

/// One end of a connector in relative space. `bounds` is set only when the
/// end is attached to an item that could be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResolvedEndpoint {
    pub point: Vec2,
    pub bounds: Option<RectBounds>,
}

impl ResolvedEndpoint {
    pub fn is_attached(&self) -> bool {
        self.bounds.is_some()
    }

    /// Where the opposite end aims: the item center, or the free point.
    fn aim(&self) -> Vec2 {
        self.bounds.map(|b| b.center()).unwrap_or(self.point)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedEndpoints {
    pub origin: ResolvedEndpoint,
    pub destination: ResolvedEndpoint,
    /// Explicit curve control point in relative space.
    pub control: Option<Vec2>,
    pub is_self_connection: bool,
    /// Board origin actually used (after sanitizing).
    pub board_origin: Vec2,
}

pub(crate) fn sanitize_origin(board_origin: Vec2, report: &mut dyn FnMut(DiagnosticKind)) -> Vec2 {
    if board_origin.is_finite() {
        board_origin
    } else {
        report(DiagnosticKind::InvalidBoardOrigin);
        Vec2::ZERO
    }
}

fn seed(
    end: &Endpoint,
    side: Side,
    origin: Vec2,
    bounds: &dyn BoundsProvider,
    report: &mut dyn FnMut(DiagnosticKind),
) -> Result<ResolvedEndpoint, SkipReason> {
    match end {
        Endpoint::Free(p) => {
            if !p.is_finite() {
                return Err(SkipReason::NonFiniteEndpoint { side });
            }
            Ok(ResolvedEndpoint { point: p.sub(origin), bounds: None })
        }
        Endpoint::Attached(att) => {
            match bounds.resolve_bounds(&att.item, origin) {
                Some(b) if b.is_usable() => {
                    return Ok(ResolvedEndpoint { point: b.center(), bounds: Some(b) });
                }
                Some(_) => report(DiagnosticKind::InvalidBounds { side }),
                None => report(DiagnosticKind::BoundsUnavailable { side }),
            }
            let point = att
                .last_point
                .filter(|p| p.is_finite())
                .map(|p| p.sub(origin))
                .unwrap_or(Vec2::ZERO);
            Ok(ResolvedEndpoint { point, bounds: None })
        }
    }
}

/// Resolve both ends of `connector`.
///
/// Attached ends aim at the explicit control point when there is one, else at
/// the other end's center (or free point). A self-connection is re-derived
/// here on every call from the current descriptors.
pub fn resolve_endpoints(
    connector: &Connector,
    board_origin: Vec2,
    bounds: &dyn BoundsProvider,
    report: &mut dyn FnMut(DiagnosticKind),
) -> Result<ResolvedEndpoints, SkipReason> {
    let origin_pt = sanitize_origin(board_origin, report);

    let control = match connector.curve_control_point {
        Some(p) if p.is_finite() => Some(p.sub(origin_pt)),
        Some(_) => {
            report(DiagnosticKind::InvalidControlPoint);
            None
        }
        None => None,
    };

    let mut origin = seed(&connector.origin, Side::Origin, origin_pt, bounds, report)?;
    let mut destination = seed(&connector.destination, Side::Destination, origin_pt, bounds, report)?;

    let origin_aim = control.unwrap_or_else(|| destination.aim());
    let destination_aim = control.unwrap_or_else(|| origin.aim());
    if let Some(b) = origin.bounds {
        origin.point = edge_point_toward(&b, origin_aim);
    }
    if let Some(b) = destination.bounds {
        destination.point = edge_point_toward(&b, destination_aim);
    }

    Ok(ResolvedEndpoints {
        origin,
        destination,
        control,
        is_self_connection: connector.references_same_item() && control.is_none(),
        board_origin: origin_pt,
    })
}
