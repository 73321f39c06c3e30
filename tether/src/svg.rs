use crate::handles::HandleKind;
use crate::marker::{MarkerDef, MarkerShape};
use crate::model::Vec2;
use crate::path::{MarkerOrient, PathSegment};
use crate::plan::RenderPlan;
use std::fmt::Write;

pub fn path_data(segments: &[PathSegment]) -> String {
    let mut d = String::new();
    for seg in segments {
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = match seg {
            PathSegment::Move { to } => write!(d, "M {} {}", to.x, to.y),
            PathSegment::Line { to } => write!(d, "L {} {}", to.x, to.y),
            PathSegment::Cubic { c1, c2, to } => {
                write!(d, "C {} {}, {} {}, {} {}", c1.x, c1.y, c2.x, c2.y, to.x, to.y)
            }
            PathSegment::Arc { radius, large_arc, sweep, to } => write!(
                d,
                "A {r} {r} 0 {} {} {} {}",
                u8::from(*large_arc),
                u8::from(*sweep),
                to.x,
                to.y,
                r = radius
            ),
        };
    }
    d
}

fn points_attr(points: &[Vec2]) -> String {
    points.iter().map(|p| format!("{},{}", p.x, p.y)).collect::<Vec<_>>().join(" ")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

fn orient_attr(orient: MarkerOrient) -> String {
    match orient {
        MarkerOrient::Auto => "auto".to_string(),
        MarkerOrient::Fixed(deg) => format!("{}", deg),
    }
}

/// `<marker>` element for a marker definition, or `None` for `ArrowHead::None`.
pub fn marker_element(def: &MarkerDef, orient: MarkerOrient) -> Option<String> {
    let body = match &def.shape {
        MarkerShape::Empty => return None,
        MarkerShape::Chevron { points, stroke, stroke_width } => format!(
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            points_attr(points),
            escape_attr(stroke),
            stroke_width
        ),
        MarkerShape::Triangle { points, fill, stroke, stroke_width } => {
            let stroke_attr = match stroke {
                Some(s) => format!(r#" stroke="{}" stroke-width="{}""#, escape_attr(s), stroke_width),
                None => String::new(),
            };
            format!(
                r#"<polygon points="{}" fill="{}"{}/>"#,
                points_attr(points),
                escape_attr(fill),
                stroke_attr
            )
        }
    };
    Some(format!(
        r#"<marker id="{}" viewBox="0 0 {vb} {vb}" refX="{}" refY="{}" markerWidth="{sz}" markerHeight="{sz}" markerUnits="strokeWidth" orient="{}">{}</marker>"#,
        escape_attr(&def.id),
        def.ref_point.x,
        def.ref_point.y,
        orient_attr(orient),
        body,
        vb = def.view_box,
        sz = def.size,
    ))
}

/// Standalone `<svg>` fragment positioned at the plan's container, with
/// handles drawn when `with_handles` is set.
pub fn plan_to_svg(plan: &RenderPlan, with_handles: bool) -> String {
    let c = &plan.container;
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" x="{}" y="{}" width="{}" height="{}" overflow="visible">"#,
        c.x, c.y, c.width, c.height
    );
    let marker = marker_element(&plan.marker, plan.marker_orient);
    if let Some(m) = &marker {
        let _ = write!(out, "<defs>{}</defs>", m);
    }
    let marker_ref = if marker.is_some() {
        format!(r#" marker-end="url(#{})""#, escape_attr(&plan.marker_id))
    } else {
        String::new()
    };
    let _ = write!(
        out,
        r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
        plan.path_data,
        escape_attr(&plan.stroke),
        plan.stroke_width,
        marker_ref
    );
    if with_handles {
        for h in &plan.handles {
            let class = match h.kind {
                HandleKind::Origin => "handle origin",
                HandleKind::Destination => "handle destination",
                HandleKind::Control => "handle control",
            };
            let _ = write!(
                out,
                r#"<circle class="{}" cx="{}" cy="{}" r="{}"/>"#,
                class, h.local.x, h.local.y, h.radius
            );
        }
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_data_formats_each_command() {
        let segs = [
            PathSegment::Move { to: Vec2::new(0.0, 0.0) },
            PathSegment::Line { to: Vec2::new(10.0, 5.0) },
            PathSegment::Cubic { c1: Vec2::new(1.0, 2.0), c2: Vec2::new(3.0, 4.0), to: Vec2::new(5.0, 6.0) },
            PathSegment::Arc { radius: 40.0, large_arc: true, sweep: true, to: Vec2::new(7.5, 8.0) },
        ];
        assert_eq!(path_data(&segs), "M 0 0 L 10 5 C 1 2, 3 4, 5 6 A 40 40 0 1 1 7.5 8");
    }

    #[test]
    fn empty_marker_has_no_element() {
        let def = crate::marker::synthesize("c", crate::model::ArrowHead::None, false, "black");
        assert!(marker_element(&def, MarkerOrient::Auto).is_none());
        let def = crate::marker::synthesize("c", crate::model::ArrowHead::Filled, false, "black");
        let el = marker_element(&def, MarkerOrient::Fixed(-90.0)).unwrap();
        assert!(el.contains(r#"orient="-90""#));
        assert!(el.contains(r#"fill="black""#));
    }
}
