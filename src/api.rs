use crate::interop::{point, string_array};
use crate::{error, Engine};
use js_sys::{Array, Function, Reflect};
use std::collections::HashSet;
use tether::geometry::limits;
use tether::{BoundsProvider, Connector, ConnectorRecord, Diagnostic, DiagnosticSink, EngineConfig, ItemRef, RectBounds, Vec2};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Point where the ray from the rectangle center toward the target leaves
/// the rectangle, as `{x, y}`.
#[wasm_bindgen]
pub fn resolve_edge_point(cx: f32, cy: f32, tx: f32, ty: f32, w: f32, h: f32) -> JsValue {
    let p = tether::resolve_edge_point(cx, cy, tx, ty, w, h);
    point(p.x, p.y)
}

/// Forwards engine diagnostics to the browser console.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, d: &Diagnostic) {
        let text = serde_json::to_string(d).unwrap_or_else(|_| d.connector_id.clone());
        if d.kind.is_skip() {
            web_sys::console::warn_1(&JsValue::from_str(&format!("tether: skipped connector {}", text)));
        } else {
            web_sys::console::debug_1(&JsValue::from_str(&format!("tether: {}", text)));
        }
    }
}

/// Host callback `(itemId, itemType, boardOrigin) => {centerX, centerY, width, height} | null`.
struct JsBoundsProvider<'a> { f: &'a Function }

impl BoundsProvider for JsBoundsProvider<'_> {
    fn resolve_bounds(&self, item: &ItemRef, board_origin: Vec2) -> Option<RectBounds> {
        let out = self
            .f
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(&item.item_id),
                &JsValue::from_str(&item.item_type),
                &point(board_origin.x, board_origin.y),
            )
            .ok()?;
        if out.is_null() || out.is_undefined() {
            return None;
        }
        serde_wasm_bindgen::from_value::<RectBounds>(out).ok()
    }
}

fn callback(v: &JsValue) -> Result<&Function, JsValue> {
    v.dyn_ref::<Function>().ok_or_else(|| error::missing_callback("resolve_bounds"))
}

fn board_origin(x: f32, y: f32) -> Result<Vec2, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("origin_x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("origin_y"));
    }
    Ok(Vec2::new(x, y))
}

fn connector_from_js(v: JsValue) -> Result<Connector, String> {
    let c: Connector = serde_wasm_bindgen::from_value(v).map_err(|e| format!("{}", e))?;
    tether::json::check_id(&c).map_err(|e| format!("{}", e))?;
    Ok(c)
}

fn parse_connector(v: JsValue) -> Result<Connector, JsValue> {
    connector_from_js(v).map_err(error::invalid_connector)
}

/// Only a non-array or an oversized batch is an error; a bad element becomes
/// a malformed record and is skipped on its own.
fn parse_records(v: JsValue) -> Result<Vec<ConnectorRecord>, JsValue> {
    if !Array::is_array(&v) {
        return Err(error::invalid_connector("connectors must be an array"));
    }
    let list = Array::from(&v);
    let len = list.length() as usize;
    if len > limits::MAX_CONNECTORS_PER_PASS {
        return Err(error::out_of_range("connectors", 0.0, limits::MAX_CONNECTORS_PER_PASS as f32, len as f32));
    }
    Ok(list
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let id = Reflect::get(&item, &JsValue::from_str("id"))
                .ok()
                .and_then(|id| id.as_string())
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("#{}", i));
            match connector_from_js(item) {
                Ok(c) => ConnectorRecord::Valid(c),
                Err(message) => ConnectorRecord::Malformed { id, message },
            }
        })
        .collect())
}

fn to_js<T: serde::Serialize>(v: &T) -> JsValue {
    serde_wasm_bindgen::to_value(v).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        crate::Engine::rs_new()
    }

    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }

    /// Replace the configuration; missing fields take their defaults.
    pub fn set_config(&mut self, config: JsValue) -> JsValue {
        let cfg: EngineConfig = match serde_wasm_bindgen::from_value(config) {
            Ok(c) => c,
            Err(e) => return error::invalid_config(format!("{}", e)),
        };
        match self.inner.set_config(cfg) {
            Ok(()) => error::ok(to_js(self.inner.config())),
            Err(e) => error::invalid_config(e.to_string()),
        }
    }

    /// Plan one connector. The envelope's value is `{status: "ready", ...}`
    /// or `{status: "skip", reason}`; a skip is not an error.
    pub fn compute_render_plan(
        &mut self,
        connector: JsValue,
        origin_x: f32,
        origin_y: f32,
        selected: bool,
        resolve_bounds: JsValue,
    ) -> JsValue {
        let f = match callback(&resolve_bounds) {
            Ok(f) => f,
            Err(e) => return e,
        };
        let origin = match board_origin(origin_x, origin_y) {
            Ok(o) => o,
            Err(e) => return e,
        };
        let c = match parse_connector(connector) {
            Ok(c) => c,
            Err(e) => return e,
        };
        let out = self.inner.compute_render_plan(&c, origin, selected, &JsBoundsProvider { f });
        error::ok(to_js(&out))
    }

    /// One render pass. `selected_ids` is an array of connector ids. Elements
    /// that fail to parse come back as `{status: "skip", reason: {kind: "malformed"}}`.
    pub fn compute_render_plans(
        &mut self,
        connectors: JsValue,
        origin_x: f32,
        origin_y: f32,
        selected_ids: JsValue,
        resolve_bounds: JsValue,
    ) -> JsValue {
        let f = match callback(&resolve_bounds) {
            Ok(f) => f,
            Err(e) => return e,
        };
        let origin = match board_origin(origin_x, origin_y) {
            Ok(o) => o,
            Err(e) => return e,
        };
        let records = match parse_records(connectors) {
            Ok(r) => r,
            Err(e) => return e,
        };
        let selected: HashSet<String> = string_array(&selected_ids).into_iter().collect();
        let out = self.inner.compute_render_records(
            &records,
            origin,
            &|id| selected.contains(id),
            &JsBoundsProvider { f },
        );
        error::ok(to_js(&out))
    }

    /// Standalone SVG fragment for one connector, or `null` when it is skipped.
    pub fn plan_svg(
        &mut self,
        connector: JsValue,
        origin_x: f32,
        origin_y: f32,
        selected: bool,
        resolve_bounds: JsValue,
        with_handles: bool,
    ) -> JsValue {
        let f = match callback(&resolve_bounds) {
            Ok(f) => f,
            Err(e) => return e,
        };
        let origin = match board_origin(origin_x, origin_y) {
            Ok(o) => o,
            Err(e) => return e,
        };
        let c = match parse_connector(connector) {
            Ok(c) => c,
            Err(e) => return e,
        };
        let out = self.inner.compute_render_plan(&c, origin, selected, &JsBoundsProvider { f });
        match out.plan() {
            Some(plan) => error::ok(JsValue::from_str(&tether::svg::plan_to_svg(plan, with_handles))),
            None => error::ok(JsValue::NULL),
        }
    }

    /// Hit-test a plan's handles at a board-space point. Takes the plan
    /// object returned by `compute_render_plan`.
    pub fn pick_handle(&self, plan: JsValue, x: f32, y: f32, tol: f32) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if !tol.is_finite() {
            return error::non_finite("tol");
        }
        if tol < 0.0 {
            return error::out_of_range("tol", 0.0, f32::MAX, tol);
        }
        let handles: Vec<tether::Handle> = match Reflect::get(&plan, &JsValue::from_str("handles"))
            .ok()
            .and_then(|h| serde_wasm_bindgen::from_value(h).ok())
        {
            Some(h) => h,
            None => return error::err("invalid_plan", "plan has no handles", None),
        };
        match tether::handles::pick_handle(&handles, x, y, tol) {
            Some(h) => error::ok(to_js(&h.kind)),
            None => error::ok(JsValue::NULL),
        }
    }

    pub fn marker_count(&self) -> u32 {
        self.inner.markers().len() as u32
    }

    /// Drop the cached marker of a deleted connector.
    pub fn forget_connector(&mut self, id: &str) -> bool {
        self.inner.markers_mut().forget(id)
    }

    pub fn clear_markers(&mut self) {
        self.inner.markers_mut().clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
