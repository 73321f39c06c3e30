use js_sys::{Array, Function, Reflect, JSON};
use tether_wasm::{resolve_edge_point, Engine};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js(s: &str) -> JsValue { JSON::parse(s).unwrap() }
fn get(v: &JsValue, k: &str) -> JsValue { Reflect::get(v, &JsValue::from_str(k)).unwrap() }
fn value(v: &JsValue) -> JsValue {
    assert_eq!(get(v, "ok").as_bool(), Some(true), "expected ok envelope");
    get(v, "value")
}

/// One 40x40 sticky at board (50, 50); anything else has vanished.
fn items() -> JsValue {
    Function::new_with_args(
        "id, type, origin",
        "if (id !== 'n' || type !== 'sticky') return null; \
         return {centerX: 50 - origin.x, centerY: 50 - origin.y, width: 40, height: 40};",
    )
    .into()
}

#[wasm_bindgen_test]
fn edge_point_is_exported() {
    let p = resolve_edge_point(0.0, 0.0, 100.0, 0.0, 20.0, 10.0);
    assert_eq!(get(&p, "x").as_f64(), Some(10.0));
    assert_eq!(get(&p, "y").as_f64(), Some(0.0));
}

#[wasm_bindgen_test]
fn straight_plan_round_trips_through_js() {
    let mut e = Engine::new();
    let c = js(r#"{"id":"a","origin":{"itemId":"n","itemType":"sticky"},"destination":{"x":300,"y":50}}"#);
    let plan = value(&e.compute_render_plan(c, 0.0, 0.0, false, items()));
    assert_eq!(get(&plan, "status").as_string().as_deref(), Some("ready"));
    assert_eq!(get(&plan, "pathKind").as_string().as_deref(), Some("straight"));
    assert_eq!(get(&plan, "markerId").as_string().as_deref(), Some("tether-arrow-a-filled"));
    assert_eq!(Array::from(&get(&plan, "handles")).length(), 2);
    assert_eq!(e.marker_count(), 1);

    let hit = value(&e.pick_handle(plan.clone(), 301.0, 50.0, 2.0));
    assert_eq!(hit.as_string().as_deref(), Some("destination"));
}

#[wasm_bindgen_test]
fn self_connection_loops() {
    let mut e = Engine::new();
    let c = js(r#"{"id":"s","origin":{"itemId":"n","itemType":"sticky"},"destination":{"itemId":"n","itemType":"sticky"}}"#);
    let plan = value(&e.compute_render_plan(c, 0.0, 0.0, true, items()));
    assert_eq!(get(&plan, "pathKind").as_string().as_deref(), Some("selfloop"));
    assert_eq!(get(&plan, "isSelfConnection").as_bool(), Some(true));
    assert_eq!(get(&plan, "stroke").as_string().as_deref(), Some("#2f80ed"));
}

#[wasm_bindgen_test]
fn throwing_callback_degrades_to_last_point() {
    let mut e = Engine::new();
    let boom: JsValue = Function::new_with_args("id, type, origin", "throw new Error('gone');").into();
    let c = js(r#"{"id":"t","origin":{"itemId":"n","itemType":"sticky","lastPoint":{"x":10,"y":10}},"destination":{"x":200,"y":10}}"#);
    let plan = value(&e.compute_render_plan(c, 0.0, 0.0, false, boom));
    assert_eq!(get(&plan, "status").as_string().as_deref(), Some("ready"));
    assert_eq!(Array::from(&get(&plan, "handles")).length(), 3);
}

#[wasm_bindgen_test]
fn render_pass_prunes_markers() {
    let mut e = Engine::new();
    let two = js(r#"[
        {"id":"a","origin":{"x":0,"y":0},"destination":{"x":100,"y":0}},
        {"id":"b","origin":{"x":0,"y":50},"destination":{"x":100,"y":50},"arrowHead":"line"}
    ]"#);
    let out = value(&e.compute_render_plans(two, 0.0, 0.0, js(r#"["b"]"#), items()));
    let out = Array::from(&out);
    assert_eq!(out.length(), 2);
    assert_eq!(get(&out.get(1), "stroke").as_string().as_deref(), Some("#2f80ed"));
    assert_eq!(e.marker_count(), 2);

    let one = js(r#"[{"id":"a","origin":{"x":0,"y":0},"destination":{"x":100,"y":0}}]"#);
    let _ = e.compute_render_plans(one, 0.0, 0.0, js("[]"), items());
    assert_eq!(e.marker_count(), 1);
    assert!(e.forget_connector("a"));
    assert!(!e.forget_connector("a"));
    assert_eq!(e.marker_count(), 0);
}

#[wasm_bindgen_test]
fn bad_records_skip_alone() {
    let mut e = Engine::new();
    let batch = js(r#"[
        {"id":"good","origin":{"x":0,"y":0},"destination":{"x":100,"y":0}},
        {"id":"ctrl","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"curveControlPoint":{"x":"12","y":3}},
        {"id":"nocolor","origin":{"x":0,"y":0},"destination":{"x":1,"y":1},"color":null},
        "not a connector",
        {"id":"also-good","origin":{"x":0,"y":50},"destination":{"x":100,"y":50}}
    ]"#);
    let out = Array::from(&value(&e.compute_render_plans(batch, 0.0, 0.0, js("[]"), items())));
    assert_eq!(out.length(), 5);
    assert_eq!(get(&out.get(0), "status").as_string().as_deref(), Some("ready"));
    assert_eq!(get(&out.get(4), "status").as_string().as_deref(), Some("ready"));
    for i in 1..4 {
        assert_eq!(get(&out.get(i), "status").as_string().as_deref(), Some("skip"));
        assert_eq!(get(&get(&out.get(i), "reason"), "kind").as_string().as_deref(), Some("malformed"));
    }
    assert_eq!(e.marker_count(), 2);
}

#[wasm_bindgen_test]
fn nan_endpoint_is_a_skip_not_an_error() {
    let mut e = Engine::new();
    let c = JSON::parse(r#"{"id":"n","origin":{"x":0,"y":0},"destination":{"x":1,"y":1}}"#).unwrap();
    Reflect::set(&get(&c, "destination"), &JsValue::from_str("x"), &JsValue::from_f64(f64::NAN)).unwrap();
    let out = value(&e.compute_render_plan(c, 0.0, 0.0, false, items()));
    assert_eq!(get(&out, "status").as_string().as_deref(), Some("skip"));
    assert_eq!(get(&get(&out, "reason"), "kind").as_string().as_deref(), Some("non_finite_endpoint"));
}

#[wasm_bindgen_test]
fn svg_fragment_is_a_string() {
    let mut e = Engine::new();
    let c = js(r#"{"id":"v","origin":{"x":0,"y":0},"destination":{"x":100,"y":40}}"#);
    let svg = value(&e.plan_svg(c, 0.0, 0.0, false, items(), true)).as_string().unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("marker-end"));
}
