use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }

pub fn set_kv(obj: &Object, key: &str, val: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), val);
}

pub fn point(x: f32, y: f32) -> JsValue {
    let o = new_obj();
    set_kv(&o, "x", &JsValue::from_f64(x as f64));
    set_kv(&o, "y", &JsValue::from_f64(y as f64));
    o.into()
}

/// Strings of a JS array; non-string entries are skipped.
pub fn string_array(v: &JsValue) -> Vec<String> {
    if !Array::is_array(v) {
        return Vec::new();
    }
    Array::from(v).iter().filter_map(|s| s.as_string()).collect()
}
