use wasm_bindgen::prelude::*;
mod api;
pub mod error;
mod interop;

pub use api::{resolve_edge_point, set_panic_hook};

/// One board's connector engine, as seen from JavaScript.
#[wasm_bindgen]
pub struct Engine { pub(crate) inner: tether::ConnectorEngine }

impl Engine {
    pub fn rs_new() -> Engine {
        Engine { inner: tether::ConnectorEngine::new().with_sink(api::ConsoleSink) }
    }
}
