//! Touch sparks - touch-reactive particle visualizer
//!
//! Touches spawn short-lived particles that drift, bounce off the surface
//! edges, shrink and fade. The simulation core in [`core`] is platform
//! agnostic; the egui/glow front end (features `wasm` and `native`) and the
//! headless CLI (feature `cli`) are thin hosts around it.

pub mod core;
pub mod headless;
pub mod time;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod gl;
#[cfg(feature = "gui")]
mod theme;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::SparksApp;
    use crate::core::SparksConfig;

    /// Optional JSON config injected by the hosting page
    const CONFIG_GLOBAL: &str = "__sparks_config";

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let config = page_config();
        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async move {
            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(move |cc| Ok(Box::new(SparksApp::new(cc, config, false)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }

    fn page_config() -> SparksConfig {
        let Some(json) = web_sys::window()
            .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str(CONFIG_GLOBAL)).ok())
            .and_then(|v| v.as_string())
        else {
            return SparksConfig::default();
        };
        SparksConfig::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring page config");
            SparksConfig::default()
        })
    }
}
