//! Strider Web - Browser entry point for the third-person movement demo
//!
//! This crate assembles the Bevy app and loads tunables for the page.

pub mod app;
pub mod config;

use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce wgpu noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let query = config::browser_query();
    let tunables = config::load_tunables(query.as_deref());
    app::run(tunables);
}
