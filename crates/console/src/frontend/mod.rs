//! Leptos frontend: permission context, guarded routes and the landing page.

pub mod app;
pub mod context;
pub mod guard;

use wasm_bindgen::prelude::*;

/// WASM entry point for the frontend.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(app::App);
}
